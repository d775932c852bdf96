//! # Events Module
//!
//! Channel-based progress reporting for batch hashing and comparison.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Hash(HashEvent::Progress(p)) = event {
//!             println!("Hashed {}/{}", p.completed, p.total);
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
