//! # phash-compare
//!
//! 64-bit perceptual hash fingerprints and fast Hamming comparison.
//!
//! ## Architecture
//! - `core::hasher` - produces hashes from images and frame sequences
//! - `core::comparator` - compares hashes: SWAR Hamming distance, threshold
//!   checks, stable nearest-neighbour search, duplicate grouping
//! - `core::pipeline` - batch hashing over directories
//! - `events` - channel-based progress reporting
//! - `error` - typed errors
//!
//! ## Example
//! ```rust
//! use phash_compare::core::{distance, nearest_neighbors, HashCollection, PerceptualHash};
//!
//! let a = PerceptualHash::new(0x0F0F_0F0F_0F0F_0F0F);
//! let b = PerceptualHash::new(0xF0F0_F0F0_F0F0_F0F0);
//! assert_eq!(distance(a, b), 64);
//!
//! let collection = HashCollection::try_from_pairs([("a", a), ("b", b)]).unwrap();
//! let hits = nearest_neighbors(a, &collection, 1);
//! assert_eq!(hits[0].id, "a");
//! ```

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{PhashError, Result};

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`.
///
/// Called by the binary; a subscriber that is already installed is left alone.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
