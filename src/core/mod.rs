//! # Core Module
//!
//! ## Modules
//! - `hasher` - Computes 64-bit perceptual hashes of images and frame sequences
//! - `comparator` - Hamming distance, threshold checks, nearest-neighbour search
//! - `scanner` - Discovers media files in directories
//! - `pipeline` - Batch hashing plus grouping or search

pub mod comparator;
pub mod hasher;
pub mod pipeline;
pub mod scanner;

// Re-export commonly used types
pub use comparator::{
    distance, nearest_neighbors, within_threshold, DuplicateGroup, HashCollection, HashDistance,
    MatchType, Neighbor,
};
pub use hasher::{compute_image_hash, compute_video_hash, HashAlgorithmKind, PerceptualHash};
