//! # Hasher Module
//!
//! Computes 64-bit perceptual hashes for images and frame sequences.
//! This is the collaborator that produces hashes; the comparator only ever
//! sees the resulting `PerceptualHash` values.
//!
//! ## Supported Algorithms
//! - **pHash (DCT)** - Most robust, handles edits well (default)
//! - **aHash (Average)** - Fastest, good for exact duplicates
//! - **dHash (Difference)** - Compares brightness gradients
//!
//! ## Example
//! ```rust,ignore
//! use phash_compare::core::hasher::{HasherConfig, HashAlgorithmKind};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(HashAlgorithmKind::Dct)
//!     .build_image();
//! let hash = hasher.hash_file(&path)?;
//!
//! let frames = HasherConfig::new().frame_stride(5).build_frames()?;
//! let hashes = frames.hash_file(&clip)?;
//! ```

mod decode;
mod fingerprint;
mod frames;
mod traits;

pub use decode::{MediaDecoder, MediaFormat};
pub use fingerprint::FingerprintHasher;
pub use frames::FrameSequenceHasher;
pub use traits::{HashAlgorithmKind, ImageHasher, PerceptualHash};

use crate::error::{HashError, PhashError};
use std::path::Path;

/// Configuration builder for hashers
#[derive(Debug, Clone)]
pub struct HasherConfig {
    /// Algorithm to use
    algorithm: HashAlgorithmKind,
    /// Hash every n-th frame of a sequence
    frame_stride: usize,
    /// Upper bound on hashes per sequence
    max_frames: Option<usize>,
}

impl HasherConfig {
    /// Create a new hasher configuration with defaults
    pub fn new() -> Self {
        Self {
            algorithm: HashAlgorithmKind::Dct,
            frame_stride: 1,
            max_frames: None,
        }
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Hash every n-th frame of a sequence (must be at least 1)
    pub fn frame_stride(mut self, stride: usize) -> Self {
        self.frame_stride = stride;
        self
    }

    /// Stop after this many frame hashes
    pub fn max_frames(mut self, max: Option<usize>) -> Self {
        self.max_frames = max;
        self
    }

    /// Build a still-image hasher
    pub fn build_image(&self) -> Box<dyn ImageHasher> {
        Box::new(FingerprintHasher::new(self.algorithm))
    }

    /// Build a frame-sequence hasher
    pub fn build_frames(&self) -> Result<FrameSequenceHasher, PhashError> {
        if self.frame_stride == 0 {
            return Err(PhashError::Config(
                "frame stride must be at least 1".to_string(),
            ));
        }
        if self.max_frames == Some(0) {
            return Err(PhashError::Config(
                "max frames must be at least 1".to_string(),
            ));
        }

        Ok(FrameSequenceHasher::new(
            self.build_image(),
            self.frame_stride,
            self.max_frames,
        ))
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the DCT hash of an image file with the default configuration
pub fn compute_image_hash(path: &Path) -> Result<PerceptualHash, HashError> {
    FingerprintHasher::default().hash_file(path)
}

/// Compute one DCT hash per frame of a frame sequence with the default configuration
pub fn compute_video_hash(path: &Path) -> Result<Vec<PerceptualHash>, HashError> {
    FrameSequenceHasher::new(Box::new(FingerprintHasher::default()), 1, None).hash_file(path)
}
