//! 64-bit still-image fingerprints backed by `image_hasher`.
//!
//! The DCT kind matches the classic pHash recipe: the image is reduced,
//! transformed with a DCT, the low-frequency 8x8 block is kept and each
//! coefficient becomes one bit by comparing it against the block mean.

use super::traits::{HashAlgorithmKind, ImageHasher, PerceptualHash};
use crate::error::HashError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig as ImageHasherConfig};

/// Grid side; 8x8 = 64 bits
const GRID: u32 = 8;

/// Still-image hasher producing one `PerceptualHash` per image
pub struct FingerprintHasher {
    kind: HashAlgorithmKind,
    hasher: image_hasher::Hasher,
}

impl FingerprintHasher {
    /// Create a hasher for the given algorithm
    pub fn new(kind: HashAlgorithmKind) -> Self {
        let config = ImageHasherConfig::new().hash_size(GRID, GRID);
        let config = match kind {
            HashAlgorithmKind::Dct => config.hash_alg(HashAlg::Mean).preproc_dct(),
            HashAlgorithmKind::Average => config.hash_alg(HashAlg::Mean),
            HashAlgorithmKind::Difference => config.hash_alg(HashAlg::Gradient),
        };

        Self {
            kind,
            hasher: config.to_hasher(),
        }
    }
}

impl Default for FingerprintHasher {
    fn default() -> Self {
        Self::new(HashAlgorithmKind::Dct)
    }
}

impl ImageHasher for FingerprintHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<PerceptualHash, HashError> {
        let hash = self.hasher.hash_image(image);
        let bytes: [u8; 8] = hash.as_bytes().try_into().map_err(|_| {
            HashError::ComputationFailed(format!(
                "{} produced {} bytes, expected 8",
                self.kind,
                hash.as_bytes().len()
            ))
        })?;

        Ok(PerceptualHash::new(u64::from_be_bytes(bytes)))
    }

    fn kind(&self) -> HashAlgorithmKind {
        self.kind
    }
}
