//! Core hash value type and the hashing collaborator trait.

use super::decode::MediaDecoder;
use crate::core::comparator::{self, HashDistance, MAX_DISTANCE};
use crate::error::{CompareError, HashError};
use image::DynamicImage;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A 64-bit perceptual hash.
///
/// Opaque to the comparator: the 64 bits are compared only through bitwise
/// operations, never interpreted. Plain `Copy` value, immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PerceptualHash(u64);

impl PerceptualHash {
    /// Wrap raw hash bits
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// The raw hash bits
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Hamming distance to another hash
    pub fn distance(self, other: Self) -> HashDistance {
        comparator::distance(self, other)
    }

    /// Similarity as a percentage (0-100)
    pub fn similarity(self, other: Self) -> f64 {
        (1.0 - self.distance(other) as f64 / MAX_DISTANCE as f64) * 100.0
    }

    /// Fixed-width lower-case hexadecimal rendering (16 digits)
    pub fn to_hex(self) -> String {
        format!("{:016x}", self.0)
    }
}

impl From<u64> for PerceptualHash {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl From<PerceptualHash> for u64 {
    fn from(hash: PerceptualHash) -> Self {
        hash.0
    }
}

impl fmt::Display for PerceptualHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::LowerHex for PerceptualHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl FromStr for PerceptualHash {
    type Err = CompareError;

    /// Parse up to 16 hex digits, with an optional `0x` prefix
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let invalid = |reason: &str| CompareError::InvalidHash {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        if digits.is_empty() {
            return Err(invalid("no hex digits"));
        }
        if digits.len() > 16 {
            return Err(invalid("more than 16 hex digits"));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid("not a hexadecimal number"));
        }

        u64::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|e| invalid(&e.to_string()))
    }
}

// Hashes travel as hex strings so JSON consumers never round a u64 through f64.
impl Serialize for PerceptualHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PerceptualHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Available hash algorithms. Every kind yields exactly 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HashAlgorithmKind {
    /// DCT hash (pHash) - mean-thresholded low-frequency DCT coefficients
    #[default]
    Dct,
    /// Average Hash (aHash) - pixels thresholded against mean brightness
    Average,
    /// Difference Hash (dHash) - brightness gradients between neighbours
    Difference,
}

impl HashAlgorithmKind {
    /// Get a human-readable description of the algorithm
    pub fn description(&self) -> &'static str {
        match self {
            HashAlgorithmKind::Dct => {
                "DCT Hash (pHash) - robust to scaling, compression and small edits"
            }
            HashAlgorithmKind::Average => {
                "Average Hash (aHash) - fast comparison based on average brightness"
            }
            HashAlgorithmKind::Difference => {
                "Difference Hash (dHash) - compares brightness gradients between pixels"
            }
        }
    }
}

impl fmt::Display for HashAlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithmKind::Dct => write!(f, "pHash"),
            HashAlgorithmKind::Average => write!(f, "aHash"),
            HashAlgorithmKind::Difference => write!(f, "dHash"),
        }
    }
}

/// Computes 64-bit fingerprints of still images
pub trait ImageHasher: Send + Sync {
    /// Compute a hash from an already-decoded image
    fn hash_image(&self, image: &DynamicImage) -> Result<PerceptualHash, HashError>;

    /// Decode a file and hash it
    fn hash_file(&self, path: &Path) -> Result<PerceptualHash, HashError> {
        let image = MediaDecoder::decode(path)?;
        self.hash_image(&image)
    }

    /// Get the algorithm kind
    fn kind(&self) -> HashAlgorithmKind;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_fixed_width() {
        assert_eq!(PerceptualHash::new(0xff).to_hex(), "00000000000000ff");
        assert_eq!(PerceptualHash::new(u64::MAX).to_string(), "ffffffffffffffff");
    }

    #[test]
    fn parses_with_and_without_prefix() {
        let expected = PerceptualHash::new(0xdead_beef);
        assert_eq!("deadbeef".parse::<PerceptualHash>().unwrap(), expected);
        assert_eq!("0xDEADBEEF".parse::<PerceptualHash>().unwrap(), expected);
        assert_eq!(" 00000000deadbeef ".parse::<PerceptualHash>().unwrap(), expected);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!("".parse::<PerceptualHash>().is_err());
        assert!("0x".parse::<PerceptualHash>().is_err());
        assert!("+ff".parse::<PerceptualHash>().is_err());
        assert!("xyz".parse::<PerceptualHash>().is_err());
        assert!("1ffffffffffffffff".parse::<PerceptualHash>().is_err());
    }

    #[test]
    fn display_and_parse_agree() {
        for bits in [0, 1, 0x0f0f_0f0f_0f0f_0f0f, u64::MAX] {
            let hash = PerceptualHash::new(bits);
            assert_eq!(hash.to_string().parse::<PerceptualHash>().unwrap(), hash);
        }
    }

    #[test]
    fn serializes_as_hex_string() {
        let hash = PerceptualHash::new(0x8000_0000_0000_0001);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, "\"8000000000000001\"");

        let back: PerceptualHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }

    #[test]
    fn similarity_bounds() {
        let a = PerceptualHash::new(0);
        let b = PerceptualHash::new(u64::MAX);
        assert_eq!(a.similarity(a), 100.0);
        assert_eq!(a.similarity(b), 0.0);
    }

    #[test]
    fn algorithm_kind_display() {
        assert_eq!(HashAlgorithmKind::Dct.to_string(), "pHash");
        assert_eq!(HashAlgorithmKind::Average.to_string(), "aHash");
        assert_eq!(HashAlgorithmKind::Difference.to_string(), "dHash");
        assert_eq!(HashAlgorithmKind::default(), HashAlgorithmKind::Dct);
    }
}
