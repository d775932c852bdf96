//! Threshold checks and comparison strategies.

use super::distance::distance;
use super::{HashDistance, MatchType, MAX_DISTANCE};
use crate::core::hasher::PerceptualHash;
use crate::error::CompareError;

/// Reject thresholds outside `0..=64`
pub fn validate_threshold(threshold: u32) -> Result<u32, CompareError> {
    if threshold > MAX_DISTANCE {
        return Err(CompareError::InvalidThreshold { value: threshold });
    }
    Ok(threshold)
}

/// `distance(a, b) <= threshold`, for a threshold in `0..=64`.
pub fn within_threshold(
    a: PerceptualHash,
    b: PerceptualHash,
    threshold: u32,
) -> Result<bool, CompareError> {
    let threshold = validate_threshold(threshold)?;
    Ok(distance(a, b) <= threshold)
}

/// Strategy trait for deciding whether two hashes match
pub trait ComparisonStrategy: Send + Sync {
    /// Whether a pair at this distance counts as a match
    fn is_match(&self, distance: HashDistance) -> bool;

    /// Classify the match type based on distance
    fn classify(&self, distance: HashDistance) -> MatchType;

    /// Get the threshold used
    fn threshold(&self) -> u32;

    /// Human-readable description of the strategy
    fn description(&self) -> String;
}

/// Simple threshold-based comparison strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdStrategy {
    /// Maximum distance to consider a match, always within 0..=64
    threshold: u32,
}

impl ThresholdStrategy {
    /// Create a new threshold strategy
    ///
    /// Recommended thresholds:
    /// - 5: Conservative, few false positives
    /// - 8: Balanced (default)
    /// - 10: Permissive, catches more near-duplicates
    pub fn new(threshold: u32) -> Result<Self, CompareError> {
        Ok(Self {
            threshold: validate_threshold(threshold)?,
        })
    }

    /// Create a conservative strategy (threshold = 5)
    pub fn conservative() -> Self {
        Self { threshold: 5 }
    }

    /// Create a balanced strategy (threshold = 8)
    pub fn balanced() -> Self {
        Self { threshold: 8 }
    }

    /// Create a permissive strategy (threshold = 10)
    pub fn permissive() -> Self {
        Self { threshold: 10 }
    }
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::balanced()
    }
}

impl ComparisonStrategy for ThresholdStrategy {
    fn is_match(&self, distance: HashDistance) -> bool {
        distance <= self.threshold
    }

    fn classify(&self, distance: HashDistance) -> MatchType {
        MatchType::from_distance(distance)
    }

    fn threshold(&self) -> u32 {
        self.threshold
    }

    fn description(&self) -> String {
        format!(
            "Threshold strategy: hashes with distance <= {} match",
            self.threshold
        )
    }
}
