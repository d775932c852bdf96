//! # Error Module
//!
//! Error types for perceptual hashing and hash comparison.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, offending values, what went wrong
//! - **Hashing errors are per file** - a file that failed to decode will
//!   fail again, so batch callers skip it and move on

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum PhashError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while discovering media files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the hash computation collaborator
///
/// Never raised by the comparator itself.
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Unsupported media format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Failed to decode {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Media is empty or has no frames: {path}")]
    EmptyMedia { path: PathBuf },

    #[error("Hash computation failed: {0}")]
    ComputationFailed(String),

    #[error("Failed to open media file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by hash comparison and collections
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error("Invalid threshold: {value} (must be 0-64)")]
    InvalidThreshold { value: u32 },

    #[error("Identifier {id} is already present in the collection")]
    DuplicateIdentifier { id: String },

    #[error("Invalid hash '{input}': {reason}")]
    InvalidHash { input: String, reason: String },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, PhashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_error_includes_path() {
        let error = HashError::DecodeError {
            path: PathBuf::from("/media/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/media/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
    }

    #[test]
    fn invalid_threshold_names_range() {
        let message = CompareError::InvalidThreshold { value: 65 }.to_string();
        assert!(message.contains("65"));
        assert!(message.contains("0-64"));
    }

    #[test]
    fn compare_error_converts_to_top_level() {
        let error: PhashError = CompareError::InvalidThreshold { value: 99 }.into();
        assert!(matches!(error, PhashError::Compare(_)));
    }
}
