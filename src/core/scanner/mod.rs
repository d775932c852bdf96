//! # Scanner Module
//!
//! Discovers hashable media files in directories.
//!
//! ## Supported Extensions
//! jpg, jpeg, png, webp, gif, bmp, tiff, tif (case-insensitive)
//!
//! ## Example
//! ```rust,ignore
//! use phash_compare::core::scanner::{MediaScanner, ScanConfig};
//!
//! let scanner = MediaScanner::new(ScanConfig::default());
//! let result = scanner.scan(&["/media/library".into()]);
//! ```

mod walker;

pub use walker::{MediaScanner, ScanConfig};

use crate::core::hasher::MediaFormat;
use crate::error::ScanError;
use serde::Serialize;
use std::path::PathBuf;

/// A discovered media file
#[derive(Debug, Clone, Serialize)]
pub struct MediaFile {
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    #[serde(skip)]
    pub format: MediaFormat,
}

/// Result of a scan. Errors are non-fatal and collected alongside the files.
#[derive(Debug)]
pub struct ScanResult {
    /// Discovered files, sorted by path
    pub files: Vec<MediaFile>,
    pub errors: Vec<ScanError>,
}
