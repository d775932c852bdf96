//! Directory walking implementation using walkdir.

use super::{MediaFile, ScanResult};
use crate::core::hasher::MediaFormat;
use crate::error::ScanError;
use crate::events::{null_sender, Event, EventSender, ScanEvent};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const DEFAULT_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "tif"];

/// Configuration for the directory scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Custom extensions to include (None = use defaults)
    pub extensions: Option<Vec<String>>,
}

/// Scanner implementation using the walkdir crate
pub struct MediaScanner {
    config: ScanConfig,
    extensions: HashSet<String>,
}

impl MediaScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let extensions = match &config.extensions {
            Some(custom) => custom.iter().map(|e| e.to_lowercase()).collect(),
            None => DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        };

        Self { config, extensions }
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.config.include_hidden && is_hidden(path) {
            return false;
        }

        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }

    /// Scan directories without progress events
    pub fn scan(&self, paths: &[PathBuf]) -> ScanResult {
        self.scan_with_events(paths, &null_sender())
    }

    /// Scan directories, reporting non-fatal errors as events.
    pub fn scan_with_events(&self, paths: &[PathBuf], events: &EventSender) -> ScanResult {
        events.send(Event::Scan(ScanEvent::Started {
            paths: paths.to_vec(),
        }));

        let mut files = Vec::new();
        let mut errors = Vec::new();

        for root in paths {
            if !root.is_dir() {
                errors.push(ScanError::DirectoryNotFound { path: root.clone() });
                continue;
            }
            self.scan_directory(root, &mut files, &mut errors);
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup_by(|a, b| a.path == b.path);

        for error in &errors {
            tracing::warn!(error = %error, "scan error");
            let path = match error {
                ScanError::DirectoryNotFound { path } | ScanError::ReadDirectory { path, .. } => {
                    path.clone()
                }
            };
            events.send(Event::Scan(ScanEvent::Error {
                path,
                message: error.to_string(),
            }));
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_files: files.len(),
        }));
        tracing::debug!(files = files.len(), errors = errors.len(), "scan finished");

        ScanResult { files, errors }
    }

    fn scan_directory(&self, root: &Path, files: &mut Vec<MediaFile>, errors: &mut Vec<ScanError>) {
        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.config.include_hidden;
        let entries = walker
            .into_iter()
            .filter_entry(|entry| include_hidden || entry.depth() == 0 || !is_hidden_entry(entry));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                    errors.push(ScanError::ReadDirectory {
                        path,
                        source: e
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.should_include(entry.path()) {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => files.push(MediaFile {
                    path: entry.path().to_path_buf(),
                    size: metadata.len(),
                    format: MediaFormat::from_path(entry.path()),
                }),
                Err(e) => errors.push(ScanError::ReadDirectory {
                    path: entry.path().to_path_buf(),
                    source: e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("metadata unavailable")),
                }),
            }
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn is_hidden_entry(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
