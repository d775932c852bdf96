//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by batch hashing and comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Media discovery events
    Scan(ScanEvent),
    /// Hashing phase events
    Hash(HashEvent),
    /// Comparison phase events
    Compare(CompareEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during media discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    Started { paths: Vec<PathBuf> },
    /// A path could not be read; scanning continues
    Error { path: PathBuf, message: String },
    Completed { total_files: usize },
}

/// Events during the hashing phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashEvent {
    Started { total_files: usize },
    Progress(HashProgress),
    /// A file failed to hash and was skipped
    Error { path: PathBuf, message: String },
    Completed { total_hashed: usize, failures: usize },
}

/// Progress information during hashing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashProgress {
    /// Number of files processed so far (hashed or failed)
    pub completed: usize,
    /// Total number of files to hash
    pub total: usize,
    /// File just processed
    pub current_path: PathBuf,
}

/// Events during pairwise comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CompareEvent {
    Started { total_hashes: usize },
    Progress(CompareProgress),
    Completed { total_matches: usize },
}

/// Progress information during comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareProgress {
    pub comparisons_completed: usize,
    pub total_comparisons: usize,
    /// Matching pairs found so far
    pub matches_found: usize,
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    Started,
    PhaseChanged { phase: PipelinePhase },
    Completed { summary: PipelineSummary },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Hashing,
    Comparing,
    Searching,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Files discovered by the scan
    pub total_files: usize,
    /// Files successfully hashed
    pub hashed_files: usize,
    /// Duplicate groups found (0 for searches)
    pub duplicate_groups: usize,
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Hashing => write!(f, "Hashing"),
            PipelinePhase::Comparing => write!(f, "Comparing"),
            PipelinePhase::Searching => write!(f, "Searching"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Hash(HashEvent::Progress(HashProgress {
            completed: 10,
            total: 50,
            current_path: PathBuf::from("/media/a.png"),
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Hash(HashEvent::Progress(p)) => {
                assert_eq!(p.completed, 10);
                assert_eq!(p.total, 50);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn phase_display() {
        assert_eq!(PipelinePhase::Hashing.to_string(), "Hashing");
        assert_eq!(PipelinePhase::Searching.to_string(), "Searching");
    }
}
