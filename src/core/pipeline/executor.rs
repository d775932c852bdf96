//! Pipeline execution implementation.

use crate::core::comparator::{
    find_matching_pairs_with_events, nearest_neighbors, nearest_neighbors_par, ComparisonStrategy,
    DuplicateGroup, HashCollection, Neighbor, ThresholdStrategy, TransitiveGrouper,
};
use crate::core::hasher::{HashAlgorithmKind, HasherConfig, ImageHasher, PerceptualHash};
use crate::core::scanner::{MediaScanner, ScanConfig};
use crate::error::{HashError, PhashError};
use crate::events::{
    null_sender, Event, EventSender, HashEvent, HashProgress, PipelineEvent, PipelinePhase,
    PipelineSummary,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Collections at least this large are searched on the rayon pool
const PARALLEL_SEARCH_MIN: usize = 50_000;

/// Result of a duplicate-grouping run
#[derive(Debug)]
pub struct PipelineResult {
    /// Duplicate groups, in order of their first member
    pub groups: Vec<DuplicateGroup<PathBuf>>,
    /// Every successfully hashed file, in path order
    pub collection: HashCollection<PathBuf>,
    /// Files discovered by the scan
    pub total_files: usize,
    /// Non-fatal scan and hash errors
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

/// Result of a nearest-neighbour search run
#[derive(Debug)]
pub struct SearchResult {
    pub neighbors: Vec<Neighbor<PathBuf>>,
    pub total_files: usize,
    pub hashed_files: usize,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directories to scan
    pub paths: Vec<PathBuf>,
    /// Hash algorithm to use
    pub algorithm: HashAlgorithmKind,
    /// Match threshold, validated when the pipeline runs
    pub threshold: u32,
    /// Scanner configuration
    pub scan_config: ScanConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            algorithm: HashAlgorithmKind::Dct,
            threshold: ThresholdStrategy::balanced().threshold(),
            scan_config: ScanConfig::default(),
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Directories to scan
    pub fn paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config.paths = paths;
        self
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Set the match threshold (0-64)
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        let hasher = HasherConfig::new()
            .algorithm(self.config.algorithm)
            .build_image();

        Pipeline {
            config: self.config,
            hasher,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Files hashed by one batch
struct HashedBatch {
    collection: HashCollection<PathBuf>,
    total_files: usize,
    errors: Vec<String>,
}

/// Scan, batch-hash, then compare or search
pub struct Pipeline {
    config: PipelineConfig,
    hasher: Box<dyn ImageHasher>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Hash a single file with this pipeline's algorithm
    pub fn hash_file(&self, path: &Path) -> Result<PerceptualHash, HashError> {
        self.hasher.hash_file(path)
    }

    /// Group duplicates without events
    pub fn run(&self) -> Result<PipelineResult, PhashError> {
        self.run_with_events(&null_sender())
    }

    /// Group duplicates with event reporting
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, PhashError> {
        let start_time = Instant::now();
        let strategy = ThresholdStrategy::new(self.config.threshold)?;

        events.send(Event::Pipeline(PipelineEvent::Started));
        let batch = self.hash_all(events)?;

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Comparing,
        }));
        let matches = find_matching_pairs_with_events(&batch.collection, &strategy, events);
        let groups = TransitiveGrouper::new().group(&batch.collection, &matches);

        let duration_ms = start_time.elapsed().as_millis() as u64;
        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                total_files: batch.total_files,
                hashed_files: batch.collection.len(),
                duplicate_groups: groups.len(),
                duration_ms,
            },
        }));
        tracing::info!(
            files = batch.total_files,
            groups = groups.len(),
            duration_ms,
            "duplicate grouping finished"
        );

        Ok(PipelineResult {
            groups,
            collection: batch.collection,
            total_files: batch.total_files,
            errors: batch.errors,
            duration_ms,
        })
    }

    /// Nearest-neighbour search without events
    pub fn search(&self, query: PerceptualHash, k: usize) -> Result<SearchResult, PhashError> {
        self.search_with_events(query, k, &null_sender())
    }

    /// The `k` scanned files closest to `query`, with event reporting
    pub fn search_with_events(
        &self,
        query: PerceptualHash,
        k: usize,
        events: &EventSender,
    ) -> Result<SearchResult, PhashError> {
        let start_time = Instant::now();

        events.send(Event::Pipeline(PipelineEvent::Started));
        let batch = self.hash_all(events)?;

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Searching,
        }));
        let neighbors = if batch.collection.len() >= PARALLEL_SEARCH_MIN {
            nearest_neighbors_par(query, &batch.collection, k)
        } else {
            nearest_neighbors(query, &batch.collection, k)
        };

        let duration_ms = start_time.elapsed().as_millis() as u64;
        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                total_files: batch.total_files,
                hashed_files: batch.collection.len(),
                duplicate_groups: 0,
                duration_ms,
            },
        }));

        Ok(SearchResult {
            neighbors,
            total_files: batch.total_files,
            hashed_files: batch.collection.len(),
            errors: batch.errors,
            duration_ms,
        })
    }

    /// Scan and hash every file. Files that fail to hash are skipped.
    fn hash_all(&self, events: &EventSender) -> Result<HashedBatch, PhashError> {
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let scanner = MediaScanner::new(self.config.scan_config.clone());
        let scan_result = scanner.scan_with_events(&self.config.paths, events);
        let mut errors: Vec<String> = scan_result.errors.iter().map(|e| e.to_string()).collect();

        let files = scan_result.files;
        let total_files = files.len();

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Hashing,
        }));
        events.send(Event::Hash(HashEvent::Started { total_files }));

        let completed = AtomicUsize::new(0);

        // par_iter + collect keeps scan order
        let outcomes: Vec<Result<(PathBuf, PerceptualHash), (PathBuf, HashError)>> = files
            .par_iter()
            .map(|file| {
                let outcome = match self.hasher.hash_file(&file.path) {
                    Ok(hash) => Ok((file.path.clone(), hash)),
                    Err(e) => {
                        tracing::warn!(path = %file.path.display(), error = %e, "skipping file");
                        events.send(Event::Hash(HashEvent::Error {
                            path: file.path.clone(),
                            message: e.to_string(),
                        }));
                        Err((file.path.clone(), e))
                    }
                };

                events.send(Event::Hash(HashEvent::Progress(HashProgress {
                    completed: completed.fetch_add(1, Ordering::Relaxed) + 1,
                    total: total_files,
                    current_path: file.path.clone(),
                })));

                outcome
            })
            .collect();

        let mut collection = HashCollection::with_capacity(total_files);
        for outcome in outcomes {
            match outcome {
                Ok((path, hash)) => collection.insert(path, hash)?,
                Err((_, e)) => errors.push(e.to_string()),
            }
        }

        events.send(Event::Hash(HashEvent::Completed {
            total_hashed: collection.len(),
            failures: total_files - collection.len(),
        }));

        Ok(HashedBatch {
            collection,
            total_files,
            errors,
        })
    }
}
