//! # Pipeline Module
//!
//! Batch workflow over directories of media.
//!
//! ## Stages
//! 1. **Scan** - Discover media files in the configured directories
//! 2. **Hash** - Compute 64-bit hashes in parallel; files that fail are
//!    logged, reported and skipped
//! 3. **Compare** - Group duplicates, or rank files against a query hash
//!
//! ## Parallelism
//! Uses rayon for parallel hashing across multiple CPU cores.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineConfig, PipelineResult, SearchResult};
