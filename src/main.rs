//! # phash CLI
//!
//! Command-line interface for perceptual hashing and hash comparison.
//!
//! ## Usage
//! ```bash
//! phash hash photo.jpg scan.png
//! phash distance 8f373714acfcf4d0 8f373714acfcf4d1
//! phash nearest query.jpg ~/Pictures -k 5
//! phash dedup ~/Pictures --threshold 8 --output json
//! ```

mod cli;

use phash_compare::Result;

fn main() -> Result<()> {
    phash_compare::init_tracing();
    cli::run()
}
