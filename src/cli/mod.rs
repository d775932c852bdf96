//! # CLI Module
//!
//! Command-line interface over the hashing and comparison library.
//!
//! ## Usage
//! ```bash
//! # Hash images (failures are reported and skipped)
//! phash hash a.jpg b.png
//!
//! # Per-frame hashes of an animated GIF, every 5th frame
//! phash frames clip.gif --stride 5
//!
//! # Compare two hashes
//! phash distance 8f373714acfcf4d0 8f373714acfcf4d1 --threshold 8
//!
//! # Nearest neighbours of a query image
//! phash nearest query.jpg ~/Pictures -k 5
//!
//! # Duplicate groups as JSON
//! phash dedup ~/Pictures --threshold 5 --output json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use phash_compare::core::comparator::{within_threshold, MatchType};
use phash_compare::core::hasher::{HashAlgorithmKind, HasherConfig, ImageHasher, PerceptualHash};
use phash_compare::core::pipeline::{Pipeline, PipelineResult, SearchResult};
use phash_compare::error::Result;
use phash_compare::events::{Event, EventChannel, EventReceiver, HashEvent, PipelineEvent, ScanEvent};
use std::path::{Path, PathBuf};
use std::thread;

/// Perceptual hashing and Hamming comparison
#[derive(Parser, Debug)]
#[command(name = "phash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the 64-bit hash of each image
    Hash {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print one hash per sampled frame of an animated GIF or APNG
    ///
    /// Video containers (mp4, avi, mkv, ...) are not decoded and are
    /// rejected as unsupported.
    Frames {
        file: PathBuf,

        /// Hash every n-th frame
        #[arg(long, default_value = "1")]
        stride: usize,

        /// Stop after this many frames
        #[arg(long)]
        max_frames: Option<usize>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Hamming distance between two hex hashes
    Distance {
        a: PerceptualHash,
        b: PerceptualHash,

        /// Also report whether the distance is within this threshold (0-64)
        #[arg(short, long)]
        threshold: Option<u32>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Find the files most similar to a query image
    Nearest {
        query: PathBuf,

        /// Directories to search
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Number of results
        #[arg(short, default_value = "5")]
        k: usize,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Group near-duplicate images
    Dedup {
        /// Directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Match threshold (lower = stricter, 0-64)
        #[arg(short, long, default_value = "8")]
        threshold: u32,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Hash algorithm to use
    #[arg(short, long, default_value = "dct")]
    algorithm: Algorithm,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Include hidden files
    #[arg(long)]
    include_hidden: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// DCT hash (pHash) - most robust (default)
    Dct,
    /// Average hash - fastest
    Average,
    /// Difference hash - gradient based
    Difference,
}

impl From<Algorithm> for HashAlgorithmKind {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Dct => HashAlgorithmKind::Dct,
            Algorithm::Average => HashAlgorithmKind::Average,
            Algorithm::Difference => HashAlgorithmKind::Difference,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (one value per line)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash { files, common } => run_hash(files, common),
        Commands::Frames {
            file,
            stride,
            max_frames,
            common,
        } => run_frames(file, stride, max_frames, common),
        Commands::Distance {
            a,
            b,
            threshold,
            output,
        } => run_distance(a, b, threshold, output),
        Commands::Nearest {
            query,
            paths,
            k,
            common,
        } => run_nearest(query, paths, k, common),
        Commands::Dedup {
            paths,
            threshold,
            common,
        } => run_dedup(paths, threshold, common),
    }
}

fn run_hash(files: Vec<PathBuf>, common: CommonArgs) -> Result<()> {
    let hasher = HasherConfig::new()
        .algorithm(common.algorithm.into())
        .build_image();
    let term = Term::stderr();
    let mut results = Vec::new();

    for file in files {
        match hasher.hash_file(&file) {
            Ok(hash) => results.push((file, hash)),
            Err(e) => {
                tracing::warn!(path = %file.display(), error = %e, "hash failed");
                term.write_line(&format!("{} {}", style("✗").red().bold(), e))
                    .ok();
            }
        }
    }

    match common.output {
        OutputFormat::Pretty => {
            for (file, hash) in &results {
                println!("{}  {}", style(hash).cyan(), file.display());
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!(results
                .iter()
                .map(|(file, hash)| serde_json::json!({ "path": file, "hash": hash }))
                .collect::<Vec<_>>());
            println!("{:#}", output);
        }
        OutputFormat::Minimal => {
            for (_, hash) in &results {
                println!("{}", hash);
            }
        }
    }

    Ok(())
}

fn run_frames(
    file: PathBuf,
    stride: usize,
    max_frames: Option<usize>,
    common: CommonArgs,
) -> Result<()> {
    let hasher = HasherConfig::new()
        .algorithm(common.algorithm.into())
        .frame_stride(stride)
        .max_frames(max_frames)
        .build_frames()?;
    let hashes = hasher.hash_file(&file)?;

    match common.output {
        OutputFormat::Pretty => {
            println!(
                "{} {} ({} frames)",
                style("Frames:").bold(),
                file.display(),
                hashes.len()
            );
            for (index, hash) in hashes.iter().enumerate() {
                println!("  {:>4}  {}", style(index * stride).dim(), style(hash).cyan());
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": file,
                "stride": stride,
                "hashes": hashes,
            });
            println!("{:#}", output);
        }
        OutputFormat::Minimal => {
            for hash in &hashes {
                println!("{}", hash);
            }
        }
    }

    Ok(())
}

fn run_distance(
    a: PerceptualHash,
    b: PerceptualHash,
    threshold: Option<u32>,
    output: OutputFormat,
) -> Result<()> {
    let distance = a.distance(b);
    let within = threshold
        .map(|t| within_threshold(a, b, t))
        .transpose()?;
    let match_type = MatchType::from_distance(distance);

    match output {
        OutputFormat::Pretty => {
            println!(
                "{} {} ({:.1}% similar, {})",
                style("Distance:").bold(),
                style(distance).cyan(),
                a.similarity(b),
                style(match_type).yellow()
            );
            if let (Some(t), Some(within)) = (threshold, within) {
                let verdict = if within {
                    style("within").green()
                } else {
                    style("outside").red()
                };
                println!("{} threshold {}", verdict, t);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "a": a,
                "b": b,
                "distance": distance,
                "similarity_percent": a.similarity(b),
                "match_type": match_type,
                "threshold": threshold,
                "within_threshold": within,
            });
            println!("{:#}", output);
        }
        OutputFormat::Minimal => println!("{}", distance),
    }

    Ok(())
}

fn run_nearest(query: PathBuf, paths: Vec<PathBuf>, k: usize, common: CommonArgs) -> Result<()> {
    let pipeline = Pipeline::builder()
        .paths(paths)
        .algorithm(common.algorithm.into())
        .include_hidden(common.include_hidden)
        .build();

    let query_hash = pipeline.hash_file(&query)?;

    let (sender, receiver) = EventChannel::new();
    let progress = progress_for(common.output);
    let event_thread = spawn_progress(receiver, progress);

    let result = pipeline.search_with_events(query_hash, k, &sender);
    drop(sender);
    event_thread.join().ok();
    let result = result?;

    match common.output {
        OutputFormat::Pretty => print_pretty_neighbors(&query, query_hash, &result),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "query": query,
                "query_hash": query_hash,
                "hashed_files": result.hashed_files,
                "errors": result.errors,
                "neighbors": result.neighbors,
            });
            println!("{:#}", output);
        }
        OutputFormat::Minimal => {
            for neighbor in &result.neighbors {
                println!("{}\t{}", neighbor.distance, neighbor.id.display());
            }
        }
    }

    Ok(())
}

fn run_dedup(paths: Vec<PathBuf>, threshold: u32, common: CommonArgs) -> Result<()> {
    let pipeline = Pipeline::builder()
        .paths(paths)
        .algorithm(common.algorithm.into())
        .threshold(threshold)
        .include_hidden(common.include_hidden)
        .build();

    let (sender, receiver) = EventChannel::new();
    let progress = progress_for(common.output);
    let event_thread = spawn_progress(receiver, progress);

    let result = pipeline.run_with_events(&sender);
    drop(sender);
    event_thread.join().ok();
    let result = result?;

    match common.output {
        OutputFormat::Pretty => print_pretty_groups(&Term::stderr(), &result),
        OutputFormat::Json => print_json_groups(&result),
        OutputFormat::Minimal => {
            for group in &result.groups {
                for member in &group.members {
                    if member != &group.representative {
                        println!("{}", member.display());
                    }
                }
            }
        }
    }

    Ok(())
}

fn progress_for(output: OutputFormat) -> Option<ProgressBar> {
    if output != OutputFormat::Pretty {
        return None;
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    Some(pb)
}

fn spawn_progress(receiver: EventReceiver, progress: Option<ProgressBar>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for event in receiver.iter() {
            let Some(pb) = progress.as_ref() else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Scan(ScanEvent::Completed { total_files }) => {
                    pb.set_length(total_files as u64);
                }
                Event::Hash(HashEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    })
}

fn print_errors(term: &Term, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    term.write_line(&format!(
        "  {} files skipped:",
        style(errors.len()).yellow()
    ))
    .ok();
    for error in errors {
        term.write_line(&format!("    {} {}", style("✗").red(), error))
            .ok();
    }
}

fn print_pretty_neighbors(query: &Path, query_hash: PerceptualHash, result: &SearchResult) {
    let term = Term::stderr();
    term.write_line(&format!(
        "{} {} ({})",
        style("Query:").bold(),
        query.display(),
        style(query_hash).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} files hashed in {:.1}s",
        style(result.hashed_files).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();
    print_errors(&term, &result.errors);
    term.write_line("").ok();

    if result.neighbors.is_empty() {
        term.write_line("  No candidates found.").ok();
        return;
    }

    for (rank, neighbor) in result.neighbors.iter().enumerate() {
        println!(
            "{:>3}. {:>2}  {:<16}  {}",
            rank + 1,
            style(neighbor.distance).cyan(),
            style(MatchType::from_distance(neighbor.distance)).yellow(),
            neighbor.id.display()
        );
    }
}

fn print_pretty_groups(term: &Term, result: &PipelineResult) {
    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line(&format!(
        "  {} files scanned, {} hashed in {:.1}s",
        style(result.total_files).cyan(),
        style(result.collection.len()).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicate groups found",
        style(result.groups.len()).cyan()
    ))
    .ok();
    print_errors(term, &result.errors);
    term.write_line("").ok();

    if result.groups.is_empty() {
        term.write_line("  No duplicates found.").ok();
        return;
    }

    for (i, group) in result.groups.iter().enumerate() {
        println!(
            "{} {} ({} files, avg distance {:.1})",
            style(format!("Group {}:", i + 1)).bold(),
            style(group.match_type).yellow(),
            group.members.len(),
            group.average_distance
        );

        for member in &group.members {
            let marker = if member == &group.representative {
                style("★").green().to_string()
            } else {
                style("○").dim().to_string()
            };
            println!("    {} {}", marker, member.display());
        }
        println!();
    }
}

fn print_json_groups(result: &PipelineResult) {
    let output = serde_json::json!({
        "total_files": result.total_files,
        "hashed_files": result.collection.len(),
        "duplicate_groups": result.groups.len(),
        "duration_ms": result.duration_ms,
        "errors": result.errors,
        "groups": result.groups.iter().map(|g| {
            serde_json::json!({
                "id": g.id.to_string(),
                "match_type": format!("{}", g.match_type),
                "members": g.members,
                "representative": g.representative,
                "average_distance": g.average_distance,
            })
        }).collect::<Vec<_>>()
    });

    println!("{:#}", output);
}
