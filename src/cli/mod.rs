use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use crate::transform::{ReverseBytes, Transform, XorMask};

/// Environment variable consulted when `--threads` is 0 or omitted.
pub const THREADS_ENV: &str = "PARCHUNK_THREADS";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Transform a file chunk by chunk into `compressed_<name>`.
    #[command(alias = "c")]
    Compress(RunArgs),

    /// Reverse a previous compress into `decompressed_<name>`. Runs the identical pipeline.
    #[command(alias = "d")]
    Decompress(RunArgs),

    /// Print the chunk plan for a file without writing anything.
    #[command(alias = "p")]
    Plan {
        /// The file to plan.
        #[arg(required = true)]
        input: PathBuf,

        /// Number of workers to plan for. [0 = PARCHUNK_THREADS, else CPU count]
        #[arg(long, default_value_t = 0)]
        threads: usize,
    },
}

#[derive(clap::Args, Clone, Debug)]
pub struct RunArgs {
    /// The source file.
    #[arg(required = true)]
    pub input: PathBuf,

    /// Where to write the result. Defaults to the input name prefixed with the operation tag.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of parallel workers. [0 = PARCHUNK_THREADS, else CPU count]
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Per-chunk transform. Every choice is its own inverse.
    #[arg(long, value_enum, default_value_t = TransformKind::Reverse)]
    pub transform: TransformKind,

    /// Key for `--transform xor`.
    #[arg(long, default_value_t = 0x5A)]
    pub xor_key: u8,
}

/// Selectable per-chunk transforms.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransformKind {
    /// Reverse byte order within each chunk.
    Reverse,
    /// XOR every byte with `--xor-key`.
    Xor,
}

impl TransformKind {
    pub fn build(self, xor_key: u8) -> Arc<dyn Transform> {
        match self {
            TransformKind::Reverse => Arc::new(ReverseBytes),
            TransformKind::Xor => Arc::new(XorMask::new(xor_key)),
        }
    }
}

/// Resolves the worker count.
///
/// Priority:
/// 1. `--threads` when non-zero.
/// 2. `PARCHUNK_THREADS` when it parses to a non-zero integer.
/// 3. The number of logical CPUs.
pub fn resolve_worker_count(threads: usize) -> usize {
    if threads > 0 {
        return threads;
    }
    if let Ok(raw) = std::env::var(THREADS_ENV) {
        match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => return n,
            _ => tracing::warn!(value = %raw, "ignoring invalid {THREADS_ENV}"),
        }
    }
    num_cpus::get()
}

/// Parses command-line arguments using `clap` and returns the command to execute.
pub fn run() -> Result<Commands, Box<dyn std::error::Error>> {
    let args = Args::parse();
    Ok(args.command)
}
