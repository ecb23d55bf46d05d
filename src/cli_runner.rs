//! CLI runner shared by the `parchunk` binary.
//!
//! Owns everything the user sees on stdout: the banner, one progress line per committed
//! chunk, and the completion summary.

use std::path::Path;

use crate::cli::{self, Commands, RunArgs};
use crate::common::{Operation, SourceFile};
use crate::planner;
use crate::workers::{Dispatcher, RunReport};

/// Public entry for running CLI logic.
pub fn run_cli_app() -> Result<(), Box<dyn std::error::Error>> {
    let command = cli::run()?;

    match &command {
        Commands::Compress(args) => run_transform(Operation::Compress, args),
        Commands::Decompress(args) => run_transform(Operation::Decompress, args),
        Commands::Plan { input, threads } => print_plan(input, cli::resolve_worker_count(*threads)),
    }
}

fn run_transform(op: Operation, args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let workers = cli::resolve_worker_count(args.threads);
    let output = match &args.output {
        Some(p) => p.clone(),
        None => op.derive_output_path(&args.input)?,
    };

    println!("{} '{}' -> '{}' ...", op.verb(), args.input.display(), output.display());

    let dispatcher = Dispatcher::new(workers, args.transform.build(args.xor_key)).with_progress(|ev| println!("{ev}"));
    let report = dispatcher.run(&args.input, &output)?;
    finish(op, &output, &report)
}

/// Print the completion lines, then fail the process if any chunk was left unwritten.
fn finish(op: Operation, output: &Path, report: &RunReport) -> Result<(), Box<dyn std::error::Error>> {
    println!("{} completed.", op.noun());
    println!(
        "{}/{} chunks, {} bytes in {:.2?} ({:.1} MB/s)",
        report.chunks_committed, report.chunks_planned, report.bytes_committed, report.elapsed, report.speed_mbps
    );

    if !report.is_complete() {
        return Err(format!(
            "{} of {} chunks failed; '{}' is incomplete",
            report.failures.len(),
            report.chunks_planned,
            output.display()
        )
        .into());
    }
    Ok(())
}

fn print_plan(input: &Path, workers: usize) -> Result<(), Box<dyn std::error::Error>> {
    let src = SourceFile::probe(input)?;
    let chunks = planner::plan(src.size, workers)?;
    println!("{} bytes, {} workers requested, {} chunks", src.size, workers, chunks.len());
    for chunk in &chunks {
        println!("{chunk}");
    }
    Ok(())
}
