//! Per-chunk worker dispatch.
//!
//! One OS thread is spawned per planned chunk. Each worker reads and transforms its chunk on
//! its own, then commits through the shared [`OutputCoordinator`]. Outcomes flow back over a
//! channel to the dispatching thread, which logs failures where they happen and joins every
//! worker before reporting. A failing worker never cancels its siblings.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::unbounded;
use scopeguard::defer;

use crate::common::{Chunk, Operation, SourceFile};
use crate::coordinator::OutputCoordinator;
use crate::fsx;
use crate::planner;
use crate::processor;
use crate::progress::{CommitEvent, ProgressCallback, ProgressTracker};
use crate::transform::Transform;
use crate::EngineError;

/// Lifecycle of one run. There are no retry transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    Planning,
    Dispatching,
    Running,
    Joining,
    Completed,
}

impl fmt::Display for DispatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DispatchPhase::Planning => "planning",
            DispatchPhase::Dispatching => "dispatching",
            DispatchPhase::Running => "running",
            DispatchPhase::Joining => "joining",
            DispatchPhase::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// A worker that did not commit its chunk.
#[derive(Debug)]
pub struct WorkerFailure {
    pub worker_id: usize,
    pub chunk: Chunk,
    pub error: EngineError,
}

/// Summary of a run that reached [`DispatchPhase::Completed`].
///
/// Reaching completion says nothing about individual chunks: check [`RunReport::is_complete`]
/// or `failures` to learn whether every byte range was written.
#[derive(Debug)]
pub struct RunReport {
    pub file_size: u64,
    pub chunks_planned: usize,
    pub chunks_committed: usize,
    pub bytes_committed: u64,
    pub failures: Vec<WorkerFailure>,
    pub elapsed: Duration,
    pub speed_mbps: f32,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.chunks_committed == self.chunks_planned
    }
}

/// Plans a file, fans out one worker per chunk and joins them all.
pub struct Dispatcher {
    workers: usize,
    transform: Arc<dyn Transform>,
    callback: Option<Arc<ProgressCallback>>,
}

impl Dispatcher {
    pub fn new(workers: usize, transform: Arc<dyn Transform>) -> Self {
        Self { workers, transform, callback: None }
    }

    /// Called once per committed chunk, from inside the coordinator's exclusive section.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&CommitEvent) + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Run `op` on `input`, writing to `output` or to the tagged path next to the input.
    /// Returns the output path actually used.
    pub fn run_operation(
        &self,
        op: Operation,
        input: &Path,
        output: Option<&Path>,
    ) -> Result<(PathBuf, RunReport), EngineError> {
        let output = match output {
            Some(p) => p.to_path_buf(),
            None => op.derive_output_path(input)?,
        };
        tracing::debug!(op = op.noun(), transform = self.transform.name(), "starting operation");
        let report = self.run(input, &output)?;
        Ok((output, report))
    }

    /// Transform `source` chunk by chunk into `output`.
    ///
    /// Fails before any worker starts on an empty or unreadable input, a zero worker count,
    /// or an output that cannot be pre-allocated. After that point the run always completes;
    /// worker errors are logged and collected in the report.
    pub fn run(&self, source: &Path, output: &Path) -> Result<RunReport, EngineError> {
        let mut phase = DispatchPhase::Planning;
        tracing::debug!(%phase, source = %source.display());

        let src = SourceFile::probe(source)?;
        let chunks = planner::plan(src.size, self.workers).inspect_err(|e| {
            tracing::error!(source = %source.display(), error = %e, "planning failed");
        })?;
        if fsx::same_file(source, output) {
            return Err(EngineError::OutputIsInput { path: output.to_path_buf() });
        }
        fsx::preallocate(output, src.size)
            .map_err(|e| EngineError::OutputCreate { path: output.to_path_buf(), source: e })?;

        phase = DispatchPhase::Dispatching;
        tracing::debug!(%phase, chunks = chunks.len(), size = src.size);

        let coordinator = OutputCoordinator::new(output, self.callback.clone());
        let tracker = ProgressTracker::new(chunks.len());
        let transform: &dyn Transform = self.transform.as_ref();
        let source_path: &Path = &src.path;
        let mut failures = Vec::new();

        let (outcome_tx, outcome_rx) = unbounded::<(Chunk, Result<CommitEvent, EngineError>)>();

        thread::scope(|s| {
            let coordinator = &coordinator;
            let mut handles = Vec::with_capacity(chunks.len());
            for chunk in &chunks {
                let outcome_tx = outcome_tx.clone();
                let metrics = tracker.worker_metrics(chunk.index);
                let handle = s.spawn(move || {
                    defer! {
                        tracing::debug!(worker = chunk.index, "worker exiting");
                    }
                    let outcome = run_worker(source_path, chunk, transform, coordinator);
                    if let (Ok(event), Some(metrics)) = (&outcome, &metrics) {
                        metrics.record_commit(event.bytes as u64);
                    }
                    let _ = outcome_tx.send((*chunk, outcome));
                });
                handles.push((*chunk, handle));
            }
            drop(outcome_tx);

            phase = DispatchPhase::Running;
            tracing::debug!(%phase, workers = handles.len());

            // Ends once every worker has sent or unwound.
            for (chunk, outcome) in outcome_rx.iter() {
                match outcome {
                    Ok(event) => tracing::debug!(worker = event.worker_id, bytes = event.bytes, "chunk committed"),
                    Err(error) => {
                        tracing::error!(worker = chunk.index, start = chunk.start, %error, "worker failed");
                        failures.push(WorkerFailure { worker_id: chunk.index, chunk, error });
                    }
                }
            }

            phase = DispatchPhase::Joining;
            tracing::debug!(%phase);

            for (chunk, handle) in handles {
                if handle.join().is_err() {
                    let error = EngineError::WorkerPanicked { worker: chunk.index };
                    tracing::error!(worker = chunk.index, start = chunk.start, %error, "worker failed");
                    failures.push(WorkerFailure { worker_id: chunk.index, chunk, error });
                }
            }
        });

        phase = DispatchPhase::Completed;
        failures.sort_by_key(|f| f.worker_id);
        let state = tracker.snapshot();
        tracing::debug!(%phase, committed = state.completed_chunks, failed = failures.len());

        Ok(RunReport {
            file_size: src.size,
            chunks_planned: chunks.len(),
            chunks_committed: state.completed_chunks as usize,
            bytes_committed: state.processed_bytes,
            failures,
            elapsed: state.elapsed_time,
            speed_mbps: state.speed_mbps,
        })
    }
}

fn run_worker(
    source: &Path,
    chunk: &Chunk,
    transform: &dyn Transform,
    coordinator: &OutputCoordinator,
) -> Result<CommitEvent, EngineError> {
    let processed = processor::process(source, chunk, transform)?;
    coordinator.commit(chunk, &processed)
}
