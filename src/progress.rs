//! Progress tracking for chunked transform runs.
//!
//! Workers bump their own atomic counters after each commit so the hot path never takes a
//! shared lock; a snapshot aggregates them on demand.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One committed chunk, reported from inside the coordinator's exclusive section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitEvent {
    pub worker_id: usize,
    pub bytes: usize,
    pub start: u64,
}

impl fmt::Display for CommitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Worker {}: processed {} bytes starting at {}", self.worker_id, self.bytes, self.start)
    }
}

/// Progress callback function type
pub type ProgressCallback = dyn Fn(&CommitEvent) + Send + Sync;

/// Per-worker metrics to avoid contention between worker threads
#[derive(Debug, Default)]
pub struct WorkerMetrics {
    pub chunks_committed: AtomicU64,
    pub bytes_committed: AtomicU64,
}

impl WorkerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_commit(&self, bytes: u64) {
        self.chunks_committed.fetch_add(1, Ordering::Relaxed);
        self.bytes_committed.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn chunks(&self) -> u64 {
        self.chunks_committed.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes_committed.load(Ordering::Relaxed)
    }
}

/// Aggregated view across all workers.
#[derive(Debug, Clone)]
pub struct ProgressState {
    pub processed_bytes: u64,
    pub completed_chunks: u64,
    pub elapsed_time: Duration,
    pub speed_mbps: f32,
}

/// The single record of what a run committed.
pub struct ProgressTracker {
    worker_metrics: Vec<Arc<WorkerMetrics>>,
    start_time: Instant,
}

impl ProgressTracker {
    /// One metrics slot per planned chunk; the worker id indexes it.
    pub fn new(num_workers: usize) -> Self {
        let worker_metrics = (0..num_workers).map(|_| Arc::new(WorkerMetrics::new())).collect();
        Self { worker_metrics, start_time: Instant::now() }
    }

    pub fn worker_metrics(&self, worker_id: usize) -> Option<Arc<WorkerMetrics>> {
        self.worker_metrics.get(worker_id).cloned()
    }

    pub fn snapshot(&self) -> ProgressState {
        let (completed_chunks, processed_bytes) = self
            .worker_metrics
            .iter()
            .fold((0u64, 0u64), |(c, b), m| (c + m.chunks(), b + m.bytes()));

        let elapsed_time = self.start_time.elapsed();
        let speed_mbps = if elapsed_time.as_secs_f32() > 0.0 {
            (processed_bytes as f32 / (1024.0 * 1024.0)) / elapsed_time.as_secs_f32()
        } else {
            0.0
        };

        ProgressState { processed_bytes, completed_chunks, elapsed_time, speed_mbps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn commit_event_renders_progress_line() {
        let ev = CommitEvent { worker_id: 3, bytes: 128, start: 384 };
        assert_eq!(ev.to_string(), "Worker 3: processed 128 bytes starting at 384");
    }

    #[test]
    fn worker_metrics_accumulate() {
        let m = WorkerMetrics::new();
        m.record_commit(1024);
        m.record_commit(2048);
        assert_eq!(m.chunks(), 2);
        assert_eq!(m.bytes(), 3072);
    }

    #[test]
    fn snapshot_aggregates_concurrent_workers() {
        let tracker = ProgressTracker::new(4);

        thread::scope(|s| {
            for id in 0..4 {
                let metrics = tracker.worker_metrics(id).unwrap();
                s.spawn(move || metrics.record_commit(1000));
            }
        });

        let state = tracker.snapshot();
        assert_eq!(state.completed_chunks, 4);
        assert_eq!(state.processed_bytes, 4000);
        assert!(tracker.worker_metrics(4).is_none());
    }
}
