//! Serialized commit phase.
//!
//! Chunk ranges are disjoint, yet the whole open/seek/write/flush/report sequence of a chunk
//! runs under one lock. Progress lines never interleave and come out in commit order.

use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::common::Chunk;
use crate::fsx;
use crate::processor::ProcessedChunk;
use crate::progress::{CommitEvent, ProgressCallback};
use crate::EngineError;

/// Owns exclusive access to the shared output file during each chunk's commit.
pub struct OutputCoordinator {
    path: PathBuf,
    section: Mutex<()>,
    callback: Option<Arc<ProgressCallback>>,
}

impl OutputCoordinator {
    /// `path` must already exist and be pre-sized; see [`fsx::preallocate`].
    pub fn new(path: &Path, callback: Option<Arc<ProgressCallback>>) -> Self {
        Self { path: path.to_path_buf(), section: Mutex::new(()), callback }
    }

    /// Write the first `processed.bytes_read` bytes at `chunk.start` and report the commit.
    ///
    /// The lock is held from opening the output until the progress event has been emitted and
    /// is released on every exit path, including errors. A poisoned lock is recovered since it
    /// guards no data.
    pub fn commit(&self, chunk: &Chunk, processed: &ProcessedChunk) -> Result<CommitEvent, EngineError> {
        let _section = self.section.lock().unwrap_or_else(PoisonError::into_inner);

        let mut out = fsx::open_for_commit(&self.path)
            .map_err(|source| EngineError::OutputOpen { path: self.path.clone(), source })?;
        let write_err = |source: std::io::Error| EngineError::OutputWrite {
            path: self.path.clone(),
            offset: chunk.start,
            source,
        };
        out.seek(SeekFrom::Start(chunk.start)).map_err(write_err)?;
        out.write_all(&processed.data[..processed.bytes_read]).map_err(write_err)?;
        out.flush().map_err(write_err)?;
        drop(out);

        let event = CommitEvent { worker_id: chunk.index, bytes: processed.bytes_read, start: chunk.start };
        if let Some(cb) = &self.callback {
            cb(&event);
        }
        Ok(event)
    }
}
