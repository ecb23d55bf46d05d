//! Chunk planning: split `[0, file_size)` into contiguous ranges, one per worker.

use crate::common::Chunk;
use crate::EngineError;

/// Partition `[0, file_size)` into at most `worker_count` contiguous chunks.
///
/// Every chunk is `ceil(file_size / worker_count)` bytes except possibly the last, which takes
/// whatever remains. When the file is too small to give every worker a full chunk, fewer
/// chunks are returned; a zero-length chunk is never produced.
pub fn plan(file_size: u64, worker_count: usize) -> Result<Vec<Chunk>, EngineError> {
    if file_size == 0 {
        return Err(EngineError::EmptyInput);
    }
    if worker_count == 0 {
        return Err(EngineError::ZeroWorkers);
    }

    let chunk_size = file_size.div_ceil(worker_count as u64);
    let mut chunks = Vec::with_capacity(file_size.div_ceil(chunk_size) as usize);
    let mut start = 0u64;
    while start < file_size {
        let length = chunk_size.min(file_size - start);
        chunks.push(Chunk { index: chunks.len(), start, length });
        start += length;
    }
    Ok(chunks)
}
