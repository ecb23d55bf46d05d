//! Read-and-transform half of a worker.
//!
//! Each call opens its own read handle to the source, so workers never contend on input. The
//! processor does not write; it hands the transformed bytes to the
//! [`OutputCoordinator`](crate::coordinator::OutputCoordinator).

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::common::Chunk;
use crate::fsx::File;
use crate::transform::Transform;
use crate::EngineError;

/// Transformed bytes of one chunk, ready to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedChunk {
    /// Bytes actually read. Shorter than the chunk only when the source ended early.
    pub bytes_read: usize,
    pub data: Vec<u8>,
}

/// Read `chunk` from `source` and apply `transform` to exactly the bytes read.
pub fn process(source: &Path, chunk: &Chunk, transform: &dyn Transform) -> Result<ProcessedChunk, EngineError> {
    let mut file = File::open(source).map_err(|e| EngineError::InputOpen { path: source.to_path_buf(), source: e })?;
    let read_err = |e: std::io::Error| EngineError::InputRead { path: source.to_path_buf(), offset: chunk.start, source: e };

    file.seek(SeekFrom::Start(chunk.start)).map_err(read_err)?;

    let mut data = Vec::with_capacity(usize::try_from(chunk.length).unwrap_or(0));
    file.take(chunk.length).read_to_end(&mut data).map_err(read_err)?;

    let bytes_read = data.len();
    if (bytes_read as u64) < chunk.length {
        // Only possible when the source shrank after it was probed.
        tracing::warn!(
            worker = chunk.index,
            expected = chunk.length,
            got = bytes_read,
            "short read at end of input"
        );
    }

    transform.apply_in_place(&mut data);
    Ok(ProcessedChunk { bytes_read, data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::ReverseBytes;
    use tempfile::tempdir;

    #[test]
    fn reads_and_reverses_only_its_own_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.bin");
        crate::fsx::write(&path, b"ABCDEFGHIJ").unwrap();

        let first = process(&path, &Chunk { index: 0, start: 0, length: 5 }, &ReverseBytes).unwrap();
        assert_eq!(first, ProcessedChunk { bytes_read: 5, data: b"EDCBA".to_vec() });

        let second = process(&path, &Chunk { index: 1, start: 5, length: 5 }, &ReverseBytes).unwrap();
        assert_eq!(second.data, b"JIHGF");
    }

    #[test]
    fn short_read_at_end_of_file_transforms_what_was_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.bin");
        crate::fsx::write(&path, b"ABCDEFG").unwrap();

        let out = process(&path, &Chunk { index: 1, start: 5, length: 5 }, &ReverseBytes).unwrap();
        assert_eq!(out.bytes_read, 2);
        assert_eq!(out.data, b"GF");
    }

    #[test]
    fn missing_source_is_an_input_open_error() {
        let dir = tempdir().unwrap();
        let err = process(&dir.path().join("nope"), &Chunk { index: 0, start: 0, length: 1 }, &ReverseBytes)
            .unwrap_err();
        assert!(matches!(err, EngineError::InputOpen { .. }));
    }
}
