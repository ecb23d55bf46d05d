use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The primary error type for all operations in the `parchunk` crate.
///
/// Variants raised inside a worker (`InputOpen`, `InputRead`, `OutputOpen`, `OutputWrite`,
/// `WorkerPanicked`) are isolated to that worker and recorded in the run report. The rest
/// abort the operation before any worker is spawned.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The source file has zero bytes, so there is nothing to plan.
    #[error("input is empty (0 bytes); nothing to process")]
    EmptyInput,

    /// A worker count of zero reached the planner.
    #[error("worker count must be at least 1")]
    ZeroWorkers,

    /// The source could not be inspected, or it is not a regular file.
    #[error("could not open '{}': {source}", path.display())]
    Probe { path: PathBuf, #[source] source: io::Error },

    /// A worker could not open its own read handle to the source.
    #[error("error opening input file '{}': {source}", path.display())]
    InputOpen { path: PathBuf, #[source] source: io::Error },

    /// Seeking or reading the source failed after it was opened.
    #[error("error reading '{}' at offset {offset}: {source}", path.display())]
    InputRead { path: PathBuf, offset: u64, #[source] source: io::Error },

    /// The output could not be created and sized before dispatch.
    #[error("could not pre-allocate output '{}': {source}", path.display())]
    OutputCreate { path: PathBuf, #[source] source: io::Error },

    /// A worker could not open the shared output inside the commit section.
    #[error("error opening output file '{}': {source}", path.display())]
    OutputOpen { path: PathBuf, #[source] source: io::Error },

    /// Seeking, writing or flushing the output failed after it was opened.
    #[error("error writing '{}' at offset {offset}: {source}", path.display())]
    OutputWrite { path: PathBuf, offset: u64, #[source] source: io::Error },

    /// The output resolves to the source itself; pre-allocating it would destroy the input.
    #[error("output '{}' is the same file as the input", path.display())]
    OutputIsInput { path: PathBuf },

    /// No file name could be taken from the path to derive a tagged output name.
    #[error("cannot derive an output name from '{}'", path.display())]
    InvalidPath { path: PathBuf },

    /// A worker thread panicked before reporting an outcome.
    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn io_variants_expose_their_source() {
        let err = EngineError::InputOpen {
            path: PathBuf::from("missing.bin"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("missing.bin"));
    }

    #[test]
    fn offsets_appear_in_messages() {
        let err = EngineError::OutputWrite {
            path: PathBuf::from("out.bin"),
            offset: 4096,
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert_eq!(err.to_string(), "error writing 'out.bin' at offset 4096: disk full");
    }
}
