//! Common utilities and types module.
// Shared structs and the operation selector.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::fsx as fs;
use crate::EngineError;

/// A contiguous, disjoint byte range of the source assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub start: u64,
    pub length: u64,
}

impl Chunk {
    /// Exclusive end offset.
    pub fn end(&self) -> u64 {
        self.start + self.length
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk {}: bytes [{}, {}) ({} bytes)", self.index, self.start, self.end(), self.length)
    }
}

/// The input of one operation. Its size is probed once and never re-read.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub size: u64,
}

impl SourceFile {
    pub fn probe(path: &Path) -> Result<Self, EngineError> {
        let meta = fs::metadata(path).map_err(|source| EngineError::Probe { path: path.to_path_buf(), source })?;
        if !meta.is_file() {
            return Err(EngineError::Probe {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            });
        }
        Ok(SourceFile { path: path.to_path_buf(), size: meta.len() })
    }
}

/// Which direction the user asked for.
///
/// Both variants run the identical pipeline: the transform is its own inverse, so
/// "decompress" is literally "compress" applied a second time. Only the naming differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Decompress,
}

impl Operation {
    /// Prefix put in front of the input's file name to derive the default output.
    pub fn tag(self) -> &'static str {
        match self {
            Operation::Compress => "compressed_",
            Operation::Decompress => "decompressed_",
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Operation::Compress => "Compressing",
            Operation::Decompress => "Decompressing",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            Operation::Compress => "Compression",
            Operation::Decompress => "Decompression",
        }
    }

    /// `dir/name` becomes `dir/<tag>name`.
    pub fn derive_output_path(self, input: &Path) -> Result<PathBuf, EngineError> {
        let name = input
            .file_name()
            .ok_or_else(|| EngineError::InvalidPath { path: input.to_path_buf() })?;
        let mut tagged = std::ffi::OsString::from(self.tag());
        tagged.push(name);
        Ok(input.with_file_name(tagged))
    }
}
