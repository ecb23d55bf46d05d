//! # parchunk Core Library
//!
//! A parallel, chunk-based file transform engine. A source file is split into contiguous byte
//! ranges, each range is transformed on its own thread, and the results are written back into
//! a pre-sized output file through a serialized commit phase.
//!
//! The bundled transforms are placeholders, not compression: each one is its own inverse, so
//! "compress" and "decompress" run the same pipeline.
//!
//! ## Key Modules
//!
//! - [`planner`]: Splits `[0, size)` into chunks for a worker count.
//! - [`transform`]: The [`Transform`](transform::Transform) trait and its implementations.
//! - [`processor`]: Reads one chunk and applies the transform.
//! - [`coordinator`]: Serializes the open/write/report sequence on the shared output.
//! - [`workers`]: The [`Dispatcher`](workers::Dispatcher) that plans, spawns and joins.
//!
//! ## Examples
//!
//! ```no_run
//! use parchunk::common::Operation;
//! use parchunk::transform::ReverseBytes;
//! use parchunk::workers::Dispatcher;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let dispatcher = Dispatcher::new(4, Arc::new(ReverseBytes)).with_progress(|ev| println!("{ev}"));
//! let (output, report) = dispatcher.run_operation(Operation::Compress, Path::new("data.bin"), None)?;
//! assert!(report.is_complete());
//! # let _ = output;
//! # Ok::<(), parchunk::EngineError>(())
//! ```

pub mod cli;
pub mod cli_runner;
pub mod common;
pub mod coordinator;
pub mod error;
pub use error::EngineError;

pub mod planner;
pub mod processor;
pub mod progress;
pub mod transform;
pub mod workers;

// Cross-platform filesystem wrapper
pub mod fsx;
