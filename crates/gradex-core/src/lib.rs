//! Gradex Core - shared contracts for the grading pipeline
//!
//! This crate defines the narrow interfaces through which the
//! compile-dispatch core talks to the rest of the grading service:
//! - `ReportSink`: receives synthesized command text and captured logs
//! - `VerdictSink`: receives the compile-error verdict push
//! - `CompileError`: the single externally visible error type
//!
//! In-memory fakes are provided for testing via the `fakes` module.

mod error;
pub mod fakes;
pub mod report;
pub mod telemetry;
mod verdict;

pub use error::{CompileError, Result};
pub use report::{ReportSink, VerdictSink};
pub use telemetry::init_tracing;
pub use verdict::VerdictStatus;
