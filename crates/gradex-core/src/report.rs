//! Collaborator trait definitions for the compile-dispatch core
//!
//! These traits define the two outward edges of the compile stage:
//! - `ReportSink`: audit trail of synthesized commands and captured logs
//! - `VerdictSink`: pass/fail signal to the grading service
//!
//! Both are async and backend-agnostic. In-memory fakes are provided for
//! testing via the `fakes` module.

use async_trait::async_trait;

use crate::error::Result;
use crate::verdict::VerdictStatus;

/// Receives the synthesized command text and the captured compiler log.
///
/// The dispatch facade publishes in a fixed order per `compile` call:
/// primary command text, secondary command text (empty string when the
/// selected toolchain has no relocation step), then one log per executed
/// command. Nothing is published if the call fails before execution.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Record one synthesized command string.
    async fn publish_command(&self, command: &str) -> Result<()>;

    /// Record the captured log of one executed command, stdout lines
    /// followed by stderr lines.
    async fn publish_log(&self, lines: &[String]) -> Result<()>;
}

/// Receives the compile-failure verdict.
///
/// Implementations must tolerate repeated pushes for the same submission
/// (primary and secondary command may both exit nonzero).
#[async_trait]
pub trait VerdictSink: Send + Sync {
    /// Push a verdict for the current submission.
    async fn report(&self, status: VerdictStatus) -> Result<()>;
}
