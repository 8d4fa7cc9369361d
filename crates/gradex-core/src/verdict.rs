//! Verdict status values pushed to the grading service.

use serde::{Deserialize, Serialize};

/// Grading verdict this core can push.
///
/// The compile stage only ever pushes `CompileError`; a submission that
/// compiles cleanly receives no push at all, and the surrounding service
/// treats the absence of a push as success.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    /// Compilation produced a nonzero exit status
    CompileError,
}

impl VerdictStatus {
    /// Wire code understood by the grading service.
    pub fn code(&self) -> &'static str {
        match self {
            VerdictStatus::CompileError => "CE",
        }
    }
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
