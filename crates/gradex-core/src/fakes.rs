//! In-memory fakes for collaborator traits (testing only)
//!
//! Provides `MemoryReportSink` and `MemoryVerdictSink` that satisfy the
//! trait contracts without any external dependencies.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::report::{ReportSink, VerdictSink};
use crate::verdict::VerdictStatus;

// ---------------------------------------------------------------------------
// MemoryReportSink
// ---------------------------------------------------------------------------

/// In-memory report sink recording commands and logs in arrival order.
#[derive(Debug, Default)]
pub struct MemoryReportSink {
    commands: Mutex<Vec<String>>,
    logs: Mutex<Vec<Vec<String>>>,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All command strings published so far.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    /// All logs published so far, one entry per executed command.
    pub fn logs(&self) -> Vec<Vec<String>> {
        self.logs.lock().unwrap().clone()
    }

    /// Every published log line flattened into one sequence.
    pub fn combined_log(&self) -> Vec<String> {
        self.logs.lock().unwrap().iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl ReportSink for MemoryReportSink {
    async fn publish_command(&self, command: &str) -> Result<()> {
        self.commands.lock().unwrap().push(command.to_string());
        Ok(())
    }

    async fn publish_log(&self, lines: &[String]) -> Result<()> {
        self.logs.lock().unwrap().push(lines.to_vec());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryVerdictSink
// ---------------------------------------------------------------------------

/// In-memory verdict sink recording every push.
#[derive(Debug, Default)]
pub struct MemoryVerdictSink {
    verdicts: Mutex<Vec<VerdictStatus>>,
}

impl MemoryVerdictSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All verdicts pushed so far.
    pub fn verdicts(&self) -> Vec<VerdictStatus> {
        self.verdicts.lock().unwrap().clone()
    }
}

#[async_trait]
impl VerdictSink for MemoryVerdictSink {
    async fn report(&self, status: VerdictStatus) -> Result<()> {
        self.verdicts.lock().unwrap().push(status);
        Ok(())
    }
}
