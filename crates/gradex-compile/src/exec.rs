//! Shell command execution with concurrent output capture.

use std::process::Stdio;
use std::time::Instant;

use gradex_core::{CompileError, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::debug;

/// Captured outcome of one executed command.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Exit code (0 = success; -1 when terminated by signal).
    pub exit_code: i32,

    /// Captured stdout lines, in stream order.
    pub stdout: Vec<String>,

    /// Captured stderr lines, in stream order.
    pub stderr: Vec<String>,

    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ExecutionResult {
    /// Whether the command exited zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Full log: every stdout line followed by every stderr line,
    /// regardless of real-time interleaving.
    pub fn log(&self) -> Vec<String> {
        let mut lines = self.stdout.clone();
        lines.extend(self.stderr.iter().cloned());
        lines
    }
}

/// Runs synthesized command text through `/bin/bash -c`.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Execute one command and capture its output.
    ///
    /// Both streams are drained by their own task while the process runs;
    /// draining them sequentially would deadlock once the undrained pipe's
    /// buffer fills on sufficiently verbose output. The process is waited
    /// first, then both readers are joined before results are assembled.
    ///
    /// A nonzero exit is reported through [`ExecutionResult`], not as an
    /// error; only a failed spawn or stream I/O maps to
    /// `CompileError::Execution`. No timeout is enforced — a hung command
    /// hangs the call.
    pub async fn run(&self, cmd: &str) -> Result<ExecutionResult> {
        let start = Instant::now();

        let mut child = Command::new("/bin/bash")
            .arg("-c")
            .arg(cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CompileError::Execution(format!("failed to spawn `{cmd}`: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CompileError::Execution("stdout pipe missing".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| CompileError::Execution("stderr pipe missing".to_string()))?;

        let stdout_task = tokio::spawn(read_lines(stdout));
        let stderr_task = tokio::spawn(read_lines(stderr));

        let status = child
            .wait()
            .await
            .map_err(|e| CompileError::Execution(format!("wait failed: {e}")))?;

        let stdout = stdout_task
            .await
            .map_err(|e| CompileError::Execution(format!("stdout reader panicked: {e}")))??;
        let stderr = stderr_task
            .await
            .map_err(|e| CompileError::Execution(format!("stderr reader panicked: {e}")))??;

        let exit_code = status.code().unwrap_or(-1);
        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(exit_code, duration_ms, "command finished");

        Ok(ExecutionResult {
            exit_code,
            stdout,
            stderr,
            duration_ms,
        })
    }
}

/// Drain one stream to completion, one decoded line at a time.
///
/// Compiler diagnostics can echo raw submission bytes, so lines are read
/// as bytes and decoded lossily; invalid UTF-8 becomes replacement
/// characters instead of aborting the capture.
async fn read_lines<R: AsyncRead + Unpin>(stream: R) -> Result<Vec<String>> {
    let mut reader = BufReader::new(stream);
    let mut collected = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|e| CompileError::Execution(format!("stream read failed: {e}")))?;
        if n == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        collected.push(String::from_utf8_lossy(&buf).into_owned());
    }
    Ok(collected)
}
