//! Gradex - compile-dispatch CLI for the grading pipeline
//!
//! The `gradex` command classifies a submitted source tree, synthesizes
//! and runs the matching toolchain invocation, and prints the command
//! text, the captured compiler log, and the verdict.
//!
//! ## Commands
//!
//! - `compile`: compile one submission into a target artifact

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde::Serialize;

use gradex_compile::{CompileConfig, CompileDispatcher};
use gradex_core::{ReportSink, VerdictSink, VerdictStatus};

#[derive(Parser)]
#[command(name = "gradex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compile-dispatch stage of the Gradex grading pipeline", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile one submission
    Compile {
        /// Root of the submitted source tree
        #[arg(short, long)]
        source: PathBuf,

        /// Target path for the native output artifact
        #[arg(short, long)]
        target: PathBuf,

        /// Native frontend: gcc or clang
        #[arg(long, env = "GRADEX_COMPILER", default_value = "gcc")]
        compiler: String,

        /// Output folder for staged artifacts
        #[arg(long)]
        exec_dir: Option<PathBuf>,

        /// Configured executable name for the submission
        #[arg(long)]
        exec_name: Option<String>,
    },
}

/// Collects everything the dispatcher publishes so it can be rendered
/// once, as text or JSON, after the compile finishes.
#[derive(Debug, Default)]
struct CollectedReport {
    commands: Mutex<Vec<String>>,
    logs: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl ReportSink for CollectedReport {
    async fn publish_command(&self, command: &str) -> gradex_core::Result<()> {
        self.commands.lock().unwrap().push(command.to_string());
        Ok(())
    }

    async fn publish_log(&self, lines: &[String]) -> gradex_core::Result<()> {
        self.logs.lock().unwrap().push(lines.to_vec());
        Ok(())
    }
}

/// Latches the compile-error push; queried for the process exit code.
#[derive(Debug, Default)]
struct LatchedVerdict {
    failed: AtomicBool,
}

#[async_trait]
impl VerdictSink for LatchedVerdict {
    async fn report(&self, _status: VerdictStatus) -> gradex_core::Result<()> {
        self.failed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Serialize)]
struct CompileOutput {
    commands: Vec<String>,
    log: Vec<String>,
    verdict: Option<&'static str>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    gradex_core::init_tracing(cli.verbose, cli.json);

    match cli.command {
        Commands::Compile {
            source,
            target,
            compiler,
            exec_dir,
            exec_name,
        } => {
            let mut config = CompileConfig {
                compiler,
                ..Default::default()
            };
            if let Some(dir) = exec_dir {
                config.exec_dir = dir;
            }
            if let Some(name) = exec_name {
                config.exec_name = name;
            }

            let report = Arc::new(CollectedReport::default());
            let verdict = Arc::new(LatchedVerdict::default());
            let dispatcher =
                CompileDispatcher::new(config, report.clone(), verdict.clone());

            dispatcher
                .compile(&source, &target)
                .await
                .with_context(|| format!("compiling {}", source.display()))?;

            let failed = verdict.failed.load(Ordering::SeqCst);
            let output = CompileOutput {
                commands: report.commands.lock().unwrap().clone(),
                log: report
                    .logs
                    .lock()
                    .unwrap()
                    .iter()
                    .flatten()
                    .cloned()
                    .collect(),
                verdict: failed.then(|| VerdictStatus::CompileError.code()),
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                for command in &output.commands {
                    if !command.is_empty() {
                        println!("$ {command}");
                    }
                }
                for line in &output.log {
                    println!("{line}");
                }
                if let Some(code) = output.verdict {
                    println!("verdict: {code}");
                }
            }

            Ok(if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}
