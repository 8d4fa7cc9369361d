//! Compile-dispatch orchestration.
//!
//! Single entry point tying the stages together: scan the tree, classify
//! it, prepare output artifacts, synthesize the toolchain command, execute
//! it, and publish command text + log to the report sink. The verdict sink
//! is notified only when an executed command exits nonzero; compile
//! failure is a grading outcome, never an `Err` from [`CompileDispatcher::compile`].

use std::path::Path;
use std::sync::Arc;

use gradex_core::{ReportSink, Result, VerdictSink, VerdictStatus};
use tracing::info;
use uuid::Uuid;

use crate::artifacts;
use crate::classify::ProjectType;
use crate::command::{self, CommandSpec};
use crate::config::CompileConfig;
use crate::exec::{ExecutionResult, ShellExecutor};
use crate::scan::scan_tree;

/// The compile stage's facade.
pub struct CompileDispatcher {
    config: CompileConfig,
    report: Arc<dyn ReportSink>,
    verdict: Arc<dyn VerdictSink>,
    executor: ShellExecutor,
}

impl CompileDispatcher {
    pub fn new(
        config: CompileConfig,
        report: Arc<dyn ReportSink>,
        verdict: Arc<dyn VerdictSink>,
    ) -> Self {
        Self {
            config,
            report,
            verdict,
            executor: ShellExecutor::new(),
        }
    }

    /// Compile one submission.
    ///
    /// Setup failures (scan, classification, artifact preparation,
    /// synthesis) abort immediately: no process is spawned and nothing is
    /// published. Once execution starts, command text and full log are
    /// always published, whatever the exit status; each nonzero exit
    /// additionally pushes one `CompileError` verdict.
    pub async fn compile(&self, source: &Path, target: &Path) -> Result<()> {
        let submission = Uuid::new_v4();

        let scan = scan_tree(source, &self.config.manifest_marker)?;
        let project = ProjectType::classify(&scan);
        info!(%submission, code_type = project.label(), "submission classified");

        if project == ProjectType::ManagedRuntime {
            artifacts::prepare_managed(&self.config, source)?;
        }

        // Synthesis validates the configured frontend, so an unsupported
        // compiler fails here, before anything is spawned or published.
        let spec = command::synthesize(project, &scan, &self.config, source, target)?;

        if matches!(project, ProjectType::NativeC | ProjectType::NativeCpp) {
            artifacts::stage_native_libs(&self.config, &self.executor).await;
        }

        self.publish_and_execute(&submission, &spec).await?;

        Ok(())
    }

    async fn publish_and_execute(&self, submission: &Uuid, spec: &CommandSpec) -> Result<()> {
        self.report.publish_command(&spec.primary).await?;
        self.report
            .publish_command(spec.secondary.as_deref().unwrap_or(""))
            .await?;

        let primary = self.run_reported(submission, &spec.primary).await?;
        self.report.publish_log(&primary.log()).await?;

        if let Some(secondary) = &spec.secondary {
            let relocation = self.run_reported(submission, secondary).await?;
            self.report.publish_log(&relocation.log()).await?;
        }

        Ok(())
    }

    /// Execute one command; a nonzero exit pushes exactly one verdict.
    async fn run_reported(&self, submission: &Uuid, cmd: &str) -> Result<ExecutionResult> {
        let result = self.executor.run(cmd).await?;
        if !result.success() {
            info!(%submission, exit_code = result.exit_code, "compile command failed");
            self.verdict.report(VerdictStatus::CompileError).await?;
        }
        Ok(result)
    }
}
