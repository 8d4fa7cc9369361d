//! Gradex Compile - the compile-dispatch core of the grading pipeline
//!
//! Given a submitted source tree and an output location, this crate:
//! - scans the tree and classifies the required toolchain
//! - synthesizes the matching compiler/build invocation
//! - executes it with deadlock-free concurrent output capture
//! - publishes command text + log and pushes a verdict on failure

pub mod artifacts;
pub mod classify;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod exec;
pub mod scan;

// Re-export key types
pub use classify::ProjectType;
pub use command::CommandSpec;
pub use config::CompileConfig;
pub use dispatch::CompileDispatcher;
pub use exec::{ExecutionResult, ShellExecutor};
pub use scan::{scan_tree, ScanResult};
