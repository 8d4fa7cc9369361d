//! Project type selection from scan results.

use serde::{Deserialize, Serialize};

use crate::scan::ScanResult;

/// Toolchain a submission compiles under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    /// Plain C, compiled with the configured frontend directly
    NativeC,
    /// C++ (any C++-flavored file anywhere makes the whole tree C++)
    NativeCpp,
    /// Managed-runtime (Java) project packaged into a jar
    ManagedRuntime,
    /// Declarative build driven by a manifest file (Cargo)
    ManifestDriven,
}

impl ProjectType {
    /// Select the project type for a scanned tree.
    ///
    /// Fixed precedence: managed-runtime beats manifest-driven beats
    /// native; native falls back to C++ iff any C++ signal was seen.
    /// Deliberately permissive — a tree carrying several signals is
    /// compiled under the highest-precedence one with no warning, and
    /// the lower-precedence files are simply not compiled. Selection is
    /// total: some native branch always applies.
    pub fn classify(scan: &ScanResult) -> Self {
        if scan.is_java {
            ProjectType::ManagedRuntime
        } else if scan.manifest_dir.is_some() {
            ProjectType::ManifestDriven
        } else if scan.is_cpp {
            ProjectType::NativeCpp
        } else {
            ProjectType::NativeC
        }
    }

    /// Code-type label recorded alongside the submission.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::NativeC => "c",
            ProjectType::NativeCpp => "c++",
            ProjectType::ManagedRuntime => "java",
            ProjectType::ManifestDriven => "rust",
        }
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
