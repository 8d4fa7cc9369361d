//! Compile-stage configuration.
//!
//! Every fixed path, filename, and magic artifact name consumed by command
//! synthesis lives here as a named field, so the synthesis logic itself
//! carries no literals. `Default` holds the values used in the production
//! grading containers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one compile-dispatch instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompileConfig {
    /// Native frontend selector; only `"gcc"` and `"clang"` are accepted.
    pub compiler: String,

    /// Output folder where artifacts are staged.
    pub exec_dir: PathBuf,

    /// Configured executable name for the submission.
    pub exec_name: String,

    /// Directory of supplemental library jars provisioned in the container.
    pub ext_lib_dir: PathBuf,

    /// Jar excluded from the classpath by exact name.
    pub denylisted_jar: String,

    /// Entry-point class baked into the packaged jar.
    pub entry_point_class: String,

    /// Archive of native libraries to stage, extracted if present.
    pub native_lib_bundle: PathBuf,

    /// Staging directory for extracted native libraries.
    pub native_lib_dir: PathBuf,

    /// Build tool used for manifest-driven projects.
    pub cargo_bin: PathBuf,

    /// Name the manifest-driven release binary is relocated under.
    pub relocated_binary: String,

    /// Optional resource subdirectory copied beside compiled classes.
    pub resource_dir_name: String,

    /// Filename whose presence marks a manifest-driven project.
    pub manifest_marker: String,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            compiler: "gcc".to_string(),
            exec_dir: PathBuf::from("/root/run"),
            exec_name: "main".to_string(),
            ext_lib_dir: PathBuf::from("/coursegrader/dockerext"),
            denylisted_jar: "ARMKernel.jar".to_string(),
            entry_point_class: "Compiler".to_string(),
            native_lib_bundle: PathBuf::from("/coursegrader/dockerext/lib.tar.gz"),
            native_lib_dir: PathBuf::from("/extlibs"),
            cargo_bin: PathBuf::from("/root/.cargo/bin/cargo"),
            relocated_binary: "compiler".to_string(),
            resource_dir_name: "res".to_string(),
            manifest_marker: "Cargo.toml".to_string(),
        }
    }
}

impl CompileConfig {
    /// Subdirectory of `exec_dir` holding compiled managed-runtime units.
    pub fn classes_dir(&self) -> PathBuf {
        self.exec_dir.join("classes")
    }

    /// Final managed-runtime artifact name (`exec_name` + jar suffix).
    pub fn jar_name(&self) -> String {
        format!("{}.jar", self.exec_name)
    }

    /// Full path of the packaged jar artifact.
    pub fn jar_path(&self) -> PathBuf {
        self.exec_dir.join(self.jar_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let config = CompileConfig::default();
        assert_eq!(config.compiler, "gcc");
        assert_eq!(config.denylisted_jar, "ARMKernel.jar");
        assert_eq!(config.entry_point_class, "Compiler");
        assert_eq!(config.relocated_binary, "compiler");
        assert_eq!(config.manifest_marker, "Cargo.toml");
    }

    #[test]
    fn test_derived_paths() {
        let config = CompileConfig {
            exec_dir: PathBuf::from("/tmp/out"),
            exec_name: "submission".to_string(),
            ..Default::default()
        };
        assert_eq!(config.classes_dir(), PathBuf::from("/tmp/out/classes"));
        assert_eq!(config.jar_name(), "submission.jar");
        assert_eq!(config.jar_path(), PathBuf::from("/tmp/out/submission.jar"));
    }
}
