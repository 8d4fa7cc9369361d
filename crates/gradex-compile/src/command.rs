//! Toolchain command synthesis.
//!
//! Builds the literal shell invocation for the selected project type. The
//! synthesized text is published verbatim for audit, so everything here
//! must be deterministic for a given tree and configuration.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use gradex_core::{CompileError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::classify::ProjectType;
use crate::config::CompileConfig;
use crate::scan::ScanResult;

/// A synthesized toolchain invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandSpec {
    /// Primary compile/build command.
    pub primary: String,

    /// Follow-up artifact-relocation command, if the toolchain needs one.
    pub secondary: Option<String>,

    /// Name of the produced artifact.
    pub artifact: String,
}

/// Synthesize the command for a classified tree.
pub fn synthesize(
    project: ProjectType,
    scan: &ScanResult,
    config: &CompileConfig,
    source_root: &Path,
    target: &Path,
) -> Result<CommandSpec> {
    match project {
        ProjectType::ManagedRuntime => synthesize_java(scan, config, source_root),
        ProjectType::ManifestDriven => synthesize_cargo(scan, config, source_root),
        ProjectType::NativeC => synthesize_native(false, scan, config, target),
        ProjectType::NativeCpp => synthesize_native(true, scan, config, target),
    }
}

/// Gather supplemental library jars, excluding the denylisted artifact.
///
/// The set is sorted so the classpath and extraction chain are stable.
/// A missing or unreadable library directory yields an empty set; the
/// grading container normally provisions it, but tests may not.
fn gather_library_jars(config: &CompileConfig) -> Vec<String> {
    let entries = match fs::read_dir(&config.ext_lib_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %config.ext_lib_dir.display(), error = %e, "library directory unreadable");
            return Vec::new();
        }
    };

    let jars: BTreeSet<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".jar"))
        .filter(|name| name != &config.denylisted_jar)
        .map(|name| config.ext_lib_dir.join(name).to_string_lossy().into_owned())
        .collect();

    jars.into_iter().collect()
}

/// Managed-runtime: compile every source against the supplemental
/// classpath, unpack each library into the classes directory, then
/// package everything into one self-contained executable jar.
fn synthesize_java(
    scan: &ScanResult,
    config: &CompileConfig,
    source_root: &Path,
) -> Result<CommandSpec> {
    let libs = gather_library_jars(config);
    let classes = config.classes_dir();
    let jar_path = config.jar_path();

    let mut classpath = vec![".".to_string()];
    classpath.extend(libs.iter().cloned());

    let mut segments = vec![format!(
        "javac -d {} -encoding utf-8 -cp {} -sourcepath {} {}",
        classes.display(),
        classpath.join(":"),
        source_root.display(),
        scan.java_sources
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" "),
    )];
    segments.push(format!("cd {}", classes.display()));
    for lib in &libs {
        segments.push(format!("jar xf {lib}"));
    }
    segments.push(format!(
        "jar --create --file {} --main-class {} -C {} .",
        jar_path.display(),
        config.entry_point_class,
        classes.display(),
    ));

    Ok(CommandSpec {
        primary: segments.join(" && "),
        secondary: None,
        artifact: config.jar_name(),
    })
}

/// Manifest-driven: build in release mode inside the manifest's directory,
/// then relocate the default release binary into the output folder.
fn synthesize_cargo(
    scan: &ScanResult,
    config: &CompileConfig,
    source_root: &Path,
) -> Result<CommandSpec> {
    let manifest_dir = scan
        .manifest_dir
        .as_ref()
        .ok_or_else(|| CompileError::InvalidInput {
            path: source_root.to_path_buf(),
        })?;

    let primary = format!(
        "cd {} && {} build --release --target-dir {}",
        manifest_dir.display(),
        config.cargo_bin.display(),
        config.exec_dir.display(),
    );
    let secondary = format!(
        "mv {}/release/{} {}",
        config.exec_dir.display(),
        config.relocated_binary,
        config.exec_dir.display(),
    );

    Ok(CommandSpec {
        primary,
        secondary: Some(secondary),
        artifact: config.relocated_binary.clone(),
    })
}

/// Frontend header for the native command: compiler executable, language
/// standard, optimization, math link flag, staged-library paths.
fn frontend_header(is_cpp: bool, config: &CompileConfig) -> Result<String> {
    let compiler = config.compiler.as_str();
    if compiler != "gcc" && compiler != "clang" {
        return Err(CompileError::UnsupportedCompiler {
            compiler: compiler.to_string(),
        });
    }
    let lib = config.native_lib_dir.display();
    let header = if is_cpp {
        if compiler == "gcc" {
            format!("g++ -std=c++17 -O2 -L{lib} -I{lib} -lm -lantlr4-runtime")
        } else {
            format!("clang++ -std=c++17 -O2 -lm -L{lib} -I{lib} -lantlr4-runtime")
        }
    } else {
        format!("{compiler} -std=c11 -O2 -lm")
    };
    Ok(header)
}

/// Native: one command compiling every gathered source file with the
/// per-directory include flags, written to the caller-supplied target.
fn synthesize_native(
    is_cpp: bool,
    scan: &ScanResult,
    config: &CompileConfig,
    target: &Path,
) -> Result<CommandSpec> {
    let header = frontend_header(is_cpp, config)?;

    let mut parts = vec![header];
    for source in &scan.native_sources {
        parts.push(source.to_string_lossy().into_owned());
    }
    for dir in &scan.include_dirs {
        parts.push(format!("-I {}", dir.display()));
    }
    parts.push(format!("-o {}", target.display()));

    let artifact = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.exec_name.clone());

    Ok(CommandSpec {
        primary: parts.join(" "),
        secondary: None,
        artifact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_with(compiler: &str) -> CompileConfig {
        CompileConfig {
            compiler: compiler.to_string(),
            exec_dir: PathBuf::from("/tmp/run"),
            ..Default::default()
        }
    }

    fn native_scan() -> ScanResult {
        ScanResult {
            native_sources: vec![PathBuf::from("/src/main.c"), PathBuf::from("/src/util.c")],
            include_dirs: vec![PathBuf::from("/src"), PathBuf::from("/src/inc")],
            ..Default::default()
        }
    }

    #[test]
    fn test_native_c_command_shape() {
        let spec = synthesize(
            ProjectType::NativeC,
            &native_scan(),
            &config_with("gcc"),
            Path::new("/src"),
            Path::new("/tmp/run/main"),
        )
        .unwrap();

        assert_eq!(
            spec.primary,
            "gcc -std=c11 -O2 -lm /src/main.c /src/util.c -I /src -I /src/inc -o /tmp/run/main"
        );
        assert!(spec.secondary.is_none());
        assert_eq!(spec.artifact, "main");
    }

    #[test]
    fn test_native_c_uses_frontend_identifier_directly() {
        let spec = synthesize(
            ProjectType::NativeC,
            &native_scan(),
            &config_with("clang"),
            Path::new("/src"),
            Path::new("/tmp/run/main"),
        )
        .unwrap();
        assert!(spec.primary.starts_with("clang -std=c11 -O2 -lm"));
    }

    #[test]
    fn test_native_cpp_frontends() {
        let mut scan = native_scan();
        scan.is_cpp = true;

        let gcc = synthesize(
            ProjectType::NativeCpp,
            &scan,
            &config_with("gcc"),
            Path::new("/src"),
            Path::new("/tmp/run/main"),
        )
        .unwrap();
        assert!(gcc
            .primary
            .starts_with("g++ -std=c++17 -O2 -L/extlibs -I/extlibs -lm -lantlr4-runtime"));

        let clang = synthesize(
            ProjectType::NativeCpp,
            &scan,
            &config_with("clang"),
            Path::new("/src"),
            Path::new("/tmp/run/main"),
        )
        .unwrap();
        assert!(clang
            .primary
            .starts_with("clang++ -std=c++17 -O2 -lm -L/extlibs -I/extlibs -lantlr4-runtime"));
    }

    #[test]
    fn test_unrecognized_frontend_rejected() {
        let err = synthesize(
            ProjectType::NativeC,
            &native_scan(),
            &config_with("icc"),
            Path::new("/src"),
            Path::new("/tmp/run/main"),
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedCompiler { compiler } if compiler == "icc"));
    }

    #[test]
    fn test_cargo_commands() {
        let scan = ScanResult {
            manifest_dir: Some(PathBuf::from("/src/proj")),
            ..Default::default()
        };
        let spec = synthesize(
            ProjectType::ManifestDriven,
            &scan,
            &config_with("gcc"),
            Path::new("/src"),
            Path::new("/tmp/run/main"),
        )
        .unwrap();

        assert_eq!(
            spec.primary,
            "cd /src/proj && /root/.cargo/bin/cargo build --release --target-dir /tmp/run"
        );
        assert_eq!(
            spec.secondary.as_deref(),
            Some("mv /tmp/run/release/compiler /tmp/run")
        );
        assert_eq!(spec.artifact, "compiler");
    }

    #[test]
    fn test_java_command_packages_jar() {
        // Library directory absent in tests, so the classpath is just ".".
        let config = CompileConfig {
            ext_lib_dir: PathBuf::from("/nonexistent-lib-dir"),
            exec_dir: PathBuf::from("/tmp/run"),
            exec_name: "submission".to_string(),
            ..Default::default()
        };
        let scan = ScanResult {
            is_java: true,
            java_sources: vec![PathBuf::from("/src/Main.java")],
            ..Default::default()
        };

        let spec = synthesize(
            ProjectType::ManagedRuntime,
            &scan,
            &config,
            Path::new("/src"),
            Path::new("/tmp/run/main"),
        )
        .unwrap();

        assert_eq!(
            spec.primary,
            "javac -d /tmp/run/classes -encoding utf-8 -cp . -sourcepath /src /src/Main.java \
             && cd /tmp/run/classes \
             && jar --create --file /tmp/run/submission.jar --main-class Compiler -C /tmp/run/classes ."
        );
        assert!(spec.secondary.is_none());
        assert_eq!(spec.artifact, "submission.jar");
    }

    #[test]
    fn test_java_classpath_excludes_denylisted_jar() {
        let tmp = tempfile::TempDir::new().unwrap();
        for name in ["b.jar", "a.jar", "ARMKernel.jar", "notes.txt"] {
            std::fs::File::create(tmp.path().join(name)).unwrap();
        }
        let config = CompileConfig {
            ext_lib_dir: tmp.path().to_path_buf(),
            exec_dir: PathBuf::from("/tmp/run"),
            ..Default::default()
        };

        let jars = gather_library_jars(&config);
        let a = tmp.path().join("a.jar").to_string_lossy().into_owned();
        let b = tmp.path().join("b.jar").to_string_lossy().into_owned();
        assert_eq!(jars, vec![a.clone(), b.clone()]);

        let scan = ScanResult {
            is_java: true,
            java_sources: vec![PathBuf::from("/src/Main.java")],
            ..Default::default()
        };
        let spec = synthesize_java(&scan, &config, Path::new("/src")).unwrap();
        assert!(spec.primary.contains(&format!("-cp .:{a}:{b}")));
        assert!(spec.primary.contains(&format!("jar xf {a} && jar xf {b}")));
        assert!(!spec.primary.contains("ARMKernel"));
    }
}
