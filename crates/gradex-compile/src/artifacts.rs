//! Output directory preparation and packaging support.
//!
//! The managed-runtime path needs a fresh classes directory (with bundled
//! resources copied in) before compilation; the native path needs the
//! external library staging directory populated. Nothing here is
//! transactional — a failure partway through surfaces as a fatal error
//! and leaves the output directory as-is.

use std::fs;
use std::path::Path;

use gradex_core::{CompileError, Result};
use tracing::{debug, warn};

use crate::config::CompileConfig;
use crate::exec::ShellExecutor;

/// Prepare the output area for a managed-runtime compile.
///
/// Clears and recreates `{exec_dir}/classes`, removes a stale packaged
/// jar, and copies the submission's optional resource directory into the
/// classes directory so generated artifacts can reference bundled
/// resources. Any removal or creation failure is a `ResourceConflict`
/// naming the offending path.
pub fn prepare_managed(config: &CompileConfig, source_root: &Path) -> Result<()> {
    let classes = config.classes_dir();

    if classes.exists() {
        // remove_dir_all deletes deepest entries first; a single
        // undeletable entry fails the whole compile up front.
        fs::remove_dir_all(&classes).map_err(|e| CompileError::ResourceConflict {
            path: classes.clone(),
            reason: format!("target path already exists and can not be deleted: {e}"),
        })?;
    }
    fs::create_dir_all(&classes).map_err(|e| CompileError::ResourceConflict {
        path: classes.clone(),
        reason: format!("can not create target directory: {e}"),
    })?;

    let jar = config.jar_path();
    if jar.exists() {
        fs::remove_file(&jar).map_err(|e| CompileError::ResourceConflict {
            path: jar.clone(),
            reason: format!("stale jar can not be deleted: {e}"),
        })?;
    }

    let res = source_root.join(&config.resource_dir_name);
    if res.is_dir() {
        for entry in fs::read_dir(&res).map_err(|e| CompileError::conflict(&res, e))? {
            let entry = entry.map_err(|e| CompileError::conflict(&res, e))?;
            let from = entry.path();
            let to = classes.join(entry.file_name());
            if from.is_dir() {
                copy_dir_recursive(&from, &to)?;
            } else {
                fs::copy(&from, &to).map_err(|e| CompileError::conflict(&from, e))?;
            }
        }
        debug!(res = %res.display(), "copied resource directory");
    }

    Ok(())
}

fn copy_dir_recursive(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to).map_err(|e| CompileError::conflict(to, e))?;
    for entry in fs::read_dir(from).map_err(|e| CompileError::conflict(from, e))? {
        let entry = entry.map_err(|e| CompileError::conflict(from, e))?;
        let src = entry.path();
        let dst = to.join(entry.file_name());
        if src.is_dir() {
            copy_dir_recursive(&src, &dst)?;
        } else {
            fs::copy(&src, &dst).map_err(|e| CompileError::conflict(&src, e))?;
        }
    }
    Ok(())
}

/// Stage external native libraries before a native compile.
///
/// Ensures the staging directory exists and, when the provisioned bundle
/// archive is present on the host, extracts it there. Best-effort: the
/// grading container normally ships the bundle, but its absence (or a
/// failed extraction) only downgrades the available libraries and is not
/// a compile failure.
pub async fn stage_native_libs(config: &CompileConfig, executor: &ShellExecutor) {
    if let Err(e) = fs::create_dir_all(&config.native_lib_dir) {
        warn!(dir = %config.native_lib_dir.display(), error = %e, "could not create staging directory");
        return;
    }

    if !config.native_lib_bundle.exists() {
        return;
    }

    let cmd = format!(
        "tar xaf {} -C {}",
        config.native_lib_bundle.display(),
        config.native_lib_dir.display(),
    );
    match executor.run(&cmd).await {
        Ok(result) if result.exit_code != 0 => {
            warn!(exit_code = result.exit_code, "library bundle extraction failed");
        }
        Ok(_) => debug!(bundle = %config.native_lib_bundle.display(), "library bundle staged"),
        Err(e) => warn!(error = %e, "library bundle extraction could not run"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn test_config(exec_dir: &Path) -> CompileConfig {
        CompileConfig {
            exec_dir: exec_dir.to_path_buf(),
            exec_name: "submission".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_managed_recreates_classes_dir() {
        let out = TempDir::new().unwrap();
        let src = TempDir::new().unwrap();
        let config = test_config(out.path());

        let stale = config.classes_dir().join("old");
        fs::create_dir_all(&stale).unwrap();
        File::create(stale.join("Old.class")).unwrap();

        prepare_managed(&config, src.path()).unwrap();

        assert!(config.classes_dir().is_dir());
        assert!(!stale.exists());
    }

    #[test]
    fn test_prepare_managed_removes_stale_jar() {
        let out = TempDir::new().unwrap();
        let src = TempDir::new().unwrap();
        let config = test_config(out.path());

        File::create(config.jar_path()).unwrap();
        prepare_managed(&config, src.path()).unwrap();
        assert!(!config.jar_path().exists());
    }

    #[test]
    fn test_prepare_managed_copies_resources() {
        let out = TempDir::new().unwrap();
        let src = TempDir::new().unwrap();
        let config = test_config(out.path());

        let res = src.path().join("res");
        fs::create_dir_all(res.join("sprites")).unwrap();
        let mut f = File::create(res.join("config.ini")).unwrap();
        f.write_all(b"x=1").unwrap();
        File::create(res.join("sprites").join("hero.png")).unwrap();

        prepare_managed(&config, src.path()).unwrap();

        assert!(config.classes_dir().join("config.ini").is_file());
        assert!(config.classes_dir().join("sprites").join("hero.png").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_prepare_managed_undeletable_dir_conflicts() {
        use std::os::unix::fs::PermissionsExt;

        let out = TempDir::new().unwrap();
        let src = TempDir::new().unwrap();
        let config = test_config(out.path());

        let locked = config.classes_dir().join("locked");
        fs::create_dir_all(&locked).unwrap();
        File::create(locked.join("keep.class")).unwrap();
        // Read+execute only: entries inside cannot be unlinked.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Root ignores permission bits, so the removal may still succeed
        // there; everywhere else this must surface as ResourceConflict.
        match prepare_managed(&config, src.path()) {
            Err(CompileError::ResourceConflict { .. }) => {}
            Err(other) => panic!("expected ResourceConflict, got {other}"),
            Ok(()) => assert!(!locked.exists(), "removal reported ok but left entries"),
        }

        // Restore so TempDir cleanup succeeds.
        if locked.exists() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[tokio::test]
    async fn test_stage_native_libs_is_presence_gated() {
        let staging = TempDir::new().unwrap();
        let config = CompileConfig {
            native_lib_dir: staging.path().join("extlibs"),
            native_lib_bundle: PathBuf::from("/nonexistent/lib.tar.gz"),
            ..Default::default()
        };

        // Missing bundle: directory is created, nothing else happens.
        stage_native_libs(&config, &ShellExecutor::new()).await;
        assert!(config.native_lib_dir.is_dir());
    }
}
