//! Source tree scanning and file classification.
//!
//! Walks the submitted tree breadth-first and folds every file into a
//! [`ScanResult`]. The walk never short-circuits: a tree mixing several
//! toolchain signals is still scanned completely, and precedence between
//! signals is resolved later by the classifier.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use gradex_core::{CompileError, Result};
use tracing::{debug, warn};

/// Effect class of a file extension.
///
/// One explicit row per extension group from the recognized-extension
/// table. Matching is case-sensitive: `.C` is C++ source, `.c` is C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileClass {
    /// `hpp`, `hh`, `H`, `hxx` — marks the tree C++ and contributes an include dir
    CppHeader,
    /// `h` — contributes an include dir only, does not imply C++
    PlainHeader,
    /// `cpp`, `CPP`, `c++`, `cxx`, `C`, `cc`, `cp` — marks the tree C++
    CppSource,
    /// `c` — native source that does not imply C++
    CSource,
    /// `java` — managed-runtime source
    JavaSource,
    /// anything else is ignored
    Other,
}

fn classify_extension(ext: &str) -> FileClass {
    match ext {
        "hpp" | "hh" | "H" | "hxx" => FileClass::CppHeader,
        "h" => FileClass::PlainHeader,
        "cpp" | "CPP" | "c++" | "cxx" | "C" | "cc" | "cp" => FileClass::CppSource,
        "c" => FileClass::CSource,
        "java" => FileClass::JavaSource,
        _ => FileClass::Other,
    }
}

/// Accumulated classification of one submitted source tree.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// True once any C++-flavored source or header was seen.
    pub is_cpp: bool,

    /// True once any managed-runtime source was seen.
    pub is_java: bool,

    /// Directory containing the manifest marker, if one was found.
    pub manifest_dir: Option<PathBuf>,

    /// Parent directories of header files, insertion-ordered, deduplicated.
    pub include_dirs: Vec<PathBuf>,

    /// Native (C/C++) source files in traversal order.
    pub native_sources: Vec<PathBuf>,

    /// Managed-runtime source files in traversal order.
    pub java_sources: Vec<PathBuf>,
}

impl ScanResult {
    fn add_include_dir(&mut self, dir: &Path, seen: &mut HashSet<PathBuf>) {
        if seen.insert(dir.to_path_buf()) {
            self.include_dirs.push(dir.to_path_buf());
        }
    }

    fn record(&mut self, path: &Path, class: FileClass, seen_includes: &mut HashSet<PathBuf>) {
        let parent = path.parent().unwrap_or(Path::new("")).to_path_buf();
        match class {
            FileClass::CppHeader => {
                self.is_cpp = true;
                self.add_include_dir(&parent, seen_includes);
            }
            FileClass::PlainHeader => {
                self.add_include_dir(&parent, seen_includes);
            }
            FileClass::CppSource => {
                self.is_cpp = true;
                self.native_sources.push(path.to_path_buf());
            }
            FileClass::CSource => {
                self.native_sources.push(path.to_path_buf());
            }
            FileClass::JavaSource => {
                self.is_java = true;
                self.java_sources.push(path.to_path_buf());
            }
            FileClass::Other => {}
        }
    }
}

/// Scan a submitted source tree.
///
/// Fails with `InvalidInput` if `root` is not a directory. Otherwise every
/// file under `root` is visited breadth-first; directory entries are
/// sorted by name per level so the resulting source and include lists (and
/// therefore the synthesized command text) are deterministic across hosts.
pub fn scan_tree(root: &Path, manifest_marker: &str) -> Result<ScanResult> {
    if !root.is_dir() {
        return Err(CompileError::InvalidInput {
            path: root.to_path_buf(),
        });
    }

    let mut result = ScanResult::default();
    let mut seen_includes = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(root.to_path_buf());

    while let Some(dir) = queue.pop_front() {
        // Unreadable directories and entries are skipped with a warning;
        // the walk keeps going so one bad subtree does not abort the
        // whole classification. Only the root itself is validated.
        let reader = match fs::read_dir(&dir) {
            Ok(reader) => reader,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };
        let mut entries: Vec<PathBuf> = reader
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                    None
                }
            })
            .collect();
        entries.sort();

        for path in entries {
            if path.is_dir() {
                queue.push_back(path);
                continue;
            }
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                result.record(&path, classify_extension(ext), &mut seen_includes);
            }
            // The manifest marker is matched on the full file name, not
            // on its extension. Last occurrence wins.
            if path.file_name().and_then(|n| n.to_str()) == Some(manifest_marker) {
                result.manifest_dir = path.parent().map(Path::to_path_buf);
            }
        }
    }

    debug!(
        cpp = result.is_cpp,
        java = result.is_java,
        manifest = result.manifest_dir.is_some(),
        native_sources = result.native_sources.len(),
        java_sources = result.java_sources.len(),
        "scan complete"
    );

    Ok(result)
}
