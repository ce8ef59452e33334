//! Kotlin source discovery.
//!
//! Roots are walked recursively with entries sorted by file name, so the
//! order in which units reach the pipeline is stable across runs and
//! platforms.

use dslgen_codegen::SourceUnit;
use dslgen_core::{Diagnostic, DiagnosticKind, Diagnostics};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const KOTLIN_EXTENSION: &str = "kt";

/// Reads every `*.kt` file below `roots`.
///
/// Unreadable entries are reported as [`DiagnosticKind::Io`] errors and
/// skipped; the remaining files are still returned.
pub fn collect_sources(roots: &[PathBuf], diagnostics: &mut Diagnostics) -> Vec<SourceUnit> {
    let mut units = Vec::new();

    for root in roots {
        let before = units.len();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let subject = e
                        .path()
                        .unwrap_or(root.as_path())
                        .display()
                        .to_string();
                    diagnostics.push(Diagnostic::error(DiagnosticKind::Io, subject, e.to_string()));
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_kotlin(entry.path()) {
                continue;
            }

            let path = entry.path().display().to_string();
            match std::fs::read_to_string(entry.path()) {
                Ok(text) => units.push(SourceUnit::new(path, text)),
                Err(e) => diagnostics.push(Diagnostic::error(
                    DiagnosticKind::Io,
                    path,
                    format!("failed to read source: {e}"),
                )),
            }
        }
        tracing::debug!(root = %root.display(), files = units.len() - before, "collected sources");
    }

    units
}

fn is_kotlin(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == KOTLIN_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collects_kotlin_files_sorted() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("b/nested")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("b/nested/Zeta.kt"), "class Zeta").unwrap();
        fs::write(root.join("a/Alpha.kt"), "class Alpha").unwrap();
        fs::write(root.join("a/notes.md"), "# notes").unwrap();
        fs::write(root.join("Build.kts"), "plugins {}").unwrap();

        let mut diagnostics = Diagnostics::new();
        let units = collect_sources(&[root.to_path_buf()], &mut diagnostics);

        let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["class Alpha", "class Zeta"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_root_reported() {
        let mut diagnostics = Diagnostics::new();
        let units = collect_sources(&[PathBuf::from("/nonexistent/dslgen/src")], &mut diagnostics);

        assert!(units.is_empty());
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.iter().next().unwrap().kind, DiagnosticKind::Io);
    }

    #[test]
    fn test_multiple_roots_keep_root_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("Z.kt"), "z").unwrap();
        fs::write(second.path().join("A.kt"), "a").unwrap();

        let mut diagnostics = Diagnostics::new();
        let units = collect_sources(
            &[first.path().to_path_buf(), second.path().to_path_buf()],
            &mut diagnostics,
        );
        let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["z", "a"]);
    }
}
