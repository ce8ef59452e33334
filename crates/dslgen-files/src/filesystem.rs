//! Writing an [`OutputTree`] to disk.
//!
//! Export runs in three phases: optionally clean the output root, create
//! every parent directory once, then write the files. Each file is fully
//! replaced on every pass. With atomic writes enabled a file is written to a
//! sibling temp file, synced, and renamed into place, so a reader never sees
//! a half-written source file.
//!
//! # Examples
//!
//! ```
//! use dslgen_files::{ExportOptions, OutputTree};
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! let mut tree = OutputTree::new();
//! tree.add_file("com/example/CardFactory.kt", "package com.example\n").unwrap();
//!
//! let out = temp.path().join("generated");
//! let written = tree.export(&out, &ExportOptions::default()).unwrap();
//!
//! assert_eq!(written, 1);
//! assert!(out.join("com/example/CardFactory.kt").exists());
//! ```

use crate::tree::OutputTree;
use crate::types::{FilesError, Result};
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Options controlling export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Write through a temp file and rename
    pub atomic: bool,
    /// Replace files that already exist
    pub overwrite: bool,
    /// Delete the output root before writing
    pub clean: bool,
}

impl ExportOptions {
    /// Creates options with defaults: atomic, overwriting, no clean.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            atomic: true,
            overwrite: true,
            clean: false,
        }
    }

    /// Sets whether to delete the output root first.
    #[must_use]
    pub const fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputTree {
    /// Writes every file under `root`, creating it if needed.
    ///
    /// Returns the number of files written; files skipped because
    /// `overwrite` is off are not counted.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidPath`] if `root` exists but is not a
    /// directory or if cleaning would remove a filesystem root, and
    /// [`FilesError::IoError`] for any failed filesystem operation.
    pub fn export(&self, root: impl AsRef<Path>, options: &ExportOptions) -> Result<usize> {
        let root = prepare_root(root.as_ref(), options)?;
        create_directories(&self.directories(&root))?;

        let mut written = 0;
        for (path, content) in self.files() {
            if write_file(&to_disk_path(path, &root), content, options)? {
                written += 1;
            }
        }

        tracing::info!(
            root = %root.display(),
            files = written,
            skipped = self.file_count() - written,
            "exported generated sources"
        );
        Ok(written)
    }

    /// Like [`Self::export`], writing files in parallel.
    ///
    /// Directories are still created sequentially before any file is
    /// written. Output is identical to the sequential export.
    ///
    /// # Errors
    ///
    /// Same as [`Self::export`].
    #[cfg(feature = "parallel")]
    pub fn export_parallel(&self, root: impl AsRef<Path>, options: &ExportOptions) -> Result<usize> {
        use rayon::prelude::*;

        let root = prepare_root(root.as_ref(), options)?;
        create_directories(&self.directories(&root))?;

        let files: Vec<(&str, &str)> = self.files().collect();
        let written = files
            .par_iter()
            .map(|(path, content)| write_file(&to_disk_path(path, &root), content, options))
            .try_fold(|| 0_usize, |count, wrote| wrote.map(|w| count + usize::from(w)))
            .try_reduce(|| 0, |a, b| Ok(a + b))?;

        tracing::info!(
            root = %root.display(),
            files = written,
            "exported generated sources in parallel"
        );
        Ok(written)
    }

    fn directories(&self, root: &Path) -> BTreeSet<PathBuf> {
        self.paths()
            .filter_map(|path| to_disk_path(path, root).parent().map(Path::to_path_buf))
            .filter(|dir| dir != root)
            .collect()
    }
}

fn prepare_root(root: &Path, options: &ExportOptions) -> Result<PathBuf> {
    if root.exists() && !root.is_dir() {
        return Err(FilesError::InvalidPath {
            path: root.display().to_string(),
            reason: "output root is not a directory".to_string(),
        });
    }

    if options.clean && root.exists() {
        let canonical = root.canonicalize().map_err(|e| FilesError::io(root, e))?;
        if canonical.parent().is_none() {
            return Err(FilesError::InvalidPath {
                path: canonical.display().to_string(),
                reason: "refusing to clean a filesystem root".to_string(),
            });
        }
        fs::remove_dir_all(&canonical).map_err(|e| FilesError::io(&canonical, e))?;
        tracing::debug!(root = %canonical.display(), "cleaned output root");
    }

    fs::create_dir_all(root).map_err(|e| FilesError::io(root, e))?;
    root.canonicalize().map_err(|e| FilesError::io(root, e))
}

fn create_directories(dirs: &BTreeSet<PathBuf>) -> Result<()> {
    for dir in dirs {
        fs::create_dir_all(dir).map_err(|e| FilesError::io(dir, e))?;
    }
    Ok(())
}

fn to_disk_path(relative: &str, root: &Path) -> PathBuf {
    relative.split('/').fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Returns `false` when the file was left untouched.
fn write_file(path: &Path, content: &str, options: &ExportOptions) -> Result<bool> {
    if !options.overwrite && path.exists() {
        tracing::debug!(path = %path.display(), "kept existing file");
        return Ok(false);
    }

    if options.atomic {
        let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        let mut file = fs::File::create(&temp_path).map_err(|e| FilesError::io(&temp_path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| FilesError::io(&temp_path, e))?;
        file.sync_all().map_err(|e| FilesError::io(&temp_path, e))?;
        fs::rename(&temp_path, path).map_err(|e| FilesError::io(path, e))?;
    } else {
        fs::write(path, content).map_err(|e| FilesError::io(path, e))?;
    }

    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_tree() -> OutputTree {
        let mut tree = OutputTree::new();
        tree.add_file("com/example/ui/CardFactory.kt", "class CardFactory\n")
            .unwrap();
        tree.add_file("com/example/ui/CardSignalExtensions.kt", "fun Card.x() {}\n")
            .unwrap();
        tree.add_file("RootFactory.kt", "class RootFactory\n").unwrap();
        tree
    }

    #[test]
    fn test_export_creates_missing_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("build/generated/dslgen");

        let written = sample_tree().export(&root, &ExportOptions::default()).unwrap();

        assert_eq!(written, 3);
        assert_eq!(
            fs::read_to_string(root.join("com/example/ui/CardFactory.kt")).unwrap(),
            "class CardFactory\n"
        );
        assert!(root.join("RootFactory.kt").exists());
    }

    #[test]
    fn test_atomic_export_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        sample_tree().export(temp.path(), &ExportOptions::default()).unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp.path().join("com/example/ui"))
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("RootFactory.kt");
        fs::write(&target, "stale").unwrap();

        sample_tree()
            .export(temp.path(), &ExportOptions {
                atomic: false,
                ..ExportOptions::default()
            })
            .unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "class RootFactory\n");
    }

    #[test]
    fn test_no_overwrite_keeps_existing() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("RootFactory.kt");
        fs::write(&target, "hand-written").unwrap();

        let written = sample_tree()
            .export(temp.path(), &ExportOptions {
                overwrite: false,
                ..ExportOptions::default()
            })
            .unwrap();

        assert_eq!(written, 2);
        assert_eq!(fs::read_to_string(&target).unwrap(), "hand-written");
    }

    #[test]
    fn test_clean_removes_stale_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("out");
        fs::create_dir_all(root.join("com/old")).unwrap();
        fs::write(root.join("com/old/GoneFactory.kt"), "old").unwrap();

        sample_tree()
            .export(&root, &ExportOptions::default().with_clean(true))
            .unwrap();

        assert!(!root.join("com/old").exists());
        assert!(root.join("com/example/ui/CardFactory.kt").exists());
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("not-a-dir");
        fs::write(&file, "").unwrap();

        let err = sample_tree().export(&file, &ExportOptions::default()).unwrap_err();
        assert!(err.is_invalid_path());
    }

    #[test]
    fn test_empty_tree_creates_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("empty");

        let written = OutputTree::new().export(&root, &ExportOptions::default()).unwrap();
        assert_eq!(written, 0);
        assert!(root.is_dir());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_export_matches_sequential() {
        let sequential = TempDir::new().unwrap();
        let parallel = TempDir::new().unwrap();
        let tree = sample_tree();

        tree.export(sequential.path(), &ExportOptions::default()).unwrap();
        let written = tree
            .export_parallel(parallel.path(), &ExportOptions::default())
            .unwrap();

        assert_eq!(written, 3);
        for path in tree.paths() {
            assert_eq!(
                fs::read_to_string(sequential.path().join(path)).unwrap(),
                fs::read_to_string(parallel.path().join(path)).unwrap()
            );
        }
    }
}
