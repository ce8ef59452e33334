//! In-memory tree of generated files keyed by relative path.
//!
//! Paths use `/` separators and are relative to the output root, so the
//! same tree exports identically on every platform. Iteration follows the
//! `BTreeMap` key order.

use crate::types::{FilesError, Result};
use std::collections::BTreeMap;

/// Generated files waiting to be written.
///
/// # Examples
///
/// ```
/// use dslgen_files::OutputTree;
///
/// let mut tree = OutputTree::new();
/// tree.add_file("com/example/CardFactory.kt", "package com.example\n").unwrap();
///
/// assert_eq!(tree.file_count(), 1);
/// assert!(tree.exists("com/example/CardFactory.kt"));
/// assert!(tree.add_file("../escape.kt", "").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTree {
    files: BTreeMap<String, String>,
}

impl OutputTree {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            files: BTreeMap::new(),
        }
    }

    /// Adds a file.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidPath`] if the path is absolute, empty, or
    /// contains `.`/`..`/empty components, and [`FilesError::DuplicatePath`]
    /// if the path is already present.
    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<String>) -> Result<()> {
        let path = path.into();
        validate_relative_path(&path)?;
        if self.files.contains_key(&path) {
            return Err(FilesError::DuplicatePath { path });
        }
        self.files.insert(path, content.into());
        Ok(())
    }

    /// Returns the content of a file.
    #[must_use]
    pub fn read_file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Returns `true` if the tree contains `path`.
    #[must_use]
    pub fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Number of files in the tree.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the tree has no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Relative paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// `(path, content)` pairs in sorted order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }
}

fn validate_relative_path(path: &str) -> Result<()> {
    let invalid = |reason: &str| FilesError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if path.is_empty() {
        return Err(invalid("path is empty"));
    }
    if path.starts_with('/') || path.contains('\\') || path.contains(':') {
        return Err(invalid("path must be relative and use '/' separators"));
    }
    for component in path.split('/') {
        match component {
            "" => return Err(invalid("empty path component")),
            "." | ".." => return Err(invalid("path must not contain '.' or '..'")),
            _ => {}
        }
    }
    Ok(())
}
