//! Fluent construction of an [`OutputTree`].
//!
//! Errors from individual files are collected and the first one is returned
//! by [`OutputBuilder::build`], so callers can chain additions freely.

use crate::tree::OutputTree;
use crate::types::{FilesError, Result};
use dslgen_codegen::GeneratedCode;

/// Builder for an [`OutputTree`].
///
/// # Examples
///
/// ```
/// use dslgen_codegen::{GeneratedArtifact, GeneratedCode};
/// use dslgen_files::OutputBuilder;
///
/// let mut code = GeneratedCode::new();
/// code.add_artifact(GeneratedArtifact {
///     target_package: "com.example".to_string(),
///     file_name: "CardFactory.kt".to_string(),
///     content: "package com.example\n".to_string(),
/// });
///
/// let tree = OutputBuilder::from_generated_code(&code).build().unwrap();
/// assert!(tree.exists("com/example/CardFactory.kt"));
/// ```
#[derive(Debug, Default)]
pub struct OutputBuilder {
    tree: OutputTree,
    errors: Vec<FilesError>,
}

impl OutputBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder holding every artifact of `code` at its package path.
    #[must_use]
    pub fn from_generated_code(code: &GeneratedCode) -> Self {
        code.artifacts().fold(Self::new(), |builder, artifact| {
            builder.add_file(artifact.relative_path(), artifact.content())
        })
    }

    /// Adds one file. Invalid or duplicate paths surface from [`Self::build`].
    #[must_use]
    pub fn add_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        if let Err(e) = self.tree.add_file(path, content) {
            self.errors.push(e);
        }
        self
    }

    /// Number of errors collected so far.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Finishes the tree.
    ///
    /// # Errors
    ///
    /// Returns the first error collected while adding files.
    pub fn build(self) -> Result<OutputTree> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.tree),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dslgen_codegen::GeneratedArtifact;

    fn artifact(package: &str, file_name: &str) -> GeneratedArtifact {
        GeneratedArtifact {
            target_package: package.to_string(),
            file_name: file_name.to_string(),
            content: format!("// {file_name}\n"),
        }
    }

    #[test]
    fn test_from_generated_code() {
        let mut code = GeneratedCode::new();
        code.add_artifact(artifact("com.example.ui", "CardFactory.kt"));
        code.add_artifact(artifact("com.example.ui", "CardSignalExtensions.kt"));
        code.add_artifact(artifact("", "RootFactory.kt"));

        let tree = OutputBuilder::from_generated_code(&code).build().unwrap();
        let paths: Vec<&str> = tree.paths().collect();
        assert_eq!(
            paths,
            vec![
                "RootFactory.kt",
                "com/example/ui/CardFactory.kt",
                "com/example/ui/CardSignalExtensions.kt",
            ]
        );
    }

    #[test]
    fn test_first_error_returned() {
        let builder = OutputBuilder::new()
            .add_file("A.kt", "a")
            .add_file("A.kt", "again")
            .add_file("../B.kt", "b");

        assert_eq!(builder.error_count(), 2);
        assert!(builder.build().unwrap_err().is_duplicate_path());
    }

    #[test]
    fn test_empty_builder() {
        let tree = OutputBuilder::new().build().unwrap();
        assert!(tree.is_empty());
    }
}
