//! Output types of the synthesizers.
//!
//! # Examples
//!
//! ```
//! use dslgen_codegen::{GeneratedArtifact, GeneratedCode};
//!
//! let artifact = GeneratedArtifact {
//!     target_package: "com.example".to_string(),
//!     file_name: "CardFactory.kt".to_string(),
//!     content: "package com.example\n".to_string(),
//! };
//! assert_eq!(artifact.relative_path(), "com/example/CardFactory.kt");
//!
//! let mut code = GeneratedCode::new();
//! code.add_artifact(artifact);
//! assert_eq!(code.artifact_count(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    /// Package declared by the file
    pub target_package: String,
    /// File name, including the `.kt` extension
    pub file_name: String,
    /// Full file content
    pub content: String,
}

impl GeneratedArtifact {
    /// Path relative to the output root: package segments as directories,
    /// then the file name. Always uses `/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dslgen_codegen::GeneratedArtifact;
    ///
    /// let artifact = GeneratedArtifact {
    ///     target_package: String::new(),
    ///     file_name: "RootFactory.kt".to_string(),
    ///     content: String::new(),
    /// };
    /// assert_eq!(artifact.relative_path(), "RootFactory.kt");
    /// ```
    #[must_use]
    pub fn relative_path(&self) -> String {
        if self.target_package.is_empty() {
            self.file_name.clone()
        } else {
            format!("{}/{}", self.target_package.replace('.', "/"), self.file_name)
        }
    }

    /// Returns the file content.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// All artifacts produced by one generation pass, in production order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCode {
    /// Generated artifacts
    pub artifacts: Vec<GeneratedArtifact>,
}

impl GeneratedCode {
    /// Creates an empty collection.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            artifacts: Vec::new(),
        }
    }

    /// Adds an artifact.
    pub fn add_artifact(&mut self, artifact: GeneratedArtifact) {
        self.artifacts.push(artifact);
    }

    /// Number of artifacts.
    #[inline]
    #[must_use]
    pub const fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    /// Iterates over the artifacts.
    #[inline]
    pub fn artifacts(&self) -> impl Iterator<Item = &GeneratedArtifact> {
        self.artifacts.iter()
    }

    /// Finds an artifact by file name.
    #[must_use]
    pub fn find(&self, file_name: &str) -> Option<&GeneratedArtifact> {
        self.artifacts.iter().find(|a| a.file_name == file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(package: &str, file: &str) -> GeneratedArtifact {
        GeneratedArtifact {
            target_package: package.to_string(),
            file_name: file.to_string(),
            content: String::new(),
        }
    }

    #[test]
    fn test_relative_path_mirrors_package() {
        assert_eq!(
            artifact("com.example.ui", "CardFactory.kt").relative_path(),
            "com/example/ui/CardFactory.kt"
        );
    }

    #[test]
    fn test_find_by_file_name() {
        let mut code = GeneratedCode::new();
        code.add_artifact(artifact("a", "One.kt"));
        code.add_artifact(artifact("a", "Two.kt"));

        assert_eq!(code.artifact_count(), 2);
        assert!(code.find("Two.kt").is_some());
        assert!(code.find("Three.kt").is_none());
    }
}
