//! Structured declaration manifests.
//!
//! A manifest supplies the declaration model directly instead of scanning
//! Kotlin sources: marked declarations with their parameters and roles,
//! marked properties, and the supertypes of any intermediate classes needed
//! for classification. Manifests are JSON or TOML, chosen by file extension.
//!
//! Default expressions are still recovered from source text: a declaration
//! whose `location.file` names a readable file (relative paths resolve
//! against the manifest's directory) has its defaults re-read from there.
//!
//! # Examples
//!
//! ```
//! use dslgen_codegen::manifest::Manifest;
//!
//! let manifest = Manifest::from_json_str(r#"{
//!     "declarations": [{
//!         "name": "Card",
//!         "package": "com.example",
//!         "parameters": [
//!             {"name": "title", "type_ref": {"name": "kotlin.String"}, "role": "exposed"}
//!         ],
//!         "supertypes": [{"name": "com.example.Base"}]
//!     }],
//!     "classes": [
//!         {"name": "com.example.Base", "supertypes": [{"name": "com.vaadin.flow.component.html.Div"}]}
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(manifest.declarations.len(), 1);
//! assert!(manifest.type_index().contains("com.example.Base"));
//! ```

use crate::classify::TypeIndex;
use dslgen_core::{Declaration, Error, PropertyBinding, Result, TypeRef};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Supertypes of a class that is not itself marked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    /// Qualified class name
    pub name: String,
    /// Direct supertypes
    #[serde(default)]
    pub supertypes: Vec<TypeRef>,
    /// Packages the declaring unit imports with `*`
    #[serde(default)]
    pub star_imports: Vec<String>,
}

/// A structured manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Marked declarations
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    /// Marked properties
    #[serde(default)]
    pub properties: Vec<PropertyBinding>,
    /// Additional classes for exportability classification
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
}

impl Manifest {
    /// Parses a JSON manifest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestError`] if the text is not a valid manifest.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::ManifestError {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Parses a TOML manifest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestError`] if the text is not a valid manifest.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::ManifestError {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Loads a manifest, choosing the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, and
    /// [`Error::ManifestError`] for an unsupported extension or invalid
    /// content.
    pub fn load(path: &Path) -> Result<Self> {
        let path_text = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path_text.clone(),
            source,
        })?;

        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("toml") => Self::from_toml_str(&text),
            other => Err(Error::ManifestError {
                path: path_text.clone(),
                message: format!(
                    "unsupported manifest extension {:?} (expected .json or .toml)",
                    other.unwrap_or("")
                ),
            }),
        };

        let manifest = parsed.map_err(|e| match e {
            Error::ManifestError { message, .. } => Error::ManifestError {
                path: path_text.clone(),
                message,
            },
            other => other,
        })?;

        tracing::debug!(
            path = %path_text,
            declarations = manifest.declarations.len(),
            properties = manifest.properties.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// Builds the classification index from declarations and class entries.
    #[must_use]
    pub fn type_index(&self) -> TypeIndex {
        let mut index = TypeIndex::new();
        for class in &self.classes {
            index.insert_with_star_imports(
                class.name.clone(),
                class.supertypes.clone(),
                class.star_imports.clone(),
            );
        }
        for declaration in &self.declarations {
            index.insert_declaration(declaration);
        }
        index
    }

    /// Source file to recover defaults from, if the declaration names one.
    ///
    /// Relative paths are resolved against `base`.
    #[must_use]
    pub fn source_path(declaration: &Declaration, base: &Path) -> Option<PathBuf> {
        let file = declaration.location.file.as_str();
        if file.is_empty() {
            return None;
        }
        let path = Path::new(file);
        Some(if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        })
    }
}
