//! Output tree for generated Kotlin DSL sources.
//!
//! Collects generated artifacts under their package-derived relative paths
//! and writes them below an output root.
//!
//! # Examples
//!
//! ```
//! use dslgen_codegen::{GeneratedArtifact, GeneratedCode};
//! use dslgen_files::{ExportOptions, OutputBuilder};
//! # use tempfile::TempDir;
//!
//! let mut code = GeneratedCode::new();
//! code.add_artifact(GeneratedArtifact {
//!     target_package: "com.example".to_string(),
//!     file_name: "CardFactory.kt".to_string(),
//!     content: "package com.example\n".to_string(),
//! });
//!
//! let tree = OutputBuilder::from_generated_code(&code).build().unwrap();
//!
//! # let temp = TempDir::new().unwrap();
//! let options = ExportOptions::default().with_clean(true);
//! tree.export(temp.path().join("generated"), &options).unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod builder;
pub mod filesystem;
pub mod tree;
pub mod types;

pub use builder::OutputBuilder;
pub use filesystem::ExportOptions;
pub use tree::OutputTree;
pub use types::{FilesError, Result};
