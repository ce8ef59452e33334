//! Kotlin DSL code generation.
//!
//! Turns marked Kotlin declarations into factory types, builder extension
//! functions and signal-binding extensions, rendered through Handlebars
//! templates.
//!
//! # Architecture
//!
//! - [`scanner`] reads declarations, properties and supertypes from source
//!   text; [`manifest`] reads the same model from JSON or TOML
//! - [`splitter`] and [`defaults`] recover default-value expressions from the
//!   raw constructor text
//! - [`classify`] decides which declarations receive a builder
//! - [`factory`] and [`bindings`] synthesize the output files
//! - [`pipeline`] runs all stages in order for one pass

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod bindings;
pub mod classify;
pub mod common;
pub mod defaults;
pub mod factory;
pub mod manifest;
pub mod pipeline;
pub mod scanner;
pub mod splitter;
pub mod template_engine;

pub use common::types::{GeneratedArtifact, GeneratedCode};
pub use pipeline::{GenerationOutput, Pipeline, SourceUnit};
