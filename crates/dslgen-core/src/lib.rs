//! Core types, modes, and errors for DSL code generation.
//!
//! This crate provides the foundational types shared by the scanner,
//! the synthesizers and the command-line host.
//!
//! # Architecture
//!
//! The core consists of:
//! - The declaration model (`Declaration`, `Parameter`, `TypeRef`, `PropertyBinding`)
//! - Generation modes describing each dependency-injection container convention
//! - Per-declaration diagnostics collected during a generation pass
//! - Error hierarchy with contextual information
//! - Configuration types

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod diagnostics;
mod error;
mod mode;
mod model;

pub mod cli;

pub use config::{CodegenConfig, ZeroInjectedPolicy};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::{Error, Result};
pub use mode::{ContainerHandle, GenerationMode};
pub use model::{
    Declaration, MarkerConvention, ParamMarkers, Parameter, PropertyBinding, Role,
    SourceLocation, TypeRef, Visibility, WrapperKind,
};
