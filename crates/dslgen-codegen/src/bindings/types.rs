//! Types for property-binding synthesis.

use crate::common::types::GeneratedArtifact;
use dslgen_core::Diagnostics;
use serde::{Deserialize, Serialize};

/// Context for rendering one binding file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingContext {
    /// Package of the owning type
    pub package: String,
    /// Rendered `import` lines
    pub imports: Vec<String>,
    /// One entry per valid property, in source order
    pub functions: Vec<BindingFunction>,
}

/// A single binding extension function.
///
/// # Examples
///
/// ```
/// use dslgen_codegen::bindings::BindingFunction;
///
/// let function = BindingFunction {
///     owner: "Card".to_string(),
///     property: "title".to_string(),
///     signal_type: "MutableSignal<String>".to_string(),
/// };
/// assert_eq!(function.property, "title");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingFunction {
    /// Receiver type
    pub owner: String,
    /// Property name, reused as the function name
    pub property: String,
    /// Rendered parameter type, e.g. `Signal<Int>`
    pub signal_type: String,
}

/// Result of binding synthesis for one or more owners.
///
/// Invalid properties never abort synthesis: each one becomes a diagnostic
/// and the remaining properties of the same owner are still generated.
#[derive(Debug, Clone, Default)]
pub struct BindingOutcome {
    /// One artifact per owner with at least one valid property
    pub artifacts: Vec<GeneratedArtifact>,
    /// Per-property violations
    pub diagnostics: Diagnostics,
}
