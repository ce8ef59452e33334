//! Binding extension generator.
//!
//! # Examples
//!
//! ```
//! use dslgen_codegen::bindings::BindingGenerator;
//! use dslgen_core::{PropertyBinding, SourceLocation, TypeRef, Visibility};
//!
//! let title = PropertyBinding {
//!     owner: "Card".to_string(),
//!     package: "com.example".to_string(),
//!     name: "title".to_string(),
//!     type_ref: TypeRef::new("com.github.fenrur.signal.BindableMutableSignal")
//!         .with_arguments(vec![TypeRef::new("kotlin.String")]),
//!     visibility: Visibility::Public,
//!     star_imports: Vec::new(),
//!     location: SourceLocation::default(),
//! };
//!
//! let generator = BindingGenerator::new().unwrap();
//! let outcome = generator.generate("Card", &[title]).unwrap();
//!
//! assert_eq!(outcome.artifacts[0].file_name, "CardSignalExtensions.kt");
//! assert!(outcome.artifacts[0]
//!     .content
//!     .contains("fun Card.title(signal: MutableSignal<String>) {"));
//! assert!(outcome.diagnostics.is_empty());
//! ```

use crate::bindings::types::{BindingContext, BindingFunction, BindingOutcome};
use crate::common::{import_lines, insert_star_imports};
use crate::common::types::GeneratedArtifact;
use crate::template_engine::{TemplateEngine, BINDINGS_TEMPLATE};
use dslgen_core::{Diagnostic, DiagnosticKind, PropertyBinding, Result, TypeRef, WrapperKind};
use std::collections::{BTreeMap, BTreeSet};

/// Generator for `<Owner>SignalExtensions.kt` files.
#[derive(Debug)]
pub struct BindingGenerator<'a> {
    engine: TemplateEngine<'a>,
}

impl BindingGenerator<'_> {
    /// Creates a new binding generator.
    ///
    /// # Errors
    ///
    /// Returns error if template engine initialization fails.
    pub fn new() -> Result<Self> {
        let engine = TemplateEngine::new()?;
        Ok(Self { engine })
    }

    /// Generates the binding file for the properties of one owner.
    ///
    /// Invalid properties are reported in the outcome and skipped. When no
    /// property is valid the outcome carries no artifact.
    ///
    /// # Errors
    ///
    /// Returns [`dslgen_core::Error::TemplateError`] if rendering fails.
    pub fn generate(&self, owner: &str, properties: &[PropertyBinding]) -> Result<BindingOutcome> {
        let mut outcome = BindingOutcome::default();
        let mut imports = BTreeSet::new();
        let mut functions = Vec::new();

        for property in properties {
            match validate_property(property) {
                Ok((kind, element)) => {
                    imports.insert(kind.counterpart_name().to_string());
                    element.collect_imports(&mut imports);
                    insert_star_imports(&mut imports, &property.star_imports);
                    functions.push(BindingFunction {
                        owner: owner.to_string(),
                        property: property.name.clone(),
                        signal_type: format!(
                            "{}<{}>",
                            simple_name(kind.counterpart_name()),
                            element.render()
                        ),
                    });
                }
                Err(diagnostic) => outcome.diagnostics.push(diagnostic),
            }
        }

        if functions.is_empty() {
            return Ok(outcome);
        }

        let package = properties
            .first()
            .map(|p| p.package.clone())
            .unwrap_or_default();
        let function_count = functions.len();
        let context = BindingContext {
            imports: import_lines(&imports, &package),
            package: package.clone(),
            functions,
        };
        let content = self.engine.render(BINDINGS_TEMPLATE, &context)?;

        let file_name = format!("{owner}SignalExtensions.kt");
        tracing::info!(
            owner,
            package = %package,
            functions = function_count,
            "generated {file_name}"
        );
        outcome.artifacts.push(GeneratedArtifact {
            target_package: package,
            file_name,
            content,
        });
        Ok(outcome)
    }

    /// Groups properties by owner and generates one file per owner.
    ///
    /// Owners are processed in `(package, owner)` order; properties keep
    /// their input order within an owner.
    ///
    /// # Errors
    ///
    /// Returns [`dslgen_core::Error::TemplateError`] if rendering fails.
    pub fn generate_all(&self, properties: &[PropertyBinding]) -> Result<BindingOutcome> {
        let mut by_owner: BTreeMap<(&str, &str), Vec<PropertyBinding>> = BTreeMap::new();
        for property in properties {
            by_owner
                .entry((property.package.as_str(), property.owner.as_str()))
                .or_default()
                .push(property.clone());
        }

        let mut outcome = BindingOutcome::default();
        for ((_, owner), group) in by_owner {
            let mut partial = self.generate(owner, &group)?;
            outcome.artifacts.append(&mut partial.artifacts);
            outcome.diagnostics.append(&mut partial.diagnostics);
        }
        Ok(outcome)
    }
}

fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Checks that a property can receive a binding function.
///
/// Returns the wrapper kind and the element type on success.
///
/// # Errors
///
/// Returns a [`DiagnosticKind::VisibilityViolation`] diagnostic for any
/// visibility other than public, and a [`DiagnosticKind::TypeShapeViolation`]
/// diagnostic when the type is not a bindable wrapper with exactly one type
/// argument.
pub fn validate_property(
    property: &PropertyBinding,
) -> std::result::Result<(WrapperKind, &TypeRef), Diagnostic> {
    let subject = format!("{}.{}", property.owner, property.name);
    let prefix = format!(
        "@ExposeSignal property '{}' in class '{}'",
        property.name, property.owner
    );
    let violation = |kind: DiagnosticKind, message: String| {
        Diagnostic::error(kind, subject.clone(), message).at(property.location.clone())
    };

    if !property.visibility.is_public() {
        return Err(violation(
            DiagnosticKind::VisibilityViolation,
            format!(
                "{prefix} must be public, but is {}. Generated extension functions cannot access {} members.",
                property.visibility, property.visibility
            ),
        ));
    }

    let Some(kind) = property.wrapper_kind() else {
        let declared = if property.type_ref.name.is_empty() {
            "<no explicit type>".to_string()
        } else {
            property.type_ref.render()
        };
        return Err(violation(
            DiagnosticKind::TypeShapeViolation,
            format!(
                "{prefix} must be of type BindableMutableSignal<T> or BindableSignal<T>, but is '{declared}'."
            ),
        ));
    };

    match property.type_ref.arguments.as_slice() {
        [element] => Ok((kind, element)),
        [] => Err(violation(
            DiagnosticKind::TypeShapeViolation,
            format!(
                "{prefix} must have a type parameter, e.g., BindableMutableSignal<String> or BindableSignal<String>."
            ),
        )),
        many => Err(violation(
            DiagnosticKind::TypeShapeViolation,
            format!(
                "{prefix} must have exactly one type parameter, but has {}.",
                many.len()
            ),
        )),
    }
}
