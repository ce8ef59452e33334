//! One generation pass, from source text or manifest to artifacts.
//!
//! The stages are strictly ordered:
//!
//! 1. scan every unit (or take the manifest's model)
//! 2. merge the per-unit type indexes
//! 3. classify each declaration against the merged index
//! 4. recover default expressions from source text
//! 5. synthesize one file per declaration
//! 6. synthesize binding files, one per owner
//!
//! Declarations are processed in input order: units in the order given,
//! declarations in source order within a unit. Problems scoped to one
//! declaration or property end up in [`GenerationOutput::diagnostics`];
//! only infrastructure failures abort the pass.
//!
//! # Examples
//!
//! ```
//! use dslgen_codegen::pipeline::{Pipeline, SourceUnit};
//! use dslgen_core::{GenerationMode, MarkerConvention, ZeroInjectedPolicy};
//!
//! let source = r#"
//! package com.example
//!
//! import com.vaadin.flow.component.html.Div
//!
//! @GenDsl
//! class Card(@GenDslInject private val service: CardService, title: String = "Untitled") : Div()
//! "#;
//!
//! let pipeline = Pipeline::new(
//!     GenerationMode::Quarkus,
//!     ZeroInjectedPolicy::AlwaysFactory,
//!     MarkerConvention::MarkToInject,
//! )
//! .unwrap();
//! let output = pipeline.run_sources(&[SourceUnit::new("Card.kt", source)]).unwrap();
//!
//! let artifact = output.code.find("CardFactory.kt").unwrap();
//! assert!(artifact.content.contains("title: String = \"Untitled\""));
//! assert!(artifact.content.contains("fun HasComponents.card("));
//! assert!(output.diagnostics.is_empty());
//! ```

use crate::bindings::BindingGenerator;
use crate::classify::{is_exportable, TypeIndex};
use crate::common::types::GeneratedCode;
use crate::defaults::recover_defaults;
use crate::factory::FactoryGenerator;
use crate::manifest::Manifest;
use crate::scanner::{scan_source, ScanOptions};
use dslgen_core::{
    CodegenConfig, Declaration, Diagnostic, DiagnosticKind, Diagnostics, Error, GenerationMode,
    MarkerConvention, PropertyBinding, Result, ZeroInjectedPolicy,
};
use std::collections::BTreeSet;
use std::path::Path;

/// A Kotlin source unit handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path used in diagnostics
    pub path: String,
    /// Full source text
    pub text: String,
}

impl SourceUnit {
    /// Creates a source unit.
    #[must_use]
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Result of a generation pass.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    /// Artifacts in production order
    pub code: GeneratedCode,
    /// Everything skipped or degraded during the pass
    pub diagnostics: Diagnostics,
}

/// A declaration ready for synthesis, with the text its defaults come from.
struct Pending<'t> {
    declaration: Declaration,
    source: Option<&'t str>,
}

/// Configured generation pass.
#[derive(Debug)]
pub struct Pipeline<'a> {
    factory: FactoryGenerator<'a>,
    bindings: BindingGenerator<'a>,
    mode: GenerationMode,
    policy: ZeroInjectedPolicy,
    options: ScanOptions,
}

impl Pipeline<'_> {
    /// Creates a pipeline with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns error if template engine initialization fails.
    pub fn new(
        mode: GenerationMode,
        policy: ZeroInjectedPolicy,
        default_convention: MarkerConvention,
    ) -> Result<Self> {
        Ok(Self {
            factory: FactoryGenerator::new()?,
            bindings: BindingGenerator::new()?,
            mode,
            policy,
            options: ScanOptions { default_convention },
        })
    }

    /// Creates a pipeline from configuration.
    ///
    /// An unknown mode name falls back to the default mode and records a
    /// warning in `diagnostics`.
    ///
    /// # Errors
    ///
    /// Returns error if template engine initialization fails.
    pub fn from_config(config: &CodegenConfig, diagnostics: &mut Diagnostics) -> Result<Self> {
        Self::new(
            config.generation_mode(diagnostics),
            config.zero_injected,
            config.default_convention,
        )
    }

    /// Mode this pipeline generates for.
    #[must_use]
    pub const fn mode(&self) -> GenerationMode {
        self.mode
    }

    /// Runs a pass over Kotlin source units.
    ///
    /// # Errors
    ///
    /// Returns error only for infrastructure failures such as template
    /// rendering. Per-declaration problems become diagnostics.
    pub fn run_sources(&self, units: &[SourceUnit]) -> Result<GenerationOutput> {
        let mut diagnostics = Diagnostics::new();
        let mut index = TypeIndex::new();
        let mut pending = Vec::new();
        let mut properties = Vec::new();

        for unit in units {
            let mut scanned = scan_source(&unit.path, &unit.text, &self.options);
            index.merge(scanned.index);
            diagnostics.append(&mut scanned.diagnostics);
            properties.append(&mut scanned.properties);
            pending.extend(scanned.declarations.into_iter().map(|declaration| Pending {
                declaration,
                source: Some(unit.text.as_str()),
            }));
        }

        tracing::info!(
            units = units.len(),
            declarations = pending.len(),
            properties = properties.len(),
            "scanned sources"
        );
        self.synthesize(pending, &properties, &index, diagnostics)
    }

    /// Runs a pass over a structured manifest.
    ///
    /// Declarations naming a source file have their defaults recovered from
    /// it; `base` resolves relative names. A source file that cannot be read
    /// is reported as a warning and the manifest's own defaults are kept.
    ///
    /// # Errors
    ///
    /// Returns error only for infrastructure failures.
    pub fn run_manifest(&self, manifest: &Manifest, base: &Path) -> Result<GenerationOutput> {
        let mut diagnostics = Diagnostics::new();
        let mut texts = Vec::with_capacity(manifest.declarations.len());

        for declaration in &manifest.declarations {
            let text = Manifest::source_path(declaration, base).and_then(|path| {
                std::fs::read_to_string(&path)
                    .map_err(|e| {
                        diagnostics.push(
                            Diagnostic::warning(
                                DiagnosticKind::Io,
                                declaration.qualified_name(),
                                format!("cannot read {}: {e}; keeping manifest defaults", path.display()),
                            )
                            .at(declaration.location.clone()),
                        );
                    })
                    .ok()
            });
            texts.push(text);
        }

        let pending = manifest
            .declarations
            .iter()
            .zip(&texts)
            .map(|(declaration, text)| Pending {
                declaration: declaration.clone(),
                source: text.as_deref(),
            })
            .collect();

        self.synthesize(pending, &manifest.properties, &manifest.type_index(), diagnostics)
    }

    fn synthesize(
        &self,
        pending: Vec<Pending<'_>>,
        properties: &[PropertyBinding],
        index: &TypeIndex,
        mut diagnostics: Diagnostics,
    ) -> Result<GenerationOutput> {
        let mut code = GeneratedCode::new();
        let mut seen = BTreeSet::new();

        for Pending {
            declaration,
            source,
        } in pending
        {
            let qualified = declaration.qualified_name();
            if !seen.insert(qualified.clone()) {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticKind::Structural,
                        qualified,
                        "declared more than once; only the first declaration is generated",
                    )
                    .at(declaration.location.clone()),
                );
                continue;
            }

            let exportable = is_exportable(&declaration, index);
            let declaration = match source {
                Some(text) => declaration.with_recovered_defaults(&recover_defaults(&declaration, text)),
                None => declaration,
            };

            match self
                .factory
                .generate(&declaration, exportable, self.mode, self.policy)
            {
                Ok(Some(artifact)) => {
                    tracing::debug!(path = %artifact.relative_path(), "produced artifact");
                    code.add_artifact(artifact);
                }
                Ok(None) => {}
                Err(Error::StructuralError {
                    declaration: subject,
                    reason,
                }) => diagnostics.push(
                    Diagnostic::error(DiagnosticKind::Structural, subject, reason)
                        .at(declaration.location.clone()),
                ),
                Err(other) => return Err(other),
            }
        }

        let mut bindings = self.bindings.generate_all(properties)?;
        for artifact in bindings.artifacts {
            tracing::debug!(path = %artifact.relative_path(), "produced artifact");
            code.add_artifact(artifact);
        }
        diagnostics.append(&mut bindings.diagnostics);

        tracing::info!(
            mode = self.mode.as_str(),
            artifacts = code.artifact_count(),
            errors = diagnostics.error_count(),
            warnings = diagnostics.warning_count(),
            "generation pass complete"
        );
        Ok(GenerationOutput { code, diagnostics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline(mode: GenerationMode) -> Pipeline<'static> {
        Pipeline::new(mode, ZeroInjectedPolicy::AlwaysFactory, MarkerConvention::MarkToInject).unwrap()
    }

    #[test]
    fn test_from_config_unknown_mode() {
        let config = CodegenConfig::from_toml_str("mode = \"guice\"").unwrap();
        let mut diagnostics = Diagnostics::new();
        let pipeline = Pipeline::from_config(&config, &mut diagnostics).unwrap();
        assert_eq!(pipeline.mode(), GenerationMode::Quarkus);
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_index_spans_units() {
        let base = SourceUnit::new(
            "Base.kt",
            "package a\n\nimport com.vaadin.flow.component.html.Div\n\nopen class Base : Div()\n",
        );
        let card = SourceUnit::new("Card.kt", "package a\n\n@GenDsl\nclass Card(x: Int) : Base()\n");

        let output = pipeline(GenerationMode::Quarkus).run_sources(&[card, base]).unwrap();
        let artifact = output.code.find("CardFactory.kt").unwrap();
        assert!(artifact.content.contains("fun HasComponents.card("));
    }

    #[test]
    fn test_duplicate_declaration_reported() {
        let unit = "package a\n@GenDsl\nclass Card(x: Int)\n";
        let output = pipeline(GenerationMode::Spring)
            .run_sources(&[SourceUnit::new("One.kt", unit), SourceUnit::new("Two.kt", unit)])
            .unwrap();

        assert_eq!(output.code.artifact_count(), 1);
        assert_eq!(output.diagnostics.error_count(), 1);
        let diagnostic = output.diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.location.as_ref().unwrap().file, "Two.kt");
    }

    #[test]
    fn test_structural_error_does_not_abort() {
        let output = pipeline(GenerationMode::Quarkus)
            .run_sources(&[SourceUnit::new(
                "Mixed.kt",
                "package a\n@GenDsl\nclass Broken private constructor(x: Int)\n\n@GenDsl\nclass Fine(x: Int)\n",
            )])
            .unwrap();

        assert!(output.code.find("FineFactory.kt").is_some());
        assert!(output.code.find("BrokenFactory.kt").is_none());
        assert_eq!(output.diagnostics.error_count(), 1);
    }

    #[test]
    fn test_bindings_follow_factories() {
        let output = pipeline(GenerationMode::Quarkus)
            .run_sources(&[SourceUnit::new(
                "SignalCard.kt",
                r#"package a

import com.github.fenrur.signal.BindableMutableSignal

@GenDsl
class SignalCard(x: Int) {
    @ExposeSignal
    val title: BindableMutableSignal<String> = bindableMutableSignalOf("")
}
"#,
            )])
            .unwrap();

        let names: Vec<&str> = output.code.artifacts().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["SignalCardFactory.kt", "SignalCardSignalExtensions.kt"]);
    }

    #[test]
    fn test_manifest_keeps_defaults_without_source() {
        let manifest = Manifest::from_json_str(
            r#"{"declarations": [{
                "name": "Card",
                "package": "a",
                "parameters": [{
                    "name": "size",
                    "type_ref": {"name": "kotlin.Int"},
                    "role": "exposed",
                    "has_default": true,
                    "default_expression": "4"
                }]
            }]}"#,
        )
        .unwrap();

        let output = pipeline(GenerationMode::Quarkus)
            .run_manifest(&manifest, Path::new("."))
            .unwrap();
        let artifact = output.code.find("CardFactory.kt").unwrap();
        assert!(artifact.content.contains("size: Int = 4"));
    }

    #[test]
    fn test_manifest_recovers_from_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Card.kt"),
            "package a\n@GenDsl\nclass Card(val size: Int = 12)\n",
        )
        .unwrap();

        let manifest = Manifest::from_json_str(
            r#"{"declarations": [{
                "name": "Card",
                "package": "a",
                "location": {"file": "Card.kt", "line": 3},
                "parameters": [{"name": "size", "type_ref": {"name": "kotlin.Int"}, "role": "exposed"}]
            }]}"#,
        )
        .unwrap();

        let output = pipeline(GenerationMode::Quarkus)
            .run_manifest(&manifest, dir.path())
            .unwrap();
        let artifact = output.code.find("CardFactory.kt").unwrap();
        assert!(artifact.content.contains("size: Int = 12"));
    }

    #[test]
    fn test_manifest_missing_source_is_warning() {
        let manifest = Manifest::from_json_str(
            r#"{"declarations": [{"name": "Card", "package": "a", "location": {"file": "Gone.kt", "line": 1}}]}"#,
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let output = pipeline(GenerationMode::Quarkus)
            .run_manifest(&manifest, dir.path())
            .unwrap();
        assert_eq!(output.diagnostics.warning_count(), 1);
        assert!(!output.diagnostics.has_errors());
        assert_eq!(output.code.artifact_count(), 1);
    }
}
