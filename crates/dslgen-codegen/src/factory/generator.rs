//! Factory and builder synthesis.
//!
//! For each marked declaration one Kotlin file is produced holding:
//!
//! 1. a factory type whose constructor receives the injected parameters and
//!    whose `create` function receives the exposed ones, then calls the
//!    target constructor with every parameter in declared order
//! 2. for exportable declarations, a `HasComponents` extension that fetches
//!    the factory through an explicit container handle, creates the
//!    component, adds it to the receiver and applies the configuration block
//!
//! # Examples
//!
//! ```
//! use dslgen_codegen::factory::FactoryGenerator;
//! use dslgen_core::{Declaration, GenerationMode, Parameter, Role, TypeRef, ZeroInjectedPolicy};
//!
//! let decl = Declaration::new("CustomButton", "com.example")
//!     .with_parameter(Parameter::new("logger", TypeRef::new("org.slf4j.Logger"), Role::Injected))
//!     .with_parameter(Parameter::new("label", TypeRef::new("kotlin.String"), Role::Exposed));
//!
//! let generator = FactoryGenerator::new().unwrap();
//! let artifact = generator
//!     .generate(&decl, true, GenerationMode::Spring, ZeroInjectedPolicy::AlwaysFactory)
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(artifact.file_name, "CustomButtonFactory.kt");
//! assert!(artifact.content.contains("return CustomButton(logger, label)"));
//! ```

use crate::common::{import_lines, insert_star_imports};
use crate::common::types::GeneratedArtifact;
use crate::factory::types::{BuilderBlock, FactoryBlock, FactoryContext};
use crate::template_engine::{TemplateEngine, FACTORY_TEMPLATE};
use dslgen_core::{Declaration, Error, GenerationMode, Parameter, Result, ZeroInjectedPolicy};
use std::collections::BTreeSet;

/// Import of the DSL scope marker placed on builders.
pub const DSL_MARKER_IMPORT: &str = "com.github.fenrur.vaadin.codegen.VaadinDsl";

/// Import of the builder receiver type.
pub const HAS_COMPONENTS_IMPORT: &str = "com.vaadin.flow.component.HasComponents";

/// Generator for factory files.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`, allowing safe use across threads.
#[derive(Debug)]
pub struct FactoryGenerator<'a> {
    engine: TemplateEngine<'a>,
}

impl FactoryGenerator<'_> {
    /// Creates a new factory generator.
    ///
    /// # Errors
    ///
    /// Returns error if template engine initialization fails.
    pub fn new() -> Result<Self> {
        let engine = TemplateEngine::new()?;
        Ok(Self { engine })
    }

    /// Generates the file for one declaration.
    ///
    /// `declaration` is expected to carry its recovered defaults already.
    /// Returns `Ok(None)` when the policy leaves nothing to emit: direct
    /// construction of a declaration that is not exportable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralError`] if the declaration name or a
    /// parameter name is not a valid identifier, if parameter names repeat,
    /// or if an exposed parameter of an exportable declaration collides
    /// with a name the builder reserves. Returns [`Error::TemplateError`] if
    /// rendering fails.
    pub fn generate(
        &self,
        declaration: &Declaration,
        exportable: bool,
        mode: GenerationMode,
        policy: ZeroInjectedPolicy,
    ) -> Result<Option<GeneratedArtifact>> {
        validate(declaration)?;

        let has_injected = declaration.injected().next().is_some();
        let emit_factory = has_injected || policy == ZeroInjectedPolicy::AlwaysFactory;
        if !emit_factory && !exportable {
            tracing::info!(
                declaration = %declaration.qualified_name(),
                "nothing to generate under direct construction"
            );
            return Ok(None);
        }
        if exportable {
            validate_builder_names(declaration, mode, emit_factory)?;
        }

        let mut imports = BTreeSet::new();
        for parameter in &declaration.parameters {
            parameter.type_ref.collect_imports(&mut imports);
        }
        insert_star_imports(&mut imports, &declaration.star_imports);
        if emit_factory {
            imports.extend(mode.factory_imports().iter().map(ToString::to_string));
        }
        if exportable {
            imports.insert(DSL_MARKER_IMPORT.to_string());
            imports.insert(HAS_COMPONENTS_IMPORT.to_string());
            if emit_factory {
                imports.insert(mode.container_handle().import.to_string());
            }
        }

        let context = FactoryContext {
            package: declaration.package.clone(),
            imports: import_lines(&imports, &declaration.package),
            target: declaration.name.clone(),
            factory: emit_factory.then(|| factory_block(declaration, mode)),
            builder: exportable.then(|| builder_block(declaration, mode, emit_factory)),
        };
        let content = self.engine.render(FACTORY_TEMPLATE, &context)?;

        let file_name = if emit_factory {
            format!("{}.kt", declaration.factory_name())
        } else {
            format!("{}Dsl.kt", declaration.name)
        };

        tracing::info!(
            declaration = %declaration.qualified_name(),
            mode = mode.as_str(),
            exportable,
            "generated {file_name}"
        );

        Ok(Some(GeneratedArtifact {
            target_package: declaration.package.clone(),
            file_name,
            content,
        }))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn validate(declaration: &Declaration) -> Result<()> {
    let structural = |reason: String| Error::StructuralError {
        declaration: declaration.qualified_name(),
        reason,
    };

    if !is_identifier(&declaration.name) {
        return Err(structural(format!(
            "'{}' is not a valid class name",
            declaration.name
        )));
    }

    let mut seen = BTreeSet::new();
    for parameter in &declaration.parameters {
        if !is_identifier(&parameter.name) {
            return Err(structural(format!(
                "'{}' is not a valid parameter name",
                parameter.name
            )));
        }
        if !seen.insert(parameter.name.as_str()) {
            return Err(structural(format!(
                "parameter '{}' is declared more than once",
                parameter.name
            )));
        }
    }
    Ok(())
}

/// Names the builder declares itself: the configuration block parameter,
/// the body locals and, when going through a factory, the container handle.
fn reserved_builder_names(mode: GenerationMode, via_factory: bool) -> Vec<&'static str> {
    let mut reserved = vec!["block", "component"];
    if via_factory {
        reserved.push("factory");
        reserved.push(mode.container_handle().name);
    }
    reserved
}

fn validate_builder_names(
    declaration: &Declaration,
    mode: GenerationMode,
    via_factory: bool,
) -> Result<()> {
    let reserved = reserved_builder_names(mode, via_factory);
    match declaration
        .exposed()
        .find(|p| reserved.contains(&p.name.as_str()))
    {
        Some(parameter) => Err(Error::StructuralError {
            declaration: declaration.qualified_name(),
            reason: format!(
                "exposed parameter '{}' clashes with a name reserved by the generated builder {}()",
                parameter.name,
                declaration.builder_name()
            ),
        }),
        None => Ok(()),
    }
}

/// `name: Type`, plus ` = default` when a default was recovered.
fn parameter_line(parameter: &Parameter) -> String {
    let mut line = format!("{}: {}", parameter.name, parameter.type_ref.render());
    match &parameter.default_expression {
        Some(default) => {
            line.push_str(" = ");
            line.push_str(default);
        }
        None if parameter.has_default => {
            tracing::debug!(
                parameter = %parameter.name,
                "default not recovered; parameter generated as required"
            );
        }
        None => {}
    }
    line
}

/// Appends `,` to every line but the last.
fn comma_separated(lines: Vec<String>) -> Vec<String> {
    let last = lines.len().saturating_sub(1);
    lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| if index < last { line + "," } else { line })
        .collect()
}

fn argument_list<'p>(parameters: impl Iterator<Item = &'p Parameter>) -> String {
    parameters
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn factory_block(declaration: &Declaration, mode: GenerationMode) -> FactoryBlock {
    let fields = declaration
        .injected()
        .map(|p| format!("private val {}: {}", p.name, p.type_ref.render()))
        .collect();
    let create_params = declaration.exposed().map(parameter_line).collect();

    FactoryBlock {
        name: declaration.factory_name(),
        annotations: mode
            .factory_annotations()
            .iter()
            .map(ToString::to_string)
            .collect(),
        fields: comma_separated(fields),
        create_params: comma_separated(create_params),
        arguments: argument_list(declaration.parameters.iter()),
    }
}

fn builder_block(declaration: &Declaration, mode: GenerationMode, via_factory: bool) -> BuilderBlock {
    let mut params = Vec::new();
    if via_factory {
        params.push(format!("{},", mode.container_handle().declaration()));
    }
    params.extend(declaration.exposed().map(|p| format!("{},", parameter_line(p))));
    params.push(format!("block: {}.() -> Unit = {{}}", declaration.name));

    let mut body = Vec::with_capacity(5);
    if via_factory {
        body.push(format!(
            "val factory = {}",
            mode.render_accessor(&declaration.factory_name())
        ));
        body.push(format!(
            "val component = factory.create({})",
            argument_list(declaration.exposed())
        ));
    } else {
        body.push(format!(
            "val component = {}({})",
            declaration.name,
            argument_list(declaration.parameters.iter())
        ));
    }
    body.push("add(component)".to_string());
    body.push("component.block()".to_string());
    body.push("return component".to_string());

    BuilderBlock {
        name: declaration.builder_name(),
        params,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dslgen_core::{Role, TypeRef};

    fn custom_button() -> Declaration {
        Declaration::new("CustomButton", "com.example")
            .with_parameter(Parameter::new(
                "logger",
                TypeRef::new("org.slf4j.Logger"),
                Role::Injected,
            ))
            .with_parameter(Parameter::new("label", TypeRef::new("kotlin.String"), Role::Exposed))
            .with_parameter(
                Parameter::new("primary", TypeRef::new("kotlin.Boolean"), Role::Exposed)
                    .with_default("false"),
            )
    }

    fn generate(
        declaration: &Declaration,
        exportable: bool,
        mode: GenerationMode,
        policy: ZeroInjectedPolicy,
    ) -> Option<GeneratedArtifact> {
        FactoryGenerator::new()
            .unwrap()
            .generate(declaration, exportable, mode, policy)
            .unwrap()
    }

    #[test]
    fn test_quarkus_factory_and_builder() {
        let artifact = generate(
            &custom_button(),
            true,
            GenerationMode::Quarkus,
            ZeroInjectedPolicy::AlwaysFactory,
        )
        .unwrap();
        let content = artifact.content();

        assert_eq!(artifact.relative_path(), "com/example/CustomButtonFactory.kt");
        assert!(content.starts_with("package com.example\n\n"));
        assert!(content.contains("@ApplicationScoped\n@Unremovable\nclass CustomButtonFactory(\n"));
        assert!(content.contains("    private val logger: Logger\n) {\n"));
        assert!(content.contains("        label: String,\n        primary: Boolean = false\n"));
        assert!(content.contains("        return CustomButton(logger, label, primary)\n"));
        assert!(content.contains("@VaadinDsl\nfun HasComponents.customButton(\n"));
        assert!(content.contains("    container: ArcContainer,\n"));
        assert!(content.contains("    primary: Boolean = false,\n"));
        assert!(content.contains("    block: CustomButton.() -> Unit = {}\n): CustomButton {\n"));
        assert!(content.contains(
            "    val factory = container.instance(CustomButtonFactory::class.java).get()\n"
        ));
        assert!(content.contains("    val component = factory.create(label, primary)\n"));
        assert!(content.contains("    add(component)\n    component.block()\n    return component\n"));
    }

    #[test]
    fn test_imports_sorted_and_deduplicated() {
        let decl = custom_button().with_parameter(Parameter::new(
            "audit",
            TypeRef::new("org.slf4j.Logger"),
            Role::Injected,
        ));
        let artifact = generate(&decl, true, GenerationMode::Spring, ZeroInjectedPolicy::AlwaysFactory)
            .unwrap();
        let imports: Vec<&str> = artifact
            .content()
            .lines()
            .filter(|line| line.starts_with("import "))
            .collect();

        let mut sorted = imports.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(imports, sorted);
        assert_eq!(
            imports,
            vec![
                "import com.github.fenrur.vaadin.codegen.VaadinDsl",
                "import com.vaadin.flow.component.HasComponents",
                "import org.slf4j.Logger",
                "import org.springframework.context.ApplicationContext",
                "import org.springframework.stereotype.Component",
            ]
        );
    }

    #[test]
    fn test_not_exportable_has_no_builder() {
        let artifact = generate(
            &custom_button(),
            false,
            GenerationMode::Quarkus,
            ZeroInjectedPolicy::AlwaysFactory,
        )
        .unwrap();
        assert!(!artifact.content().contains("HasComponents"));
        assert!(!artifact.content().contains("@VaadinDsl"));
        assert!(!artifact.content().contains("ArcContainer"));
    }

    #[test]
    fn test_zero_parameters_always_factory() {
        let decl = Declaration::new("Empty", "com.example");
        let artifact = generate(&decl, true, GenerationMode::Spring, ZeroInjectedPolicy::AlwaysFactory)
            .unwrap();
        let content = artifact.content();

        assert!(content.contains("@Component\nclass EmptyFactory {\n"));
        assert!(content.contains("    fun create(): Empty {\n        return Empty()\n    }\n"));
        assert!(content.contains("    context: ApplicationContext,\n    block: Empty.() -> Unit = {}\n"));
        assert!(content.contains("    val component = factory.create()\n"));
    }

    #[test]
    fn test_direct_construction_skips_factory() {
        let decl = Declaration::new("Badge", "com.example").with_parameter(
            Parameter::new("text", TypeRef::new("kotlin.String"), Role::Exposed).with_default("\"\""),
        );
        let artifact = generate(
            &decl,
            true,
            GenerationMode::Quarkus,
            ZeroInjectedPolicy::DirectConstruction,
        )
        .unwrap();
        let content = artifact.content();

        assert_eq!(artifact.file_name, "BadgeDsl.kt");
        assert!(!content.contains("class BadgeFactory"));
        assert!(!content.contains("ArcContainer"));
        assert!(!content.contains("@ApplicationScoped"));
        assert!(content.contains("fun HasComponents.badge(\n    text: String = \"\",\n"));
        assert!(content.contains("    val component = Badge(text)\n"));
    }

    #[test]
    fn test_direct_construction_not_exportable_yields_nothing() {
        let decl = Declaration::new("Helper", "com.example");
        assert!(generate(
            &decl,
            false,
            GenerationMode::Quarkus,
            ZeroInjectedPolicy::DirectConstruction,
        )
        .is_none());
    }

    #[test]
    fn test_direct_construction_keeps_factory_with_injection() {
        let artifact = generate(
            &custom_button(),
            true,
            GenerationMode::Quarkus,
            ZeroInjectedPolicy::DirectConstruction,
        )
        .unwrap();
        assert_eq!(artifact.file_name, "CustomButtonFactory.kt");
    }

    #[test]
    fn test_unrecovered_default_is_required() {
        let mut parameter = Parameter::new("size", TypeRef::new("kotlin.Int"), Role::Exposed);
        parameter.has_default = true;
        let decl = Declaration::new("Box", "a").with_parameter(parameter);

        let artifact = generate(&decl, false, GenerationMode::Quarkus, ZeroInjectedPolicy::AlwaysFactory)
            .unwrap();
        assert!(artifact.content().contains("        size: Int\n    ): Box {\n"));
    }

    #[test]
    fn test_default_package_has_no_header() {
        let decl = Declaration::new("Root", "");
        let artifact = generate(&decl, false, GenerationMode::Spring, ZeroInjectedPolicy::AlwaysFactory)
            .unwrap();
        assert!(!artifact.content().contains("package "));
        assert_eq!(artifact.relative_path(), "RootFactory.kt");
    }

    #[test]
    fn test_duplicate_parameter_is_structural() {
        let decl = Declaration::new("Twice", "a")
            .with_parameter(Parameter::new("x", TypeRef::new("kotlin.Int"), Role::Exposed))
            .with_parameter(Parameter::new("x", TypeRef::new("kotlin.Int"), Role::Exposed));
        let err = FactoryGenerator::new()
            .unwrap()
            .generate(&decl, false, GenerationMode::Quarkus, ZeroInjectedPolicy::AlwaysFactory)
            .unwrap_err();
        assert!(err.is_structural_error());
    }

    #[test]
    fn test_invalid_name_is_structural() {
        let decl = Declaration::new("not a name", "a");
        let err = FactoryGenerator::new()
            .unwrap()
            .generate(&decl, false, GenerationMode::Quarkus, ZeroInjectedPolicy::AlwaysFactory)
            .unwrap_err();
        assert!(err.is_structural_error());
    }

    #[test]
    fn test_builder_reserved_names_are_structural() {
        let generator = FactoryGenerator::new().unwrap();
        for (name, mode) in [
            ("block", GenerationMode::Quarkus),
            ("component", GenerationMode::Quarkus),
            ("factory", GenerationMode::Spring),
            ("context", GenerationMode::Spring),
            ("container", GenerationMode::Quarkus),
        ] {
            let decl = Declaration::new("Card", "com.example")
                .with_parameter(Parameter::new(name, TypeRef::new("kotlin.Int"), Role::Exposed));
            let err = generator
                .generate(&decl, true, mode, ZeroInjectedPolicy::AlwaysFactory)
                .unwrap_err();
            assert!(err.is_structural_error(), "{name} in {mode:?}");
            assert!(err.to_string().contains(&format!("'{name}'")));
        }
    }

    #[test]
    fn test_reserved_names_depend_on_builder_shape() {
        let generator = FactoryGenerator::new().unwrap();
        let with = |name: &str| {
            Declaration::new("Card", "com.example")
                .with_parameter(Parameter::new(name, TypeRef::new("kotlin.Int"), Role::Exposed))
        };

        // The other mode's handle name is free.
        assert!(generator
            .generate(&with("container"), true, GenerationMode::Spring, ZeroInjectedPolicy::AlwaysFactory)
            .is_ok());
        // No factory local or container handle without a factory.
        assert!(generator
            .generate(&with("factory"), true, GenerationMode::Quarkus, ZeroInjectedPolicy::DirectConstruction)
            .is_ok());
        // No builder, nothing reserved.
        assert!(generator
            .generate(&with("block"), false, GenerationMode::Quarkus, ZeroInjectedPolicy::AlwaysFactory)
            .is_ok());
    }

    #[test]
    fn test_star_imports_carried_into_file() {
        let decl = Declaration::new("Card", "com.example.ui")
            .with_star_import("com.example.model")
            .with_parameter(Parameter::new(
                "repo",
                TypeRef::new("com.example.ui.Repository"),
                Role::Injected,
            ));
        let artifact = generate(&decl, false, GenerationMode::Spring, ZeroInjectedPolicy::AlwaysFactory)
            .unwrap();
        assert!(artifact.content().contains("import com.example.model.*\n"));
        assert!(artifact.content().contains("    private val repo: Repository\n"));
    }

    #[test]
    fn test_comma_separated() {
        let lines = comma_separated(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(lines, vec!["a,", "b"]);
        assert!(comma_separated(Vec::new()).is_empty());
    }
}
