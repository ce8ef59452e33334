//! Template engine for Kotlin generation using Handlebars.
//!
//! Wraps Handlebars with the built-in templates pre-registered. Strict mode
//! is on, so a context missing a field fails instead of rendering an empty
//! string, and HTML escaping is off since the output is Kotlin source.
//!
//! # Examples
//!
//! ```
//! use dslgen_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let mut engine = TemplateEngine::new().unwrap();
//! engine.register_template_string("greeting", "fun {{name}}() = Unit").unwrap();
//! let out = engine.render("greeting", &json!({"name": "hello"})).unwrap();
//! assert_eq!(out, "fun hello() = Unit");
//! ```

use dslgen_core::{Error, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Name of the factory file template.
pub const FACTORY_TEMPLATE: &str = "kotlin/factory";

/// Name of the binding file template.
pub const BINDINGS_TEMPLATE: &str = "kotlin/bindings";

/// Template engine for Kotlin generation.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`, allowing it to be used across
/// thread boundaries safely.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateEngine<'a> {
    /// Creates a new template engine with the built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if a built-in template fails to
    /// register.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        // Kotlin output: `<`, `>` and `&` must survive verbatim
        handlebars.register_escape_fn(handlebars::no_escape);

        Self::register_kotlin_templates(&mut handlebars)?;

        Ok(Self { handlebars })
    }

    fn register_kotlin_templates(handlebars: &mut Handlebars<'a>) -> Result<()> {
        handlebars
            .register_template_string(
                FACTORY_TEMPLATE,
                include_str!("../templates/kotlin/factory.kt.hbs"),
            )
            .map_err(|e| Error::TemplateError {
                message: format!("Failed to register factory template: {e}"),
                source: None,
            })?;

        handlebars
            .register_template_string(
                BINDINGS_TEMPLATE,
                include_str!("../templates/kotlin/bindings.kt.hbs"),
            )
            .map_err(|e| Error::TemplateError {
                message: format!("Failed to register bindings template: {e}"),
                source: None,
            })?;

        Ok(())
    }

    /// Renders a template with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if the template is not registered or
    /// the context lacks a field the template uses.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::TemplateError {
                message: format!("Template rendering failed: {e}"),
                source: None,
            })
    }

    /// Registers an additional template.
    ///
    /// Registering under an existing name replaces that template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if the template string is invalid.
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::TemplateError {
                message: format!("Failed to register template '{name}': {e}"),
                source: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_engine_creation() {
        assert!(TemplateEngine::new().is_ok());
    }

    #[test]
    fn test_render_factory_template() {
        let engine = TemplateEngine::new().unwrap();
        let context = json!({
            "package": "com.example",
            "imports": ["import org.slf4j.Logger"],
            "target": "Card",
            "factory": {
                "name": "CardFactory",
                "annotations": ["@Component"],
                "fields": ["private val logger: Logger"],
                "create_params": ["title: String"],
                "arguments": "logger, title"
            },
            "builder": null
        });

        let rendered = engine.render(FACTORY_TEMPLATE, &context).unwrap();
        assert!(rendered.starts_with("package com.example\n"));
        assert!(rendered.contains("import org.slf4j.Logger\n"));
        assert!(rendered.contains("@Component\nclass CardFactory(\n"));
        assert!(rendered.contains("    private val logger: Logger\n"));
        assert!(rendered.contains("        return Card(logger, title)\n"));
        assert!(!rendered.contains("@VaadinDsl"));
    }

    #[test]
    fn test_render_bindings_template() {
        let engine = TemplateEngine::new().unwrap();
        let context = json!({
            "package": "com.example",
            "imports": ["import com.github.fenrur.signal.Signal"],
            "functions": [
                {"owner": "Card", "property": "count", "signal_type": "Signal<Int>"}
            ]
        });

        let rendered = engine.render(BINDINGS_TEMPLATE, &context).unwrap();
        assert!(rendered.contains("fun Card.count(signal: Signal<Int>) {\n"));
        assert!(rendered.contains("    this.count.bindTo(signal)\n"));
        assert!(rendered.contains(" * Binds the given [signal] to the [count] property.\n"));
    }

    #[test]
    fn test_no_html_escaping() {
        let mut engine = TemplateEngine::new().unwrap();
        engine
            .register_template_string("raw", "{{value}}")
            .unwrap();
        let rendered = engine
            .render("raw", &json!({"value": "Map<String, () -> Unit> & \"x\""}))
            .unwrap();
        assert_eq!(rendered, "Map<String, () -> Unit> & \"x\"");
    }

    #[test]
    fn test_render_nonexistent_template() {
        let engine = TemplateEngine::new().unwrap();
        let err = engine.render("kotlin/missing", &json!({})).unwrap_err();
        assert!(err.is_template_error());
    }

    #[test]
    fn test_strict_mode_fails_on_missing_variable() {
        let mut engine = TemplateEngine::new().unwrap();
        engine
            .register_template_string("strict", "Value: {{missing_var}}")
            .unwrap();
        let result = engine.render("strict", &json!({"other_var": "value"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_register_invalid_template_syntax() {
        let mut engine = TemplateEngine::new().unwrap();
        let err = engine
            .register_template_string("invalid", "Hello {{name")
            .unwrap_err();
        assert!(err.is_template_error());
    }

    #[test]
    fn test_concurrent_template_usage() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TemplateEngine>();
    }
}
