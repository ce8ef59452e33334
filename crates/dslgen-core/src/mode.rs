//! Dependency-injection container conventions.
//!
//! A [`GenerationMode`] only decides how a generated factory is annotated and
//! how a generated builder obtains it. Parameter order, names and types are
//! identical across modes.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Explicit container parameter taken by generated builder functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerHandle {
    /// Parameter name
    pub name: &'static str,
    /// Simple type name
    pub type_name: &'static str,
    /// Qualified import of the type
    pub import: &'static str,
}

impl ContainerHandle {
    /// Renders the handle as a parameter declaration, e.g. `container: ArcContainer`.
    #[must_use]
    pub fn declaration(&self) -> String {
        format!("{}: {}", self.name, self.type_name)
    }
}

/// Container convention the generated code targets.
///
/// # Examples
///
/// ```
/// use dslgen_core::GenerationMode;
///
/// let mode: GenerationMode = "spring".parse().unwrap();
/// assert_eq!(mode, GenerationMode::Spring);
/// assert_eq!(
///     mode.render_accessor("CardFactory"),
///     "context.getBean(CardFactory::class.java)"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Quarkus ArC: application-scoped, unremovable beans
    #[default]
    Quarkus,
    /// Spring: component-scanned beans
    Spring,
}

const QUARKUS_CONTAINER: ContainerHandle = ContainerHandle {
    name: "container",
    type_name: "ArcContainer",
    import: "io.quarkus.arc.ArcContainer",
};

const SPRING_CONTAINER: ContainerHandle = ContainerHandle {
    name: "context",
    type_name: "ApplicationContext",
    import: "org.springframework.context.ApplicationContext",
};

impl GenerationMode {
    /// Every supported mode.
    pub const ALL: [Self; 2] = [Self::Quarkus, Self::Spring];

    /// Returns the lowercase configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quarkus => "quarkus",
            Self::Spring => "spring",
        }
    }

    /// Container parameter of generated builders.
    #[must_use]
    pub const fn container_handle(self) -> ContainerHandle {
        match self {
            Self::Quarkus => QUARKUS_CONTAINER,
            Self::Spring => SPRING_CONTAINER,
        }
    }

    /// Expression that fetches a factory, with `{container}` and `{factory}`
    /// placeholders.
    #[must_use]
    pub const fn accessor_template(self) -> &'static str {
        match self {
            Self::Quarkus => "{container}.instance({factory}::class.java).get()",
            Self::Spring => "{container}.getBean({factory}::class.java)",
        }
    }

    /// Fills the accessor template for the given factory type.
    #[must_use]
    pub fn render_accessor(self, factory: &str) -> String {
        self.accessor_template()
            .replace("{container}", self.container_handle().name)
            .replace("{factory}", factory)
    }

    /// Annotation lines placed above a generated factory.
    #[must_use]
    pub const fn factory_annotations(self) -> &'static [&'static str] {
        match self {
            Self::Quarkus => &["@ApplicationScoped", "@Unremovable"],
            Self::Spring => &["@Component"],
        }
    }

    /// Imports required by the factory annotations.
    #[must_use]
    pub const fn factory_imports(self) -> &'static [&'static str] {
        match self {
            Self::Quarkus => &[
                "io.quarkus.arc.Unremovable",
                "jakarta.enterprise.context.ApplicationScoped",
            ],
            Self::Spring => &["org.springframework.stereotype.Component"],
        }
    }

    /// Resolves a configured mode name leniently.
    ///
    /// A missing value selects the default. An unknown value also selects the
    /// default, logs a warning and records an
    /// [`DiagnosticKind::InvalidConfiguration`] warning.
    pub fn resolve(value: Option<&str>, diagnostics: &mut Diagnostics) -> Self {
        let Some(value) = value else {
            return Self::default();
        };
        match value.parse() {
            Ok(mode) => mode,
            Err(_) => {
                let fallback = Self::default();
                diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::InvalidConfiguration,
                    "mode",
                    format!(
                        "unknown generation mode '{value}', falling back to '{}'",
                        fallback.as_str()
                    ),
                ));
                fallback
            }
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quarkus" => Ok(Self::Quarkus),
            "spring" => Ok(Self::Spring),
            _ => Err(crate::Error::InvalidArgument(format!(
                "invalid generation mode: '{s}' (expected: quarkus or spring)"
            ))),
        }
    }
}
