//! Diagnostics reported during a generation pass.
//!
//! Fatal conditions are scoped to the smallest unit that caused them: a
//! declaration without a usable constructor or a property with the wrong
//! visibility is skipped and reported here, while generation continues for
//! everything else.

use crate::model::SourceLocation;
use serde::Serialize;
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// The pass continued with a fallback
    Warning,
    /// The offending declaration or property was skipped
    Error,
}

/// Which rule a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Marked declaration without a usable primary constructor
    Structural,
    /// Bound property with restricted visibility
    VisibilityViolation,
    /// Bound property whose type is not a recognized wrapper with one argument
    TypeShapeViolation,
    /// Unknown configuration value replaced by a default
    InvalidConfiguration,
    /// A source unit could not be read
    Io,
}

impl DiagnosticKind {
    /// Returns the short rule name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::VisibilityViolation => "visibility",
            Self::TypeShapeViolation => "type-shape",
            Self::InvalidConfiguration => "configuration",
            Self::Io => "io",
        }
    }
}

/// A human-readable report about one declaration, property or setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Violated rule
    pub kind: DiagnosticKind,
    /// Offending declaration, property (`Owner.property`) or setting
    pub subject: String,
    /// What went wrong
    pub message: String,
    /// Where it went wrong, when known
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    #[must_use]
    pub fn error(kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            subject: subject.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Creates a warning diagnostic.
    #[must_use]
    pub fn warning(kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            subject: subject.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Attaches a source location.
    #[must_use]
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Returns `true` for error severity.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{severity}[{}] {}", self.kind.as_str(), self.subject)?;
        if let Some(location) = &self.location {
            write!(f, " ({location})")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Ordered collection of diagnostics from one pass.
///
/// Every pushed diagnostic is also logged through `tracing`.
///
/// # Examples
///
/// ```
/// use dslgen_core::{Diagnostic, DiagnosticKind, Diagnostics};
///
/// let mut diagnostics = Diagnostics::new();
/// diagnostics.push(Diagnostic::error(
///     DiagnosticKind::Structural,
///     "com.example.Card",
///     "no primary constructor",
/// ));
///
/// assert!(diagnostics.has_errors());
/// assert_eq!(diagnostics.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => tracing::error!("{diagnostic}"),
            Severity::Warning => tracing::warn!("{diagnostic}"),
        }
        self.entries.push(diagnostic);
    }

    /// Moves all diagnostics from `other` into this collection without
    /// logging them again.
    pub fn append(&mut self, other: &mut Self) {
        self.entries.append(&mut other.entries);
    }

    /// Returns `true` if any error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_error)
    }

    /// Number of errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|d| d.is_error()).count()
    }

    /// Number of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.entries.len() - self.error_count()
    }

    /// Number of diagnostics.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Returns the diagnostics ordered by location, then subject and rule.
    #[must_use]
    pub fn sorted(&self) -> Vec<&Diagnostic> {
        let mut sorted: Vec<&Diagnostic> = self.entries.iter().collect();
        sorted.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.subject.cmp(&b.subject))
                .then_with(|| a.kind.cmp(&b.kind))
                .then_with(|| a.message.cmp(&b.message))
        });
        sorted
    }
}
