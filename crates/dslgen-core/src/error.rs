//! Error types for DSL code generation.
//!
//! Infrastructure failures (unreadable configuration, broken templates, I/O
//! on the output root) are reported through [`Error`]. Problems scoped to a
//! single declaration or property are reported as diagnostics instead, so
//! one bad declaration never aborts the whole pass.
//!
//! # Examples
//!
//! ```
//! use dslgen_core::{Error, Result};
//!
//! fn check_output(dir: &str) -> Result<()> {
//!     if dir.is_empty() {
//!         return Err(Error::ConfigError {
//!             message: "output directory cannot be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_output("").unwrap_err();
//! assert!(err.is_config_error());
//! ```

use thiserror::Error;

/// Main error type for DSL code generation.
///
/// All library crates in the workspace use this type, providing consistent
/// error handling from scanning through synthesis.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    ///
    /// Raised when configuration is invalid, missing required fields,
    /// or cannot be parsed.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Template registration or rendering failed.
    #[error("Template error: {message}")]
    TemplateError {
        /// Description of the template failure
        message: String,
        /// Underlying template engine error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation error for model values.
    ///
    /// Raised when a declaration, parameter or property does not satisfy
    /// the shape required for generation.
    #[error("Validation error in {field}: {reason}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Detailed reason for the validation failure
        reason: String,
    },

    /// A marked declaration lacks a usable constructor.
    #[error("Declaration '{declaration}' cannot be generated: {reason}")]
    StructuralError {
        /// Qualified name of the offending declaration
        declaration: String,
        /// Which structural requirement is violated
        reason: String,
    },

    /// A declaration manifest could not be read or parsed.
    #[error("Manifest error in {path}: {message}")]
    ManifestError {
        /// Manifest path
        path: String,
        /// Description of the failure
        message: String,
    },

    /// I/O failure while reading sources or writing artifacts.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use dslgen_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "unknown key".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a template error.
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(self, Self::TemplateError { .. })
    }

    /// Returns `true` if this is a validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use dslgen_core::Error;
    ///
    /// let err = Error::ValidationError {
    ///     field: "title".to_string(),
    ///     reason: "must be public".to_string(),
    /// };
    /// assert!(err.is_validation_error());
    /// ```
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }

    /// Returns `true` if this is a structural error.
    #[must_use]
    pub const fn is_structural_error(&self) -> bool {
        matches!(self, Self::StructuralError { .. })
    }

    /// Returns `true` if this is a manifest error.
    #[must_use]
    pub const fn is_manifest_error(&self) -> bool {
        matches!(self, Self::ManifestError { .. })
    }

    /// Returns `true` if this is an I/O error.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Result type alias for code generation operations.
///
/// # Examples
///
/// ```
/// use dslgen_core::{Error, Result};
///
/// fn parse_count(value: i32) -> Result<i32> {
///     if value < 0 {
///         return Err(Error::InvalidArgument("negative count".to_string()));
///     }
///     Ok(value)
/// }
///
/// assert!(parse_count(3).is_ok());
/// assert!(parse_count(-1).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;
