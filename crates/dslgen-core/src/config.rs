//! Configuration for a generation pass.
//!
//! Configuration is read from a `dslgen.toml` file; command-line flags
//! override individual values afterwards.
//!
//! # Examples
//!
//! ```
//! use dslgen_core::{CodegenConfig, Diagnostics, GenerationMode, ZeroInjectedPolicy};
//!
//! let config = CodegenConfig::from_toml_str(r#"
//! mode = "spring"
//! output-dir = "build/generated/dsl"
//! sources = ["src/main/kotlin"]
//! zero-injected = "direct-construction"
//! "#).unwrap();
//!
//! let mut diagnostics = Diagnostics::new();
//! assert_eq!(config.generation_mode(&mut diagnostics), GenerationMode::Spring);
//! assert_eq!(config.zero_injected, ZeroInjectedPolicy::DirectConstruction);
//! ```

use crate::diagnostics::Diagnostics;
use crate::mode::GenerationMode;
use crate::model::MarkerConvention;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What to generate for a declaration without injected parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroInjectedPolicy {
    /// Always emit a factory, with an empty constructor
    #[default]
    AlwaysFactory,
    /// Skip the factory; the builder constructs the target directly
    DirectConstruction,
}

impl ZeroInjectedPolicy {
    /// Returns the configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlwaysFactory => "always-factory",
            Self::DirectConstruction => "direct-construction",
        }
    }
}

impl fmt::Display for ZeroInjectedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZeroInjectedPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "always-factory" => Ok(Self::AlwaysFactory),
            "direct-construction" => Ok(Self::DirectConstruction),
            _ => Err(Error::InvalidArgument(format!(
                "invalid zero-injected policy: '{s}' (expected: always-factory or direct-construction)"
            ))),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build/generated/dslgen")
}

/// Settings for one generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CodegenConfig {
    /// Container convention name; resolved leniently
    pub mode: Option<String>,

    /// Root of the generated source tree.
    ///
    /// Default: `build/generated/dslgen`
    pub output_dir: PathBuf,

    /// Directories scanned for Kotlin sources
    pub sources: Vec<PathBuf>,

    /// Structured declaration manifest used instead of scanning
    pub manifest: Option<PathBuf>,

    /// Policy for declarations without injected parameters
    pub zero_injected: ZeroInjectedPolicy,

    /// Marker convention for declarations that carry no parameter markers
    pub default_convention: MarkerConvention,

    /// Delete the output root before writing
    pub clean_output: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            mode: None,
            output_dir: default_output_dir(),
            sources: Vec::new(),
            manifest: None,
            zero_injected: ZeroInjectedPolicy::default(),
            default_convention: MarkerConvention::default(),
            clean_output: false,
        }
    }
}

impl CodegenConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the text is not valid TOML or
    /// contains unknown keys or values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::ConfigError {
            message: format!("failed to parse configuration: {e}"),
        })
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::ConfigError`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|e| match e {
            Error::ConfigError { message } => Error::ConfigError {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Resolves the configured mode, recording a warning for unknown names.
    pub fn generation_mode(&self, diagnostics: &mut Diagnostics) -> GenerationMode {
        GenerationMode::resolve(self.mode.as_deref(), diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CodegenConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("build/generated/dslgen"));
        assert_eq!(config.zero_injected, ZeroInjectedPolicy::AlwaysFactory);
        assert_eq!(config.default_convention, MarkerConvention::MarkToInject);
        assert!(!config.clean_output);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = CodegenConfig::from_toml_str("").unwrap();
        assert_eq!(config, CodegenConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = CodegenConfig::from_toml_str("colour = \"blue\"").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_unknown_mode_is_lenient() {
        let config = CodegenConfig::from_toml_str("mode = \"micronaut\"").unwrap();
        let mut diagnostics = Diagnostics::new();
        assert_eq!(config.generation_mode(&mut diagnostics), GenerationMode::Quarkus);
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_default_convention_parsed() {
        let config = CodegenConfig::from_toml_str("default-convention = \"mark-to-expose\"").unwrap();
        assert_eq!(config.default_convention, MarkerConvention::MarkToExpose);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "clean-output = true").unwrap();
        writeln!(file, "sources = [\"src/main/kotlin\", \"src/ui/kotlin\"]").unwrap();

        let config = CodegenConfig::load(file.path()).unwrap();
        assert!(config.clean_output);
        assert_eq!(config.sources.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CodegenConfig::load(Path::new("/nonexistent/dslgen.toml")).unwrap_err();
        assert!(err.is_io_error());
    }

    #[test]
    fn test_zero_injected_from_str() {
        assert_eq!(
            "Direct-Construction".parse::<ZeroInjectedPolicy>().unwrap(),
            ZeroInjectedPolicy::DirectConstruction
        );
        assert!("never".parse::<ZeroInjectedPolicy>().is_err());
    }
}
