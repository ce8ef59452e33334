//! Output formatters for CLI commands.
//!
//! Command results go to stdout in the requested format; diagnostics go to
//! stderr as one line each, colored in pretty mode.

use anyhow::Result;
use colored::Colorize;
use dslgen_core::cli::OutputFormat;
use dslgen_core::{Diagnostic, Diagnostics, Severity};
use serde::Serialize;

/// Formats `data` according to `format`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use dslgen_cli::formatters::format_output;
/// use dslgen_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Summary {
///     files: usize,
/// }
///
/// let output = format_output(&Summary { files: 3 }, OutputFormat::Text)?;
/// assert_eq!(output, r#"{"files":3}"#);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Text => Ok(serde_json::to_string(data)?),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// Renders diagnostics in their deterministic report order.
///
/// Pretty output colors the severity; the other formats are plain.
#[must_use]
pub fn format_diagnostics(diagnostics: &Diagnostics, format: OutputFormat) -> String {
    diagnostics
        .sorted()
        .into_iter()
        .map(|d| match format {
            OutputFormat::Pretty => colored_line(d),
            OutputFormat::Json | OutputFormat::Text => d.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn colored_line(diagnostic: &Diagnostic) -> String {
    let plain = diagnostic.to_string();
    let (head, rest) = plain.split_once(' ').unwrap_or((plain.as_str(), ""));
    let head = match diagnostic.severity {
        Severity::Error => head.red().bold(),
        Severity::Warning => head.yellow().bold(),
    };
    format!("{head} {rest}")
}

/// Colorized, human-readable output.
pub mod pretty {
    use super::{Colorize, Result, Serialize};
    use serde_json::Value;
    use std::fmt::Write;

    /// Formats data as indented, colorized key/value output.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be converted to JSON.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut out = String::new();
        write_value(&mut out, &value, 0)?;
        Ok(out)
    }

    fn write_value(out: &mut String, value: &Value, indent: usize) -> Result<()> {
        let pad = "  ".repeat(indent);
        match value {
            Value::Null => write!(out, "{}", "none".dimmed())?,
            Value::Bool(b) => write!(out, "{}", b.to_string().yellow())?,
            Value::Number(n) => write!(out, "{}", n.to_string().cyan())?,
            Value::String(s) => write!(out, "{}", s.green())?,
            Value::Array(items) if items.is_empty() => out.push_str("[]"),
            Value::Array(items) => {
                for item in items {
                    write!(out, "\n{pad}- ")?;
                    write_value(out, item, indent + 1)?;
                }
            }
            Value::Object(map) if map.is_empty() => out.push_str("{}"),
            Value::Object(map) => {
                for (i, (key, val)) in map.iter().enumerate() {
                    if i > 0 || indent > 0 {
                        writeln!(out)?;
                        out.push_str(&pad);
                    }
                    write!(out, "{}: ", key.blue().bold())?;
                    write_value(out, val, indent + 1)?;
                }
            }
        }
        Ok(())
    }
}
