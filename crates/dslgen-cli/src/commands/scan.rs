//! Scan command implementation.
//!
//! Lists the marked declarations and bound properties found under the
//! source roots, with their classification and recovered defaults, without
//! generating anything.

use crate::formatters::{format_diagnostics, format_output};
use crate::sources::collect_sources;
use anyhow::{Context, Result};
use dslgen_codegen::classify::{TypeIndex, is_exportable};
use dslgen_codegen::defaults::recover_defaults;
use dslgen_codegen::scanner::{ScanOptions, ScannedUnit, scan_source};
use dslgen_core::cli::{ExitCode, OutputFormat};
use dslgen_core::{Diagnostics, MarkerConvention, Parameter};
use serde::Serialize;
use std::path::PathBuf;

/// One marked declaration.
#[derive(Debug, Serialize)]
pub struct DeclarationReport {
    /// Qualified class name
    pub name: String,
    /// `file:line`
    pub location: String,
    /// Whether a builder would be generated
    pub exportable: bool,
    /// Container-supplied parameters
    pub injected: Vec<String>,
    /// Caller-supplied parameters with their defaults
    pub exposed: Vec<String>,
}

/// One bound property.
#[derive(Debug, Serialize)]
pub struct PropertyReport {
    /// `Owner.property`
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub type_name: String,
    /// Declared visibility
    pub visibility: String,
}

/// Everything found by a scan.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// Number of source files read
    pub files: usize,
    /// Marked declarations in source order
    pub declarations: Vec<DeclarationReport>,
    /// Bound properties in source order
    pub properties: Vec<PropertyReport>,
}

/// Scans `sources` and builds the report.
///
/// # Errors
///
/// Returns an error if `convention` is not a known marker convention.
pub fn scan(
    sources: &[PathBuf],
    convention: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> Result<ScanReport> {
    let default_convention = convention
        .map(str::parse::<MarkerConvention>)
        .transpose()
        .context("invalid --default-convention value")?
        .unwrap_or_default();
    let options = ScanOptions { default_convention };

    let units = collect_sources(sources, diagnostics);
    let mut index = TypeIndex::new();
    let mut scanned: Vec<(ScannedUnit, &str)> = Vec::with_capacity(units.len());
    for unit in &units {
        let mut result = scan_source(&unit.path, &unit.text, &options);
        diagnostics.append(&mut result.diagnostics);
        index.merge(std::mem::take(&mut result.index));
        scanned.push((result, unit.text.as_str()));
    }

    let mut report = ScanReport {
        files: units.len(),
        declarations: Vec::new(),
        properties: Vec::new(),
    };
    for (unit, text) in &scanned {
        for declaration in &unit.declarations {
            let declaration = declaration.with_recovered_defaults(&recover_defaults(declaration, text));
            report.declarations.push(DeclarationReport {
                name: declaration.qualified_name(),
                location: declaration.location.to_string(),
                exportable: is_exportable(&declaration, &index),
                injected: declaration.injected().map(describe).collect(),
                exposed: declaration.exposed().map(describe).collect(),
            });
        }
        for property in &unit.properties {
            report.properties.push(PropertyReport {
                name: format!("{}.{}", property.owner, property.name),
                type_name: property.type_ref.render(),
                visibility: property.visibility.to_string(),
            });
        }
    }

    Ok(report)
}

fn describe(parameter: &Parameter) -> String {
    let mut text = format!("{}: {}", parameter.name, parameter.type_ref.render());
    if let Some(default) = &parameter.default_expression {
        text.push_str(" = ");
        text.push_str(default);
    }
    text
}

/// Runs the scan command.
///
/// # Errors
///
/// Returns an error if the convention name is invalid or the report cannot
/// be formatted.
pub fn run(
    sources: &[PathBuf],
    convention: Option<&str>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    if sources.is_empty() {
        eprintln!("error: no source roots given (use --source)");
        return Ok(ExitCode::INVALID_INPUT);
    }

    let mut diagnostics = Diagnostics::new();
    let report = scan(sources, convention, &mut diagnostics)?;
    tracing::info!(
        files = report.files,
        declarations = report.declarations.len(),
        properties = report.properties.len(),
        "scan complete"
    );

    println!("{}", format_output(&report, output_format)?);
    if !diagnostics.is_empty() {
        eprintln!("{}", format_diagnostics(&diagnostics, output_format));
    }

    Ok(if diagnostics.has_errors() {
        ExitCode::DIAGNOSTICS
    } else {
        ExitCode::SUCCESS
    })
}
