//! Generate command implementation.
//!
//! Runs one generation pass and writes the result:
//! 1. Resolves settings from the config file and command-line overrides
//! 2. Reads declarations from a manifest or by scanning Kotlin sources
//! 3. Synthesizes factories, builders and signal bindings
//! 4. Exports the output tree under the output root

use crate::formatters::{format_diagnostics, format_output};
use crate::sources::collect_sources;
use anyhow::{Context, Result};
use dslgen_codegen::Pipeline;
use dslgen_codegen::manifest::Manifest;
use dslgen_core::cli::{ExitCode, OutputFormat};
use dslgen_core::{CodegenConfig, Diagnostics, ZeroInjectedPolicy};
use dslgen_files::{ExportOptions, OutputBuilder};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Command-line inputs of `dslgen generate`.
///
/// Every set field overrides the corresponding config file value.
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Source roots to scan
    pub sources: Vec<PathBuf>,
    /// Structured manifest used instead of scanning
    pub manifest: Option<PathBuf>,
    /// Output root
    pub output: Option<PathBuf>,
    /// Container convention name
    pub mode: Option<String>,
    /// Zero-injected policy name
    pub zero_injected: Option<String>,
    /// Config file
    pub config: Option<PathBuf>,
    /// Delete the output root first
    pub clean: bool,
}

impl GenerateArgs {
    /// Merges the config file (if any) with the command-line overrides.
    ///
    /// Relative paths inside the config file resolve against the file's
    /// directory; command-line paths are used as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the
    /// zero-injected policy name is unknown.
    pub fn resolve(&self) -> Result<CodegenConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = CodegenConfig::load(path)
                    .with_context(|| format!("failed to load config {}", path.display()))?;
                let base = path.parent().unwrap_or_else(|| Path::new(""));
                rebase_paths(&mut config, base);
                config
            }
            None => CodegenConfig::default(),
        };

        if !self.sources.is_empty() {
            config.sources.clone_from(&self.sources);
        }
        if let Some(manifest) = &self.manifest {
            config.manifest = Some(manifest.clone());
        }
        if let Some(output) = &self.output {
            config.output_dir.clone_from(output);
        }
        if let Some(mode) = &self.mode {
            config.mode = Some(mode.clone());
        }
        if let Some(policy) = &self.zero_injected {
            config.zero_injected = policy
                .parse::<ZeroInjectedPolicy>()
                .context("invalid --zero-injected value")?;
        }
        config.clean_output |= self.clean;

        Ok(config)
    }
}

fn rebase_paths(config: &mut CodegenConfig, base: &Path) {
    let rebase = |path: &Path| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    };
    config.sources = config.sources.iter().map(|p| rebase(p)).collect();
    config.manifest = config.manifest.as_deref().map(rebase);
    config.output_dir = rebase(&config.output_dir);
}

/// Result of one generation pass.
#[derive(Debug, Serialize)]
pub struct GenerationSummary {
    /// Resolved mode
    pub mode: String,
    /// Output root
    pub output_dir: String,
    /// Files written, relative to the output root
    pub files: Vec<String>,
    /// Number of error diagnostics
    pub errors: usize,
    /// Number of warning diagnostics
    pub warnings: usize,
}

/// Runs the generate command.
///
/// Every artifact that could be generated is written even when some
/// declarations fail; those failures turn the exit code into
/// [`ExitCode::DIAGNOSTICS`].
///
/// # Errors
///
/// Returns an error if configuration, template setup, the manifest, or the
/// export to the output root fails.
pub fn run(args: &GenerateArgs, output_format: OutputFormat) -> Result<ExitCode> {
    let config = args.resolve()?;

    if config.sources.is_empty() && config.manifest.is_none() {
        eprintln!("error: no source roots or manifest given (use --source or --manifest)");
        return Ok(ExitCode::INVALID_INPUT);
    }

    let mut diagnostics = Diagnostics::new();
    let pipeline = Pipeline::from_config(&config, &mut diagnostics)
        .context("failed to initialize code generators")?;
    info!(mode = %pipeline.mode(), output = %config.output_dir.display(), "starting generation");

    let mut output = if let Some(manifest_path) = &config.manifest {
        if !config.sources.is_empty() {
            warn!("manifest given; source roots are not scanned");
        }
        let manifest = Manifest::load(manifest_path)
            .with_context(|| format!("failed to load manifest {}", manifest_path.display()))?;
        let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));
        pipeline.run_manifest(&manifest, base)?
    } else {
        let units = collect_sources(&config.sources, &mut diagnostics);
        info!("Scanning {} source files", units.len());
        pipeline.run_sources(&units)?
    };
    diagnostics.append(&mut output.diagnostics);

    let tree = OutputBuilder::from_generated_code(&output.code)
        .build()
        .context("generated artifacts could not be collected")?;
    let options = ExportOptions::default().with_clean(config.clean_output);
    tree.export_parallel(&config.output_dir, &options)
        .with_context(|| format!("failed to write {}", config.output_dir.display()))?;

    let summary = GenerationSummary {
        mode: pipeline.mode().to_string(),
        output_dir: config.output_dir.display().to_string(),
        files: tree.paths().map(str::to_string).collect(),
        errors: diagnostics.error_count(),
        warnings: diagnostics.warning_count(),
    };
    println!("{}", format_output(&summary, output_format)?);

    if !diagnostics.is_empty() {
        eprintln!("{}", format_diagnostics(&diagnostics, output_format));
    }

    if diagnostics.has_errors() {
        warn!(
            errors = summary.errors,
            "generation finished with errors; affected declarations were skipped"
        );
        Ok(ExitCode::DIAGNOSTICS)
    } else {
        info!("Generated {} files", summary.files.len());
        Ok(ExitCode::SUCCESS)
    }
}
