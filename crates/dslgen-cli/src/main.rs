//! dslgen command-line host.
//!
//! Generates Kotlin factories, `HasComponents` builder functions and signal
//! binding extensions for marked classes.
//!
//! # Examples
//!
//! ```bash
//! # Generate for a Quarkus project
//! dslgen generate --source src/main/kotlin --output build/generated/dslgen
//!
//! # Spring, taking the remaining settings from a config file
//! DSLGEN_MODE=spring dslgen generate --config dslgen.toml
//!
//! # List what would be generated
//! dslgen scan --source src/main/kotlin --format json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use dslgen_cli::commands;
use dslgen_cli::commands::generate::GenerateArgs;
use dslgen_core::cli::{ExitCode, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Kotlin DSL code generator for dependency-injected UI components.
#[derive(Parser, Debug)]
#[command(name = "dslgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate factories, builders and signal bindings.
    ///
    /// Reads marked declarations from Kotlin sources (or a manifest) and
    /// writes one file per declaration and per binding owner under the
    /// output root. Files of failed declarations are skipped and reported;
    /// the exit code is then 3.
    Generate {
        /// Source root to scan recursively for `*.kt` files (repeatable)
        #[arg(short, long = "source", num_args = 1)]
        sources: Vec<PathBuf>,

        /// JSON or TOML manifest used instead of scanning
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Output root (default: build/generated/dslgen)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Container convention: quarkus or spring
        #[arg(long, env = "DSLGEN_MODE")]
        mode: Option<String>,

        /// Declarations without injected parameters: always-factory or direct-construction
        #[arg(long)]
        zero_injected: Option<String>,

        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Delete the output root before writing
        #[arg(long)]
        clean: bool,
    },

    /// List marked declarations and bound properties without generating.
    Scan {
        /// Source root to scan recursively for `*.kt` files (repeatable)
        #[arg(short, long = "source", num_args = 1, required = true)]
        sources: Vec<PathBuf>,

        /// Convention for unmarked parameters: mark-to-inject or mark-to-expose
        #[arg(long)]
        default_convention: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let output_format = cli.format.parse::<OutputFormat>()?;
    let exit_code = execute_command(cli.command, output_format)?;

    std::process::exit(exit_code.as_i32());
}

/// Initializes logging to stderr; `--verbose` forces debug level.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Routes a command to its handler.
fn execute_command(command: Commands, output_format: OutputFormat) -> Result<ExitCode> {
    match command {
        Commands::Generate {
            sources,
            manifest,
            output,
            mode,
            zero_injected,
            config,
            clean,
        } => {
            let args = GenerateArgs {
                sources,
                manifest,
                output,
                mode,
                zero_injected,
                config,
                clean,
            };
            commands::generate::run(&args, output_format)
        }
        Commands::Scan {
            sources,
            default_convention,
        } => commands::scan::run(&sources, default_convention.as_deref(), output_format),
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}
