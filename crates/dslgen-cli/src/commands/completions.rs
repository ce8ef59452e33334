//! Shell completion generation command.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use dslgen_core::cli::ExitCode;
use std::io;

/// Writes the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn io::Write) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Runs the completions command, printing the script to stdout.
///
/// # Errors
///
/// Never fails; the `Result` keeps the signature uniform with the other
/// commands.
#[allow(clippy::unnecessary_wraps)]
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    tracing::info!("Generating {shell} completions");
    write_completions(shell, cmd, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;

    fn command() -> Command {
        Command::new("dslgen").subcommand(
            Command::new("generate").arg(Arg::new("output").long("output")),
        )
    }

    #[test]
    fn test_bash_completions_mention_subcommand() {
        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut command(), &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("dslgen"));
        assert!(script.contains("generate"));
    }

    #[test]
    fn test_all_shells_produce_output() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            let mut out = Vec::new();
            write_completions(shell, &mut command(), &mut out);
            assert!(!out.is_empty(), "{shell} produced no output");
        }
    }
}
