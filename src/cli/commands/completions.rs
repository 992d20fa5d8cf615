//! Shell completions command implementation.

use crate::cli::{Cli, Shell};
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::{Generator, generate, shells};
use std::io::{self, Write};

const BIN_NAME: &str = "lockin";

/// Write completions for `shell` to stdout.
///
/// # Errors
///
/// Returns an I/O error if stdout cannot be flushed.
pub fn execute(shell: &Shell) -> Result<()> {
    let mut out = io::stdout();
    match shell {
        Shell::Bash => write_completions(shells::Bash, &mut out),
        Shell::Zsh => write_completions(shells::Zsh, &mut out),
        Shell::Fish => write_completions(shells::Fish, &mut out),
        Shell::PowerShell => write_completions(shells::PowerShell, &mut out),
        Shell::Elvish => write_completions(shells::Elvish, &mut out),
    }
    out.flush()?;
    Ok(())
}

fn write_completions(generator: impl Generator, out: &mut dyn Write) {
    generate(generator, &mut Cli::command(), BIN_NAME, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_name_subcommands() {
        let mut buf = Vec::new();
        write_completions(shells::Bash, &mut buf);
        let script = String::from_utf8(buf).unwrap();

        assert!(script.contains(BIN_NAME));
        assert!(script.contains("save"));
        assert!(script.contains("activity"));
    }
}
