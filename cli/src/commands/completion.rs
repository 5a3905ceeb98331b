//! Shell completion output.

use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io::Write;

use crate::Cli;

pub const BIN_NAME: &str = "jira-reindex-runner";

/// Write the completion script for `shell` to `out`.
pub fn write_completion<W: Write>(shell: Shell, out: &mut W) {
    let mut command = Cli::command();
    generate(shell, &mut command, BIN_NAME, out);
}

pub fn print_completion(shell: Shell) {
    write_completion(shell, &mut std::io::stdout());
}
