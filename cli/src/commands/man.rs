//! Man page output.

use clap::CommandFactory;
use clap_mangen::Man;
use std::io::{self, Write};

use crate::Cli;

/// Render the man page for the runner into `out`.
pub fn write_man<W: Write>(out: &mut W) -> io::Result<()> {
    Man::new(Cli::command()).render(out)
}

pub fn print_man() -> io::Result<()> {
    write_man(&mut io::stdout())
}
