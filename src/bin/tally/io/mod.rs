//! Where formulas come from and where results go.

mod lines;

pub use lines::FormulaLine;

use lines::read_formula_lines;

use std::fs::{self, File};
use std::io::{self, BufReader, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};

pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

/// Reads batch formulas from `path`, or from stdin when no path is given.
pub fn load_formulas(path: Option<&Path>) -> Result<Vec<FormulaLine>> {
    match path {
        Some(p) => {
            let file = File::open(p)
                .with_context(|| format!("Failed to open formula file: {}", p.display()))?;
            read_formula_lines(BufReader::new(file))
                .with_context(|| format!("Failed to read formula file: {}", p.display()))
        }
        None => read_formula_lines(io::stdin().lock()).context("Failed to read formulas from stdin"),
    }
}

/// Writes rendered results to `path`, or to stdout when no path is given.
pub fn write_results(path: Option<&Path>, rendered: &str) -> Result<()> {
    match path {
        Some(p) => fs::write(p, rendered)
            .with_context(|| format!("Failed to write results to {}", p.display())),
        None => {
            let mut out = io::stdout().lock();
            out.write_all(rendered.as_bytes())
                .and_then(|()| out.flush())
                .context("Failed to write results to stdout")
        }
    }
}
