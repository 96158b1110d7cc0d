use std::fmt::Write as _;

use anyhow::{Context, Result};
use atom_tally::AtomCounts;

use crate::cli::OutputFormat;

/// A parsed formula alongside its text, ready for output.
#[derive(Debug, Clone)]
pub struct Tally {
    pub formula: String,
    pub counts: AtomCounts,
}

pub fn render(format: OutputFormat, tallies: &[Tally]) -> Result<String> {
    match format {
        OutputFormat::Lines => Ok(render_lines(tallies)),
        OutputFormat::Compact => Ok(render_compact(tallies)),
        OutputFormat::Toml => render_toml(tallies),
    }
}

/// `Element: count` per line, alphabetical. Several formulas get a header
/// line each and a blank line between blocks.
fn render_lines(tallies: &[Tally]) -> String {
    let mut out = String::new();
    let with_headers = tallies.len() > 1;

    for (i, tally) in tallies.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if with_headers {
            let _ = writeln!(out, "{}", tally.formula);
        }
        for (element, quantity) in &tally.counts {
            let _ = writeln!(out, "{element}: {quantity}");
        }
    }

    out
}

fn render_compact(tallies: &[Tally]) -> String {
    let mut out = String::new();

    if let [only] = tallies {
        let _ = writeln!(out, "{}", only.counts);
        return out;
    }

    for tally in tallies {
        let _ = writeln!(out, "{} -> {}", tally.formula, tally.counts);
    }

    out
}

fn render_toml(tallies: &[Tally]) -> Result<String> {
    let mut doc = toml::Table::new();
    for tally in tallies {
        let value = toml::Value::try_from(&tally.counts)
            .with_context(|| format!("Cannot represent counts of '{}' as TOML", tally.formula))?;
        doc.insert(tally.formula.clone(), value);
    }
    toml::to_string(&doc).context("Failed to serialize TOML output")
}
