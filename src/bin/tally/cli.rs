use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Count the atoms in chemical formulas",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Count atoms in formulas given on the command line
    #[command(visible_alias = "c")]
    Count(CountArgs),

    /// Count atoms in a file of formulas, one per line
    #[command(visible_alias = "b")]
    Batch(BatchArgs),
}

impl Command {
    pub fn common(&self) -> &CommonOptions {
        match self {
            Command::Count(args) => &args.common,
            Command::Batch(args) => &args.common,
        }
    }
}

/// Parsing and output options shared by all commands.
#[derive(Args)]
#[command(next_help_heading = "Parsing & Output")]
pub struct CommonOptions {
    /// Output format (default: lines, or the config file's choice)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Maximum group nesting depth
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Settings file (TOML with [parser] and [output] tables)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress banner and tables (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct CountArgs {
    #[command(flatten)]
    pub common: CommonOptions,

    /// Formulas to evaluate, e.g. 'K4(ON(SO3)2)2'
    #[arg(value_name = "FORMULA", required = true)]
    pub formulas: Vec<String>,
}

#[derive(Args)]
pub struct BatchArgs {
    #[command(flatten)]
    pub common: CommonOptions,

    /// Input file (stdin if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report failing lines and continue instead of stopping at the first
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One "Element: count" line per element
    #[default]
    Lines,
    /// Single line per formula, unit counts omitted (K4N2O14S4)
    Compact,
    /// TOML table per formula
    Toml,
}

pub fn parse() -> Cli {
    Cli::parse()
}
