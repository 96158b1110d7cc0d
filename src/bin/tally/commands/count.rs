use anyhow::{Context, Result};

use atom_tally::FormulaParser;

use crate::cli::CountArgs;
use crate::config::build_settings;
use crate::display::{
    Context as DisplayContext, FormulaContext, print_element_distribution, print_formula_summary,
};
use crate::io::write_results;
use crate::render::{Tally, render};

pub fn run_count(args: CountArgs, ctx: DisplayContext) -> Result<()> {
    let settings = build_settings(&args.common)?;
    let parser = FormulaParser::new(settings.parser);

    let tallies = count_formulas(&parser, &args.formulas)?;

    if ctx.interactive {
        for tally in &tallies {
            print_formula_summary(&tally.formula, &tally.counts);
            print_element_distribution(&tally.counts);
        }
    }

    let rendered = render(settings.format, &tallies)?;
    write_results(None, &rendered)
}

/// Parses every formula, stopping at the first failure.
fn count_formulas(parser: &FormulaParser, formulas: &[String]) -> Result<Vec<Tally>> {
    formulas
        .iter()
        .map(|formula| {
            let counts = parser.parse(formula).with_context(|| FormulaContext {
                formula: formula.clone(),
                line: None,
            })?;
            Ok(Tally {
                formula: formula.clone(),
                counts,
            })
        })
        .collect()
}
