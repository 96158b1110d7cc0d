use std::path::Path;

use anyhow::{Error, Result, bail};

use atom_tally::FormulaParser;

use crate::cli::{BatchArgs, OutputFormat};
use crate::config::build_settings;
use crate::display::{
    BatchStats, Context as DisplayContext, FormulaContext, Progress, print_batch_summary,
    print_line_failure,
};
use crate::io::{FormulaLine, load_formulas, stdin_is_tty, write_results};
use crate::render::{Tally, render};

const TOTAL_STEPS: u8 = 3;

pub fn run_batch(args: BatchArgs, ctx: DisplayContext) -> Result<()> {
    if args.input.is_none() && stdin_is_tty() {
        bail!(
            "No input file specified and stdin is a terminal.\n\nUsage: tally batch -i <FILE> or pipe formulas via stdin."
        );
    }

    let settings = build_settings(&args.common)?;
    let parser = FormulaParser::new(settings.parser);

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading formulas");
    let lines = load_formulas(args.input.as_deref())?;
    let read_substep = format!(
        "{} formulas from {}",
        lines.len(),
        display_name(args.input.as_deref(), "stdin")
    );
    progress.complete_step("Reading formulas", &[&read_substep]);

    progress.step_counted("Counting atoms", lines.len() as u64);
    let outcome = count_lines(&parser, &lines, args.keep_going, &progress)?;
    let count_substeps = [
        format!("Parsed {}", outcome.stats.parsed),
        format!("Failed {}", outcome.stats.failed),
    ];
    let count_substeps_ref: Vec<&str> = count_substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Counting atoms", &count_substeps_ref);

    progress.step("Writing output");
    let rendered = render(settings.format, &outcome.tallies)?;
    write_results(args.output.as_deref(), &rendered)?;
    let write_substep = format!(
        "Write {} → {}",
        format_name(settings.format),
        display_name(args.output.as_deref(), "stdout")
    );
    progress.complete_step("Writing output", &[&write_substep]);

    progress.finish();

    if ctx.interactive {
        print_batch_summary(&outcome.stats);
    }

    if outcome.stats.failed > 0 {
        bail!(
            "{} of {} formulas failed to parse",
            outcome.stats.failed,
            outcome.stats.formulas
        );
    }

    Ok(())
}

struct BatchOutcome {
    tallies: Vec<Tally>,
    stats: BatchStats,
}

fn count_lines(
    parser: &FormulaParser,
    lines: &[FormulaLine],
    keep_going: bool,
    progress: &Progress,
) -> Result<BatchOutcome> {
    let mut tallies = Vec::with_capacity(lines.len());
    let mut stats = BatchStats {
        formulas: lines.len(),
        ..BatchStats::default()
    };

    for entry in lines {
        match parser.parse(&entry.formula) {
            Ok(counts) => {
                stats.parsed += 1;
                tallies.push(Tally {
                    formula: entry.formula.clone(),
                    counts,
                });
            }
            Err(err) if keep_going => {
                stats.failed += 1;
                progress.suspend(|| print_line_failure(entry.line, &entry.formula, &err));
            }
            Err(err) => {
                return Err(Error::new(err).context(FormulaContext {
                    formula: entry.formula.clone(),
                    line: Some(entry.line),
                }));
            }
        }
        progress.tick();
    }

    stats.combined = tallies
        .iter()
        .flat_map(|tally| tally.counts.iter())
        .collect();

    Ok(BatchOutcome { tallies, stats })
}

fn display_name(path: Option<&Path>, fallback: &str) -> String {
    path.map(|p| {
        p.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    })
    .unwrap_or_else(|| fallback.to_string())
}

fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Lines => "lines",
        OutputFormat::Compact => "compact",
        OutputFormat::Toml => "TOML",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atom_tally::ParseError;

    fn lines(list: &[(usize, &str)]) -> Vec<FormulaLine> {
        list.iter()
            .map(|&(line, formula)| FormulaLine {
                line,
                formula: formula.to_string(),
            })
            .collect()
    }

    #[test]
    fn stops_at_first_failure_with_line_context() {
        let parser = FormulaParser::default();
        let input = lines(&[(1, "H2O"), (3, "Mg(OH"), (4, "NaCl")]);

        let result = count_lines(&parser, &input, false, &Progress::Silent);
        let err = match result {
            Ok(_) => panic!("expected failure"),
            Err(e) => e,
        };

        let context = err.downcast_ref::<FormulaContext>().unwrap();
        assert_eq!(context.line, Some(3));
        assert_eq!(err.to_string(), "Line 3: failed to parse 'Mg(OH'");
        assert_eq!(
            err.downcast_ref::<ParseError>(),
            Some(&ParseError::UnmatchedOpenGroup { position: 2 })
        );
    }

    #[test]
    fn keep_going_collects_successes_and_counts_failures() {
        let parser = FormulaParser::default();
        let input = lines(&[(1, "H2O"), (2, "H2$"), (3, "CO2"), (4, "(")]);

        let Ok(outcome) = count_lines(&parser, &input, true, &Progress::Silent) else {
            panic!("keep-going run should not fail");
        };

        assert_eq!(outcome.stats.formulas, 4);
        assert_eq!(outcome.stats.parsed, 2);
        assert_eq!(outcome.stats.failed, 2);
        let parsed: Vec<_> = outcome.tallies.iter().map(|t| t.formula.as_str()).collect();
        assert_eq!(parsed, vec!["H2O", "CO2"]);
    }

    #[test]
    fn combined_counts_sum_all_formulas() {
        let parser = FormulaParser::default();
        let input = lines(&[(1, "H2O"), (2, "CO2"), (3, "Mg(OH)2")]);

        let Ok(outcome) = count_lines(&parser, &input, false, &Progress::Silent) else {
            panic!("all formulas are valid");
        };

        let combined = &outcome.stats.combined;
        assert_eq!(combined.get("H"), Some(4));
        assert_eq!(combined.get("O"), Some(5));
        assert_eq!(combined.get("C"), Some(1));
        assert_eq!(combined.get("Mg"), Some(1));
        assert_eq!(combined.total_atoms(), 11);
    }

    #[test]
    fn display_name_uses_file_name_or_fallback() {
        assert_eq!(
            display_name(Some(Path::new("/data/salts.txt")), "stdin"),
            "salts.txt"
        );
        assert_eq!(display_name(None, "stdout"), "stdout");
    }
}
