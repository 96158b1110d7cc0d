use std::fmt;
use std::io::{self, Write};

use anyhow::Error;
use atom_tally::{ConfigError, ParseError};

use crate::util::text::{caret_window, wrap};

/// Context attached to a parse failure so the report can show the formula.
#[derive(Debug, Clone)]
pub struct FormulaContext {
    pub formula: String,
    /// Input line, for formulas read in batch mode.
    pub line: Option<usize>,
}

impl fmt::Display for FormulaContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Line {}: failed to parse '{}'", line, self.formula),
            None => write!(f, "Failed to parse '{}'", self.formula),
        }
    }
}

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some((window, caret)) = locate(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║    {:<57} ║", window);
        let _ = writeln!(stderr, "   ║    {:<57} ║", caret);
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

/// One-line report for a batch line that failed under `--keep-going`.
pub fn print_line_failure(line: usize, formula: &str, err: &ParseError) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "  ✗ line {}: {} ({})", line, err, formula);
}

/// Formula excerpt and caret under the failing position, when the error
/// carries both.
fn locate(err: &Error) -> Option<(String, String)> {
    let context = err.downcast_ref::<FormulaContext>()?;
    let parse_err = err.downcast_ref::<ParseError>()?;
    if matches!(parse_err, ParseError::EmptyFormula) {
        return None;
    }
    Some(caret_window(&context.formula, parse_err.position(), 57))
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_parse_hints(err);
        collector.collect_config_hints(err);
        collector.collect_io_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_parse_hints(&mut self, err: &Error) {
        let Some(parse_err) = err.downcast_ref::<ParseError>() else {
            return;
        };

        self.mark_typed();

        match parse_err {
            ParseError::EmptyFormula => {
                self.add("The formula is empty");
                self.add("Pass at least one element symbol, e.g. 'H2O'");
            }

            ParseError::UnmatchedOpenGroup { .. } => {
                self.add("This '(' is never closed");
                self.add("Add the matching ')' after the group's contents");
            }

            ParseError::UnmatchedCloseGroup { .. } => {
                self.add("This ')' has no matching '(' before it");
                self.add("Remove it or add the opening '(' where the group starts");
            }

            ParseError::InvalidCharacter { character, .. } => {
                self.collect_character_hints(*character);
            }

            ParseError::ZeroCount { .. } => {
                self.add("Counts must be at least 1");
                self.add("Omit the count entirely to mean exactly one");
            }

            ParseError::CountOverflow { .. } => {
                self.add("A count or a product of nested multipliers exceeds 64 bits");
                self.add("Check for a mistyped multiplier with too many digits");
            }

            ParseError::NestingTooDeep { limit, .. } => {
                self.add(format!("Groups may nest at most {} levels deep", limit));
                self.add("Raise the limit with --max-depth or [parser] max_depth");
            }
        }
    }

    fn collect_character_hints(&mut self, character: char) {
        if character.is_ascii_digit() {
            self.add("A count must follow an element symbol or a ')'");
        } else if character.is_ascii_lowercase() {
            self.add("Element symbols start with an uppercase letter");
            self.add("Lowercase letters may only follow that capital, as in 'Na'");
        } else if character.is_whitespace() {
            self.add("Whitespace is not allowed inside a formula");
            self.add("Quote the formula or remove the spaces");
        } else if matches!(character, '[' | ']' | '{' | '}') {
            self.add("Only parentheses '(' and ')' can form groups");
        } else if matches!(character, '+' | '-' | '.' | '·' | '*') {
            self.add("Charges and hydrate notation are not supported");
        } else {
            self.add("Formulas may contain only letters, digits, '(' and ')'");
        }
    }

    fn collect_config_hints(&mut self, err: &Error) {
        let Some(config_err) = err.downcast_ref::<ConfigError>() else {
            return;
        };

        self.mark_typed();

        match config_err {
            ConfigError::Parse(_) => {
                self.add("The settings file is not valid TOML for tally");
                self.add("Allowed tables: [parser] with max_depth, [output] with format");
            }

            ConfigError::InvalidValue { field, .. } => {
                self.add(format!("Check the value given for '{}'", field));
                if *field == "max_depth" {
                    self.add(format!(
                        "max_depth must be between 1 and {}",
                        atom_tally::MAX_SUPPORTED_DEPTH
                    ));
                }
            }
        }
    }

    fn collect_io_hints(&mut self, err: &Error) {
        use std::io::ErrorKind;

        let Some(source) = err.downcast_ref::<std::io::Error>() else {
            return;
        };

        self.mark_typed();

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("Input is not valid UTF-8 text");
                self.add("Formulas files must be plain text, one formula per line");
            }

            ErrorKind::BrokenPipe => {
                self.add("Broken pipe: output consumer terminated");
                self.add("This may occur when piping to commands like `head`");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("terminal") || msg.contains("stdin") {
            self.add("Input appears to be from a terminal");
            self.add("Provide input via -i/--input or pipe formulas to stdin");
            return;
        }

        if msg.contains("failed to parse") {
            self.add("Fix the lines listed above, or drop --keep-going to see details");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}
