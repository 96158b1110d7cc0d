mod config;
mod cursor;
mod error;

pub use config::{DEFAULT_MAX_DEPTH, MAX_SUPPORTED_DEPTH, ParserConfig};
pub use error::{ConfigError, ParseError, ParseErrorKind};

use crate::model::counts::AtomCounts;
use cursor::{Cursor, Source};

/// Recursive-descent evaluator for formulas such as `K4(ON(SO3)2)2`.
///
/// Every level of the descent, including the outermost, returns the counts
/// for the span it consumed together with the cursor where it stopped. A
/// level stops at end of input or at a `)` it did not open.
#[derive(Debug, Clone, Default)]
pub struct FormulaParser {
    config: ParserConfig,
}

impl FormulaParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Counts every element in `formula`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] describing the first problem found, with the
    /// character offset where it occurred. Empty input is
    /// [`ParseError::EmptyFormula`].
    pub fn parse(&self, formula: &str) -> Result<AtomCounts, ParseError> {
        if formula.is_empty() {
            return Err(ParseError::EmptyFormula);
        }

        let source = Source::new(formula);
        let (counts, end) = self.parse_sequence(&source, Cursor::START, 0)?;

        // A top-level sequence only stops early on a stray ')'.
        if !source.is_end(end) {
            return Err(ParseError::UnmatchedCloseGroup {
                position: end.position(),
            });
        }

        log::debug!(
            "parsed {formula:?}: {} elements, {} atoms",
            counts.len(),
            counts.total_atoms()
        );

        Ok(counts)
    }

    fn parse_sequence(
        &self,
        source: &Source,
        start: Cursor,
        depth: usize,
    ) -> Result<(AtomCounts, Cursor), ParseError> {
        let mut counts = AtomCounts::new();
        let mut cursor = start;

        while let Some(c) = source.peek(cursor) {
            match c {
                'A'..='Z' => {
                    let (symbol, after_symbol) = source.scan_symbol(cursor);
                    let (count, after_count) = source.scan_count(after_symbol, cursor)?;
                    counts
                        .checked_add(&symbol, count.value)
                        .map_err(|_| count.overflow())?;
                    cursor = after_count;
                }
                '(' => {
                    let (group, close) = self.parse_group(source, cursor, depth)?;
                    let (count, after_count) = source.scan_count(close.next(), close)?;
                    counts
                        .checked_merge_scaled(group, count.value)
                        .map_err(|_| count.overflow())?;
                    cursor = after_count;
                }
                ')' => return Ok((counts, cursor)),
                other => {
                    return Err(ParseError::invalid_character(other, cursor.position()));
                }
            }
        }

        Ok((counts, cursor))
    }

    /// Parses the group opened at `open` and returns the cursor at its `)`.
    fn parse_group(
        &self,
        source: &Source,
        open: Cursor,
        depth: usize,
    ) -> Result<(AtomCounts, Cursor), ParseError> {
        let depth = depth + 1;
        let limit = self.config.depth_limit();
        if depth > limit {
            return Err(ParseError::nesting_too_deep(open.position(), limit));
        }

        log::trace!("enter group at {} (depth {depth})", open.position());
        let (inner, close) = self.parse_sequence(source, open.next(), depth)?;

        if source.is_end(close) {
            return Err(ParseError::UnmatchedOpenGroup {
                position: open.position(),
            });
        }
        log::trace!("leave group at {} (depth {depth})", close.position());

        Ok((inner, close))
    }
}

/// Counts every element in `formula` using the default configuration.
///
/// ```
/// let counts = atom_tally::parse("Mg(OH)2")?;
/// assert_eq!(counts.get("Mg"), Some(1));
/// assert_eq!(counts.get("O"), Some(2));
/// assert_eq!(counts.get("H"), Some(2));
/// # Ok::<(), atom_tally::ParseError>(())
/// ```
pub fn parse(formula: &str) -> Result<AtomCounts, ParseError> {
    FormulaParser::default().parse(formula)
}

/// Counts every element in `formula` under `config`.
pub fn parse_with(formula: &str, config: &ParserConfig) -> Result<AtomCounts, ParseError> {
    FormulaParser::new(config.clone()).parse(formula)
}
