//! Atom counting for chemical formulas written with nested, multiplied groups.
//!
//! Given a formula such as `K4(ON(SO3)2)2`, the parser totals every element
//! symbol across all nesting levels, applying each group's multiplier to
//! everything inside it.
//!
//! # Features
//!
//! - **Multi-letter symbols**: an uppercase letter followed by any lowercase
//!   letters (`Na`, `Mg`, `Uuo`)
//! - **Implicit counts**: a symbol or group without digits counts once
//! - **Nested groups**: parentheses nest to any depth up to a configurable limit
//! - **Precise errors**: every failure reports its kind and character offset
//!
//! Symbols are accepted by shape alone. There is no periodic table lookup,
//! no charge or isotope notation, and no hydrate dot.
//!
//! # Quick Start
//!
//! ```
//! use atom_tally::{parse, ParseError, ParseErrorKind};
//!
//! let counts = parse("K4(ON(SO3)2)2")?;
//!
//! assert_eq!(counts.get("K"), Some(4));
//! assert_eq!(counts.get("N"), Some(2));
//! assert_eq!(counts.get("O"), Some(14));
//! assert_eq!(counts.get("S"), Some(4));
//!
//! // Iteration is in ascending symbol order.
//! let lines: Vec<String> = counts.iter().map(|(el, n)| format!("{el}: {n}")).collect();
//! assert_eq!(lines, ["K: 4", "N: 2", "O: 14", "S: 4"]);
//!
//! // Compact form omits unit counts.
//! assert_eq!(counts.to_string(), "K4N2O14S4");
//!
//! let err = parse("H2$").unwrap_err();
//! assert_eq!(err.kind(), ParseErrorKind::InvalidCharacter);
//! assert_eq!(err.position(), 2);
//! # Ok::<(), ParseError>(())
//! ```
//!
//! # Configuration
//!
//! [`ParserConfig`] bounds the nesting depth, up to [`MAX_SUPPORTED_DEPTH`].
//! It can be built in code or read from TOML:
//!
//! ```
//! use atom_tally::{FormulaParser, ParserConfig};
//!
//! let config = ParserConfig::from_toml_str("max_depth = 2")?;
//! let parser = FormulaParser::new(config);
//!
//! assert!(parser.parse("((H2O))").is_ok());
//! assert!(parser.parse("(((H2O)))").is_err());
//! # Ok::<(), atom_tally::ConfigError>(())
//! ```
//!
//! # Errors
//!
//! - [`ParseError`] – what went wrong and where, see [`ParseErrorKind`]
//! - [`ConfigError`] – malformed or out-of-range configuration

mod model;
mod parser;

pub use model::counts::{AtomCounts, Iter};

pub use parser::{
    ConfigError, DEFAULT_MAX_DEPTH, FormulaParser, MAX_SUPPORTED_DEPTH, ParseError,
    ParseErrorKind, ParserConfig, parse, parse_with,
};
