//! Error types for formula parsing and parser configuration.
//!
//! Every [`ParseError`] except [`ParseError::EmptyFormula`] carries the
//! character offset at which parsing stopped, so a caller can point at the
//! exact spot in the input.

use thiserror::Error;

/// Errors that can occur while evaluating a formula.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input contains no characters at all.
    #[error("formula is empty")]
    EmptyFormula,

    /// A `(` is never closed before the end of input.
    #[error("unmatched '(' at position {position}")]
    UnmatchedOpenGroup {
        /// Offset of the opening parenthesis.
        position: usize,
    },

    /// A `)` appears with no enclosing group.
    #[error("unmatched ')' at position {position}")]
    UnmatchedCloseGroup {
        /// Offset of the closing parenthesis.
        position: usize,
    },

    /// A character that cannot start or continue any term.
    ///
    /// Covers symbols outside `[A-Za-z0-9()]`, lowercase letters that do not
    /// follow an element's leading capital, and digits with nothing to count.
    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Offset of the character.
        position: usize,
    },

    /// A count whose digits evaluate to zero, such as `H0` or `(OH)00`.
    #[error("count at position {position} is zero")]
    ZeroCount {
        /// Offset of the first digit.
        position: usize,
    },

    /// A count, or a quantity scaled by it, does not fit in 64 bits.
    #[error("count at position {position} overflows")]
    CountOverflow {
        /// Offset of the first digit of the count being applied, or of the
        /// symbol or `)` it follows when the count is implicit.
        position: usize,
    },

    /// Opening the group at `position` would exceed the nesting limit.
    #[error("group at position {position} exceeds the nesting limit of {limit}")]
    NestingTooDeep {
        /// Offset of the opening parenthesis.
        position: usize,
        /// The maximum depth in effect.
        limit: usize,
    },
}

/// Discriminant of a [`ParseError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// See [`ParseError::EmptyFormula`].
    EmptyFormula,
    /// See [`ParseError::UnmatchedOpenGroup`].
    UnmatchedOpenGroup,
    /// See [`ParseError::UnmatchedCloseGroup`].
    UnmatchedCloseGroup,
    /// See [`ParseError::InvalidCharacter`].
    InvalidCharacter,
    /// See [`ParseError::ZeroCount`].
    ZeroCount,
    /// See [`ParseError::CountOverflow`].
    CountOverflow,
    /// See [`ParseError::NestingTooDeep`].
    NestingTooDeep,
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::EmptyFormula => ParseErrorKind::EmptyFormula,
            ParseError::UnmatchedOpenGroup { .. } => ParseErrorKind::UnmatchedOpenGroup,
            ParseError::UnmatchedCloseGroup { .. } => ParseErrorKind::UnmatchedCloseGroup,
            ParseError::InvalidCharacter { .. } => ParseErrorKind::InvalidCharacter,
            ParseError::ZeroCount { .. } => ParseErrorKind::ZeroCount,
            ParseError::CountOverflow { .. } => ParseErrorKind::CountOverflow,
            ParseError::NestingTooDeep { .. } => ParseErrorKind::NestingTooDeep,
        }
    }

    /// Character offset of the error. An empty formula reports 0.
    pub fn position(&self) -> usize {
        match self {
            ParseError::EmptyFormula => 0,
            ParseError::UnmatchedOpenGroup { position }
            | ParseError::UnmatchedCloseGroup { position }
            | ParseError::InvalidCharacter { position, .. }
            | ParseError::ZeroCount { position }
            | ParseError::CountOverflow { position }
            | ParseError::NestingTooDeep { position, .. } => *position,
        }
    }

    pub(crate) fn invalid_character(character: char, position: usize) -> Self {
        Self::InvalidCharacter {
            character,
            position,
        }
    }

    pub(crate) fn nesting_too_deep(position: usize, limit: usize) -> Self {
        Self::NestingTooDeep { position, limit }
    }
}

/// Errors raised while loading or validating a [`ParserConfig`](super::ParserConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text is not valid TOML for the expected layout.
    #[error("failed to parse parser configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value the parser cannot work with.
    #[error("invalid value for '{field}': {detail}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the problem.
        detail: String,
    },
}

impl ConfigError {
    /// Creates an [`InvalidValue`](ConfigError::InvalidValue) error.
    pub fn invalid_value(field: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_include_position() {
        let err = ParseError::invalid_character('$', 2);
        assert_eq!(err.to_string(), "invalid character '$' at position 2");

        let err = ParseError::UnmatchedOpenGroup { position: 0 };
        assert_eq!(err.to_string(), "unmatched '(' at position 0");

        let err = ParseError::nesting_too_deep(9, 8);
        assert_eq!(
            err.to_string(),
            "group at position 9 exceeds the nesting limit of 8"
        );
    }

    #[test]
    fn kind_and_position_accessors() {
        let err = ParseError::ZeroCount { position: 4 };
        assert_eq!(err.kind(), ParseErrorKind::ZeroCount);
        assert_eq!(err.position(), 4);

        assert_eq!(ParseError::EmptyFormula.kind(), ParseErrorKind::EmptyFormula);
        assert_eq!(ParseError::EmptyFormula.position(), 0);
    }

    #[test]
    fn config_invalid_value_message() {
        let err = ConfigError::invalid_value("max_depth", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid value for 'max_depth': must be at least 1"
        );
    }
}
