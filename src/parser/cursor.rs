use super::error::ParseError;

/// Character offset into a [`Source`]. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Cursor(usize);

impl Cursor {
    pub const START: Cursor = Cursor(0);

    #[inline]
    pub fn position(self) -> usize {
        self.0
    }

    #[inline]
    pub fn next(self) -> Cursor {
        Cursor(self.0 + 1)
    }
}

/// A count read after a symbol or a closing parenthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Count {
    pub value: u64,
    /// Where the digits start. An implicit count points at the symbol or
    /// `)` it belongs to.
    pub at: Cursor,
}

impl Count {
    pub fn overflow(&self) -> ParseError {
        ParseError::CountOverflow {
            position: self.at.position(),
        }
    }
}

pub(crate) struct Source {
    chars: Vec<char>,
}

impl Source {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    #[inline]
    pub fn peek(&self, at: Cursor) -> Option<char> {
        self.chars.get(at.0).copied()
    }

    #[inline]
    pub fn is_end(&self, at: Cursor) -> bool {
        at.0 >= self.chars.len()
    }

    /// Reads an element symbol: the character at `at` plus any lowercase
    /// letters after it. The caller has already checked for the capital.
    pub fn scan_symbol(&self, at: Cursor) -> (String, Cursor) {
        let end = self.skip_while(at.next(), |c| c.is_ascii_lowercase());
        let symbol = self.chars[at.0..end.0].iter().collect();
        (symbol, end)
    }

    /// Reads an optional run of decimal digits. No digits means a count of 1
    /// located at `owner`, the term the count applies to.
    pub fn scan_count(&self, at: Cursor, owner: Cursor) -> Result<(Count, Cursor), ParseError> {
        let end = self.skip_while(at, |c| c.is_ascii_digit());
        if end == at {
            return Ok((Count { value: 1, at: owner }, end));
        }

        let mut value: u64 = 0;
        for &c in &self.chars[at.0..end.0] {
            let digit = u64::from(c as u8 - b'0');
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .ok_or(ParseError::CountOverflow {
                    position: at.position(),
                })?;
        }

        if value == 0 {
            return Err(ParseError::ZeroCount {
                position: at.position(),
            });
        }

        Ok((Count { value, at }, end))
    }

    fn skip_while(&self, from: Cursor, pred: impl Fn(char) -> bool) -> Cursor {
        let mut cursor = from;
        while let Some(c) = self.peek(cursor) {
            if !pred(c) {
                break;
            }
            cursor = cursor.next();
        }
        cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(n: usize) -> Cursor {
        Cursor(n)
    }

    #[test]
    fn symbol_takes_trailing_lowercase() {
        let src = Source::new("Mg(OH)2");
        let (symbol, end) = src.scan_symbol(at(0));
        assert_eq!(symbol, "Mg");
        assert_eq!(end, at(2));
    }

    #[test]
    fn symbol_stops_at_next_capital() {
        let src = Source::new("NaCl");
        let (symbol, end) = src.scan_symbol(at(0));
        assert_eq!(symbol, "Na");
        assert_eq!(end, at(2));
    }

    #[test]
    fn missing_count_defaults_to_one() {
        let src = Source::new("Na");
        let (count, end) = src.scan_count(at(2), at(0)).unwrap();
        assert_eq!(count.value, 1);
        assert_eq!(count.at, at(0));
        assert_eq!(end, at(2));
    }

    #[test]
    fn reads_multi_digit_count() {
        let src = Source::new("H12O");
        let (count, end) = src.scan_count(at(1), at(0)).unwrap();
        assert_eq!(count.value, 12);
        assert_eq!(count.at, at(1));
        assert_eq!(end, at(3));
    }

    #[test]
    fn leading_zero_is_read_as_decimal() {
        let src = Source::new("C05");
        let (count, _) = src.scan_count(at(1), at(0)).unwrap();
        assert_eq!(count.value, 5);
    }

    #[test]
    fn zero_count_is_rejected() {
        let src = Source::new("H00");
        let err = src.scan_count(at(1), at(0)).unwrap_err();
        assert_eq!(err, ParseError::ZeroCount { position: 1 });
    }

    #[test]
    fn oversized_count_overflows() {
        let src = Source::new("H18446744073709551616");
        let err = src.scan_count(at(1), at(0)).unwrap_err();
        assert_eq!(err, ParseError::CountOverflow { position: 1 });
    }

    #[test]
    fn max_count_fits() {
        let src = Source::new("H18446744073709551615");
        let (count, _) = src.scan_count(at(1), at(0)).unwrap();
        assert_eq!(count.value, u64::MAX);
    }

    #[test]
    fn peek_and_end_use_character_offsets() {
        let src = Source::new("é(");
        assert_eq!(src.peek(at(0)), Some('é'));
        assert_eq!(src.peek(at(1)), Some('('));
        assert!(src.is_end(at(2)));
    }
}
