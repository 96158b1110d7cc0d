use std::io::BufRead;

use anyhow::{Context, Result};

/// A formula taken from one line of batch input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaLine {
    /// 1-based line number in the input.
    pub line: usize,
    pub formula: String,
}

/// Collects the formulas in `reader`, one per line.
///
/// Surrounding whitespace is trimmed. Blank lines and lines starting with
/// `#` are skipped but still advance the line number.
pub fn read_formula_lines<R: BufRead>(reader: R) -> Result<Vec<FormulaLine>> {
    let mut formulas = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let ln = i + 1;
        let content = line.with_context(|| format!("Failed to read input line {ln}"))?;
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        formulas.push(FormulaLine {
            line: ln,
            formula: trimmed.to_string(),
        });
    }
    Ok(formulas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn skips_blank_and_comment_lines() {
        let input = "# salts\nNaCl\n\n  Mg(OH)2  \n\t\n# end\nK4(ON(SO3)2)2\n";
        let lines = read_formula_lines(Cursor::new(input)).unwrap();
        assert_eq!(
            lines,
            vec![
                FormulaLine {
                    line: 2,
                    formula: "NaCl".to_string()
                },
                FormulaLine {
                    line: 4,
                    formula: "Mg(OH)2".to_string()
                },
                FormulaLine {
                    line: 7,
                    formula: "K4(ON(SO3)2)2".to_string()
                },
            ]
        );
    }

    #[test]
    fn handles_crlf_and_missing_final_newline() {
        let input = "H2O\r\nCO2";
        let lines = read_formula_lines(Cursor::new(input)).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].formula, "H2O");
        assert_eq!(lines[1].formula, "CO2");
        assert_eq!(lines[1].line, 2);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let lines = read_formula_lines(Cursor::new("")).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let input: &[u8] = b"H2O\n\xff\xfe\n";
        let err = read_formula_lines(Cursor::new(input)).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
