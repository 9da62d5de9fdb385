//! Textual handling of A1-style references inside formulas
//!
//! Formulas are never evaluated. Two things are needed from their text:
//! which cells they point at (for highlighting precedents) and how a shared
//! formula reads when copied to another cell.

use crate::cell::{CellAddress, CellRange};
use once_cell::sync::Lazy;
use regex::Regex;

static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\$?[A-Z]{1,3}\$?[0-9]+)(?::(\$?[A-Z]{1,3}\$?[0-9]+))?")
        .expect("reference regex must compile")
});

/// A cell or range reference found in formula text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaReference {
    /// Text as written, e.g. `$A$1:B3`
    pub text: String,
    /// Byte span of `text` in the formula
    pub span: (usize, usize),
    /// Covered rectangle, 0-based
    pub range: CellRange,
}

impl FormulaReference {
    /// Covered cells clipped to a grid of `rows` x `cols`
    pub fn cells_within(&self, rows: u32, cols: u16) -> impl Iterator<Item = (u32, u16)> + '_ {
        self.range
            .cells()
            .take_while(move |&(r, _)| r < rows)
            .filter(move |&(_, c)| c < cols)
    }
}

/// Replace the contents of `"..."` string literals and `'...'` sheet names
/// with spaces, keeping byte offsets and the delimiters.
fn blank_literals(formula: &str) -> String {
    let mut out = String::with_capacity(formula.len());
    let mut open: Option<char> = None;
    for ch in formula.chars() {
        match open {
            Some(quote) if ch == quote => {
                open = None;
                out.push(ch);
            }
            Some(_) => out.extend(std::iter::repeat(' ').take(ch.len_utf8())),
            None => {
                if matches!(ch, '"' | '\'') {
                    open = Some(ch);
                }
                out.push(ch);
            }
        }
    }
    out
}

/// Whether references behind a `Sheet!` qualifier are matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Qualified {
    Skip,
    Keep,
}

/// Matches that are whole references: not part of a longer name and not a
/// function call like `LOG10(`. The sheet qualifier itself is never part of
/// the match.
fn reference_matches(formula: &str, qualified: Qualified) -> Vec<regex::Captures<'_>> {
    REFERENCE_RE
        .captures_iter(formula)
        .filter(|caps| {
            let whole = &caps[0];
            let start = caps.get(0).map_or(0, |m| m.start());
            let before = formula[..start].chars().next_back();
            let after = formula[start + whole.len()..].chars().next();
            let bounded_before = match before {
                Some('!') => qualified == Qualified::Keep,
                Some(c) => !(c.is_alphanumeric() || matches!(c, '_' | '.' | '\'' | '$')),
                None => true,
            };
            let bounded_after = !matches!(after, Some(c) if c.is_alphanumeric() || matches!(c, '_' | '(' | '!'));
            bounded_before && bounded_after
        })
        .collect()
}

/// Every in-sheet reference in a formula, in order of appearance.
///
/// ```
/// use sheetdiff_core::formula_references;
///
/// let refs = formula_references("=SUM(A1:B2)+$C$3&\"D4\"");
/// let texts: Vec<_> = refs.iter().map(|r| r.text.as_str()).collect();
/// assert_eq!(texts, ["A1:B2", "$C$3"]);
/// ```
pub fn formula_references(formula: &str) -> Vec<FormulaReference> {
    let scrubbed = blank_literals(formula);
    reference_matches(&scrubbed, Qualified::Skip)
        .into_iter()
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let range = CellRange::parse(whole.as_str()).ok()?;
            Some(FormulaReference {
                text: whole.as_str().to_string(),
                span: (whole.start(), whole.end()),
                range,
            })
        })
        .collect()
}

fn shift(addr: CellAddress, d_row: i64, d_col: i64) -> Option<CellAddress> {
    let row = if addr.row_absolute { addr.row as i64 } else { addr.row as i64 + d_row };
    let col = if addr.col_absolute { addr.col as i64 } else { addr.col as i64 + d_col };
    if row < 0 || col < 0 || row >= crate::MAX_ROWS as i64 || col >= crate::MAX_COLS as i64 {
        return None;
    }
    Some(CellAddress {
        row: row as u32,
        col: col as u16,
        ..addr
    })
}

/// Rewrite a formula as if copied `d_row` rows down and `d_col` columns right.
///
/// `$`-anchored parts stay put; a reference pushed off the sheet becomes `#REF!`.
/// References into other sheets move too, keeping their `Sheet!` prefix.
pub fn translate_formula(formula: &str, d_row: i64, d_col: i64) -> String {
    if d_row == 0 && d_col == 0 {
        return formula.to_string();
    }

    let scrubbed = blank_literals(formula);
    let mut out = String::with_capacity(formula.len() + 8);
    let mut last = 0;
    for caps in reference_matches(&scrubbed, Qualified::Keep) {
        let Some(whole) = caps.get(0) else { continue };
        let shifted: Option<Vec<CellAddress>> = [caps.get(1), caps.get(2)]
            .into_iter()
            .flatten()
            .map(|part| CellAddress::parse(part.as_str()).ok().and_then(|a| shift(a, d_row, d_col)))
            .collect();

        out.push_str(&formula[last..whole.start()]);
        match shifted.as_deref() {
            Some([a]) => out.push_str(&a.to_string()),
            Some([a, b]) => {
                out.push_str(&a.to_string());
                out.push(':');
                out.push_str(&b.to_string());
            }
            _ => out.push_str("#REF!"),
        }
        last = whole.end();
    }
    out.push_str(&formula[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(formula: &str) -> Vec<String> {
        formula_references(formula).into_iter().map(|r| r.text).collect()
    }

    #[test]
    fn finds_cells_and_ranges() {
        assert_eq!(texts("=A1+B$2*SUM($C3:D10)"), ["A1", "B$2", "$C3:D10"]);
        let refs = formula_references("=AVERAGE(B2:C3)");
        assert_eq!(refs[0].range, CellRange::from_indices(1, 1, 2, 2));
        assert_eq!(refs[0].span, (9, 14));
    }

    #[test]
    fn skips_strings_functions_and_other_sheets() {
        assert!(texts("=\"A1 is \"&\"B2\"").is_empty());
        assert_eq!(texts("=LOG10(A2)"), ["A2"]);
        assert_eq!(texts("=Sheet2!A1+A2"), ["A2"]);
        assert_eq!(texts("='My Sheet'!B3+C4"), ["C4"]);
        assert!(texts("=my_name1+TAX2024x").is_empty());
    }

    #[test]
    fn non_ascii_strings_keep_offsets() {
        let refs = formula_references("=\"€€\"&A1");
        assert_eq!(refs[0].text, "A1");
        assert_eq!(&"=\"€€\"&A1"[refs[0].span.0..refs[0].span.1], "A1");
    }

    #[test]
    fn cells_are_clipped_to_grid() {
        let refs = formula_references("=SUM(B2:D5)");
        let cells: Vec<_> = refs[0].cells_within(3, 3).collect();
        assert_eq!(cells, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn translation_moves_relative_parts() {
        assert_eq!(translate_formula("=A1*2", 1, 0), "=A2*2");
        assert_eq!(translate_formula("=SUM($A1:B$1)", 2, 1), "=SUM($A3:C$1)");
        assert_eq!(translate_formula("=$A$1+\"A1\"", 5, 5), "=$A$1+\"A1\"");
        assert_eq!(translate_formula("=A1", -1, 0), "=#REF!");
        assert_eq!(translate_formula("=B2", 0, 0), "=B2");
    }

    #[test]
    fn translation_moves_other_sheet_references() {
        assert_eq!(translate_formula("=Data!B1*2", 1, 0), "=Data!B2*2");
        assert_eq!(
            translate_formula("='Q1 Data'!A1:B1+C1", 1, 1),
            "='Q1 Data'!B2:C2+D2"
        );
        // cell-like text inside a quoted sheet name is not a reference
        assert_eq!(translate_formula("='Plan A1'!$C$3+A1", 2, 0), "='Plan A1'!$C$3+A3");
        assert_eq!(translate_formula("=SUM(Data!A1:A3)", 0, 2), "=SUM(Data!C1:C3)");
    }

    #[test]
    fn other_sheet_names_are_not_references() {
        assert_eq!(texts("='Plan A1'!B2+C3"), ["C3"]);
        assert_eq!(texts("=AB1!A1"), Vec::<String>::new());
    }
}
