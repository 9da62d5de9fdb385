//! Cell display formatting
//!
//! Numbers are shown in their natural form until the user asks for more or
//! fewer decimals on a cell. Once a non-zero override is set, the cell's
//! number format decides grouping, percent scaling and the text around the
//! digits, and the override shifts the format's own decimal count.

use std::collections::BTreeMap;

use sheetdiff_core::{is_date_format, parse_number_format, CellRange, CellValue, StyleRecord};

/// Render a cell value for display.
///
/// ```
/// use sheetdiff::{format_cell, CellValue, StyleRecord};
///
/// let style = StyleRecord::new().number_format("#,##0.0");
/// assert_eq!(format_cell(&CellValue::Number(1234.5), &style, 1), "1,234.50");
/// assert_eq!(format_cell(&CellValue::Number(1234.5), &style, 0), "1234.5");
/// ```
pub fn format_cell(value: &CellValue, style: &StyleRecord, decimal_override: i32) -> String {
    let number = match value {
        CellValue::Number(n) if decimal_override != 0 => *n,
        _ => return value.to_natural_string(),
    };

    let code = style.number_format.as_deref();
    if code.map_or(false, is_date_format) {
        return value.to_natural_string();
    }
    let info = code.and_then(parse_number_format).unwrap_or_default();

    let decimals = (i64::from(info.decimals) + i64::from(decimal_override)).max(0) as usize;
    let mut suffix = info.suffix;
    let number = if info.percent {
        if !suffix.contains('%') {
            suffix.push('%');
        }
        number * 100.0
    } else {
        number
    };

    let mut digits = format!("{:.*}", decimals, number);
    if info.grouping {
        digits = group_thousands(&digits);
    }
    format!("{}{}{}", info.prefix, digits, suffix)
}

/// Insert `,` every three digits of the integer part.
fn group_thousands(digits: &str) -> String {
    let (sign, unsigned) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let (int_part, frac_part) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3);
    out.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push_str(frac_part);
    out
}

/// Per-cell decimal adjustments chosen by the user.
///
/// Only non-zero adjustments are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecimalOverrides {
    cells: BTreeMap<(u32, u16), i32>,
}

impl DecimalOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` to every cell of every range.
    pub fn adjust(&mut self, ranges: &[CellRange], delta: i32) {
        for range in ranges {
            for cell in range.cells() {
                let next = self.get(cell.0, cell.1).saturating_add(delta);
                if next == 0 {
                    self.cells.remove(&cell);
                } else {
                    self.cells.insert(cell, next);
                }
            }
        }
    }

    /// Override for a cell, 0 when none
    pub fn get(&self, row: u32, col: u16) -> i32 {
        self.cells.get(&(row, col)).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Non-zero overrides in row-major order
    pub fn iter(&self) -> impl Iterator<Item = ((u32, u16), i32)> + '_ {
        self.cells.iter().map(|(&k, &v)| (k, v))
    }
}
