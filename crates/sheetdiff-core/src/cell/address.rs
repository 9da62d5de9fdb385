//! A1-style cell addresses and ranges

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "$B$2"), 0-based internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, ..., XFD=16383)
    pub col: u16,
    /// Whether the row reference is absolute ($)
    pub row_absolute: bool,
    /// Whether the column reference is absolute ($)
    pub col_absolute: bool,
}

impl CellAddress {
    /// Create a relative cell address
    pub fn new(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: false,
            col_absolute: false,
        }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// ```
    /// use sheetdiff_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("$B$2").unwrap();
    /// assert_eq!((addr.row, addr.col), (1, 1));
    /// assert!(addr.row_absolute && addr.col_absolute);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (col_absolute, rest) = match s.strip_prefix('$') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let letters_end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        if letters_end == 0 {
            return Err(Error::InvalidAddress(format!("no column letters in '{}'", s)));
        }
        let col = Self::letters_to_column(&rest[..letters_end])?;

        let (row_absolute, digits) = match rest[letters_end..].strip_prefix('$') {
            Some(digits) => (true, digits),
            None => (false, &rest[letters_end..]),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!("invalid row number in '{}'", s)));
        }

        let row: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;
        if row == 0 {
            return Err(Error::InvalidAddress(format!("row number must be >= 1 in '{}'", s)));
        }
        if row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row - 1, MAX_ROWS - 1));
        }

        Ok(Self {
            row: row - 1,
            col,
            row_absolute,
            col_absolute,
        })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut letters = Vec::with_capacity(3);
        let mut n = col as u32 + 1;
        while n > 0 {
            n -= 1;
            letters.push(b'A' + (n % 26) as u8);
            n /= 26;
        }
        letters.reverse();
        String::from_utf8_lossy(&letters).into_owned()
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!("invalid column letter '{}'", c)));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            if col > MAX_COLS as u32 {
                return Err(Error::ColumnOutOfBounds(u16::MAX, MAX_COLS - 1));
            }
        }

        Ok((col - 1) as u16)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.col_absolute {
            f.write_str("$")?;
        }
        f.write_str(&Self::column_to_letters(self.col))?;
        if self.row_absolute {
            f.write_str("$")?;
        }
        write!(f, "{}", self.row + 1)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// An inclusive rectangle of cells, normalized so `start` is top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Top-left corner
    pub start: CellAddress,
    /// Bottom-right corner
    pub end: CellAddress,
}

impl CellRange {
    /// Create a range from two corners in any order
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        let mut start = a;
        let mut end = b;
        if start.row > end.row {
            std::mem::swap(&mut start.row, &mut end.row);
            std::mem::swap(&mut start.row_absolute, &mut end.row_absolute);
        }
        if start.col > end.col {
            std::mem::swap(&mut start.col, &mut end.col);
            std::mem::swap(&mut start.col_absolute, &mut end.col_absolute);
        }
        Self { start, end }
    }

    /// Create a range from inclusive row/column bounds
    pub fn from_indices(top: u32, left: u16, bottom: u32, right: u16) -> Self {
        Self::new(CellAddress::new(top, left), CellAddress::new(bottom, right))
    }

    /// Parse "A1:B10" or a single "C3"
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let range = match s.split_once(':') {
            Some((a, b)) => Self::new(CellAddress::parse(a)?, CellAddress::parse(b)?),
            None => {
                let addr = CellAddress::parse(s)?;
                Self::new(addr, addr)
            }
        };
        Ok(range)
    }

    /// Check if a cell is within this range
    pub fn contains(&self, row: u32, col: u16) -> bool {
        (self.start.row..=self.end.row).contains(&row)
            && (self.start.col..=self.end.col).contains(&col)
    }

    /// Number of rows covered
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns covered
    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// Iterate (row, col) pairs row by row
    pub fn cells(&self) -> impl Iterator<Item = (u32, u16)> {
        let (left, right) = (self.start.col, self.end.col);
        (self.start.row..=self.end.row).flat_map(move |r| (left..=right).map(move |c| (r, c)))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        for (col, letters) in [(0, "A"), (25, "Z"), (26, "AA"), (701, "ZZ"), (702, "AAA"), (16383, "XFD")] {
            assert_eq!(CellAddress::column_to_letters(col), letters);
            assert_eq!(CellAddress::letters_to_column(letters).unwrap(), col);
        }
        assert_eq!(CellAddress::letters_to_column("ab").unwrap(), 27);
    }

    #[test]
    fn test_cell_address_parse() {
        let addr = CellAddress::parse("B2").unwrap();
        assert_eq!((addr.row, addr.col), (1, 1));
        assert!(!addr.row_absolute && !addr.col_absolute);

        let addr = CellAddress::parse("$A1").unwrap();
        assert!(addr.col_absolute && !addr.row_absolute);

        let addr = CellAddress::parse("A$1").unwrap();
        assert!(!addr.col_absolute && addr.row_absolute);

        let addr = CellAddress::parse("XFD1048576").unwrap();
        assert_eq!((addr.row, addr.col), (1_048_575, 16_383));
    }

    #[test]
    fn test_cell_address_parse_errors() {
        for bad in ["", "A", "1", "A0", "A1048577", "XFE1", "A1B", "$$A1"] {
            assert!(CellAddress::parse(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["A1", "$C$100", "AA$7", "$XFD1"] {
            assert_eq!(CellAddress::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_cell_range() {
        let range = CellRange::parse("D4:B2").unwrap();
        assert_eq!(range.to_string(), "B2:D4");
        assert_eq!((range.row_count(), range.col_count()), (3, 3));
        assert!(range.contains(2, 2));
        assert!(!range.contains(0, 0));

        let single = CellRange::parse("C3").unwrap();
        assert_eq!(single.cells().collect::<Vec<_>>(), vec![(2, 2)]);

        let cells: Vec<_> = CellRange::parse("A1:B2").unwrap().cells().collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }
}
