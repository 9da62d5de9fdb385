//! Cell value type

use std::fmt;

/// The value a grid cell holds after loading.
///
/// Error cells from the workbook arrive as [`CellValue::Text`] carrying the
/// error literal (`#DIV/0!`), since they compare and render as text.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// No value
    #[default]
    Empty,

    /// String value
    Text(String),

    /// Numeric value (dates are serial numbers)
    Number(f64),

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),
}

impl CellValue {
    /// Create a text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Create a numeric value, collapsing NaN to [`CellValue::Empty`]
    pub fn number(n: f64) -> Self {
        if n.is_nan() {
            CellValue::Empty
        } else {
            CellValue::Number(n)
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Get the value as a number, if it is one.
    ///
    /// Booleans are not numbers here: `TRUE` and `1` are different content.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the value as a string slice, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Natural string form: `""` for empty, `TRUE`/`FALSE` for booleans,
    /// the shortest round-tripping decimal for numbers.
    pub fn to_natural_string(&self) -> String {
        self.to_string()
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Text(_) => "text",
            CellValue::Number(_) => "number",
            CellValue::Boolean(_) => "boolean",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Boolean(true) => f.write_str("TRUE"),
            CellValue::Boolean(false) => f.write_str("FALSE"),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_strings() {
        assert_eq!(CellValue::Empty.to_natural_string(), "");
        assert_eq!(CellValue::Number(42.0).to_natural_string(), "42");
        assert_eq!(CellValue::Number(1234.5).to_natural_string(), "1234.5");
        assert_eq!(CellValue::Boolean(true).to_natural_string(), "TRUE");
        assert_eq!(CellValue::text("#N/A").to_natural_string(), "#N/A");
    }

    #[test]
    fn nan_collapses_to_empty() {
        assert_eq!(CellValue::from(f64::NAN), CellValue::Empty);
        assert_eq!(CellValue::from(2.0_f64), CellValue::Number(2.0));
    }

    #[test]
    fn booleans_are_not_numbers() {
        assert_eq!(CellValue::Boolean(true).as_number(), None);
        assert_eq!(CellValue::Number(1.0).as_number(), Some(1.0));
    }
}
