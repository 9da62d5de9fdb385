//! Per-cell presentation metadata
//!
//! - [`StyleRecord`] - everything the comparison looks at for one cell
//! - [`StyleTable`] - deduplicated records referenced by [`StyleId`]
//! - [`HexColor`] and [`ThemeColorResolver`] - color resolution
//! - [`parse_number_format`] - number-format code parsing
//!
//! Every field of a record is optional. `None` means "inherit the viewer
//! default", so `StyleRecord::default()` is the same as having no style.

mod alignment;
mod color;
mod number_format;
mod table;

pub use alignment::{HorizontalAlignment, VerticalAlignment};
pub use color::{
    apply_tint, indexed_color, ColorDescriptor, ColorKind, ColorRole, HexColor,
    ThemeColorResolver, ThemePalette,
};
pub use number_format::{builtin_format_code, is_date_format, parse_number_format, FormatInfo};
pub use table::{StyleId, StyleTable};

use std::hash::{Hash, Hasher};

/// Resolved style of one cell
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleRecord {
    /// Fill color
    pub background: Option<HexColor>,
    pub font: FontRecord,
    pub alignment: AlignmentRecord,
    pub border: BorderSides,
    /// Number-format code, e.g. `#,##0.00`
    pub number_format: Option<String>,
}

impl StyleRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field overrides the viewer default
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Set the background color
    pub fn background(mut self, color: HexColor) -> Self {
        self.background = Some(color);
        self
    }

    /// Set bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.font.bold = Some(bold);
        self
    }

    /// Set italic
    pub fn italic(mut self, italic: bool) -> Self {
        self.font.italic = Some(italic);
        self
    }

    /// Set the font color
    pub fn font_color(mut self, color: HexColor) -> Self {
        self.font.color = Some(color);
        self
    }

    /// Set the number-format code
    pub fn number_format<S: Into<String>>(mut self, code: S) -> Self {
        self.number_format = Some(code.into());
        self
    }
}

// Font sizes come from decimal attributes and are never NaN.
impl Eq for StyleRecord {}

impl Hash for StyleRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.background.hash(state);
        self.font.hash(state);
        self.alignment.hash(state);
        self.border.hash(state);
        self.number_format.hash(state);
    }
}

/// Font attributes
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontRecord {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Font family name, e.g. "Calibri"
    pub family: Option<String>,
    /// Size in points
    pub size_pt: Option<f64>,
    pub color: Option<HexColor>,
}

impl Hash for FontRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bold.hash(state);
        self.italic.hash(state);
        self.family.hash(state);
        self.size_pt.map(f64::to_bits).hash(state);
        self.color.hash(state);
    }
}

/// Alignment attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentRecord {
    pub horizontal: Option<HorizontalAlignment>,
    pub vertical: Option<VerticalAlignment>,
    pub wrap: Option<bool>,
}

/// Which cell edges carry a border line of any style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderSides {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl BorderSides {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}
