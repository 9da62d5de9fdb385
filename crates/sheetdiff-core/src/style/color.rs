//! Workbook color descriptors and their resolution to plain RGB
//!
//! Cell colors arrive in one of four encodings: automatic, explicit (A)RGB,
//! an index into the legacy 64-entry palette, or a theme slot plus tint.
//! [`ThemeColorResolver`] turns any of them into a [`HexColor`] or `None`,
//! where `None` always means "use the viewer default".

use crate::error::{Error, Result};
use std::fmt;

/// An opaque RGB color, displayed as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const BLACK: HexColor = HexColor::rgb(0, 0, 0);
    pub const WHITE: HexColor = HexColor::rgb(255, 255, 255);

    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    const fn from_u32(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Parse 6-digit RGB or 8-digit ARGB, with or without a leading `#`.
    ///
    /// The alpha byte of ARGB input is dropped.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(hex.to_string()));
        }
        let rgb = match digits.len() {
            6 => digits,
            8 => &digits[2..],
            _ => return Err(Error::InvalidColor(hex.to_string())),
        };
        u32::from_str_radix(rgb, 16)
            .map(Self::from_u32)
            .map_err(|_| Error::InvalidColor(hex.to_string()))
    }

    /// Channels as a tuple
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for HexColor {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        HexColor::from_hex(&value)
    }
}

/// How a raw color is encoded in the workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorKind {
    /// Viewer default
    #[default]
    Auto,
    /// Explicit RGB/ARGB hex
    Rgb,
    /// Legacy indexed palette
    Indexed,
    /// Theme slot with optional tint
    Theme,
}

/// A color exactly as the style part describes it, before resolution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorDescriptor {
    pub kind: ColorKind,
    pub argb_or_rgb: Option<String>,
    pub index: Option<u32>,
    pub theme_slot: Option<u32>,
    pub tint: Option<f64>,
}

impl ColorDescriptor {
    /// The automatic color
    pub fn auto() -> Self {
        Self::default()
    }

    /// An explicit RGB or ARGB hex string
    pub fn rgb<S: Into<String>>(hex: S) -> Self {
        Self {
            kind: ColorKind::Rgb,
            argb_or_rgb: Some(hex.into()),
            ..Self::default()
        }
    }

    /// An entry of the legacy indexed palette
    pub fn indexed(index: u32) -> Self {
        Self {
            kind: ColorKind::Indexed,
            index: Some(index),
            ..Self::default()
        }
    }

    /// A theme slot with optional tint
    pub fn theme(slot: u32, tint: Option<f64>) -> Self {
        Self {
            kind: ColorKind::Theme,
            theme_slot: Some(slot),
            tint,
            ..Self::default()
        }
    }
}

/// What the color is painted on; fonts get the text-alias rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Fill,
    Font,
}

/// Theme colors in `clrScheme` document order (dk1, lt1, dk2, lt2,
/// accent1-6, hlink, folHlink). A slot may be present but unresolvable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThemePalette {
    slots: Vec<Option<HexColor>>,
}

impl ThemePalette {
    /// A palette with no slots
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(slots: Vec<Option<HexColor>>) -> Self {
        Self { slots }
    }

    /// Color of a slot, `None` when missing or unresolvable
    pub fn get(&self, slot: u32) -> Option<HexColor> {
        self.slots.get(slot as usize).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<HexColor>> + '_ {
        self.slots.iter().copied()
    }
}

impl FromIterator<Option<HexColor>> for ThemePalette {
    fn from_iter<I: IntoIterator<Item = Option<HexColor>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Resolves [`ColorDescriptor`]s against one workbook's theme palette.
#[derive(Debug, Clone, Default)]
pub struct ThemeColorResolver {
    palette: ThemePalette,
    font_theme_text_alias: bool,
}

impl ThemeColorResolver {
    pub fn new(palette: ThemePalette) -> Self {
        Self {
            palette,
            font_theme_text_alias: false,
        }
    }

    /// Treat a font color on theme slot 1 as slot 0 when slot 1 is white.
    ///
    /// Some producers write theme 1 for ordinary dark text even though slot 1
    /// holds the light background color. Off by default: themes that
    /// deliberately use white text on slot 1 would turn dark.
    pub fn with_font_theme_text_alias(mut self, enabled: bool) -> Self {
        self.font_theme_text_alias = enabled;
        self
    }

    pub fn palette(&self) -> &ThemePalette {
        &self.palette
    }

    /// Resolve a descriptor to a concrete color, or `None` for "viewer default".
    pub fn resolve(&self, color: &ColorDescriptor, role: ColorRole) -> Option<HexColor> {
        match color.kind {
            ColorKind::Auto => None,
            ColorKind::Rgb => normalize_argb(color.argb_or_rgb.as_deref()?),
            ColorKind::Indexed => indexed_color(color.index?),
            ColorKind::Theme => {
                let mut slot = color.theme_slot?;
                if self.font_theme_text_alias
                    && role == ColorRole::Font
                    && slot == 1
                    && self.palette.get(1) == Some(HexColor::WHITE)
                {
                    slot = 0;
                }
                let base = self.palette.get(slot)?;
                Some(apply_tint(base, color.tint.unwrap_or(0.0)))
            }
        }
    }
}

/// `#RRGGBB` from 6-digit RGB or 8-digit ARGB; all-zero ARGB is transparent.
fn normalize_argb(value: &str) -> Option<HexColor> {
    let value = value.trim();
    if value.len() == 8 && value.bytes().all(|b| b == b'0') {
        return None;
    }
    HexColor::from_hex(value).ok()
}

/// Lighten (positive) or darken (negative) a color.
///
/// Each channel moves toward white by `t` of the remaining distance, or is
/// scaled by `1 + t` toward black. Results are truncated, and `t` is clamped
/// to `[-1, 1]`.
pub fn apply_tint(base: HexColor, tint: f64) -> HexColor {
    if tint == 0.0 || tint.is_nan() {
        return base;
    }
    let t = tint.clamp(-1.0, 1.0);
    let channel = |c: u8| -> u8 {
        let c = c as f64;
        let v = if t < 0.0 { c * (1.0 + t) } else { c + (255.0 - c) * t };
        v.clamp(0.0, 255.0) as u8
    };
    HexColor::rgb(channel(base.r), channel(base.g), channel(base.b))
}

/// Legacy indexed palette entry; indices past 63 (system colors) are `None`.
pub fn indexed_color(index: u32) -> Option<HexColor> {
    INDEXED_PALETTE
        .get(index as usize)
        .map(|&rgb| HexColor::from_u32(rgb))
}

const INDEXED_PALETTE: [u32; 64] = [
    // 0-7 and their 8-15 duplicates
    0x000000, 0xFFFFFF, 0xFF0000, 0x00FF00, 0x0000FF, 0xFFFF00, 0xFF00FF, 0x00FFFF,
    0x000000, 0xFFFFFF, 0xFF0000, 0x00FF00, 0x0000FF, 0xFFFF00, 0xFF00FF, 0x00FFFF,
    0x800000, 0x008000, 0x000080, 0x808000, 0x800080, 0x008080, 0xC0C0C0, 0x808080,
    0x9999FF, 0x993366, 0xFFFFCC, 0xCCFFFF, 0x660066, 0xFF8080, 0x0066CC, 0xCCCCFF,
    0x000080, 0xFF00FF, 0xFFFF00, 0x00FFFF, 0x800080, 0x800000, 0x008080, 0x0000FF,
    0x00CCFF, 0xCCFFFF, 0xCCFFCC, 0xFFFF99, 0x99CCFF, 0xFF99CC, 0xCC99FF, 0xFFCC99,
    0x3366FF, 0x33CCCC, 0x99CC00, 0xFFCC00, 0xFF9900, 0xFF6600, 0x666699, 0x969696,
    0x003366, 0x339966, 0x003300, 0x333300, 0x993300, 0x993366, 0x333399, 0x333333,
];
