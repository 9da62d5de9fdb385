//! Excel number-format codes
//!
//! Only what display needs is extracted: decimal count, thousands grouping,
//! percent scaling and the literal text around the digits. Multi-section
//! formats (`positive;negative;zero;text`) are read from their first section.

/// Rendering parameters parsed from a number-format code
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatInfo {
    /// Digits after the decimal point
    pub decimals: u32,
    /// Thousands separators
    pub grouping: bool,
    /// Value is shown multiplied by 100
    pub percent: bool,
    /// Literal text before the digits (or a detected currency symbol)
    pub prefix: String,
    /// Literal text after the digits
    pub suffix: String,
}

const CURRENCY_SYMBOLS: [char; 7] = ['$', '€', '£', '¥', '₫', '₩', '₹'];

#[derive(Debug, Clone, Copy)]
struct Token {
    ch: char,
    /// Backslash-escaped, never a placeholder or date code
    literal: bool,
}

impl Token {
    fn is_placeholder(&self) -> bool {
        !self.literal && matches!(self.ch, '0' | '#' | '?')
    }

    fn is(&self, ch: char) -> bool {
        !self.literal && self.ch == ch
    }
}

/// Tokens of the first section with quoted runs and bracketed directives
/// removed. The `_` and `*` markers are dropped but the character they pad
/// or repeat stays as ordinary text.
fn first_section(code: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(code.len());
    let mut chars = code.chars();
    while let Some(ch) = chars.next() {
        match ch {
            ';' => break,
            '"' => {
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                }
            }
            '[' => {
                for c in chars.by_ref() {
                    if c == ']' {
                        break;
                    }
                }
            }
            '\\' => {
                if let Some(c) = chars.next() {
                    tokens.push(Token { ch: c, literal: true });
                }
            }
            '_' | '*' => {}
            _ => tokens.push(Token { ch, literal: false }),
        }
    }
    tokens
}

fn is_text_or_general(code: &str) -> bool {
    let code = code.trim();
    code.is_empty() || code == "@" || code.eq_ignore_ascii_case("general")
}

fn clean_affix(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.ch)
        .filter(|c| !matches!(c, '(' | ')'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse a number-format code.
///
/// Returns `None` for `General`, `@`, an empty code, or a section without
/// digit placeholders: the value is then shown in its natural form.
///
/// ```
/// use sheetdiff_core::parse_number_format;
///
/// let info = parse_number_format("0.0%").unwrap();
/// assert_eq!(info.decimals, 1);
/// assert!(info.percent);
/// assert!(parse_number_format("General").is_none());
/// ```
pub fn parse_number_format(code: &str) -> Option<FormatInfo> {
    if is_text_or_general(code) {
        return None;
    }

    let tokens = first_section(code);
    let mut first = tokens.iter().position(Token::is_placeholder)?;
    let last = tokens.iter().rposition(Token::is_placeholder)?;
    if first > 0 && tokens[first - 1].is('.') {
        first -= 1;
    }

    let decimals = tokens[first..=last]
        .iter()
        .position(|t| t.is('.'))
        .map(|dot| {
            tokens[first + dot + 1..=last]
                .iter()
                .take_while(|t| t.is_placeholder())
                .count() as u32
        })
        .unwrap_or(0);

    let mut prefix = clean_affix(&tokens[..first]);
    let suffix = clean_affix(&tokens[last + 1..]);
    if prefix.is_empty() {
        if let Some(symbol) = code.chars().find(|c| CURRENCY_SYMBOLS.contains(c)) {
            prefix.push(symbol);
        }
    }

    Some(FormatInfo {
        decimals,
        grouping: tokens.iter().any(|t| t.is(',')),
        percent: tokens.iter().any(|t| t.is('%')),
        prefix,
        suffix,
    })
}

/// Whether a format code renders dates or times.
///
/// Quoted text and bracketed directives are dropped from the first section,
/// then any remaining `y m d h s a` (either case) marks a date. Escapes are
/// not special here, and `General` matches through its `a`, so decimal
/// overrides never touch General-formatted numbers.
pub fn is_date_format(code: &str) -> bool {
    let mut chars = code.chars();
    while let Some(ch) = chars.next() {
        match ch {
            ';' => break,
            '"' => {
                if !chars.by_ref().any(|c| c == '"') {
                    break;
                }
            }
            '[' => {
                if !chars.by_ref().any(|c| c == ']') {
                    break;
                }
            }
            c if matches!(c.to_ascii_lowercase(), 'y' | 'm' | 'd' | 'h' | 's' | 'a') => return true,
            _ => {}
        }
    }
    false
}

/// Format code of a built-in `numFmtId`; ids without a fixed code are `None`.
pub fn builtin_format_code(id: u32) -> Option<&'static str> {
    Some(match id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        5 => "\"$\"#,##0_);(\"$\"#,##0)",
        6 => "\"$\"#,##0_);[Red](\"$\"#,##0)",
        7 => "\"$\"#,##0.00_);(\"$\"#,##0.00)",
        8 => "\"$\"#,##0.00_);[Red](\"$\"#,##0.00)",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "mm-dd-yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "#,##0_);(#,##0)",
        38 => "#,##0_);[Red](#,##0)",
        39 => "#,##0.00_);(#,##0.00)",
        40 => "#,##0.00_);[Red](#,##0.00)",
        41 => r#"_(* #,##0_);_(* \(#,##0\);_(* "-"_);_(@_)"#,
        42 => r#"_("$"* #,##0_);_("$"* \(#,##0\);_("$"* "-"_);_(@_)"#,
        43 => r#"_(* #,##0.00_);_(* \(#,##0.00\);_(* "-"??_);_(@_)"#,
        44 => r#"_("$"* #,##0.00_)_("$"* \(#,##0.00\)_("$"* "-"??_)_(@_)"#,
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mmss.0",
        48 => "##0.0E+0",
        49 => "@",
        _ => return None,
    })
}
