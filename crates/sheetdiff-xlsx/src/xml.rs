//! quick-xml attribute helpers shared by the part readers

use std::str::FromStr;

use quick_xml::events::BytesStart;

/// Unescaped value of attribute `key` (qualified name, e.g. `r:id`)
pub(crate) fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Attribute parsed with `FromStr`; unparseable values count as absent.
pub(crate) fn attr_parse<T: FromStr>(e: &BytesStart<'_>, key: &[u8]) -> Option<T> {
    attr(e, key)?.trim().parse().ok()
}

/// OOXML boolean (`1`/`true`/`0`/`false`)
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Toggle element such as `<b/>`: on unless `val` says otherwise.
pub(crate) fn flag(e: &BytesStart<'_>) -> bool {
    attr(e, b"val").and_then(|v| parse_bool(&v)).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_element() {
        assert!(flag(&BytesStart::new("b")));
        assert!(!flag(&BytesStart::from_content(r#"b val="0""#, 1)));
        assert!(flag(&BytesStart::from_content(r#"b val="true""#, 1)));
    }

    #[test]
    fn test_attr_parse() {
        let e = BytesStart::from_content(r#"row r="12" ht="abc""#, 3);
        assert_eq!(attr_parse::<u32>(&e, b"r"), Some(12));
        assert_eq!(attr_parse::<f64>(&e, b"ht"), None);
        assert_eq!(attr(&e, b"missing"), None);
    }
}
