//! Shared-string table and rich-text collection

use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::LoadResult;

/// Decode Excel's `_xHHHH_` escapes (`_x000D_` is CR, `_x005F_` a literal underscore).
///
/// Sequences that are not exactly four hex digits between `_x` and `_` are
/// left as written.
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match decode_escape(tail) {
            Some(ch) => {
                out.push(ch);
                rest = &tail[7..];
            }
            None => {
                out.push('_');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// `tail` starts with `_x`
fn decode_escape(tail: &str) -> Option<char> {
    if tail.as_bytes().get(6) != Some(&b'_') {
        return None;
    }
    let hex = tail.get(2..6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    char::from_u32(u32::from_str_radix(hex, 16).ok()?)
}

/// Visible text of one string item (`si` or an inline `is`).
///
/// Rich-text runs are concatenated; phonetic runs (`rPh`) are skipped.
#[derive(Debug, Default)]
pub(crate) struct TextCollector {
    text: String,
    in_t: bool,
    in_phonetic: bool,
}

impl TextCollector {
    pub(crate) fn start(&mut self, local_name: &[u8]) {
        match local_name {
            b"rPh" => self.in_phonetic = true,
            b"t" if !self.in_phonetic => self.in_t = true,
            _ => {}
        }
    }

    pub(crate) fn end(&mut self, local_name: &[u8]) {
        match local_name {
            b"rPh" => self.in_phonetic = false,
            b"t" => self.in_t = false,
            _ => {}
        }
    }

    pub(crate) fn text(&mut self, text: &str) {
        if self.in_t {
            self.text.push_str(text);
        }
    }

    /// Decoded text so far; resets the collector.
    pub(crate) fn finish(&mut self) -> String {
        let text = decode_excel_escapes(&self.text);
        *self = Self::default();
        text
    }
}

/// Read `xl/sharedStrings.xml` into index order
pub(crate) fn read_shared_strings<R: BufRead>(reader: R) -> LoadResult<Vec<String>> {
    let mut xml_reader = Reader::from_reader(reader);
    // whitespace inside <t> is content
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut collector = TextCollector::default();
    let mut in_si = false;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    collector = TextCollector::default();
                }
                name if in_si => collector.start(name),
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(collector.finish());
                    in_si = false;
                }
                name if in_si => collector.end(name),
                _ => {}
            },
            Event::Text(e) if in_si => collector.text(&e.unescape()?),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}
