//! Theme palette (`xl/theme/theme1.xml`)

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use sheetdiff_core::{HexColor, ThemePalette};

use crate::error::LoadResult;
use crate::xml::attr;

/// Parse the first `a:clrScheme` of a theme part into palette slots.
///
/// Slots keep document order (`dk1`, `lt1`, `dk2`, `lt2`, accents,
/// hyperlinks). A slot whose color element is neither `srgbClr` nor a
/// recognizable `sysClr` is kept as `None` so later indices do not shift.
pub fn parse_theme_palette(theme_xml: &[u8]) -> LoadResult<ThemePalette> {
    let mut reader = Reader::from_reader(theme_xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut slots = Vec::new();
    // depth below clrScheme: 0 = scheme, 1 = slot element, 2 = color element
    let mut depth: Option<usize> = None;
    let mut current: Option<Option<HexColor>> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match depth {
                None if e.local_name().as_ref() == b"clrScheme" => depth = Some(0),
                Some(0) => {
                    current = Some(None);
                    depth = Some(1);
                }
                Some(d) => {
                    if d == 1 {
                        set_slot_color(&mut current, &e);
                    }
                    depth = Some(d + 1);
                }
                None => {}
            },
            Event::Empty(e) => match depth {
                Some(0) => slots.push(None),
                Some(1) => set_slot_color(&mut current, &e),
                _ => {}
            },
            Event::End(_) => match depth {
                Some(0) => break,
                Some(1) => {
                    slots.push(current.take().flatten());
                    depth = Some(0);
                }
                Some(d) => depth = Some(d - 1),
                None => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(ThemePalette::new(slots))
}

fn set_slot_color(current: &mut Option<Option<HexColor>>, e: &BytesStart<'_>) {
    if let Some(slot) = current {
        if slot.is_none() {
            *slot = slot_color(e);
        }
    }
}

fn slot_color(e: &BytesStart<'_>) -> Option<HexColor> {
    match e.local_name().as_ref() {
        b"srgbClr" => attr(e, b"val").and_then(|v| HexColor::from_hex(&v).ok()),
        b"sysClr" => attr(e, b"lastClr")
            .and_then(|v| HexColor::from_hex(&v).ok())
            .or_else(|| attr(e, b"val").and_then(|v| system_color(&v))),
        _ => None,
    }
}

fn system_color(name: &str) -> Option<HexColor> {
    match name {
        "windowText" | "WindowText" => Some(HexColor::BLACK),
        "window" | "Window" => Some(HexColor::WHITE),
        _ => None,
    }
}
