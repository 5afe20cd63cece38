use pdf_writer::{Name, Pdf, Ref};

use crate::error::{Error, TextLocation};

/// The three standard Type 1 faces the report uses. None are embedded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StandardFont {
    Regular,
    Bold,
    Oblique,
}

impl StandardFont {
    pub(crate) const ALL: [StandardFont; 3] =
        [StandardFont::Regular, StandardFont::Bold, StandardFont::Oblique];

    pub(crate) fn base_font(self) -> &'static [u8] {
        match self {
            StandardFont::Regular => b"Helvetica",
            StandardFont::Bold => b"Helvetica-Bold",
            StandardFont::Oblique => b"Helvetica-Oblique",
        }
    }

    /// Resource name used inside content streams.
    pub(crate) fn resource_name(self) -> &'static [u8] {
        match self {
            StandardFont::Regular => b"F1",
            StandardFont::Bold => b"F2",
            StandardFont::Oblique => b"F3",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            StandardFont::Regular | StandardFont::Oblique => &HELVETICA_WIDTHS,
            StandardFont::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Width of a WinAnsi byte in 1000-units/em.
    fn byte_width_1000(self, byte: u8) -> f32 {
        match byte {
            32..=126 => self.widths()[(byte - 32) as usize] as f32,
            // Latin-1 letters: close enough to the average lowercase glyph
            _ => 556.0,
        }
    }

    /// Width of already-encoded text at `font_size` (same unit as the size).
    pub(crate) fn text_width(self, bytes: &[u8], font_size: f32) -> f32 {
        bytes
            .iter()
            .map(|&b| self.byte_width_1000(b) * font_size / 1000.0)
            .sum()
    }
}

/// Helvetica / Helvetica-Oblique AFM widths for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold AFM widths for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Write the Type 1 font dictionaries and return their refs in `StandardFont::ALL` order.
pub(crate) fn register_standard_fonts(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
) -> Vec<(StandardFont, Ref)> {
    StandardFont::ALL
        .iter()
        .map(|&font| {
            let font_ref = alloc();
            pdf.type1_font(font_ref)
                .base_font(Name(font.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            (font, font_ref)
        })
        .collect()
}

/// Map a single Unicode char to its WinAnsi (Windows-1252) byte.
fn char_to_winansi(c: char) -> Option<u8> {
    match c as u32 {
        0x0000..=0x007F => Some(c as u8),
        0x00A0..=0x00FF => Some(c as u8), // Latin-1 supplement maps directly
        0x20AC => Some(0x80),
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85),
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95), // bullet
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}

/// Convert a UTF-8 string to WinAnsi bytes. Unmappable characters are an error, never dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Result<Vec<u8>, Error> {
    s.chars()
        .map(|c| {
            char_to_winansi(c).ok_or_else(|| Error::Unencodable {
                text: s.to_string(),
                ch: c,
                location: None,
            })
        })
        .collect()
}

/// Like [`to_winansi_bytes`], tagging the error with where the text came from.
pub(crate) fn encode_at(s: &str, location: impl FnOnce() -> TextLocation) -> Result<Vec<u8>, Error> {
    to_winansi_bytes(s).map_err(|e| match e {
        Error::Unencodable { text, ch, .. } => Error::Unencodable {
            text,
            ch,
            location: Some(location()),
        },
        other => other,
    })
}
