use pdf_writer::{Content, Name, Str};

use crate::error::{Error, TextLocation};
use crate::fonts::{StandardFont, encode_at};

/// Points per millimetre.
pub(super) const PT_PER_MM: f32 = 72.0 / 25.4;

/// Horizontal inset of text inside a cell, in mm.
const CELL_MARGIN: f32 = 1.0;

const LINE_WIDTH_MM: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum Align {
    Left,
    Center,
}

/// A rectangle in page millimetres, origin at the top-left corner.
#[derive(Clone, Copy, Debug)]
pub(super) struct CellRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Content stream wrapper that takes top-down millimetre coordinates.
pub(super) struct Canvas {
    content: Content,
    page_height: f32,
}

impl Canvas {
    pub(super) fn new(page_height: f32) -> Self {
        let mut content = Content::new();
        content.set_line_width(LINE_WIDTH_MM * PT_PER_MM);
        Self {
            content,
            page_height,
        }
    }

    pub(super) fn border(&mut self, rect: CellRect) {
        self.content
            .rect(
                rect.x * PT_PER_MM,
                (self.page_height - rect.y - rect.h) * PT_PER_MM,
                rect.w * PT_PER_MM,
                rect.h * PT_PER_MM,
            )
            .stroke();
    }

    /// Single-line text cell: vertically centred on the cell, left-inset or centred horizontally.
    pub(super) fn text(
        &mut self,
        rect: CellRect,
        text: &str,
        font: StandardFont,
        font_size: f32,
        align: Align,
        location: impl FnOnce() -> TextLocation,
    ) -> Result<(), Error> {
        let bytes = encode_at(text, location)?;
        if bytes.is_empty() {
            return Ok(());
        }

        let size_mm = font_size / PT_PER_MM;
        let x = match align {
            Align::Left => rect.x + CELL_MARGIN,
            Align::Center => rect.x + (rect.w - font.text_width(&bytes, size_mm)) / 2.0,
        };
        let baseline = rect.y + 0.5 * rect.h + 0.3 * size_mm;

        self.content.begin_text();
        self.content.set_font(Name(font.resource_name()), font_size);
        self.content
            .next_line(x * PT_PER_MM, (self.page_height - baseline) * PT_PER_MM);
        self.content.show(Str(&bytes));
        self.content.end_text();
        Ok(())
    }

    pub(super) fn finish(self) -> Vec<u8> {
        self.content.finish().as_slice().to_vec()
    }
}
