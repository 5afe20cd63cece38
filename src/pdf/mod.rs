mod cell;

use pdf_writer::{Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::error::{Error, TextLocation};
use crate::fonts::{StandardFont, register_standard_fonts};
use crate::model::{Card, CardGeometry, Page};

use cell::{Align, Canvas, CellRect, PT_PER_MM};

const BODY_SIZE: f32 = 12.0;
const HEADER_SIZE: f32 = 16.0;
const FOOTER_SIZE: f32 = 8.0;

const HEADER_TOP: f32 = 10.0;
const HEADER_HEIGHT: f32 = 10.0;
const FOOTER_HEIGHT: f32 = 10.0;

/// Name, address and city row heights inside the left box.
const NAME_ROWS: [f32; 3] = [7.0, 7.0, 6.0];
const COMMENT_LABEL_HEIGHT: f32 = 7.0;
const COMMENT_LINE_HEIGHT: f32 = 6.0;
const COMMENT_LINES: usize = 2;
const COMMENT_RULE: &str = "_________________________________________";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// Flate-compress page content streams.
    pub compress: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { compress: true }
    }
}

fn draw_card(
    canvas: &mut Canvas,
    card: &Card,
    geometry: &CardGeometry,
    page: usize,
    slot: usize,
) -> Result<(), Error> {
    let at = || TextLocation::Card { page, slot };
    let name_w = geometry.name_address_width;
    let comment_w = geometry.comment_width;
    let comment_x = card.x + name_w;

    canvas.border(CellRect { x: card.x, y: card.y, w: name_w, h: geometry.box_height });
    canvas.border(CellRect { x: comment_x, y: card.y, w: comment_w, h: geometry.box_height });

    let mut y = card.y;
    for (line, h) in [&card.name_line, &card.address_line, &card.city_line]
        .into_iter()
        .zip(NAME_ROWS)
    {
        let rect = CellRect { x: card.x, y, w: name_w, h };
        canvas.text(rect, line, StandardFont::Regular, BODY_SIZE, Align::Left, at)?;
        y += h;
    }

    let label = CellRect { x: comment_x, y: card.y, w: comment_w, h: COMMENT_LABEL_HEIGHT };
    canvas.text(label, "Comments:", StandardFont::Regular, BODY_SIZE, Align::Left, at)?;
    let mut line_y = card.y + COMMENT_LABEL_HEIGHT;
    for _ in 0..COMMENT_LINES {
        let rect = CellRect { x: comment_x, y: line_y, w: comment_w, h: COMMENT_LINE_HEIGHT };
        canvas.text(rect, COMMENT_RULE, StandardFont::Regular, BODY_SIZE, Align::Left, at)?;
        line_y += COMMENT_LINE_HEIGHT;
    }
    Ok(())
}

fn draw_page(page: &Page, header_label: &str, geometry: &CardGeometry) -> Result<Vec<u8>, Error> {
    let mut canvas = Canvas::new(geometry.page_height);
    let full_width = geometry.page_width - 2.0 * geometry.left_margin;

    let header = CellRect { x: geometry.left_margin, y: HEADER_TOP, w: full_width, h: HEADER_HEIGHT };
    canvas.text(
        header,
        header_label,
        StandardFont::Bold,
        HEADER_SIZE,
        Align::Center,
        || TextLocation::HeaderLabel,
    )?;

    for (slot, card) in page.cards.iter().enumerate() {
        draw_card(&mut canvas, card, geometry, page.number, slot)?;
    }

    let footer = CellRect {
        x: geometry.left_margin,
        y: geometry.page_height - geometry.footer_from_bottom,
        w: full_width,
        h: FOOTER_HEIGHT,
    };
    canvas.text(
        footer,
        &page.footer_text(),
        StandardFont::Oblique,
        FOOTER_SIZE,
        Align::Center,
        || TextLocation::Footer { page: page.number },
    )?;

    Ok(canvas.finish())
}

/// Draw every page and assemble the finished PDF.
pub fn render(
    pages: &[Page],
    header_label: &str,
    geometry: &CardGeometry,
    options: &RenderOptions,
) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();
    let fonts = register_standard_fonts(&mut pdf, &mut alloc);

    let contents = pages
        .iter()
        .map(|page| draw_page(page, header_label, geometry))
        .collect::<Result<Vec<_>, _>>()?;
    let t_draw = t0.elapsed();

    let n = contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, raw) in contents.into_iter().enumerate() {
        if options.compress {
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
            pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
        } else {
            pdf.stream(content_ids[i], &raw);
        }
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);
    pdf.document_info(info_id)
        .title(TextStr(header_label))
        .producer(TextStr(concat!("cardsheet ", env!("CARGO_PKG_VERSION"))));

    let media_box = Rect::new(
        0.0,
        0.0,
        geometry.page_width * PT_PER_MM,
        geometry.page_height * PT_PER_MM,
    );
    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(media_box)
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut font_dict = resources.fonts();
        for (font, font_ref) in &fonts {
            font_dict.pair(Name(font.resource_name()), *font_ref);
        }
    }

    log::info!(
        "Render phases: draw={:.1}ms, assembly={:.1}ms ({n} pages)",
        t_draw.as_secs_f64() * 1000.0,
        (t0.elapsed() - t_draw).as_secs_f64() * 1000.0,
    );

    Ok(pdf.finish())
}
