mod error;
mod fonts;
mod layout;
mod model;
mod pdf;
mod records;
mod xlsx;

pub use error::{Error, TextLocation};
pub use layout::{DEFAULT_RECORDS_PER_PAGE, LayoutConfig, Paginator, TrailingPage, layout};
pub use model::{Card, CardGeometry, Page, Record, SUBDIVISION_FALLBACK};
pub use pdf::{RenderOptions, render};
pub use records::{REQUIRED_COLUMNS, SUBDIVISION_COLUMN, records_from_table};
pub use xlsx::{Table, TableRow, Workbook};

use std::path::Path;
use std::time::Instant;

pub const DEFAULT_OUTPUT_NAME: &str = "formatted_report_no_spacing.pdf";
pub const PDF_MIME: &str = "application/pdf";

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReportConfig {
    pub layout: LayoutConfig,
    pub render: RenderOptions,
}

/// What a generation run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub pages: usize,
    pub cards: usize,
    pub pdf: Vec<u8>,
}

/// Validate, lay out and render one sheet. The sheet name becomes the page header.
pub fn generate_report(table: &Table, config: &ReportConfig) -> Result<Report, Error> {
    let t0 = Instant::now();

    config.layout.check_capacity()?;
    let records = records_from_table(table)?;
    let t_records = t0.elapsed();

    let pages = layout(&records, &config.layout);
    let t_layout = t0.elapsed();

    let pdf = render(&pages, &table.name, &config.layout.geometry, &config.render)?;
    let t_render = t0.elapsed();

    log::info!(
        "Timing: records={:.1}ms, layout={:.1}ms, render={:.1}ms ({} records, {} pages, {} bytes)",
        t_records.as_secs_f64() * 1000.0,
        (t_layout - t_records).as_secs_f64() * 1000.0,
        (t_render - t_layout).as_secs_f64() * 1000.0,
        records.len(),
        pages.len(),
        pdf.len(),
    );

    Ok(Report {
        pages: pages.len(),
        cards: pages.iter().map(|p| p.cards.len()).sum(),
        pdf,
    })
}

/// Pick `sheet` (or the first sheet) from an open workbook.
pub fn select_sheet(workbook: &mut Workbook, sheet: Option<&str>) -> Result<Table, Error> {
    let name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidWorkbook("workbook has no sheets".into()))?,
    };
    workbook.sheet(&name)
}

pub fn convert_xlsx_to_pdf(
    input: &Path,
    sheet: Option<&str>,
    output: &Path,
    config: &ReportConfig,
) -> Result<Report, Error> {
    let t0 = Instant::now();
    let mut workbook = Workbook::open(input)?;
    let table = select_sheet(&mut workbook, sheet)?;
    let t_parse = t0.elapsed();

    let report = generate_report(&table, config)?;
    let t_generate = t0.elapsed();

    std::fs::write(output, &report.pdf).map_err(Error::Io)?;

    log::info!(
        "Timing: parse={:.1}ms, generate={:.1}ms, write={:.1}ms, total={:.1}ms",
        t_parse.as_secs_f64() * 1000.0,
        (t_generate - t_parse).as_secs_f64() * 1000.0,
        (t0.elapsed() - t_generate).as_secs_f64() * 1000.0,
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(report)
}

pub fn convert_xlsx_bytes_to_pdf(
    input: &[u8],
    sheet: Option<&str>,
    config: &ReportConfig,
) -> Result<Report, Error> {
    let mut workbook = Workbook::from_bytes(input)?;
    let table = select_sheet(&mut workbook, sheet)?;
    generate_report(&table, config)
}
