#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::PathBuf;

use cardsheet::{Record, RenderOptions, ReportConfig};
use zip::write::SimpleFileOptions;

pub enum Cell {
    Text(&'static str),
    Owned(String),
    Number(f64),
    Inline(&'static str),
    Bool(bool),
    Empty,
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn col_letters(mut col: usize) -> String {
    let mut out = Vec::new();
    col += 1;
    while col > 0 {
        let rem = (col - 1) % 26;
        out.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap()
}

/// Minimal in-memory .xlsx writer: enough parts for a real reader.
#[derive(Default)]
pub struct XlsxBuilder {
    sheets: Vec<(String, Vec<Vec<Cell>>)>,
}

impl XlsxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, name: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.push((name.to_string(), rows));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut shared: Vec<String> = Vec::new();
        let mut sheet_xml = Vec::new();
        for (_, rows) in &self.sheets {
            let mut xml = String::from(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
            );
            for (ri, row) in rows.iter().enumerate() {
                let r = ri + 1;
                xml.push_str(&format!(r#"<row r="{r}">"#));
                for (ci, cell) in row.iter().enumerate() {
                    let cref = format!("{}{r}", col_letters(ci));
                    let mut shared_cell = |text: &str| {
                        let idx = match shared.iter().position(|s| s == text) {
                            Some(i) => i,
                            None => {
                                shared.push(text.to_string());
                                shared.len() - 1
                            }
                        };
                        format!(r#"<c r="{cref}" t="s"><v>{idx}</v></c>"#)
                    };
                    let c = match cell {
                        Cell::Text(t) => shared_cell(*t),
                        Cell::Owned(t) => shared_cell(t.as_str()),
                        Cell::Number(n) => format!(r#"<c r="{cref}"><v>{n}</v></c>"#),
                        Cell::Inline(t) => format!(
                            r#"<c r="{cref}" t="inlineStr"><is><t>{}</t></is></c>"#,
                            escape(t)
                        ),
                        Cell::Bool(b) => {
                            format!(r#"<c r="{cref}" t="b"><v>{}</v></c>"#, u8::from(*b))
                        }
                        Cell::Empty => continue,
                    };
                    xml.push_str(&c);
                }
                xml.push_str("</row>");
            }
            xml.push_str("</sheetData></worksheet>");
            sheet_xml.push(xml);
        }

        let mut workbook = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
        );
        let mut rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (i, (name, _)) in self.sheets.iter().enumerate() {
            let n = i + 1;
            workbook.push_str(&format!(
                r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
                escape(name)
            ));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
            ));
        }
        workbook.push_str("</sheets></workbook>");
        rels.push_str("</Relationships>");

        let mut sst = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
            shared.len()
        );
        for s in &shared {
            sst.push_str(&format!("<si><t>{}</t></si>", escape(s)));
        }
        sst.push_str("</sst>");

        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let mut add = |name: &str, body: &str| {
            zip.start_file(name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        };
        add("xl/workbook.xml", &workbook);
        add("xl/_rels/workbook.xml.rels", &rels);
        add("xl/sharedStrings.xml", &sst);
        for (i, xml) in sheet_xml.iter().enumerate() {
            add(&format!("xl/worksheets/sheet{}.xml", i + 1), xml);
        }
        zip.finish().unwrap().into_inner()
    }
}

pub fn header(cols: &[&'static str]) -> Vec<Cell> {
    cols.iter().map(|&c| Cell::Text(c)).collect()
}

pub const FULL_HEADER: [&str; 5] = ["Last_Name", "First_Name", "Address", "City", "Subdivision_Name"];

/// Header plus `n` generated rows; `subdivision(i)` picks each row's subdivision.
pub fn roster(n: usize, subdivision: impl Fn(usize) -> Option<&'static str>) -> Vec<Vec<Cell>> {
    let mut rows = vec![header(&FULL_HEADER)];
    for i in 0..n {
        rows.push(vec![
            Cell::Owned(format!("Last{i}")),
            Cell::Owned(format!("First{i}")),
            Cell::Owned(format!("{} Main St", 100 + i)),
            Cell::Text("Springfield"),
            match subdivision(i) {
                Some(s) => Cell::Text(s),
                None => Cell::Empty,
            },
        ]);
    }
    rows
}

pub fn records(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record::new(format!("Last{i}"), format!("First{i}"), format!("{i} Elm St"), "Shelbyville"))
        .collect()
}

/// Config with uncompressed content streams so operators can be searched as text.
pub fn inspectable_config() -> ReportConfig {
    ReportConfig {
        render: RenderOptions { compress: false },
        ..ReportConfig::default()
    }
}

pub fn count(haystack: &[u8], needle: &str) -> usize {
    let needle = needle.as_bytes();
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

pub fn page_count(pdf: &[u8]) -> usize {
    count(pdf, "/Type /Page") - count(pdf, "/Type /Pages")
}

/// Output directory for generated artifacts: tests/output/<name>/
pub fn output_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(name);
    std::fs::create_dir_all(&dir).ok();
    dir
}
