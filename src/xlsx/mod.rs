mod sheet;

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::error::Error;

pub use sheet::{Table, TableRow};

const SML_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

type Archive = zip::ZipArchive<Cursor<Vec<u8>>>;

struct SheetEntry {
    name: String,
    /// Part path inside the archive, e.g. "xl/worksheets/sheet1.xml"
    part: String,
}

/// An opened `.xlsx` workbook. Sheets are parsed lazily by name.
pub struct Workbook {
    zip: Archive,
    sheets: Vec<SheetEntry>,
    shared_strings: Vec<String>,
}

fn read_zip_text<R: Read + Seek>(zip: &mut zip::ZipArchive<R>, name: &str) -> Option<String> {
    let mut content = String::new();
    zip.by_name(name).ok()?.read_to_string(&mut content).ok()?;
    Some(content)
}

fn parse_rels_xml(xml_content: &str) -> HashMap<String, String> {
    let mut rels = HashMap::new();
    let Ok(xml) = roxmltree::Document::parse(xml_content) else {
        return rels;
    };
    for node in xml.root_element().children() {
        if node.tag_name().name() == "Relationship"
            && let (Some(id), Some(target)) = (node.attribute("Id"), node.attribute("Target"))
        {
            rels.insert(id.to_string(), target.to_string());
        }
    }
    rels
}

/// Resolve a relationship target against the `xl/` directory.
fn resolve_part(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    }
}

fn parse_shared_strings(zip: &mut Archive) -> Result<Vec<String>, Error> {
    let Some(xml_content) = read_zip_text(zip, "xl/sharedStrings.xml") else {
        return Ok(Vec::new());
    };
    let xml = roxmltree::Document::parse(&xml_content)?;
    Ok(xml
        .root_element()
        .children()
        .filter(|n| n.tag_name().name() == "si")
        .map(sheet::string_item_text)
        .collect())
}

fn parse_sheet_entries(zip: &mut Archive) -> Result<Vec<SheetEntry>, Error> {
    let xml_content = read_zip_text(zip, "xl/workbook.xml").ok_or_else(|| {
        Error::InvalidWorkbook("missing xl/workbook.xml (is this an XLSX file?)".into())
    })?;
    let rels = read_zip_text(zip, "xl/_rels/workbook.xml.rels")
        .map(|c| parse_rels_xml(&c))
        .unwrap_or_default();

    let xml = roxmltree::Document::parse(&xml_content)?;
    let sheets_node = xml
        .root_element()
        .children()
        .find(|n| n.tag_name().name() == "sheets" && n.tag_name().namespace() == Some(SML_NS))
        .ok_or_else(|| Error::InvalidWorkbook("workbook has no <sheets> element".into()))?;

    let mut entries = Vec::new();
    for (i, node) in sheets_node
        .children()
        .filter(|n| n.tag_name().name() == "sheet")
        .enumerate()
    {
        let Some(name) = node.attribute("name") else {
            continue;
        };
        let part = node
            .attribute((REL_NS, "id"))
            .and_then(|rid| rels.get(rid))
            .map(|target| resolve_part(target))
            .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", i + 1));
        log::debug!("Sheet {name:?} -> {part}");
        entries.push(SheetEntry {
            name: name.to_string(),
            part,
        });
    }
    Ok(entries)
}

impl Workbook {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
                std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
            ),
            _ => Error::Io(e),
        })?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, Error> {
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes.into()))
            .map_err(|_| Error::InvalidWorkbook("file is not a ZIP archive".into()))?;
        let sheets = parse_sheet_entries(&mut zip)?;
        let shared_strings = parse_shared_strings(&mut zip)?;
        Ok(Self {
            zip,
            sheets,
            shared_strings,
        })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn sheet(&mut self, name: &str) -> Result<Table, Error> {
        let entry = self
            .sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::SheetNotFound {
                name: name.to_string(),
                available: self.sheet_names(),
            })?;

        let xml_content = read_zip_text(&mut self.zip, &entry.part).ok_or_else(|| {
            Error::InvalidWorkbook(format!("missing worksheet part {}", entry.part))
        })?;
        let xml = roxmltree::Document::parse(&xml_content)?;
        let raw = sheet::parse_sheet_rows(&xml, &self.shared_strings);
        Ok(sheet::build_table(&entry.name, raw))
    }
}
