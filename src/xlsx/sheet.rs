use super::SML_NS;

/// One worksheet as rows of optional text cells. The first sheet row is the header.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    /// 1-based row number in the worksheet
    pub sheet_row: usize,
    pub cells: Vec<Option<String>>,
}

impl TableRow {
    pub fn get(&self, col: usize) -> Option<&str> {
        self.cells.get(col).and_then(|c| c.as_deref())
    }
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn head(&self, n: usize) -> &[TableRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Plain-text preview of the first `n` rows, one tab-separated line per row.
    pub fn preview(&self, n: usize) -> String {
        let mut out = self.headers.join("\t");
        for row in self.head(n) {
            out.push('\n');
            let cells: Vec<&str> = (0..self.headers.len())
                .map(|i| row.get(i).unwrap_or(""))
                .collect();
            out.push_str(&cells.join("\t"));
        }
        out
    }
}

/// Column XFD, the widest sheet Excel writes.
const MAX_COLUMNS: usize = 16_384;

/// "BC12" -> (column 54 zero-based, row 12). Returns None for malformed refs
/// and columns past XFD.
pub(super) fn parse_cell_ref(r: &str) -> Option<(usize, usize)> {
    let split = r.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = r.split_at(split);
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    let col = letters.bytes().try_fold(0usize, |acc, b| {
        acc.checked_mul(26)?.checked_add((b - b'A' + 1) as usize)
    })?;
    if col > MAX_COLUMNS {
        return None;
    }
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((col - 1, row))
}

/// Integral numbers print without a fractional part; anything else prints as stored.
pub(super) fn format_number(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        _ => raw.trim().to_string(),
    }
}

/// Concatenated text of a `<si>` or `<is>` node: plain `<t>` or rich-text runs, minus phonetic hints.
pub(super) fn string_item_text(node: roxmltree::Node) -> String {
    let mut text = String::new();
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "t" => text.push_str(child.text().unwrap_or("")),
            "r" => {
                for t in child
                    .children()
                    .filter(|n| n.tag_name().name() == "t")
                {
                    text.push_str(t.text().unwrap_or(""));
                }
            }
            _ => {}
        }
    }
    text
}

fn sml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(SML_NS))
}

fn cell_value(cell: roxmltree::Node, shared_strings: &[String]) -> Option<String> {
    let value = || sml(cell, "v").and_then(|v| v.text());
    let text = match cell.attribute("t").unwrap_or("n") {
        "s" => {
            let idx: usize = value()?.trim().parse().ok()?;
            let Some(s) = shared_strings.get(idx) else {
                log::warn!("Shared string index {idx} out of range");
                return None;
            };
            s.clone()
        }
        "inlineStr" => string_item_text(sml(cell, "is")?),
        "str" | "e" => value()?.to_string(),
        "b" => match value()?.trim() {
            "1" => "TRUE".to_string(),
            _ => "FALSE".to_string(),
        },
        _ => format_number(value()?),
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Raw sheet rows, indexed by 1-based row number, gaps filled with None.
pub(super) fn parse_sheet_rows(
    xml: &roxmltree::Document,
    shared_strings: &[String],
) -> Vec<(usize, Vec<Option<String>>)> {
    let Some(sheet_data) = sml(xml.root_element(), "sheetData") else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    let mut next_row = 1usize;
    for row in sheet_data.children().filter(|n| n.tag_name().name() == "row") {
        let row_num = row
            .attribute("r")
            .and_then(|r| r.parse().ok())
            .unwrap_or(next_row);
        next_row = row_num + 1;

        let mut cells: Vec<Option<String>> = Vec::new();
        let mut next_col = 0usize;
        for cell in row.children().filter(|n| n.tag_name().name() == "c") {
            let col = match cell.attribute("r") {
                Some(r) => match parse_cell_ref(r) {
                    Some((col, _)) => col,
                    None => {
                        log::warn!("Unresolvable cell reference {r:?} in row {row_num}");
                        next_col
                    }
                },
                None => next_col,
            };
            next_col = col + 1;
            if cells.len() <= col {
                cells.resize(col + 1, None);
            }
            cells[col] = cell_value(cell, shared_strings);
        }
        rows.push((row_num, cells));
    }
    rows
}

/// Header from the first row, data from the rest. Fully empty data rows are dropped.
pub(super) fn build_table(name: &str, raw: Vec<(usize, Vec<Option<String>>)>) -> Table {
    let mut iter = raw.into_iter();
    let header_cells = iter.next().map(|(_, cells)| cells).unwrap_or_default();
    let mut rows: Vec<TableRow> = iter
        .map(|(sheet_row, cells)| TableRow { sheet_row, cells })
        .collect();

    let width = rows
        .iter()
        .map(|r| r.cells.len())
        .chain(std::iter::once(header_cells.len()))
        .max()
        .unwrap_or(0);
    let headers: Vec<String> = (0..width)
        .map(|i| match header_cells.get(i).and_then(|c| c.as_deref()) {
            Some(h) => h.to_string(),
            None => format!("Unnamed: {i}"),
        })
        .collect();

    let before = rows.len();
    rows.retain(|r| r.cells.iter().any(|c| c.is_some()));
    if rows.len() < before {
        log::warn!("Sheet {name:?}: dropped {} empty rows", before - rows.len());
    }
    for row in &mut rows {
        row.cells.resize(width, None);
    }

    Table {
        name: name.to_string(),
        headers,
        rows,
    }
}
