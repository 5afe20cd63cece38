use crate::error::{Error, TextLocation};
use crate::fonts::encode_at;
use crate::model::Record;
use crate::xlsx::{Table, TableRow};

pub const REQUIRED_COLUMNS: [&str; 4] = ["Last_Name", "First_Name", "Address", "City"];
pub const SUBDIVISION_COLUMN: &str = "Subdivision_Name";

struct ColumnMap {
    required: [usize; 4],
    subdivision: Option<usize>,
}

/// Check the header row. All four required columns are named in the error, not just the missing ones.
fn resolve_columns(table: &Table) -> Result<ColumnMap, Error> {
    let found: Vec<Option<usize>> = REQUIRED_COLUMNS
        .iter()
        .map(|name| table.column_index(name))
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .zip(&found)
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns {
            required: REQUIRED_COLUMNS.to_vec(),
            missing,
        });
    }

    let mut required = [0usize; 4];
    for (slot, idx) in required.iter_mut().zip(found.into_iter().flatten()) {
        *slot = idx;
    }
    Ok(ColumnMap {
        required,
        subdivision: table.column_index(SUBDIVISION_COLUMN),
    })
}

fn checked_text(row: &TableRow, col: usize, header: &str) -> Result<String, Error> {
    let text = row.get(col).unwrap_or("").to_string();
    encode_at(&text, || TextLocation::Cell {
        row: row.sheet_row,
        column: header.to_string(),
    })?;
    Ok(text)
}

/// Validate the sheet and convert its rows to records, preserving order.
pub fn records_from_table(table: &Table) -> Result<Vec<Record>, Error> {
    let columns = resolve_columns(table)?;
    let [last, first, address, city] = columns.required;

    table
        .rows
        .iter()
        .map(|row| {
            let subdivision = match columns.subdivision {
                Some(col) => {
                    let text = checked_text(row, col, SUBDIVISION_COLUMN)?;
                    let trimmed = text.trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                }
                None => None,
            };
            Ok(Record {
                last_name: checked_text(row, last, REQUIRED_COLUMNS[0])?,
                first_name: checked_text(row, first, REQUIRED_COLUMNS[1])?,
                address: checked_text(row, address, REQUIRED_COLUMNS[2])?,
                city: checked_text(row, city, REQUIRED_COLUMNS[3])?,
                subdivision,
            })
        })
        .collect()
}
