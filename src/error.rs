use std::fmt;

/// Where an unencodable piece of text came from.
#[derive(Debug, Clone, PartialEq)]
pub enum TextLocation {
    /// A data cell: 1-based spreadsheet row and the column header.
    Cell { row: usize, column: String },
    HeaderLabel,
    Footer { page: usize },
    Card { page: usize, slot: usize },
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextLocation::Cell { row, column } => write!(f, "row {row}, column {column}"),
            TextLocation::HeaderLabel => write!(f, "header label"),
            TextLocation::Footer { page } => write!(f, "footer of page {page}"),
            TextLocation::Card { page, slot } => write!(f, "card {} on page {page}", slot + 1),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    InvalidWorkbook(String),
    Xml(roxmltree::Error),
    SheetNotFound {
        name: String,
        available: Vec<String>,
    },
    MissingColumns {
        required: Vec<&'static str>,
        missing: Vec<String>,
    },
    Unencodable {
        text: String,
        ch: char,
        location: Option<TextLocation>,
    },
    PageOverflow {
        records_per_page: usize,
        capacity: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidWorkbook(msg) => write!(f, "Invalid workbook: {msg}"),
            Error::Xml(e) => write!(f, "XML parse error: {e}"),
            Error::SheetNotFound { name, available } => write!(
                f,
                "Sheet {name:?} not found (available: {})",
                available.join(", ")
            ),
            Error::MissingColumns { required, missing } => write!(
                f,
                "Columns {required:?} are required in the sheet. (missing: {})",
                missing.join(", ")
            ),
            Error::PageOverflow {
                records_per_page,
                capacity,
            } => write!(
                f,
                "{records_per_page} records per page do not fit on the page (at most {capacity})"
            ),
            Error::Unencodable { text, ch, location } => {
                write!(
                    f,
                    "Character {ch:?} (U+{:04X}) in {text:?} cannot be encoded as WinAnsi",
                    *ch as u32
                )?;
                if let Some(loc) = location {
                    write!(f, " ({loc})")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Xml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Xml(e)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::Io(io) => Error::Io(io),
            other => Error::InvalidWorkbook(other.to_string()),
        }
    }
}
