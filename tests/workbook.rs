mod common;

use cardsheet::{Error, REQUIRED_COLUMNS, Record, TextLocation, Workbook, records_from_table};
use common::{Cell, XlsxBuilder, header};

fn open(bytes: Vec<u8>) -> Workbook {
    Workbook::from_bytes(bytes).expect("open workbook")
}

#[test]
fn lists_sheets_in_workbook_order() {
    let bytes = XlsxBuilder::new()
        .sheet("Zeta", common::roster(1, |_| None))
        .sheet("Alpha", common::roster(2, |_| None))
        .build();
    let wb = open(bytes);
    assert_eq!(wb.sheet_names(), vec!["Zeta", "Alpha"]);
}

#[test]
fn reads_the_selected_sheet() {
    let bytes = XlsxBuilder::new()
        .sheet("One", common::roster(1, |_| None))
        .sheet("Two", common::roster(3, |_| Some("Maple")))
        .build();
    let mut wb = open(bytes);
    let table = wb.sheet("Two").unwrap();
    assert_eq!(table.name, "Two");
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[0].sheet_row, 2);

    let records = records_from_table(&table).unwrap();
    assert_eq!(
        records[2],
        Record::new("Last2", "First2", "102 Main St", "Springfield").with_subdivision("Maple")
    );
}

#[test]
fn unknown_sheet_lists_available_ones() {
    let mut wb = open(XlsxBuilder::new().sheet("Roster", common::roster(1, |_| None)).build());
    match wb.sheet("Nope") {
        Err(Error::SheetNotFound { name, available }) => {
            assert_eq!(name, "Nope");
            assert_eq!(available, vec!["Roster"]);
        }
        other => panic!("expected SheetNotFound, got {:?}", other.map(|t| t.name)),
    }
}

#[test]
fn cell_types_become_text() {
    let rows = vec![
        header(&["Last_Name", "First_Name", "Address", "City", "Subdivision_Name"]),
        vec![
            Cell::Inline("O'Brien & Sons"),
            Cell::Bool(true),
            Cell::Number(4521.0),
            Cell::Number(2.5),
            Cell::Number(7.0),
        ],
    ];
    let mut wb = open(XlsxBuilder::new().sheet("S", rows).build());
    let records = records_from_table(&wb.sheet("S").unwrap()).unwrap();
    assert_eq!(records[0].last_name, "O'Brien & Sons");
    assert_eq!(records[0].first_name, "TRUE");
    assert_eq!(records[0].address, "4521");
    assert_eq!(records[0].city, "2.5");
    assert_eq!(records[0].subdivision.as_deref(), Some("7"));
}

#[test]
fn blank_cells_and_rows() {
    let rows = vec![
        header(&["Last_Name", "First_Name", "Address", "City", "Subdivision_Name"]),
        vec![Cell::Text("Kim"), Cell::Empty, Cell::Text("9 Pine"), Cell::Text("Ames"), Cell::Text("  ")],
        vec![Cell::Empty, Cell::Empty, Cell::Empty],
        vec![Cell::Text("Lee"), Cell::Text("Bo"), Cell::Text("3 Fir"), Cell::Text("Ames"), Cell::Text(" East ")],
    ];
    let mut wb = open(XlsxBuilder::new().sheet("S", rows).build());
    let table = wb.sheet("S").unwrap();
    assert_eq!(table.rows.len(), 2);

    let records = records_from_table(&table).unwrap();
    assert_eq!(records[0].first_name, "");
    assert_eq!(records[0].full_name(), "Kim, ");
    assert_eq!(records[0].subdivision, None);
    assert_eq!(records[1].subdivision.as_deref(), Some("East"));
}

#[test]
fn subdivision_column_is_optional_and_columns_may_be_reordered() {
    let rows = vec![
        header(&["City", "Notes", "Address", "First_Name", "Last_Name"]),
        vec![Cell::Text("Ames"), Cell::Text("x"), Cell::Text("1 Elm"), Cell::Text("Al"), Cell::Text("Ng")],
    ];
    let mut wb = open(XlsxBuilder::new().sheet("S", rows).build());
    let records = records_from_table(&wb.sheet("S").unwrap()).unwrap();
    assert_eq!(records, vec![Record::new("Ng", "Al", "1 Elm", "Ames")]);
}

#[test]
fn missing_required_column_names_all_four() {
    let rows = vec![
        header(&["Last_Name", "First_Name", "Street", "City"]),
        vec![Cell::Text("A"), Cell::Text("B"), Cell::Text("C"), Cell::Text("D")],
    ];
    let mut wb = open(XlsxBuilder::new().sheet("S", rows).build());
    let err = records_from_table(&wb.sheet("S").unwrap()).unwrap_err();
    match &err {
        Error::MissingColumns { required, missing } => {
            assert_eq!(required, &REQUIRED_COLUMNS.to_vec());
            assert_eq!(missing, &vec!["Address".to_string()]);
        }
        other => panic!("expected MissingColumns, got {other}"),
    }
    let msg = err.to_string();
    for col in REQUIRED_COLUMNS {
        assert!(msg.contains(col), "{msg}");
    }
    assert!(msg.ends_with("(missing: Address)"), "{msg}");
}

#[test]
fn header_match_is_case_sensitive() {
    let rows = vec![header(&["last_name", "First_Name", "Address", "City"])];
    let mut wb = open(XlsxBuilder::new().sheet("S", rows).build());
    assert!(matches!(
        records_from_table(&wb.sheet("S").unwrap()),
        Err(Error::MissingColumns { .. })
    ));
}

#[test]
fn unencodable_cell_is_rejected_with_its_position() {
    let rows = vec![
        header(&["Last_Name", "First_Name", "Address", "City"]),
        vec![Cell::Text("Ok"), Cell::Text("Fine"), Cell::Text("1 Elm"), Cell::Text("Ames")],
        vec![Cell::Text("Nguyễn"), Cell::Text("An"), Cell::Text("2 Elm"), Cell::Text("Ames")],
    ];
    let mut wb = open(XlsxBuilder::new().sheet("S", rows).build());
    match records_from_table(&wb.sheet("S").unwrap()) {
        Err(Error::Unencodable { ch, location, .. }) => {
            assert_eq!(ch, 'ễ');
            assert_eq!(
                location,
                Some(TextLocation::Cell {
                    row: 3,
                    column: "Last_Name".into()
                })
            );
        }
        other => panic!("expected Unencodable, got {other:?}"),
    }
}

#[test]
fn latin1_text_is_accepted() {
    let rows = vec![
        header(&["Last_Name", "First_Name", "Address", "City"]),
        vec![Cell::Text("Müller"), Cell::Text("José"), Cell::Text("5 Côte"), Cell::Text("Zürich")],
    ];
    let mut wb = open(XlsxBuilder::new().sheet("S", rows).build());
    let records = records_from_table(&wb.sheet("S").unwrap()).unwrap();
    assert_eq!(records[0].full_name(), "Müller, José");
}

#[test]
fn preview_shows_header_and_first_rows() {
    let mut wb = open(XlsxBuilder::new().sheet("S", common::roster(10, |_| None)).build());
    let table = wb.sheet("S").unwrap();
    let preview = table.preview(2);
    let lines: Vec<&str> = preview.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Last_Name\tFirst_Name\tAddress\tCity\tSubdivision_Name");
    assert_eq!(lines[1], "Last0\tFirst0\t100 Main St\tSpringfield\t");
    assert_eq!(table.head(50).len(), 10);
}

#[test]
fn not_a_zip_is_an_invalid_workbook() {
    assert!(matches!(
        Workbook::from_bytes(b"definitely not a workbook".to_vec()),
        Err(Error::InvalidWorkbook(_))
    ));
}
