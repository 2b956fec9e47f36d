use pretty_assertions::assert_eq;
use proptest::prelude::*;
use workbook_model::{
    column_index, column_name, format_a1, AnchoredCell, CellRef, ModelError, Range,
    EXCEL_MAX_COLS, EXCEL_MAX_ROWS,
};

#[test]
fn parse_failures_name_the_offending_text() {
    for (text, err) in [
        ("A", ModelError::InvalidCellReference("A".into())),
        ("1", ModelError::InvalidCellReference("1".into())),
        ("A0", ModelError::InvalidCellReference("A0".into())),
        ("A1B", ModelError::InvalidCellReference("A1B".into())),
        ("XFE1", ModelError::ColumnOverflow),
        ("A1048577", ModelError::RowOverflow),
    ] {
        assert_eq!(CellRef::from_a1(text), Err(err), "{text}");
    }

    assert_eq!(
        Range::from_a1("A:B1"),
        Err(ModelError::InvalidCellReference("A".into()))
    );
    assert_eq!(
        Range::from_a1("A1:B"),
        Err(ModelError::InvalidCellReference("B".into()))
    );
}

#[test]
fn anchors_and_case() {
    let cell = AnchoredCell::from_a1("$b$12").unwrap();
    assert_eq!(cell.cell, CellRef::new(11, 1));
    assert!(cell.col_abs && cell.row_abs);
    assert_eq!(cell.to_a1(), "$B$12");
    assert_eq!(format_a1(2, 0, false, true), "C$1");
    assert_eq!(Range::from_a1("c3").unwrap().to_string(), "C3");
}

#[test]
fn sheet_edges() {
    let last = CellRef::new(EXCEL_MAX_ROWS - 1, EXCEL_MAX_COLS - 1);
    assert_eq!(last.to_a1(), "XFD1048576");
    assert_eq!(column_index("XFD"), Ok(EXCEL_MAX_COLS - 1));
    assert_eq!(column_name(0), "A");
    assert_eq!(column_name(26), "AA");
}

fn cell() -> impl Strategy<Value = CellRef> {
    (0..EXCEL_MAX_ROWS, 0..EXCEL_MAX_COLS).prop_map(|(row, col)| CellRef::new(row, col))
}

proptest! {
    #![proptest_config(ProptestConfig {
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn cell_a1_roundtrips(cell in cell()) {
        prop_assert_eq!(CellRef::from_a1(&cell.to_a1()), Ok(cell));
    }

    #[test]
    fn column_names_roundtrip(col in 0..EXCEL_MAX_COLS) {
        prop_assert_eq!(column_index(&column_name(col)), Ok(col));
    }

    #[test]
    fn ranges_format_normalized(a in cell(), b in cell()) {
        let text = format!("{}:{}", a.to_a1(), b.to_a1());
        let range = Range::from_a1(&text).unwrap();
        prop_assert_eq!(range, Range::new(a, b));
        prop_assert!(range.start.row <= range.end.row && range.start.col <= range.end.col);
        prop_assert_eq!(Range::from_a1(&range.to_string()), Ok(range));
    }
}
