use pretty_assertions::assert_eq;
use workbook_adjust::{insert_cols, insert_rows, remove_col, remove_row};
use workbook_model::{column_index, CellRef, CellValue, SheetDefaults, Workbook};

const SHEET: &str = "Sheet1";

/// Columns J:T at width 5, with a text cell on row 1 of each.
fn preset() -> Workbook {
    let mut wb = Workbook::new();
    wb.add_sheet(SHEET).unwrap();
    let sheet = wb.sheet_by_name_mut(SHEET).unwrap();
    sheet
        .set_col_width(col("J"), col("T"), 5.0)
        .unwrap();
    for c in col("J")..=col("T") {
        let cell = CellRef::new(0, c);
        sheet
            .set_value(cell, CellValue::String(cell.to_a1()))
            .unwrap();
    }
    wb
}

fn col(name: &str) -> u32 {
    column_index(name).unwrap()
}

fn assert_widths(wb: &Workbook, expected: &[(&str, f64)], label: &str) {
    let sheet = wb.sheet_by_name(SHEET).unwrap();
    for (name, width) in expected {
        assert_eq!(sheet.col_width(col(name)), *width, "{label}: column {name}");
    }
}

#[test]
fn inserted_columns_extend_the_run_they_land_in() {
    let default = SheetDefaults::default().default_col_width;
    let cases: [(&str, u32, Vec<(&str, f64)>); 7] = [
        ("B", 2, vec![("J", default), ("K", default), ("U", 5.0), ("V", 5.0), ("W", default)]),
        ("J", 2, vec![("J", default), ("K", default), ("U", 5.0), ("V", 5.0), ("W", default)]),
        ("O", 2, vec![("O", 5.0), ("P", 5.0), ("U", 5.0), ("V", 5.0), ("W", default)]),
        ("O", 5, vec![("O", 5.0), ("S", 5.0), ("X", 5.0), ("Y", 5.0), ("Z", default)]),
        ("O", 6, vec![("O", 5.0), ("S", 5.0), ("X", 5.0), ("Y", 5.0), ("AA", default)]),
        ("U", 2, vec![("U", 5.0), ("V", 5.0), ("W", default)]),
        ("V", 2, vec![("U", default), ("V", default), ("W", default)]),
    ];
    for (at, count, expected) in cases {
        let mut wb = preset();
        insert_cols(&mut wb, SHEET, col(at), count).unwrap();
        assert_widths(&wb, &expected, &format!("insert {count} at {at}"));
    }
}

#[test]
fn removed_columns_take_their_width_with_them() {
    let default = SheetDefaults::default().default_col_width;
    let cases: [(&str, Vec<(&str, f64)>); 4] = [
        ("B", vec![("H", default), ("I", 5.0), ("S", 5.0), ("T", default)]),
        ("J", vec![("I", default), ("J", 5.0), ("S", 5.0), ("T", default)]),
        ("O", vec![("I", default), ("O", 5.0), ("S", 5.0), ("T", default)]),
        ("T", vec![("R", 5.0), ("S", 5.0), ("T", default), ("U", default)]),
    ];
    for (at, expected) in cases {
        let mut wb = preset();
        remove_col(&mut wb, SHEET, col(at)).unwrap();
        assert_widths(&wb, &expected, &format!("remove {at}"));
    }
}

#[test]
fn removing_every_custom_column() {
    let mut wb = preset();
    wb.sheet_by_name_mut(SHEET)
        .unwrap()
        .set_col_width(col("I"), col("I"), 8.0)
        .unwrap();
    for _ in 0..=12 {
        remove_col(&mut wb, SHEET, col("I")).unwrap();
    }
    let sheet = wb.sheet_by_name(SHEET).unwrap();
    assert!(sheet.col_properties.is_empty());
    for c in col("I")..=col("U") {
        assert_eq!(sheet.col_width(c), sheet.defaults.default_col_width);
    }

    wb.sheet_by_name_mut(SHEET).unwrap().col_properties.clear();
    remove_col(&mut wb, SHEET, 0).unwrap();
}

#[test]
fn cells_move_with_their_columns() {
    let mut wb = preset();
    insert_cols(&mut wb, SHEET, col("B"), 2).unwrap();
    let sheet = wb.sheet_by_name(SHEET).unwrap();
    assert_eq!(sheet.value(CellRef::new(0, col("L"))), CellValue::String("J1".into()));
    assert_eq!(sheet.value(CellRef::new(0, col("V"))), CellValue::String("T1".into()));
    assert_eq!(sheet.value(CellRef::new(0, col("J"))), CellValue::Empty);
}

#[test]
fn row_heights_follow_row_edits() {
    let mut wb = Workbook::new();
    wb.add_sheet(SHEET).unwrap();
    let sheet = wb.sheet_by_name_mut(SHEET).unwrap();
    for row in 2..=4 {
        sheet.set_row_height(row, 30.0).unwrap();
    }

    insert_rows(&mut wb, SHEET, 3, 1).unwrap();
    let heights = |wb: &Workbook| -> Vec<u32> {
        wb.sheet_by_name(SHEET)
            .unwrap()
            .row_properties
            .keys()
            .copied()
            .collect()
    };
    assert_eq!(heights(&wb), vec![2, 3, 4, 5]);

    remove_row(&mut wb, SHEET, 0).unwrap();
    assert_eq!(heights(&wb), vec![1, 2, 3, 4]);

    // Inserting directly above the run does not extend it.
    insert_rows(&mut wb, SHEET, 1, 2).unwrap();
    assert_eq!(heights(&wb), vec![3, 4, 5, 6]);
    let sheet = wb.sheet_by_name(SHEET).unwrap();
    assert_eq!(sheet.row_height(3), 30.0);
    assert_eq!(sheet.row_height(1), sheet.defaults.default_row_height);
}
