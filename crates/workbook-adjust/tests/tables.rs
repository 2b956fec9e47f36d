use pretty_assertions::assert_eq;
use workbook_adjust::{insert_cols, remove_col, remove_row};
use workbook_model::{
    CharsetDecodeError, ModelError, PartState, RangeRecord, Table, TableOptions, TablePart,
    Workbook,
};

fn workbook_with_tables(refs: &[&str]) -> Workbook {
    let mut wb = Workbook::new();
    wb.add_sheet("Sheet1").unwrap();
    for reference in refs {
        wb.add_table("Sheet1", reference, TableOptions::default())
            .unwrap();
    }
    wb
}

fn tables(wb: &Workbook) -> Vec<(String, String)> {
    wb.sheet_by_name("Sheet1")
        .unwrap()
        .tables()
        .map(|t| (t.name.clone(), t.area.reference().to_string()))
        .collect()
}

fn table<'a>(wb: &'a Workbook, name: &str) -> &'a Table {
    wb.table_by_name(name).unwrap().1
}

fn column_names(table: &Table) -> Vec<&str> {
    table.columns.iter().map(|c| c.name.as_str()).collect()
}

fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
    list.iter()
        .map(|(n, r)| (n.to_string(), r.to_string()))
        .collect()
}

#[test]
fn tables_shift_shrink_and_drop_with_their_header_row() {
    let mut wb = workbook_with_tables(&["B2:C3", "E3:F5", "H5:H8", "J5:K9"]);

    let result = remove_row(&mut wb, "Sheet1", 1).unwrap();
    assert_eq!(result.removed_tables, vec!["Table1".to_string()]);
    assert_eq!(
        tables(&wb),
        pairs(&[("Table2", "E2:F4"), ("Table3", "H4:H7"), ("Table4", "J4:K8")])
    );

    remove_row(&mut wb, "Sheet1", 2).unwrap();
    assert_eq!(
        tables(&wb),
        pairs(&[("Table2", "E2:F3"), ("Table3", "H3:H6"), ("Table4", "J3:K7")])
    );

    let result = remove_row(&mut wb, "Sheet1", 2).unwrap();
    assert_eq!(
        result.removed_tables,
        vec!["Table3".to_string(), "Table4".to_string()]
    );
    assert_eq!(tables(&wb), pairs(&[("Table2", "E2:F2")]));

    let result = remove_col(&mut wb, "Sheet1", 7).unwrap();
    assert!(result.removed_tables.is_empty());
    assert_eq!(tables(&wb), pairs(&[("Table2", "E2:F2")]));
    assert_eq!(table(&wb, "Table2").auto_filter.as_ref().unwrap().reference(), "E2:F2");
}

#[test]
fn columns_follow_edits_inside_the_table() {
    let mut wb = workbook_with_tables(&["B2:D5"]);
    assert_eq!(column_names(table(&wb, "Table1")), ["Column1", "Column2", "Column3"]);

    insert_cols(&mut wb, "Sheet1", 2, 1).unwrap();
    let t = table(&wb, "Table1");
    assert_eq!(t.area.reference(), "B2:E5");
    assert_eq!(column_names(t), ["Column1", "Column4", "Column2", "Column3"]);
    assert_eq!(t.auto_filter.as_ref().unwrap().reference(), "B2:E5");

    remove_col(&mut wb, "Sheet1", 1).unwrap();
    let t = table(&wb, "Table1");
    assert_eq!(t.area.reference(), "B2:D5");
    assert_eq!(column_names(t), ["Column4", "Column2", "Column3"]);

    // Inserting at the first column moves the whole table.
    insert_cols(&mut wb, "Sheet1", 1, 2).unwrap();
    let t = table(&wb, "Table1");
    assert_eq!(t.area.reference(), "D2:F5");
    assert_eq!(column_names(t), ["Column4", "Column2", "Column3"]);
}

#[test]
fn deleting_the_totals_row_clears_it() {
    let mut wb = workbook_with_tables(&["A1:B4"]);
    for part in &mut wb.sheets[0].tables {
        if let PartState::Loaded(table) = &mut part.content {
            table.totals_row_count = 1;
        }
    }

    remove_row(&mut wb, "Sheet1", 1).unwrap();
    assert_eq!(table(&wb, "Table1").totals_row_count, 1);

    remove_row(&mut wb, "Sheet1", 2).unwrap();
    let t = table(&wb, "Table1");
    assert_eq!(t.area.reference(), "A1:B2");
    assert_eq!(t.totals_row_count, 0);
}

#[test]
fn unreadable_table_parts_are_skipped() {
    let mut wb = Workbook::new();
    wb.add_sheet("Sheet1").unwrap();
    wb.add_table("Sheet1", "A1:D5", TableOptions::default())
        .unwrap();
    let path = wb.sheets[0].tables[0].path.clone();

    wb.sheets[0].tables[0].content = PartState::Missing;
    let result = remove_row(&mut wb, "Sheet1", 0).unwrap();
    assert_eq!(result.skipped_tables, vec![path.clone()]);
    assert!(result.removed_tables.is_empty());

    wb.sheets[0].tables[0].content =
        PartState::Undecodable(CharsetDecodeError::new(path.as_str(), "unsupported charset"));
    let result = remove_row(&mut wb, "Sheet1", 0).unwrap();
    assert_eq!(result.skipped_tables, vec![path.clone()]);

    let mut broken = Table {
        area: RangeRecord::from_reference("-"),
        ..table_template()
    };
    broken.auto_filter = None;
    wb.sheets[0].tables[0] = TablePart {
        path: path.clone(),
        content: PartState::Loaded(broken.clone()),
    };
    let result = remove_row(&mut wb, "Sheet1", 0).unwrap();
    assert_eq!(result.skipped_tables, vec!["Broken".to_string()]);
    assert_eq!(wb.sheets[0].tables[0].table(), Some(&broken));
}

fn table_template() -> Table {
    let mut wb = workbook_with_tables(&[]);
    wb.add_table(
        "Sheet1",
        "A1:A2",
        TableOptions {
            name: Some("Broken".to_string()),
            ..TableOptions::default()
        },
    )
    .unwrap();
    table(&wb, "Broken").clone()
}

#[test]
fn tables_pushed_past_the_last_column_fail() {
    let mut wb = workbook_with_tables(&["XFC1:XFD3"]);
    let before = wb.clone();
    assert_eq!(insert_cols(&mut wb, "Sheet1", 0, 1), Err(ModelError::ColumnOverflow));
    assert_eq!(wb, before);
}
