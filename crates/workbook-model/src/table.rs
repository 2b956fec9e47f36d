use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::names::{looks_like_a1_cell_reference, looks_like_r1c1_cell_reference};
use crate::{ModelError, PartState, Range, RangeRecord};

/// Maximum table name length in characters.
pub const EXCEL_TABLE_NAME_MAX_LEN: usize = 255;

/// Validate an Excel table name (ListObject name).
///
/// - Names are non-empty and at most 255 characters.
/// - The first character must be a letter or `_`.
/// - Remaining characters may be letters, digits, `_`, or `.` (no spaces).
/// - Names may not look like A1 or R1C1 references, nor be `TRUE`/`FALSE`.
///
/// Workbook-wide uniqueness is enforced by [`crate::Workbook::add_table`].
pub fn validate_table_name(name: &str) -> Result<(), ModelError> {
    let invalid = || ModelError::InvalidTableName(name.to_string());
    if name.is_empty() || name.chars().count() > EXCEL_TABLE_NAME_MAX_LEN {
        return Err(invalid());
    }

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(invalid());
    };
    if !(first.is_alphabetic() || first == '_') {
        return Err(invalid());
    }
    if !chars.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '.') {
        return Err(invalid());
    }

    if looks_like_a1_cell_reference(name) || looks_like_r1c1_cell_reference(name) {
        return Err(invalid());
    }
    if name.eq_ignore_ascii_case("TRUE") || name.eq_ignore_ascii_case("FALSE") {
        return Err(invalid());
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: u32,
    pub name: String,
    pub display_name: String,
    /// Table extent (`ref`), headers and totals included.
    pub area: RangeRecord,
    pub header_row_count: u32,
    pub totals_row_count: u32,
    pub columns: Vec<TableColumn>,
    /// The table's own autofilter `ref`; follows `area`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_filter: Option<RangeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,
}

fn parse_default_column_number(name: &str) -> Option<u32> {
    let prefix = name.get(..6).filter(|p| p.eq_ignore_ascii_case("column"))?;
    let digits = &name[prefix.len()..];
    // Only canonical `Column{n}` collides with generated names (`Column01` does not).
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse().ok()
}

impl Table {
    /// Row holding the header cells, if the table shows one.
    pub fn header_row(&self) -> Option<u32> {
        if self.header_row_count == 0 {
            return None;
        }
        self.area.range().ok().map(|r| r.start.row)
    }

    /// Insert `count` generated columns before column `offset` (relative to the table).
    ///
    /// Generated names follow Excel's `Column{n}` scheme, skipping numbers already used.
    pub fn insert_columns(&mut self, offset: usize, count: u32) {
        let mut used: HashSet<u32> = self
            .columns
            .iter()
            .filter_map(|c| parse_default_column_number(&c.name))
            .collect();
        let mut next_id = self.columns.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let mut next_default: u32 = 1;
        let offset = offset.min(self.columns.len());

        let generated: Vec<TableColumn> = (0..count)
            .map(|_| {
                let name = loop {
                    let n = next_default;
                    next_default = next_default.saturating_add(1);
                    if used.insert(n) {
                        break format!("Column{n}");
                    }
                };
                let column = TableColumn { id: next_id, name };
                next_id += 1;
                column
            })
            .collect();
        self.columns.splice(offset..offset, generated);
    }

    /// Remove `count` columns starting at column `offset` (relative to the table).
    pub fn remove_columns(&mut self, offset: usize, count: u32) {
        let start = offset.min(self.columns.len());
        let end = start.saturating_add(count as usize).min(self.columns.len());
        self.columns.drain(start..end);
    }

    /// Move the table to `range`, keeping its autofilter in step.
    pub fn set_area(&mut self, range: Range) {
        self.area.set(range);
        if let Some(filter) = self.auto_filter.as_mut() {
            filter.set(range);
        }
    }
}

/// A table part referenced from a worksheet.
///
/// Table parts load lazily; a part that is missing or undecodable stays in
/// the worksheet untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePart {
    /// Package path, e.g. `xl/tables/table1.xml`.
    pub path: String,
    pub content: PartState<Table>,
}

impl TablePart {
    pub fn table(&self) -> Option<&Table> {
        self.content.loaded()
    }

    /// Table id, read from the loaded table or else from the `tableN.xml` path.
    pub fn id(&self) -> Option<u32> {
        if let Some(table) = self.table() {
            return Some(table.id);
        }
        let file = self.path.rsplit('/').next()?;
        file.strip_prefix("table")?
            .strip_suffix(".xml")?
            .parse()
            .ok()
    }
}

fn show_header_row_default() -> bool {
    true
}

/// Options accepted by [`crate::Workbook::add_table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Table name; `Table{n}` is generated when absent.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub style_name: Option<String>,
    #[serde(default = "show_header_row_default")]
    pub show_header_row: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            name: None,
            style_name: None,
            show_header_row: true,
        }
    }
}
