use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    AutoFilter, Cell, CellFormula, CellKey, CellRef, CellValue, Hyperlink, HyperlinkTarget,
    ModelError, Range, RangeRecord, SheetDefaults, TablePart, EXCEL_MAX_COLS, EXCEL_MAX_ROWS,
};

/// Identifier for a worksheet (the SpreadsheetML `sheetId`).
pub type WorksheetId = u32;

/// Per-column overrides (`<col>`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default)]
    pub hidden: bool,
}

/// Per-row overrides (`<row ht=... hidden=...>`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RowProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub hidden: bool,
}

fn check_cell(cell: CellRef) -> Result<CellKey, ModelError> {
    if cell.row >= EXCEL_MAX_ROWS {
        return Err(ModelError::RowOverflow);
    }
    if cell.col >= EXCEL_MAX_COLS {
        return Err(ModelError::ColumnOverflow);
    }
    Ok(CellKey::from_ref(cell))
}

/// A worksheet: sparse cells plus every artifact that owns coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    pub id: WorksheetId,
    pub name: String,
    #[serde(default)]
    pub cells: BTreeMap<CellKey, Cell>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged_cells: Vec<RangeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_filter: Option<AutoFilter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<TablePart>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hyperlinks: Vec<Hyperlink>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub col_properties: BTreeMap<u32, ColProperties>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub row_properties: BTreeMap<u32, RowProperties>,
    #[serde(default)]
    pub defaults: SheetDefaults,
}

impl Worksheet {
    pub fn new(id: WorksheetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            cells: BTreeMap::new(),
            merged_cells: Vec::new(),
            auto_filter: None,
            tables: Vec::new(),
            hyperlinks: Vec::new(),
            col_properties: BTreeMap::new(),
            row_properties: BTreeMap::new(),
            defaults: SheetDefaults::default(),
        }
    }

    pub fn cell(&self, cell: CellRef) -> Option<&Cell> {
        self.cells.get(&CellKey::from_ref(cell))
    }

    pub fn value(&self, cell: CellRef) -> CellValue {
        self.cell(cell)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    pub fn formula(&self, cell: CellRef) -> Option<&CellFormula> {
        self.cell(cell).and_then(|c| c.formula.as_ref())
    }

    /// Set a literal value, clearing any formula on the cell.
    pub fn set_value(&mut self, cell: CellRef, value: CellValue) -> Result<(), ModelError> {
        let key = check_cell(cell)?;
        if value == CellValue::Empty {
            self.cells.remove(&key);
        } else {
            self.cells.insert(key, Cell::with_value(value));
        }
        Ok(())
    }

    /// Attach a formula, keeping the cell's cached value.
    pub fn set_formula(&mut self, cell: CellRef, formula: CellFormula) -> Result<(), ModelError> {
        let key = check_cell(cell)?;
        self.cells.entry(key).or_default().formula = Some(formula);
        Ok(())
    }

    pub fn clear_cell(&mut self, cell: CellRef) -> Option<Cell> {
        self.cells.remove(&CellKey::from_ref(cell))
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (CellRef, &Cell)> + '_ {
        self.cells.iter().map(|(k, c)| (k.to_ref(), c))
    }

    /// Cells of one row, left to right.
    pub fn row_cells(&self, row: u32) -> impl Iterator<Item = (CellRef, &Cell)> + '_ {
        let (first, last) = CellKey::row_bounds(row.min(EXCEL_MAX_ROWS - 1));
        self.cells
            .range(first..=last)
            .map(|(k, c)| (k.to_ref(), c))
    }

    /// Merge `range`, rejecting overlaps with existing merges. Single cells are a no-op.
    pub fn merge_cells(&mut self, range: Range) -> Result<(), ModelError> {
        check_cell(range.end)?;
        if range.is_single_cell() {
            return Ok(());
        }
        for existing in &self.merged_cells {
            if existing.range()?.intersects(&range) {
                return Err(ModelError::OverlappingMerge(range.to_string()));
            }
        }
        self.merged_cells.push(RangeRecord::new(range));
        Ok(())
    }

    /// Remove every merge intersecting `range`; returns how many were removed.
    pub fn unmerge_cells(&mut self, range: Range) -> usize {
        let before = self.merged_cells.len();
        self.merged_cells
            .retain(|m| !m.range().is_ok_and(|r| r.intersects(&range)));
        before - self.merged_cells.len()
    }

    pub fn merged_range_at(&self, cell: CellRef) -> Option<Range> {
        self.merged_cells
            .iter()
            .filter_map(|m| m.range().ok())
            .find(|r| r.contains(cell))
    }

    pub fn set_auto_filter(&mut self, range: Range) -> Result<(), ModelError> {
        check_cell(range.end)?;
        self.auto_filter = Some(AutoFilter::new(range));
        Ok(())
    }

    pub fn clear_auto_filter(&mut self) -> Option<AutoFilter> {
        self.auto_filter.take()
    }

    /// Set the hyperlink anchored at `cell`, replacing any existing one.
    pub fn set_hyperlink(
        &mut self,
        cell: CellRef,
        target: HyperlinkTarget,
    ) -> Result<(), ModelError> {
        check_cell(cell)?;
        self.hyperlinks.retain(|h| h.anchor != cell);
        self.hyperlinks.push(Hyperlink::new(cell, target));
        Ok(())
    }

    pub fn hyperlink(&self, cell: CellRef) -> Option<&Hyperlink> {
        self.hyperlinks.iter().find(|h| h.anchor == cell)
    }

    pub fn remove_hyperlink(&mut self, cell: CellRef) -> Option<Hyperlink> {
        let idx = self.hyperlinks.iter().position(|h| h.anchor == cell)?;
        Some(self.hyperlinks.remove(idx))
    }

    /// Set the width of columns `first..=last` (0-indexed, either order).
    pub fn set_col_width(&mut self, first: u32, last: u32, width: f64) -> Result<(), ModelError> {
        let (first, last) = if first <= last { (first, last) } else { (last, first) };
        if last >= EXCEL_MAX_COLS {
            return Err(ModelError::ColumnOverflow);
        }
        for col in first..=last {
            self.col_properties.entry(col).or_default().width = Some(width);
        }
        Ok(())
    }

    /// Effective width of `col`: its override, else the sheet default.
    pub fn col_width(&self, col: u32) -> f64 {
        self.col_properties
            .get(&col)
            .and_then(|p| p.width)
            .unwrap_or(self.defaults.default_col_width)
    }

    pub fn set_row_height(&mut self, row: u32, height: f64) -> Result<(), ModelError> {
        if row >= EXCEL_MAX_ROWS {
            return Err(ModelError::RowOverflow);
        }
        self.row_properties.entry(row).or_default().height = Some(height);
        Ok(())
    }

    pub fn row_height(&self, row: u32) -> f64 {
        self.row_properties
            .get(&row)
            .and_then(|p| p.height)
            .unwrap_or(self.defaults.default_row_height)
    }

    /// Loaded tables on this sheet (missing or undecodable parts are skipped).
    pub fn tables(&self) -> impl Iterator<Item = &crate::Table> + '_ {
        self.tables.iter().filter_map(TablePart::table)
    }
}
