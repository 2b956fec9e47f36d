use workbook_model::{
    Cell, CellFormula, CellKey, CellRef, FormulaKind, ModelError, Range, RowProperties, Workbook,
    EXCEL_MAX_ROWS,
};

use super::dispatch::adjust;
use super::interval::{AdjustDirection, AdjustEvent};
use super::ops::EditResult;
use super::rewrite::{rewrite_formula_for_row_duplicate, SheetOrder};
use super::shared::resolve_formula_text;

/// Everything copied out of the source row before the insertion.
struct RowCopy {
    cells: Vec<(u32, Cell)>,
    properties: Option<RowProperties>,
    /// Column spans of merges confined to the source row.
    merges: Vec<(u32, u32)>,
}

fn copy_formula(formula: &CellFormula, text: String, dst: CellRef) -> CellFormula {
    let single_cell_array = formula.kind == FormulaKind::Array
        && formula
            .extent
            .as_deref()
            .and_then(|extent| Range::from_a1(extent).ok())
            .is_some_and(|extent| extent.is_single_cell());
    if single_cell_array {
        CellFormula {
            kind: FormulaKind::Array,
            text,
            extent: Some(dst.to_a1()),
        }
    } else {
        CellFormula {
            kind: FormulaKind::Normal,
            text,
            extent: None,
        }
    }
}

fn copy_row(
    workbook: &Workbook,
    sheet_idx: usize,
    src: u32,
    dst: u32,
) -> Result<RowCopy, ModelError> {
    let sheet = &workbook.sheets[sheet_idx];
    let order = SheetOrder::from_workbook(workbook);
    let delta = i64::from(dst) - i64::from(src);

    let mut cells = Vec::new();
    for (cell, stored) in sheet.row_cells(src) {
        let mut copy = stored.clone();
        if let Some(formula) = stored.formula.as_ref() {
            let text = resolve_formula_text(sheet, cell, formula)?;
            let (text, _) = rewrite_formula_for_row_duplicate(&text, &sheet.name, &order, delta)?;
            copy.formula = Some(copy_formula(formula, text, CellRef::new(dst, cell.col)));
        }
        cells.push((cell.col, copy));
    }

    let merges = sheet
        .merged_cells
        .iter()
        .filter_map(|record| record.range().ok())
        .filter(|range| range.start.row == src && range.end.row == src)
        .map(|range| (range.start.col, range.end.col))
        .collect();

    Ok(RowCopy {
        cells,
        properties: sheet.row_properties.get(&src).cloned(),
        merges,
    })
}

/// Insert a copy of row `src` at row `dst` (0-indexed) on `sheet`.
///
/// The copy is taken before the insertion: values, formulas (moved so they
/// refer to the new row the way the source referred to its own), the row's
/// height and visibility, and merges confined to the row. `src == dst` is a
/// no-op.
pub fn duplicate_row(
    workbook: &mut Workbook,
    sheet: &str,
    src: u32,
    dst: u32,
) -> Result<EditResult, ModelError> {
    let sheet_idx = workbook
        .sheet_index(sheet)
        .ok_or_else(|| ModelError::SheetNotFound(sheet.to_string()))?;
    if src >= EXCEL_MAX_ROWS || dst >= EXCEL_MAX_ROWS {
        return Err(ModelError::RowOverflow);
    }
    if src == dst {
        return Ok(EditResult::default());
    }

    let copy = copy_row(workbook, sheet_idx, src, dst)?;
    let result = adjust(workbook, sheet, AdjustEvent::insert(AdjustDirection::Rows, dst, 1))?;

    let ws = &mut workbook.sheets[sheet_idx];
    for (col, cell) in copy.cells {
        ws.cells.insert(CellKey::new(dst, col), cell);
    }
    match copy.properties {
        Some(props) => {
            ws.row_properties.insert(dst, props);
        }
        None => {
            ws.row_properties.remove(&dst);
        }
    }
    for (first, last) in copy.merges {
        let range = Range::new(CellRef::new(dst, first), CellRef::new(dst, last));
        if let Err(err) = ws.merge_cells(range) {
            log::debug!("not duplicating merge {range} on {}: {err}", ws.name);
        }
    }
    Ok(result)
}
