//! Shared-formula resolution.
//!
//! A shared formula stores its text once, on the master cell. Every other cell
//! of the group carries only the group index; its effective text is the
//! master's text moved by the offset between the two cells.

use workbook_model::{CellFormula, CellRef, ModelError, Workbook, Worksheet};

use super::rewrite::rewrite_formula_for_copy_delta;

/// The master cell of shared group `index` on `sheet`.
pub(crate) fn shared_master(sheet: &Worksheet, index: u32) -> Option<(CellRef, &CellFormula)> {
    sheet.iter_cells().find_map(|(cell, stored)| {
        let formula = stored.formula.as_ref()?;
        (formula.is_shared_master() && formula.shared_index() == Some(index))
            .then_some((cell, formula))
    })
}

/// Text of `master_text` (written at `master`) as seen from `cell`.
pub(crate) fn derive_from_master(
    master_text: &str,
    master: CellRef,
    cell: CellRef,
) -> Result<String, ModelError> {
    let delta_row = i64::from(cell.row) - i64::from(master.row);
    let delta_col = i64::from(cell.col) - i64::from(master.col);
    rewrite_formula_for_copy_delta(master_text, delta_row, delta_col).map(|(text, _)| text)
}

/// Effective text of `formula` stored at `cell`.
///
/// A dependent whose master cannot be found resolves to empty text.
pub(crate) fn resolve_formula_text(
    sheet: &Worksheet,
    cell: CellRef,
    formula: &CellFormula,
) -> Result<String, ModelError> {
    let Some(index) = formula.shared_index().filter(|_| formula.is_shared_dependent()) else {
        return Ok(formula.text.clone());
    };
    match shared_master(sheet, index) {
        Some((master, master_formula)) => derive_from_master(&master_formula.text, master, cell),
        None => Ok(String::new()),
    }
}

/// Formula text of `cell` on `sheet`, deriving shared-formula dependents from
/// their master. `Ok(None)` when the cell holds no formula.
pub fn cell_formula(
    workbook: &Workbook,
    sheet: &str,
    cell: CellRef,
) -> Result<Option<String>, ModelError> {
    let ws = workbook
        .sheet_by_name(sheet)
        .ok_or_else(|| ModelError::SheetNotFound(sheet.to_string()))?;
    ws.formula(cell)
        .map(|formula| resolve_formula_text(ws, cell, formula))
        .transpose()
}
