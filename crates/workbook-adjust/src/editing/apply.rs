use workbook_model::{ModelError, Workbook};

use super::dispatch::adjust;
use super::duplicate::duplicate_row;
use super::interval::{AdjustDirection, AdjustEvent};
use super::ops::{EditOp, EditResult};

fn structural(
    workbook: &mut Workbook,
    sheet: &str,
    event: AdjustEvent,
) -> Result<EditResult, ModelError> {
    if event.magnitude == 0 {
        return Err(ModelError::InvalidCount);
    }
    adjust(workbook, sheet, event)
}

/// Apply `op` to `workbook` as a single transaction.
pub fn apply_operation(workbook: &mut Workbook, op: EditOp) -> Result<EditResult, ModelError> {
    match op {
        EditOp::InsertRows { sheet, row, count } => structural(
            workbook,
            &sheet,
            AdjustEvent::insert(AdjustDirection::Rows, row, count),
        ),
        EditOp::DeleteRows { sheet, row, count } => structural(
            workbook,
            &sheet,
            AdjustEvent::delete(AdjustDirection::Rows, row, count),
        ),
        EditOp::InsertCols { sheet, col, count } => structural(
            workbook,
            &sheet,
            AdjustEvent::insert(AdjustDirection::Columns, col, count),
        ),
        EditOp::DeleteCols { sheet, col, count } => structural(
            workbook,
            &sheet,
            AdjustEvent::delete(AdjustDirection::Columns, col, count),
        ),
        EditOp::DuplicateRow { sheet, src, dst } => duplicate_row(workbook, &sheet, src, dst),
    }
}

/// Insert `count` empty rows before row `row` (0-indexed).
pub fn insert_rows(
    workbook: &mut Workbook,
    sheet: &str,
    row: u32,
    count: u32,
) -> Result<EditResult, ModelError> {
    apply_operation(
        workbook,
        EditOp::InsertRows {
            sheet: sheet.to_string(),
            row,
            count,
        },
    )
}

/// Delete row `row` (0-indexed).
pub fn remove_row(workbook: &mut Workbook, sheet: &str, row: u32) -> Result<EditResult, ModelError> {
    apply_operation(
        workbook,
        EditOp::DeleteRows {
            sheet: sheet.to_string(),
            row,
            count: 1,
        },
    )
}

/// Insert `count` empty columns before column `col` (0-indexed).
pub fn insert_cols(
    workbook: &mut Workbook,
    sheet: &str,
    col: u32,
    count: u32,
) -> Result<EditResult, ModelError> {
    apply_operation(
        workbook,
        EditOp::InsertCols {
            sheet: sheet.to_string(),
            col,
            count,
        },
    )
}

/// Delete column `col` (0-indexed).
pub fn remove_col(workbook: &mut Workbook, sheet: &str, col: u32) -> Result<EditResult, ModelError> {
    apply_operation(
        workbook,
        EditOp::DeleteCols {
            sheet: sheet.to_string(),
            col,
            count: 1,
        },
    )
}

/// Insert a copy of row `src` as a new row at `dst` (both 0-indexed).
pub fn duplicate_row_to(
    workbook: &mut Workbook,
    sheet: &str,
    src: u32,
    dst: u32,
) -> Result<EditResult, ModelError> {
    apply_operation(
        workbook,
        EditOp::DuplicateRow {
            sheet: sheet.to_string(),
            src,
            dst,
        },
    )
}
