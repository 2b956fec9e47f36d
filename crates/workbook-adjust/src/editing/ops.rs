use workbook_model::{CellRef, Range};

/// High-level structural edit operation, intended to behave like Excel.
///
/// Rows and columns are 0-indexed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOp {
    InsertRows { sheet: String, row: u32, count: u32 },
    DeleteRows { sheet: String, row: u32, count: u32 },
    InsertCols { sheet: String, col: u32, count: u32 },
    DeleteCols { sheet: String, col: u32, count: u32 },
    /// Insert a copy of row `src` as a new row at `dst`.
    DuplicateRow { sheet: String, src: u32, dst: u32 },
}

impl EditOp {
    pub fn sheet(&self) -> &str {
        match self {
            EditOp::InsertRows { sheet, .. }
            | EditOp::DeleteRows { sheet, .. }
            | EditOp::InsertCols { sheet, .. }
            | EditOp::DeleteCols { sheet, .. }
            | EditOp::DuplicateRow { sheet, .. } => sheet,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormulaRewrite {
    pub sheet: String,
    /// Cell holding the formula after the edit.
    pub cell: CellRef,
    pub before: String,
    pub after: String,
}

/// What a structural edit changed beyond plain coordinate shifts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditResult {
    pub formula_rewrites: Vec<FormulaRewrite>,
    /// Merges collapsed by a deletion.
    pub removed_merges: Vec<Range>,
    /// Anchors (pre-edit) of hyperlinks whose cell was deleted.
    pub removed_hyperlinks: Vec<CellRef>,
    pub removed_tables: Vec<String>,
    /// Tables left untouched because their part could not be read.
    pub skipped_tables: Vec<String>,
}
