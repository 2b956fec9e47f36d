mod adapters;
mod apply;
mod dispatch;
mod duplicate;
pub mod interval;
mod ops;
mod rewrite;
mod shared;
pub mod tokenize;

pub use adapters::Adapter;
pub use apply::{
    apply_operation, duplicate_row_to, insert_cols, insert_rows, remove_col, remove_row,
};
pub use dispatch::adjust;
pub use interval::{adjust_interval, adjust_point, AdjustDirection, AdjustEvent};
pub use ops::{EditOp, EditResult, FormulaRewrite};
pub use rewrite::{
    adjust_formula, rewrite_formula_for_copy_delta, rewrite_formula_for_row_duplicate, SheetOrder,
};
pub use shared::cell_formula;
pub use tokenize::{render, tokenize, FormulaToken, REF_ERROR};
