//! `workbook-model` defines the in-memory workbook structures that structural
//! edits operate on: sheets, sparse cells, formulas, and every artifact that
//! owns cell coordinates (merges, autofilters, tables, hyperlinks, dimension
//! overrides, defined names, the calc chain).
//!
//! Records derive `serde` so they can cross IPC boundaries as JSON; runtime
//! caches are skipped during serialization.

mod address;
mod autofilter;
mod calc_chain;
mod cell;
mod error;
mod formula_text;
mod hyperlinks;
mod names;
mod part;
mod record;
mod settings;
mod sheet_name;
pub mod table;
mod workbook;
mod worksheet;

pub use address::{
    column_index, column_name, format_a1, row_index, AnchoredCell, CellRef, Range,
};
pub use autofilter::AutoFilter;
pub use calc_chain::{CalcChain, CalcChainEntry};
pub use cell::{Cell, CellFormula, CellKey, CellValue, FormulaKind, EXCEL_MAX_COLS, EXCEL_MAX_ROWS};
pub use error::{CharsetDecodeError, ModelError};
pub use formula_text::normalize_formula_text;
pub use hyperlinks::{Hyperlink, HyperlinkTarget};
pub use names::{
    validate_defined_name, DefinedName, DefinedNameScope, DefinedNameValidationError,
    EXCEL_DEFINED_NAME_MAX_LEN,
};
pub use part::PartState;
pub use record::RangeRecord;
pub use settings::SheetDefaults;
pub use sheet_name::{
    sheet_name_casefold, sheet_name_eq_case_insensitive, validate_sheet_name,
    EXCEL_MAX_SHEET_NAME_LEN,
};
pub use table::{validate_table_name, Table, TableColumn, TableOptions, TablePart};
pub use workbook::Workbook;
pub use worksheet::{ColProperties, RowProperties, Worksheet, WorksheetId};
