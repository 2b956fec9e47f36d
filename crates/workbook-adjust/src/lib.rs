#![forbid(unsafe_code)]
#![deny(unreachable_patterns)]

//! Structural edits for [`workbook_model`] workbooks: inserting and deleting
//! rows and columns, and duplicating rows.
//!
//! A structural edit moves more than cells. Every artifact that records a
//! coordinate on the edited sheet must follow: merged ranges, the sheet
//! autofilter, tables, hyperlinks, row heights and column widths, the calc
//! chain, and formulas and defined names anywhere in the workbook that refer
//! into the sheet.
//!
//! Edits are transactional. [`editing::adjust`] plans every artifact against
//! the unmodified workbook and only writes once all of them succeeded; an
//! error (for example a reference pushed past column `XFD`) leaves the
//! workbook exactly as it was.
//!
//! ```
//! use workbook_adjust::{cell_formula, insert_rows};
//! use workbook_model::{CellFormula, CellRef, Workbook};
//!
//! let mut wb = Workbook::new();
//! wb.add_sheet("Sheet1").unwrap();
//! wb.sheet_by_name_mut("Sheet1")
//!     .unwrap()
//!     .set_formula(CellRef::new(0, 0), CellFormula::normal("=A3+A4"))
//!     .unwrap();
//!
//! // Insert one row above row 3.
//! insert_rows(&mut wb, "Sheet1", 2, 1).unwrap();
//! assert_eq!(
//!     cell_formula(&wb, "Sheet1", CellRef::new(0, 0)).unwrap().as_deref(),
//!     Some("A4+A5")
//! );
//! ```

pub mod editing;

pub use editing::{
    adjust, apply_operation, cell_formula, duplicate_row_to, insert_cols, insert_rows,
    remove_col, remove_row, AdjustDirection, AdjustEvent, EditOp, EditResult, FormulaRewrite,
};
