use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{CellRef, Range};

/// Excel-compatible maximum rows per worksheet (1,048,576).
pub const EXCEL_MAX_ROWS: u32 = 1_048_576;

/// Excel-compatible maximum columns per worksheet (16,384).
pub const EXCEL_MAX_COLS: u32 = 16_384;

const COL_BITS: u32 = 14; // 2^14 = 16,384 columns.
const COL_MASK: u64 = (1u64 << COL_BITS) - 1;

/// Compact key used for sparse cell storage.
///
/// The key is a packed `(row, col)` pair into a `u64`:
///
/// ```text
/// key = (row << 14) | col
/// ```
///
/// Keys therefore sort row-major, so a `BTreeMap<CellKey, _>` range query
/// yields one row at a time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(transparent)]
pub struct CellKey(u64);

impl CellKey {
    /// Encode a `(row, col)` coordinate. Callers keep coordinates within Excel bounds.
    #[inline]
    pub fn new(row: u32, col: u32) -> Self {
        debug_assert!(row < EXCEL_MAX_ROWS, "row out of Excel bounds: {row}");
        debug_assert!(col < EXCEL_MAX_COLS, "col out of Excel bounds: {col}");
        Self((u64::from(row) << COL_BITS) | (u64::from(col) & COL_MASK))
    }

    /// Decode the row component (0-indexed).
    #[inline]
    pub const fn row(self) -> u32 {
        (self.0 >> COL_BITS) as u32
    }

    /// Decode the column component (0-indexed).
    #[inline]
    pub const fn col(self) -> u32 {
        (self.0 & COL_MASK) as u32
    }

    #[inline]
    pub const fn to_ref(self) -> CellRef {
        CellRef::new(self.row(), self.col())
    }

    #[inline]
    pub fn from_ref(cell: CellRef) -> Self {
        Self::new(cell.row, cell.col)
    }

    /// First and last key of a row, for `BTreeMap::range`.
    pub fn row_bounds(row: u32) -> (Self, Self) {
        (Self::new(row, 0), Self::new(row, EXCEL_MAX_COLS - 1))
    }
}

impl<'de> Deserialize<'de> for CellKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(deserializer)?;
        let row = raw >> COL_BITS;
        if row >= u64::from(EXCEL_MAX_ROWS) {
            return Err(D::Error::custom(format!(
                "CellKey row out of Excel bounds: {row}"
            )));
        }
        Ok(CellKey(raw))
    }
}

impl From<CellRef> for CellKey {
    fn from(value: CellRef) -> Self {
        Self::from_ref(value)
    }
}

/// A cell's cached value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    String(String),
    Boolean(bool),
    /// Error literal such as `#REF!`.
    Error(String),
}

/// How a formula is attached to its cell (SpreadsheetML `<f t="...">`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormulaKind {
    #[default]
    Normal,
    Array,
    /// Member of a shared-formula group identified by `index` (`si`).
    Shared { index: u32 },
}

/// Formula stored on a cell.
///
/// `text` is canonical (trimmed, no leading `=`). Dependents of a shared
/// formula carry empty text and no extent; their text derives from the group's
/// master cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellFormula {
    #[serde(default)]
    pub kind: FormulaKind,
    #[serde(default)]
    pub text: String,
    /// `ref` attribute for array formulas and shared-formula masters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<String>,
}

impl CellFormula {
    pub fn normal(text: &str) -> Self {
        Self {
            kind: FormulaKind::Normal,
            text: crate::normalize_formula_text(text),
            extent: None,
        }
    }

    pub fn array(text: &str, extent: Range) -> Self {
        Self {
            kind: FormulaKind::Array,
            text: crate::normalize_formula_text(text),
            extent: Some(extent.to_string()),
        }
    }

    pub fn shared_master(index: u32, text: &str, extent: Range) -> Self {
        Self {
            kind: FormulaKind::Shared { index },
            text: crate::normalize_formula_text(text),
            extent: Some(extent.to_string()),
        }
    }

    pub fn shared_dependent(index: u32) -> Self {
        Self {
            kind: FormulaKind::Shared { index },
            text: String::new(),
            extent: None,
        }
    }

    pub fn shared_index(&self) -> Option<u32> {
        match self.kind {
            FormulaKind::Shared { index } => Some(index),
            _ => None,
        }
    }

    #[inline]
    pub fn is_shared_dependent(&self) -> bool {
        self.shared_index().is_some() && self.text.is_empty()
    }

    #[inline]
    pub fn is_shared_master(&self) -> bool {
        self.shared_index().is_some() && !self.text.is_empty()
    }
}

/// A stored cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub value: CellValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<CellFormula>,
}

impl Cell {
    pub fn with_value(value: CellValue) -> Self {
        Self {
            value,
            formula: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value == CellValue::Empty && self.formula.is_none()
    }
}
