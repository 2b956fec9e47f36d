use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A package part whose bytes could not be decoded with their declared charset.
///
/// Produced by the package reader; the model only carries it around so callers
/// can decide whether a broken part is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("cannot decode part {part}: {message}")]
pub struct CharsetDecodeError {
    /// Package path of the part (e.g. `xl/tables/table1.xml`).
    pub part: String,
    pub message: String,
}

impl CharsetDecodeError {
    pub fn new(part: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            part: part.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by model mutators and structural edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The carried token is the exact text that failed to parse (for ranges,
    /// the failing half).
    #[error("cannot convert cell {0:?} to coordinates: invalid cell reference")]
    InvalidCellReference(String),
    #[error("the column number must be greater than or equal to 1 and less than or equal to 16384")]
    ColumnOverflow,
    #[error("row number exceeds maximum limit of 1048576")]
    RowOverflow,
    #[error("invalid table name {0:?}")]
    InvalidTableName(String),
    #[error("table name {0:?} already exists in the workbook")]
    DuplicateTableName(String),
    #[error("invalid defined name {0:?}")]
    InvalidDefinedName(String),
    #[error("defined name {0:?} already exists in scope")]
    DuplicateDefinedName(String),
    #[error("invalid sheet name {0:?}")]
    InvalidSheetName(String),
    #[error("sheet name {0:?} is already in use")]
    DuplicateSheetName(String),
    #[error("sheet {0} does not exist")]
    SheetNotFound(String),
    #[error("range {0} overlaps an existing merged range")]
    OverlappingMerge(String),
    #[error("row/column count must be greater than zero")]
    InvalidCount,
    #[error(transparent)]
    CharsetDecode(#[from] CharsetDecodeError),
}
