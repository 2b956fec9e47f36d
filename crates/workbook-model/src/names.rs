use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::WorksheetId;

/// Maximum length of a defined name in characters (Excel-compatible).
pub const EXCEL_DEFINED_NAME_MAX_LEN: usize = 255;

/// Scope of a defined name (workbook-scoped or worksheet-scoped).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "worksheet_id", rename_all = "snake_case")]
pub enum DefinedNameScope {
    Workbook,
    Sheet(WorksheetId),
}

/// A workbook- or sheet-scoped defined name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinedName {
    pub name: String,
    pub scope: DefinedNameScope,
    /// Definition formula, stored **without** leading `=`.
    pub refers_to: String,
}

/// Excel-compatible validation errors for defined names.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DefinedNameValidationError {
    #[error("defined name cannot be empty")]
    Empty,
    #[error("defined name is too long ({len} > {max})")]
    TooLong { len: usize, max: usize },
    #[error("invalid first character '{0}' (must start with a letter, '_' or '\\')")]
    InvalidStartCharacter(char),
    #[error("invalid character '{ch}' at index {index}")]
    InvalidCharacter { ch: char, index: usize },
    #[error("defined name cannot look like a cell reference (e.g. A1 or R1C1)")]
    LooksLikeCellReference,
}

pub(crate) fn looks_like_a1_cell_reference(name: &str) -> bool {
    let bytes = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
        i += 1;
    }

    // Excel columns are 1-3 letters.
    if i == 0 || i > 3 {
        return false;
    }

    let digit_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }

    digit_start != i && i == bytes.len()
}

pub(crate) fn looks_like_r1c1_cell_reference(name: &str) -> bool {
    if name.eq_ignore_ascii_case("r") || name.eq_ignore_ascii_case("c") {
        return true;
    }

    let bytes = name.as_bytes();
    let Some((&first, rest)) = bytes.split_first() else {
        return false;
    };
    match first.to_ascii_uppercase() {
        b'R' => {
            let mut i = 0;
            while i < rest.len() && rest[i].is_ascii_digit() {
                i += 1;
            }
            if i == rest.len() {
                return i > 0;
            }
            if rest[i].to_ascii_uppercase() != b'C' {
                return false;
            }
            rest[i + 1..].iter().all(u8::is_ascii_digit)
        }
        b'C' => !rest.is_empty() && rest.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

/// Validate an Excel-compatible defined name.
///
/// - must not be empty or longer than [`EXCEL_DEFINED_NAME_MAX_LEN`]
/// - must start with a letter, `_`, or `\`
/// - remaining characters may be letters, digits, `_`, or `.`
/// - must not match an A1 or R1C1-style cell reference
pub fn validate_defined_name(name: &str) -> Result<(), DefinedNameValidationError> {
    if name.is_empty() {
        return Err(DefinedNameValidationError::Empty);
    }

    let len = name.chars().count();
    if len > EXCEL_DEFINED_NAME_MAX_LEN {
        return Err(DefinedNameValidationError::TooLong {
            len,
            max: EXCEL_DEFINED_NAME_MAX_LEN,
        });
    }

    if looks_like_a1_cell_reference(name) || looks_like_r1c1_cell_reference(name) {
        return Err(DefinedNameValidationError::LooksLikeCellReference);
    }

    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        if !(first.is_alphabetic() || first == '_' || first == '\\') {
            return Err(DefinedNameValidationError::InvalidStartCharacter(first));
        }
    }

    for (index, ch) in name.chars().enumerate().skip(1) {
        if !(ch.is_alphabetic() || ch.is_ascii_digit() || ch == '_' || ch == '.') {
            return Err(DefinedNameValidationError::InvalidCharacter { ch, index });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_excel_name_rules() {
        assert!(validate_defined_name("Amount").is_ok());
        assert!(validate_defined_name("_xlnm._FilterDatabase").is_ok());
        assert!(validate_defined_name("\\Back").is_ok());
        assert_eq!(
            validate_defined_name("A1"),
            Err(DefinedNameValidationError::LooksLikeCellReference)
        );
        assert_eq!(
            validate_defined_name("R2C3"),
            Err(DefinedNameValidationError::LooksLikeCellReference)
        );
        assert_eq!(
            validate_defined_name("1st"),
            Err(DefinedNameValidationError::InvalidStartCharacter('1'))
        );
        assert_eq!(
            validate_defined_name("my name"),
            Err(DefinedNameValidationError::InvalidCharacter { ch: ' ', index: 2 })
        );
    }
}
