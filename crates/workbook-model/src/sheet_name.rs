use unicode_normalization::UnicodeNormalization;

use crate::ModelError;

/// Excel's maximum sheet name length, in characters.
pub const EXCEL_MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN_SHEET_NAME_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

/// Case-fold a sheet name the way Excel compares them (NFKC, then uppercase).
pub fn sheet_name_casefold(name: &str) -> String {
    name.nfkc().flat_map(char::to_uppercase).collect()
}

pub fn sheet_name_eq_case_insensitive(a: &str, b: &str) -> bool {
    a == b || sheet_name_casefold(a) == sheet_name_casefold(b)
}

/// Validate a worksheet name.
///
/// Names are non-empty, at most 31 characters, contain none of `: \ / ? * [ ]`,
/// and do not begin or end with `'`.
pub fn validate_sheet_name(name: &str) -> Result<(), ModelError> {
    let invalid = || ModelError::InvalidSheetName(name.to_string());
    if name.trim().is_empty() || name.chars().count() > EXCEL_MAX_SHEET_NAME_LEN {
        return Err(invalid());
    }
    if name.contains(FORBIDDEN_SHEET_NAME_CHARS) {
        return Err(invalid());
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(invalid());
    }
    Ok(())
}
