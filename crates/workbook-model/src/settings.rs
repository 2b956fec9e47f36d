use serde::{Deserialize, Serialize};

fn default_col_width() -> f64 {
    SheetDefaults::DEFAULT_COL_WIDTH
}

fn default_row_height() -> f64 {
    SheetDefaults::DEFAULT_ROW_HEIGHT
}

/// Sheet formatting defaults (SpreadsheetML `sheetFormatPr`).
///
/// Lines without an explicit override report these values. Every field has a
/// serde default so partial configuration documents deserialize cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetDefaults {
    /// Column width in characters of the default font.
    #[serde(default = "default_col_width")]
    pub default_col_width: f64,
    /// Row height in points.
    #[serde(default = "default_row_height")]
    pub default_row_height: f64,
}

impl SheetDefaults {
    pub const DEFAULT_COL_WIDTH: f64 = 9.140625;
    pub const DEFAULT_ROW_HEIGHT: f64 = 15.0;
}

impl Default for SheetDefaults {
    fn default() -> Self {
        Self {
            default_col_width: Self::DEFAULT_COL_WIDTH,
            default_row_height: Self::DEFAULT_ROW_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fill_defaults() {
        let parsed: SheetDefaults = serde_json::from_str(r#"{"default_row_height": 20.5}"#).unwrap();
        assert_eq!(
            parsed,
            SheetDefaults {
                default_col_width: SheetDefaults::DEFAULT_COL_WIDTH,
                default_row_height: 20.5,
            }
        );
        let empty: SheetDefaults = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, SheetDefaults::default());
    }
}
