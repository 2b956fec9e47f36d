use serde::{Deserialize, Serialize};

use crate::CellRef;

/// Where a hyperlink points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HyperlinkTarget {
    /// External URI stored as a relationship.
    External { uri: String },
    /// In-workbook location (`location` attribute), e.g. `Sheet2!A1`.
    Internal { location: String },
}

/// A hyperlink anchored at a single cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    pub anchor: CellRef,
    pub target: HyperlinkTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl Hyperlink {
    pub fn new(anchor: CellRef, target: HyperlinkTarget) -> Self {
        Self {
            anchor,
            target,
            display: None,
            tooltip: None,
        }
    }

    /// True for in-workbook links (the SpreadsheetML location flag).
    pub fn is_location(&self) -> bool {
        matches!(self.target, HyperlinkTarget::Internal { .. })
    }
}
