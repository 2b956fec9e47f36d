use serde::{Deserialize, Serialize};

use crate::RangeRecord;

/// Worksheet-level autofilter (`<autoFilter ref="...">`).
///
/// Only the filtered extent is modelled; criteria are carried by the package
/// layer and keyed by column offset within `area`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoFilter {
    pub area: RangeRecord,
}

impl AutoFilter {
    pub fn new(area: impl Into<RangeRecord>) -> Self {
        Self { area: area.into() }
    }
}
