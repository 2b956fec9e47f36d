use serde::{Deserialize, Serialize};

use crate::{ModelError, Range};

/// A rectangle owned by a worksheet artifact (merge, autofilter, table).
///
/// The textual `ref` is authoritative on disk; the parsed rectangle is a
/// runtime cache that is filled whenever the record is built from a [`Range`].
/// Records read back from storage have no cache and are parsed on demand, so a
/// malformed `ref` only surfaces when something needs the rectangle.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeRecord {
    reference: String,
    #[serde(skip)]
    cached: Option<Range>,
}

impl RangeRecord {
    pub fn new(range: Range) -> Self {
        Self {
            reference: range.to_string(),
            cached: Some(range),
        }
    }

    /// Wrap a stored `ref` without validating it.
    pub fn from_reference(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            cached: None,
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn range(&self) -> Result<Range, ModelError> {
        match self.cached {
            Some(range) => Ok(range),
            None => Range::from_a1(&self.reference),
        }
    }

    pub fn set(&mut self, range: Range) {
        *self = Self::new(range);
    }
}

impl PartialEq for RangeRecord {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

impl Eq for RangeRecord {}

impl From<Range> for RangeRecord {
    fn from(value: Range) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_reference_is_parsed_lazily() {
        let record = RangeRecord::from_reference("A1:B");
        assert_eq!(record.reference(), "A1:B");
        assert_eq!(
            record.range(),
            Err(ModelError::InvalidCellReference("B".into()))
        );

        let record = RangeRecord::from_reference("B3:A2");
        assert_eq!(record.range().unwrap().to_string(), "A2:B3");
    }

    #[test]
    fn serializes_as_plain_reference() {
        let record = RangeRecord::new(Range::from_a1("C1:D4").unwrap());
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, "\"C1:D4\"");
        let back: RangeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
