use serde::{Deserialize, Serialize};

/// One `<c>` entry of `xl/calcChain.xml`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcChainEntry {
    /// Cell reference text (`r`).
    pub cell: String,
    /// Sheet id (`i`); `0` means the same sheet as the previous entry.
    #[serde(default)]
    pub index: u32,
}

impl CalcChainEntry {
    pub fn new(cell: impl Into<String>, index: u32) -> Self {
        Self {
            cell: cell.into(),
            index,
        }
    }
}

/// Recalculation order recorded by the workbook.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcChain {
    pub entries: Vec<CalcChainEntry>,
}

impl CalcChain {
    /// Sheet id of each entry with inherited (`0`) indices filled in.
    pub fn resolved_indices(&self) -> Vec<u32> {
        let mut current = 0;
        self.entries
            .iter()
            .map(|entry| {
                if entry.index != 0 {
                    current = entry.index;
                }
                current
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_index_inherits_previous_sheet() {
        let chain = CalcChain {
            entries: vec![
                CalcChainEntry::new("A1", 2),
                CalcChainEntry::new("A2", 0),
                CalcChainEntry::new("B1", 1),
                CalcChainEntry::new("B2", 0),
            ],
        };
        assert_eq!(chain.resolved_indices(), vec![2, 2, 1, 1]);
    }
}
