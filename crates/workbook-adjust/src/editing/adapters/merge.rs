use workbook_model::{ModelError, Range, RangeRecord, Worksheet};

use super::PlanContext;
use crate::editing::ops::EditResult;

pub(crate) struct MergePatch {
    merged_cells: Vec<RangeRecord>,
    removed: Vec<Range>,
}

pub(crate) fn plan(ctx: &PlanContext<'_>) -> Result<MergePatch, ModelError> {
    let mut merged_cells = Vec::with_capacity(ctx.sheet.merged_cells.len());
    let mut removed = Vec::new();
    for record in &ctx.sheet.merged_cells {
        let range = record.range()?;
        match ctx.event.adjust_range(range)? {
            Some(adjusted) if adjusted == range => merged_cells.push(record.clone()),
            // A merge shrunk to one cell is no longer a merge.
            Some(adjusted) if !adjusted.is_single_cell() => {
                merged_cells.push(RangeRecord::new(adjusted));
            }
            _ => removed.push(range),
        }
    }
    Ok(MergePatch {
        merged_cells,
        removed,
    })
}

impl MergePatch {
    pub(crate) fn apply(self, sheet: &mut Worksheet, result: &mut EditResult) {
        if !self.removed.is_empty() {
            log::debug!(
                "removed {} collapsed merge(s) on {}",
                self.removed.len(),
                sheet.name
            );
        }
        sheet.merged_cells = self.merged_cells;
        result.removed_merges.extend(self.removed);
    }
}
