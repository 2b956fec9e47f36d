use workbook_model::{AutoFilter, ModelError, Range, RangeRecord, Worksheet};

use super::PlanContext;
use crate::editing::interval::AdjustDirection;

pub(crate) struct AutoFilterPatch {
    auto_filter: Option<AutoFilter>,
}

pub(crate) fn plan(ctx: &PlanContext<'_>) -> Result<AutoFilterPatch, ModelError> {
    let Some(filter) = ctx.sheet.auto_filter.as_ref() else {
        return Ok(AutoFilterPatch { auto_filter: None });
    };
    let range = filter.area.range()?;
    let event = ctx.event;

    let area = match event.adjust_range(range)? {
        Some(adjusted) if adjusted == range => filter.area.clone(),
        Some(adjusted) => RangeRecord::new(adjusted),
        // Every filtered line was deleted: keep the filter on the line that
        // now sits at the pivot.
        None => RangeRecord::new(pin_to_line(range, event.direction, event.pivot)),
    };
    Ok(AutoFilterPatch {
        auto_filter: Some(AutoFilter { area }),
    })
}

fn pin_to_line(range: Range, direction: AdjustDirection, line: u32) -> Range {
    let mut pinned = range;
    match direction {
        AdjustDirection::Rows => {
            pinned.start.row = line;
            pinned.end.row = line;
        }
        AdjustDirection::Columns => {
            pinned.start.col = line;
            pinned.end.col = line;
        }
    }
    pinned
}

impl AutoFilterPatch {
    pub(crate) fn apply(self, sheet: &mut Worksheet) {
        sheet.auto_filter = self.auto_filter;
    }
}
