use std::collections::BTreeMap;

use workbook_model::{ColProperties, RowProperties, Worksheet};

use super::PlanContext;
use crate::editing::interval::{adjust_point, AdjustDirection, AdjustEvent};

pub(crate) enum DimensionsPatch {
    Rows(BTreeMap<u32, RowProperties>),
    Columns(BTreeMap<u32, ColProperties>),
}

/// Re-key per-line overrides for `event`.
///
/// Overrides on deleted lines are dropped, and so are overrides pushed past
/// the last line. Inserted lines copy the override of the line just before
/// the pivot, so inserting inside (or right after) a run of equal widths
/// extends the run.
fn rekey<V: Clone>(overrides: &BTreeMap<u32, V>, event: AdjustEvent) -> BTreeMap<u32, V> {
    let limit = event.direction.limit();
    let mut out: BTreeMap<u32, V> = overrides
        .iter()
        .filter_map(|(line, props)| {
            let moved = adjust_point(*line, event.pivot, event.magnitude)?;
            let moved = u32::try_from(moved).ok().filter(|l| *l < limit)?;
            Some((moved, props.clone()))
        })
        .collect();

    if event.is_insert() && event.pivot > 0 {
        if let Some(props) = overrides.get(&(event.pivot - 1)) {
            let last = (u64::from(event.pivot) + u64::from(event.count())).min(u64::from(limit));
            for line in event.pivot..last as u32 {
                out.insert(line, props.clone());
            }
        }
    }
    out
}

pub(crate) fn plan(ctx: &PlanContext<'_>) -> DimensionsPatch {
    match ctx.event.direction {
        AdjustDirection::Rows => DimensionsPatch::Rows(rekey(&ctx.sheet.row_properties, ctx.event)),
        AdjustDirection::Columns => {
            DimensionsPatch::Columns(rekey(&ctx.sheet.col_properties, ctx.event))
        }
    }
}

impl DimensionsPatch {
    pub(crate) fn apply(self, sheet: &mut Worksheet) {
        match self {
            DimensionsPatch::Rows(rows) => sheet.row_properties = rows,
            DimensionsPatch::Columns(cols) => sheet.col_properties = cols,
        }
    }
}
