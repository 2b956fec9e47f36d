use workbook_model::{ModelError, PartState, Range, Table, TablePart, Worksheet};

use super::PlanContext;
use crate::editing::interval::{AdjustDirection, AdjustEvent};
use crate::editing::ops::EditResult;

pub(crate) struct TablesPatch {
    tables: Vec<TablePart>,
    removed: Vec<String>,
    skipped: Vec<String>,
}

enum TableOutcome {
    Keep,
    Replace(Table),
    Remove,
}

/// Columns of the table that the edit inserts or deletes, as
/// `(offset within the table, count)`.
fn column_change(area: Range, event: AdjustEvent) -> Option<(usize, u32)> {
    if event.direction != AdjustDirection::Columns {
        return None;
    }
    let (start, end) = (area.start.col, area.end.col);
    if event.is_insert() {
        // Inserting at the first column shifts the table instead of growing it.
        return (event.pivot > start && event.pivot <= end)
            .then(|| ((event.pivot - start) as usize, event.count()));
    }
    let (first, last) = event.deleted_span()?;
    let (lo, hi) = (first.max(start), last.min(end));
    (lo <= hi).then(|| ((lo - start) as usize, hi - lo + 1))
}

fn adjust_table(table: &Table, area: Range, event: AdjustEvent) -> Result<TableOutcome, ModelError> {
    if table.header_row().is_some_and(|row| {
        event.direction == AdjustDirection::Rows && event.deletes_line(row)
    }) {
        return Ok(TableOutcome::Remove);
    }
    let Some(adjusted) = event.adjust_range(area)? else {
        return Ok(TableOutcome::Remove);
    };
    if adjusted == area {
        return Ok(TableOutcome::Keep);
    }

    let mut table = table.clone();
    if let Some((offset, count)) = column_change(area, event) {
        if event.is_insert() {
            table.insert_columns(offset, count);
        } else {
            table.remove_columns(offset, count);
        }
    }
    if table.totals_row_count > 0
        && event.direction == AdjustDirection::Rows
        && event.deletes_line(area.end.row)
    {
        table.totals_row_count = 0;
    }
    table.set_area(adjusted);
    Ok(TableOutcome::Replace(table))
}

pub(crate) fn plan(ctx: &PlanContext<'_>) -> Result<TablesPatch, ModelError> {
    let mut tables = Vec::with_capacity(ctx.sheet.tables.len());
    let mut removed = Vec::new();
    let mut skipped = Vec::new();

    for part in &ctx.sheet.tables {
        let table = match &part.content {
            PartState::Loaded(table) => table,
            PartState::Missing => {
                log::warn!("table part {} is missing; leaving it as is", part.path);
                skipped.push(part.path.clone());
                tables.push(part.clone());
                continue;
            }
            PartState::Undecodable(err) => {
                log::warn!("skipping table part {}: {err}", part.path);
                skipped.push(part.path.clone());
                tables.push(part.clone());
                continue;
            }
        };
        let area = match table.area.range() {
            Ok(area) => area,
            Err(err) => {
                log::warn!(
                    "skipping table {} with unusable ref {:?}: {err}",
                    table.name,
                    table.area.reference()
                );
                skipped.push(table.name.clone());
                tables.push(part.clone());
                continue;
            }
        };

        match adjust_table(table, area, ctx.event)? {
            TableOutcome::Keep => tables.push(part.clone()),
            TableOutcome::Replace(table) => tables.push(TablePart {
                path: part.path.clone(),
                content: PartState::Loaded(table),
            }),
            TableOutcome::Remove => removed.push(table.name.clone()),
        }
    }

    Ok(TablesPatch {
        tables,
        removed,
        skipped,
    })
}

impl TablesPatch {
    pub(crate) fn apply(self, sheet: &mut Worksheet, result: &mut EditResult) {
        for name in &self.removed {
            log::debug!("removed table {name} from {}", sheet.name);
        }
        sheet.tables = self.tables;
        result.removed_tables.extend(self.removed);
        result.skipped_tables.extend(self.skipped);
    }
}
