use workbook_model::{CellKey, ModelError, Workbook, Worksheet};

use super::adapters::{Adapter, PlanContext};
use super::interval::AdjustEvent;
use super::ops::EditResult;
use super::rewrite::SheetOrder;

/// Reject edits that would push stored cells past the last line.
fn check_bounds(sheet: &Worksheet, event: AdjustEvent) -> Result<(), ModelError> {
    let dir = event.direction;
    if event.pivot >= dir.limit() {
        return Err(dir.overflow());
    }
    if !event.is_insert() {
        return Ok(());
    }
    let furthest = sheet
        .cells
        .keys()
        .map(|key| dir.line_of(key.to_ref()))
        .filter(|line| *line >= event.pivot)
        .max();
    match furthest {
        Some(line) if u64::from(line) + u64::from(event.count()) >= u64::from(dir.limit()) => {
            Err(dir.overflow())
        }
        _ => Ok(()),
    }
}

/// Cell moves for `event`: `(old, Some(new))` for shifted cells, `(old, None)`
/// for cells in deleted lines. Unmoved cells are not listed.
fn plan_splice(
    sheet: &Worksheet,
    event: AdjustEvent,
) -> Result<Vec<(CellKey, Option<CellKey>)>, ModelError> {
    let mut moves = Vec::new();
    if event.magnitude == 0 {
        return Ok(moves);
    }
    for key in sheet.cells.keys() {
        let cell = key.to_ref();
        match event.adjust_cell(cell)? {
            Some(moved) if moved == cell => {}
            moved => moves.push((*key, moved.map(CellKey::from_ref))),
        }
    }
    Ok(moves)
}

fn splice(sheet: &mut Worksheet, moves: Vec<(CellKey, Option<CellKey>)>) {
    // Take every moving cell out first so shifted keys never collide with
    // cells that have yet to move.
    let mut carried = Vec::with_capacity(moves.len());
    for (old, new) in moves {
        if let Some(cell) = sheet.cells.remove(&old) {
            if let Some(new) = new {
                carried.push((new, cell));
            }
        }
    }
    sheet.cells.extend(carried);
}

/// Apply one structural edit to `sheet` and every artifact that refers to it.
///
/// Either every adapter succeeds and the whole edit lands, or the first error
/// is returned and `workbook` is left exactly as it was.
pub fn adjust(
    workbook: &mut Workbook,
    sheet: &str,
    event: AdjustEvent,
) -> Result<EditResult, ModelError> {
    let sheet_idx = workbook
        .sheet_index(sheet)
        .ok_or_else(|| ModelError::SheetNotFound(sheet.to_string()))?;
    log::debug!(
        "adjust {sheet}: {:?} pivot={} magnitude={}",
        event.direction,
        event.pivot,
        event.magnitude
    );

    check_bounds(&workbook.sheets[sheet_idx], event)?;

    let order = SheetOrder::from_workbook(workbook);
    let ctx = PlanContext {
        workbook: &*workbook,
        sheet_idx,
        sheet: &workbook.sheets[sheet_idx],
        order: &order,
        event,
    };
    let moves = plan_splice(ctx.sheet, event)?;
    let patches = Adapter::ORDER
        .iter()
        .map(|adapter| {
            adapter.plan(&ctx).inspect_err(|err| {
                log::debug!("{} rejected the edit on {sheet}: {err}", adapter.name());
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut result = EditResult::default();
    splice(&mut workbook.sheets[sheet_idx], moves);
    for patch in patches {
        patch.apply(workbook, sheet_idx, &mut result);
    }

    log::debug!(
        "adjusted {sheet}: {} formula rewrite(s), {} merge(s) / {} hyperlink(s) / {} table(s) removed, {} table(s) skipped",
        result.formula_rewrites.len(),
        result.removed_merges.len(),
        result.removed_hyperlinks.len(),
        result.removed_tables.len(),
        result.skipped_tables.len()
    );
    Ok(result)
}
