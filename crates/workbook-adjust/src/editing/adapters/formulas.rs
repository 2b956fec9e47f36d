use ahash::AHashMap;
use workbook_model::{CellFormula, CellKey, CellRef, ModelError, Range, Workbook, Worksheet};

use super::PlanContext;
use crate::editing::interval::AdjustEvent;
use crate::editing::ops::{EditResult, FormulaRewrite};
use crate::editing::rewrite::adjust_formula;
use crate::editing::shared::derive_from_master;

struct FormulaUpdate {
    sheet_idx: usize,
    /// Post-edit position; cell storage is spliced before this patch lands.
    cell: CellRef,
    before: String,
    formula: CellFormula,
}

pub(crate) struct FormulasPatch {
    updates: Vec<FormulaUpdate>,
}

/// A shared-formula master as it is now and as it will be after the edit.
struct SharedMaster<'a> {
    cell: CellRef,
    text: &'a str,
    /// New anchor and text; `None` when the master's line is deleted.
    moved: Option<(CellRef, String)>,
}

/// Every shared-formula master on `sheet`, by group index.
fn shared_masters<'a>(
    ctx: &PlanContext<'_>,
    sheet: &'a Worksheet,
    edited: bool,
) -> Result<AHashMap<u32, SharedMaster<'a>>, ModelError> {
    let mut masters = AHashMap::new();
    for (cell, stored) in sheet.iter_cells() {
        let Some(formula) = stored.formula.as_ref() else {
            continue;
        };
        let Some(index) = formula.shared_index().filter(|_| formula.is_shared_master()) else {
            continue;
        };
        let anchor = if edited {
            ctx.event.adjust_cell(cell)?
        } else {
            Some(cell)
        };
        let moved = match anchor {
            Some(anchor) => {
                let (text, _) = adjust_formula(
                    &formula.text,
                    Some(&sheet.name),
                    &ctx.sheet.name,
                    ctx.order,
                    ctx.event,
                )?;
                Some((anchor, text))
            }
            None => None,
        };
        masters.insert(
            index,
            SharedMaster {
                cell,
                text: formula.text.as_str(),
                moved,
            },
        );
    }
    Ok(masters)
}

/// Text of a shared dependent at `cell` (moving to `anchor`) before and after
/// the edit, or `None` while the group's master still derives it correctly.
///
/// The dependent's own text is rewritten and compared with what the adjusted
/// master yields at the new offset; an edit between the two, or between the
/// cells they point at, splits the group.
fn detach_dependent(
    ctx: &PlanContext<'_>,
    sheet: &Worksheet,
    master: &SharedMaster<'_>,
    cell: CellRef,
    anchor: CellRef,
) -> Result<Option<(String, String)>, ModelError> {
    let own = derive_from_master(master.text, master.cell, cell)?;
    let (adjusted, _) = adjust_formula(
        &own,
        Some(&sheet.name),
        &ctx.sheet.name,
        ctx.order,
        ctx.event,
    )?;
    let derived = match &master.moved {
        Some((new_master, new_text)) => derive_from_master(new_text, *new_master, anchor).ok(),
        None => None,
    };
    Ok((derived.as_deref() != Some(adjusted.as_str())).then_some((own, adjusted)))
}

/// New `ref` for an array formula or shared master now anchored at `anchor`.
fn adjust_extent(extent: &str, anchor: CellRef, event: AdjustEvent) -> Result<Option<String>, ModelError> {
    let range = Range::from_a1(extent)?;
    Ok(match event.adjust_range(range)? {
        Some(adjusted) if adjusted == range => None,
        Some(adjusted) => Some(adjusted.to_string()),
        None => Some(anchor.to_a1()),
    })
}

pub(crate) fn plan(ctx: &PlanContext<'_>) -> Result<FormulasPatch, ModelError> {
    let event = ctx.event;
    let mut updates = Vec::new();

    for (sheet_idx, sheet) in ctx.workbook.sheets.iter().enumerate() {
        let edited = sheet_idx == ctx.sheet_idx;
        let masters = shared_masters(ctx, sheet, edited)?;

        for (cell, stored) in sheet.iter_cells() {
            let Some(formula) = stored.formula.as_ref() else {
                continue;
            };
            let anchor = if edited {
                match event.adjust_cell(cell)? {
                    Some(anchor) => anchor,
                    // The cell goes away with its line.
                    None => continue,
                }
            } else {
                cell
            };

            let mut before = formula.text.clone();
            let mut next = formula.clone();
            let master = formula
                .shared_index()
                .filter(|_| formula.is_shared_dependent())
                .and_then(|index| masters.get(&index));
            if let Some(master) = master {
                let detached = detach_dependent(ctx, sheet, master, cell, anchor)?;
                if let Some((own, adjusted)) = detached {
                    before = own;
                    next = CellFormula::normal(&adjusted);
                }
            } else if !next.text.is_empty() {
                let (text, changed) = adjust_formula(
                    &next.text,
                    Some(&sheet.name),
                    &ctx.sheet.name,
                    ctx.order,
                    event,
                )?;
                if changed {
                    next.text = text;
                }
            }

            if edited {
                if let Some(extent) = next.extent.as_deref() {
                    if let Some(extent) = adjust_extent(extent, anchor, event)? {
                        next.extent = Some(extent);
                    }
                }
            }

            if next != *formula {
                updates.push(FormulaUpdate {
                    sheet_idx,
                    cell: anchor,
                    before,
                    formula: next,
                });
            }
        }
    }

    Ok(FormulasPatch { updates })
}

impl FormulasPatch {
    pub(crate) fn apply(self, workbook: &mut Workbook, result: &mut EditResult) {
        for update in self.updates {
            let sheet = &mut workbook.sheets[update.sheet_idx];
            let Some(stored) = sheet.cells.get_mut(&CellKey::from_ref(update.cell)) else {
                continue;
            };
            if update.before != update.formula.text {
                log::trace!(
                    "{}!{}: {} -> {}",
                    sheet.name,
                    update.cell,
                    update.before,
                    update.formula.text
                );
                result.formula_rewrites.push(FormulaRewrite {
                    sheet: sheet.name.clone(),
                    cell: update.cell,
                    before: update.before,
                    after: update.formula.text.clone(),
                });
            }
            stored.formula = Some(update.formula);
        }
    }
}
