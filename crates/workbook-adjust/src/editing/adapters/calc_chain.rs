use ahash::AHashMap;
use workbook_model::{CalcChain, CalcChainEntry, CellRef, ModelError, PartState, Workbook};

use super::PlanContext;

pub(crate) struct CalcChainPatch {
    chain: Option<CalcChain>,
}

struct Planned {
    cell: String,
    sheet_id: u32,
    raw_index: u32,
}

pub(crate) fn plan(ctx: &PlanContext<'_>) -> Result<CalcChainPatch, ModelError> {
    let Some(chain) = ctx.workbook.calc_chain.read()? else {
        return Ok(CalcChainPatch { chain: None });
    };
    let edited = ctx.sheet.id;

    let mut planned = Vec::with_capacity(chain.entries.len());
    for (entry, sheet_id) in chain.entries.iter().zip(chain.resolved_indices()) {
        if sheet_id != edited {
            planned.push(Planned {
                cell: entry.cell.clone(),
                sheet_id,
                raw_index: entry.index,
            });
            continue;
        }
        let cell = CellRef::from_a1(&entry.cell)?;
        let Some(moved) = ctx.event.adjust_cell(cell)? else {
            continue;
        };
        planned.push(Planned {
            cell: if moved == cell {
                entry.cell.clone()
            } else {
                moved.to_a1()
            },
            sheet_id,
            raw_index: entry.index,
        });
    }

    Ok(CalcChainPatch {
        chain: Some(CalcChain {
            entries: rebuild(dedup(planned)),
        }),
    })
}

/// Keep one entry per (sheet, cell): the one with the larger written index,
/// the first one on ties.
fn dedup(planned: Vec<Planned>) -> Vec<Planned> {
    let mut winner: AHashMap<(u32, String), usize> = AHashMap::with_capacity(planned.len());
    for (i, entry) in planned.iter().enumerate() {
        let key = (entry.sheet_id, entry.cell.to_ascii_uppercase());
        match winner.get(&key) {
            Some(&best) if planned[best].raw_index >= entry.raw_index => {}
            _ => {
                winner.insert(key, i);
            }
        }
    }
    planned
        .into_iter()
        .enumerate()
        .filter(|(i, entry)| {
            winner.get(&(entry.sheet_id, entry.cell.to_ascii_uppercase())) == Some(i)
        })
        .map(|(_, entry)| entry)
        .collect()
}

/// Re-derive written indices: an inherited (`0`) index stays inherited only
/// while the previous surviving entry is on the same sheet.
fn rebuild(planned: Vec<Planned>) -> Vec<CalcChainEntry> {
    let mut previous = 0;
    planned
        .into_iter()
        .map(|entry| {
            let index = if entry.raw_index == 0 && entry.sheet_id == previous {
                0
            } else {
                entry.sheet_id
            };
            previous = entry.sheet_id;
            CalcChainEntry::new(entry.cell, index)
        })
        .collect()
}

impl CalcChainPatch {
    pub(crate) fn apply(self, workbook: &mut Workbook) {
        if let Some(chain) = self.chain {
            workbook.calc_chain = PartState::Loaded(chain);
        }
    }
}
