use workbook_model::{DefinedNameScope, ModelError, Workbook};

use super::PlanContext;
use crate::editing::rewrite::adjust_formula;

pub(crate) struct DefinedNamesPatch {
    updates: Vec<(usize, String)>,
}

pub(crate) fn plan(ctx: &PlanContext<'_>) -> Result<DefinedNamesPatch, ModelError> {
    let mut updates = Vec::new();
    for (i, name) in ctx.workbook.defined_names.iter().enumerate() {
        // Unqualified references in a sheet-scoped name resolve against that sheet.
        let scope_sheet = match name.scope {
            DefinedNameScope::Workbook => None,
            DefinedNameScope::Sheet(id) => ctx.workbook.sheet(id).map(|s| s.name.as_str()),
        };
        let (refers_to, changed) = adjust_formula(
            &name.refers_to,
            scope_sheet,
            &ctx.sheet.name,
            ctx.order,
            ctx.event,
        )?;
        if changed {
            log::trace!("defined name {}: {} -> {refers_to}", name.name, name.refers_to);
            updates.push((i, refers_to));
        }
    }
    Ok(DefinedNamesPatch { updates })
}

impl DefinedNamesPatch {
    pub(crate) fn apply(self, workbook: &mut Workbook) {
        for (i, refers_to) in self.updates {
            workbook.defined_names[i].refers_to = refers_to;
        }
    }
}
