use workbook_model::{CellRef, Hyperlink, ModelError, Worksheet};

use super::PlanContext;
use crate::editing::ops::EditResult;

pub(crate) struct HyperlinksPatch {
    hyperlinks: Vec<Hyperlink>,
    removed: Vec<CellRef>,
}

pub(crate) fn plan(ctx: &PlanContext<'_>) -> Result<HyperlinksPatch, ModelError> {
    let mut hyperlinks = Vec::with_capacity(ctx.sheet.hyperlinks.len());
    let mut removed = Vec::new();
    for link in &ctx.sheet.hyperlinks {
        match ctx.event.adjust_cell(link.anchor)? {
            Some(anchor) => hyperlinks.push(Hyperlink {
                anchor,
                ..link.clone()
            }),
            None => removed.push(link.anchor),
        }
    }
    Ok(HyperlinksPatch {
        hyperlinks,
        removed,
    })
}

impl HyperlinksPatch {
    pub(crate) fn apply(self, sheet: &mut Worksheet, result: &mut EditResult) {
        sheet.hyperlinks = self.hyperlinks;
        result.removed_hyperlinks.extend(self.removed);
    }
}
