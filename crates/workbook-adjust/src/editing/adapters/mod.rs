//! Owners of cell coordinates, adjusted one after another for each edit.
//!
//! Every adapter plans against a shared `&Workbook` and returns a [`Patch`];
//! nothing is written until all adapters have planned successfully.

mod autofilter;
mod calc_chain;
mod defined_names;
mod dimensions;
mod formulas;
mod hyperlinks;
mod merge;
mod tables;

use workbook_model::{ModelError, Workbook, Worksheet};

use super::interval::AdjustEvent;
use super::ops::EditResult;
use super::rewrite::SheetOrder;

/// Read-only view handed to every adapter while planning.
pub(crate) struct PlanContext<'a> {
    pub workbook: &'a Workbook,
    pub sheet_idx: usize,
    pub sheet: &'a Worksheet,
    pub order: &'a SheetOrder,
    pub event: AdjustEvent,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Adapter {
    MergeCells,
    AutoFilter,
    Tables,
    Hyperlinks,
    Dimensions,
    Formulas,
    CalcChain,
    DefinedNames,
}

impl Adapter {
    /// Planning order.
    pub const ORDER: [Adapter; 8] = [
        Adapter::MergeCells,
        Adapter::AutoFilter,
        Adapter::Tables,
        Adapter::Hyperlinks,
        Adapter::Dimensions,
        Adapter::Formulas,
        Adapter::CalcChain,
        Adapter::DefinedNames,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Adapter::MergeCells => "merge_cells",
            Adapter::AutoFilter => "auto_filter",
            Adapter::Tables => "tables",
            Adapter::Hyperlinks => "hyperlinks",
            Adapter::Dimensions => "dimensions",
            Adapter::Formulas => "formulas",
            Adapter::CalcChain => "calc_chain",
            Adapter::DefinedNames => "defined_names",
        }
    }

    pub(crate) fn plan(self, ctx: &PlanContext<'_>) -> Result<Patch, ModelError> {
        Ok(match self {
            Adapter::MergeCells => Patch::MergeCells(merge::plan(ctx)?),
            Adapter::AutoFilter => Patch::AutoFilter(autofilter::plan(ctx)?),
            Adapter::Tables => Patch::Tables(tables::plan(ctx)?),
            Adapter::Hyperlinks => Patch::Hyperlinks(hyperlinks::plan(ctx)?),
            Adapter::Dimensions => Patch::Dimensions(dimensions::plan(ctx)),
            Adapter::Formulas => Patch::Formulas(formulas::plan(ctx)?),
            Adapter::CalcChain => Patch::CalcChain(calc_chain::plan(ctx)?),
            Adapter::DefinedNames => Patch::DefinedNames(defined_names::plan(ctx)?),
        })
    }
}

/// Planned, not yet applied, changes of one adapter.
pub(crate) enum Patch {
    MergeCells(merge::MergePatch),
    AutoFilter(autofilter::AutoFilterPatch),
    Tables(tables::TablesPatch),
    Hyperlinks(hyperlinks::HyperlinksPatch),
    Dimensions(dimensions::DimensionsPatch),
    Formulas(formulas::FormulasPatch),
    CalcChain(calc_chain::CalcChainPatch),
    DefinedNames(defined_names::DefinedNamesPatch),
}

impl Patch {
    /// Commit into `workbook`. Cannot fail: all validation happened while planning.
    pub(crate) fn apply(self, workbook: &mut Workbook, sheet_idx: usize, result: &mut EditResult) {
        match self {
            Patch::MergeCells(p) => p.apply(&mut workbook.sheets[sheet_idx], result),
            Patch::AutoFilter(p) => p.apply(&mut workbook.sheets[sheet_idx]),
            Patch::Tables(p) => p.apply(&mut workbook.sheets[sheet_idx], result),
            Patch::Hyperlinks(p) => p.apply(&mut workbook.sheets[sheet_idx], result),
            Patch::Dimensions(p) => p.apply(&mut workbook.sheets[sheet_idx]),
            Patch::Formulas(p) => p.apply(workbook, result),
            Patch::CalcChain(p) => p.apply(workbook),
            Patch::DefinedNames(p) => p.apply(workbook),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn planning_order_names() {
        assert_eq!(
            Adapter::ORDER.map(Adapter::name),
            [
                "merge_cells",
                "auto_filter",
                "tables",
                "hyperlinks",
                "dimensions",
                "formulas",
                "calc_chain",
                "defined_names",
            ]
        );
    }
}
