use ahash::AHashMap;
use smallvec::SmallVec;
use workbook_model::{sheet_name_casefold, sheet_name_eq_case_insensitive, ModelError, Workbook};

use super::interval::{AdjustDirection, AdjustEvent};
use super::tokenize::{
    render, tokenize, CellPart, ColBound, FormulaToken, RefPart, Reference, RowBound,
    SheetPrefix, SheetTarget, REF_ERROR,
};

/// Tab order used to resolve sheet qualifiers, including 3D spans.
#[derive(Clone, Debug, Default)]
pub struct SheetOrder {
    index: AHashMap<String, usize>,
}

impl SheetOrder {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = AHashMap::new();
        for (i, name) in names.into_iter().enumerate() {
            index.entry(sheet_name_casefold(name.as_ref())).or_insert(i);
        }
        Self { index }
    }

    pub fn from_workbook(workbook: &Workbook) -> Self {
        Self::new(workbook.sheets.iter().map(|s| s.name.as_str()))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&sheet_name_casefold(name)).copied()
    }

    fn same_sheet(&self, a: &str, b: &str) -> bool {
        match (self.position(a), self.position(b)) {
            (Some(a), Some(b)) => a == b,
            _ => sheet_name_eq_case_insensitive(a, b),
        }
    }

    /// True when a reference qualified by `sheet`, written in a formula whose
    /// context sheet is `ctx_sheet`, points into `edit_sheet`.
    ///
    /// Unqualified references inside a workbook-scoped name (`ctx_sheet` is
    /// `None`) never apply. External references never apply.
    pub fn applies(
        &self,
        sheet: Option<&SheetPrefix>,
        ctx_sheet: Option<&str>,
        edit_sheet: &str,
    ) -> bool {
        match sheet.map(|s| &s.target) {
            None => ctx_sheet.is_some_and(|ctx| self.same_sheet(ctx, edit_sheet)),
            Some(SheetTarget::Sheet(name)) => self.same_sheet(name, edit_sheet),
            Some(SheetTarget::Span { start, end }) => {
                let (Some(start), Some(end), Some(edit)) = (
                    self.position(start),
                    self.position(end),
                    self.position(edit_sheet),
                ) else {
                    return false;
                };
                let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
                edit >= lo && edit <= hi
            }
            Some(SheetTarget::External) => false,
        }
    }
}

enum Outcome<P> {
    Unchanged,
    Moved(SmallVec<[P; 3]>),
    Deleted,
}

/// Move a reference's parts for a structural edit.
///
/// Two-part ranges move as an interval so a deletion inside them shrinks the
/// range; every other shape moves point by point and any deleted point
/// deletes the whole reference.
fn adjust_parts<P: RefPart>(
    reference: &Reference<P>,
    event: AdjustEvent,
) -> Result<Outcome<P>, ModelError> {
    let dir = event.direction;
    let Some(lines) = reference
        .parts
        .iter()
        .map(|p| p.line(dir))
        .collect::<Option<SmallVec<[u32; 3]>>>()
    else {
        return Ok(Outcome::Unchanged);
    };

    let mut parts = reference.parts.clone();
    if let &[a, b] = &lines[..] {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let Some((new_lo, new_hi)) = event.adjust_span(lo, hi)? else {
            return Ok(Outcome::Deleted);
        };
        let (new_a, new_b) = if a <= b { (new_lo, new_hi) } else { (new_hi, new_lo) };
        parts[0] = parts[0].with_line(dir, new_a);
        parts[1] = parts[1].with_line(dir, new_b);
    } else {
        for (part, line) in parts.iter_mut().zip(lines) {
            let Some(new_line) = event.adjust_line(line)? else {
                return Ok(Outcome::Deleted);
            };
            *part = part.with_line(dir, new_line);
        }
    }

    Ok(if parts == reference.parts {
        Outcome::Unchanged
    } else {
        Outcome::Moved(parts)
    })
}

/// Shift a reference by a fixed delta on both axes.
///
/// With `absolute_too` unset, `$`-anchored coordinates stay put.
fn shift_parts<P: RefPart>(
    reference: &Reference<P>,
    delta_row: i64,
    delta_col: i64,
    absolute_too: bool,
) -> Result<Outcome<P>, ModelError> {
    let mut parts = reference.parts.clone();
    for part in parts.iter_mut() {
        for (dir, delta) in [
            (AdjustDirection::Rows, delta_row),
            (AdjustDirection::Columns, delta_col),
        ] {
            let Some(line) = part.line(dir) else {
                continue;
            };
            if delta == 0 || (part.is_abs(dir) && !absolute_too) {
                continue;
            }
            let moved = i64::from(line) + delta;
            if moved < 0 {
                return Ok(Outcome::Deleted);
            }
            if moved >= i64::from(dir.limit()) {
                return Err(dir.overflow());
            }
            *part = part.with_line(dir, moved as u32);
        }
    }
    Ok(if parts == reference.parts {
        Outcome::Unchanged
    } else {
        Outcome::Moved(parts)
    })
}

fn apply_outcome<P: RefPart>(
    reference: &Reference<P>,
    outcome: Outcome<P>,
    wrap: fn(Reference<P>) -> FormulaToken,
) -> Option<FormulaToken> {
    match outcome {
        Outcome::Unchanged => None,
        Outcome::Moved(parts) => Some(wrap(reference.with_parts(parts))),
        Outcome::Deleted => Some(FormulaToken::Literal(REF_ERROR.to_string())),
    }
}

/// Rewrite every reference token accepted by `applies` with its shape callback.
///
/// Works on a token copy and renders only once every reference succeeded, so
/// an error leaves nothing half-rewritten. Returns the original text when no
/// reference changed.
fn rewrite_references<A, C, R, K>(
    formula: &str,
    applies: A,
    mut cells: C,
    mut rows: R,
    mut cols: K,
) -> Result<(String, bool), ModelError>
where
    A: Fn(Option<&SheetPrefix>) -> bool,
    C: FnMut(&Reference<CellPart>) -> Result<Outcome<CellPart>, ModelError>,
    R: FnMut(&Reference<RowBound>) -> Result<Outcome<RowBound>, ModelError>,
    K: FnMut(&Reference<ColBound>) -> Result<Outcome<ColBound>, ModelError>,
{
    let mut tokens = tokenize(formula)?;
    let mut changed = false;
    for token in tokens.iter_mut() {
        if !token.is_reference() || !applies(token.sheet()) {
            continue;
        }
        let replacement = match &*token {
            FormulaToken::CellRef(r) => apply_outcome(r, cells(r)?, FormulaToken::CellRef),
            FormulaToken::RangeRef(r) => apply_outcome(r, cells(r)?, FormulaToken::RangeRef),
            FormulaToken::RowRangeRef(r) => apply_outcome(r, rows(r)?, FormulaToken::RowRangeRef),
            FormulaToken::ColRangeRef(r) => apply_outcome(r, cols(r)?, FormulaToken::ColRangeRef),
            _ => None,
        };
        if let Some(replacement) = replacement {
            *token = replacement;
            changed = true;
        }
    }

    if changed {
        Ok((render(&tokens), true))
    } else {
        Ok((formula.to_string(), false))
    }
}

/// Rewrite `formula` for a row/column insertion or deletion on `edit_sheet`.
///
/// `ctx_sheet` is the sheet unqualified references resolve against (the
/// formula's own sheet, or a defined name's scope sheet); `None` leaves
/// unqualified references alone. References into deleted lines become `#REF!`.
pub fn adjust_formula(
    formula: &str,
    ctx_sheet: Option<&str>,
    edit_sheet: &str,
    order: &SheetOrder,
    event: AdjustEvent,
) -> Result<(String, bool), ModelError> {
    rewrite_references(
        formula,
        |sheet| order.applies(sheet, ctx_sheet, edit_sheet),
        |r| adjust_parts(r, event),
        |r| adjust_parts(r, event),
        |r| adjust_parts(r, event),
    )
}

/// Rewrite `formula` as if copied `delta_row` rows and `delta_col` columns
/// away: relative coordinates move, `$`-anchored ones do not. References
/// pushed above row 1 or left of column A become `#REF!`.
pub fn rewrite_formula_for_copy_delta(
    formula: &str,
    delta_row: i64,
    delta_col: i64,
) -> Result<(String, bool), ModelError> {
    rewrite_references(
        formula,
        |sheet| !matches!(sheet.map(|s| &s.target), Some(SheetTarget::External)),
        |r| shift_parts(r, delta_row, delta_col, false),
        |r| shift_parts(r, delta_row, delta_col, false),
        |r| shift_parts(r, delta_row, delta_col, false),
    )
}

/// Rewrite a formula copied from one row of `ctx_sheet` to another.
///
/// Every row coordinate that points into `ctx_sheet` moves by `delta_row`,
/// anchored or not, so the copy refers to its own row the way the source
/// referred to its own.
pub fn rewrite_formula_for_row_duplicate(
    formula: &str,
    ctx_sheet: &str,
    order: &SheetOrder,
    delta_row: i64,
) -> Result<(String, bool), ModelError> {
    rewrite_references(
        formula,
        |sheet| order.applies(sheet, Some(ctx_sheet), ctx_sheet),
        |r| shift_parts(r, delta_row, 0, true),
        |r| shift_parts(r, delta_row, 0, true),
        |r| shift_parts(r, delta_row, 0, true),
    )
}
