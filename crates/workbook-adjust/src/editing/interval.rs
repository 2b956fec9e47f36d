use workbook_model::{CellRef, ModelError, Range, EXCEL_MAX_COLS, EXCEL_MAX_ROWS};

/// Axis a structural edit shifts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AdjustDirection {
    Rows,
    Columns,
}

impl AdjustDirection {
    /// Number of lines on this axis.
    pub const fn limit(self) -> u32 {
        match self {
            AdjustDirection::Rows => EXCEL_MAX_ROWS,
            AdjustDirection::Columns => EXCEL_MAX_COLS,
        }
    }

    pub fn overflow(self) -> ModelError {
        match self {
            AdjustDirection::Rows => ModelError::RowOverflow,
            AdjustDirection::Columns => ModelError::ColumnOverflow,
        }
    }

    /// The coordinate of `cell` on this axis.
    pub const fn line_of(self, cell: CellRef) -> u32 {
        match self {
            AdjustDirection::Rows => cell.row,
            AdjustDirection::Columns => cell.col,
        }
    }

    const fn with_line(self, cell: CellRef, line: u32) -> CellRef {
        match self {
            AdjustDirection::Rows => CellRef::new(line, cell.col),
            AdjustDirection::Columns => CellRef::new(cell.row, line),
        }
    }
}

/// Transform the inclusive interval `[start, end]` for an edit at `pivot`.
///
/// A positive `magnitude` inserts that many lines before `pivot`; a negative one
/// deletes `|magnitude|` lines starting at `pivot`. Returns `None` when the
/// interval is collapsed by a deletion. Results are unbounded; callers check
/// them against the sheet limits.
pub fn adjust_interval(start: u32, end: u32, pivot: u32, magnitude: i64) -> Option<(u64, u64)> {
    debug_assert!(start <= end, "interval must be normalized");
    let (start, end, pivot) = (u64::from(start), u64::from(end), u64::from(pivot));
    let count = magnitude.unsigned_abs();

    if magnitude >= 0 {
        return Some(if pivot <= start {
            (start + count, end + count)
        } else if pivot <= end {
            (start, end + count)
        } else {
            (start, end)
        });
    }

    let del_end = pivot + count - 1;
    if del_end < start {
        return Some((start - count, end - count));
    }
    if pivot > end {
        return Some((start, end));
    }

    // The block overlaps the interval: map each endpoint on its own.
    let new_start = start.min(pivot);
    let new_end = if end > del_end {
        end - count
    } else {
        pivot.checked_sub(1)?
    };
    (new_start <= new_end).then_some((new_start, new_end))
}

/// [`adjust_interval`] for a single line; `None` when the line is deleted.
pub fn adjust_point(line: u32, pivot: u32, magnitude: i64) -> Option<u64> {
    adjust_interval(line, line, pivot, magnitude).map(|(start, _)| start)
}

/// One structural edit: `magnitude` lines inserted (> 0) or deleted (< 0) at `pivot`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AdjustEvent {
    pub direction: AdjustDirection,
    pub pivot: u32,
    pub magnitude: i64,
}

impl AdjustEvent {
    pub fn insert(direction: AdjustDirection, pivot: u32, count: u32) -> Self {
        Self {
            direction,
            pivot,
            magnitude: i64::from(count),
        }
    }

    pub fn delete(direction: AdjustDirection, pivot: u32, count: u32) -> Self {
        Self {
            direction,
            pivot,
            magnitude: -i64::from(count),
        }
    }

    #[inline]
    pub fn is_insert(&self) -> bool {
        self.magnitude > 0
    }

    #[inline]
    pub fn is_delete(&self) -> bool {
        self.magnitude < 0
    }

    /// Number of lines inserted or deleted.
    pub fn count(&self) -> u32 {
        u32::try_from(self.magnitude.unsigned_abs()).unwrap_or(u32::MAX)
    }

    /// Inclusive span of deleted lines, for deletions.
    pub fn deleted_span(&self) -> Option<(u32, u32)> {
        if !self.is_delete() {
            return None;
        }
        let last = u64::from(self.pivot) + self.magnitude.unsigned_abs() - 1;
        Some((self.pivot, u32::try_from(last).unwrap_or(u32::MAX)))
    }

    /// True if `line` falls inside the deleted block.
    pub fn deletes_line(&self, line: u32) -> bool {
        self.deleted_span()
            .is_some_and(|(first, last)| line >= first && line <= last)
    }

    fn bounded(&self, line: u64) -> Result<u32, ModelError> {
        u32::try_from(line)
            .ok()
            .filter(|line| *line < self.direction.limit())
            .ok_or_else(|| self.direction.overflow())
    }

    /// New position of `line`, `None` if deleted.
    pub fn adjust_line(&self, line: u32) -> Result<Option<u32>, ModelError> {
        adjust_point(line, self.pivot, self.magnitude)
            .map(|line| self.bounded(line))
            .transpose()
    }

    /// New `[start, end]`, `None` if collapsed.
    pub fn adjust_span(&self, start: u32, end: u32) -> Result<Option<(u32, u32)>, ModelError> {
        match adjust_interval(start, end, self.pivot, self.magnitude) {
            Some((start, end)) => Ok(Some((self.bounded(start)?, self.bounded(end)?))),
            None => Ok(None),
        }
    }

    /// New position of `cell` on the edited axis, `None` if its line is deleted.
    pub fn adjust_cell(&self, cell: CellRef) -> Result<Option<CellRef>, ModelError> {
        let line = self.direction.line_of(cell);
        Ok(self
            .adjust_line(line)?
            .map(|line| self.direction.with_line(cell, line)))
    }

    /// New rectangle on the edited axis, `None` if collapsed.
    pub fn adjust_range(&self, range: Range) -> Result<Option<Range>, ModelError> {
        let start = self.direction.line_of(range.start);
        let end = self.direction.line_of(range.end);
        Ok(self.adjust_span(start, end)?.map(|(start, end)| {
            Range::new(
                self.direction.with_line(range.start, start),
                self.direction.with_line(range.end, end),
            )
        }))
    }
}
