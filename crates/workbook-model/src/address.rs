use core::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::{EXCEL_MAX_COLS, EXCEL_MAX_ROWS};
use crate::ModelError;

/// A reference to a single cell within a worksheet.
///
/// Rows and columns are **0-indexed**:
/// - `row = 0` is Excel row `1`
/// - `col = 0` is Excel column `A`
///
/// Ordering is row-major, matching the storage order of [`crate::CellKey`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    /// 0-indexed row.
    pub row: u32,
    /// 0-indexed column.
    pub col: u32,
}

impl CellRef {
    /// Construct a new [`CellRef`].
    #[inline]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Convert to Excel A1 notation (e.g. `A1`, `BC32`).
    pub fn to_a1(self) -> String {
        format_a1(self.col, self.row, false, false)
    }

    /// Parse an Excel A1-style reference (e.g. `A1`, `$B$2`).
    ///
    /// Bare columns (`A`) and bare rows (`1`) are rejected; use
    /// [`Range::from_a1`] for rectangles.
    pub fn from_a1(a1: &str) -> Result<Self, ModelError> {
        AnchoredCell::from_a1(a1).map(|anchored| anchored.cell)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// A cell reference together with its `$` anchors, as written in formula text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnchoredCell {
    pub cell: CellRef,
    pub col_abs: bool,
    pub row_abs: bool,
}

impl AnchoredCell {
    pub fn from_a1(a1: &str) -> Result<Self, ModelError> {
        let invalid = || ModelError::InvalidCellReference(a1.to_string());
        let bytes = a1.as_bytes();
        let mut idx = 0usize;

        let col_abs = bytes.first() == Some(&b'$');
        if col_abs {
            idx += 1;
        }
        let col_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_alphabetic() {
            idx += 1;
        }
        if idx == col_start {
            return Err(invalid());
        }
        let col_end = idx;

        let row_abs = bytes.get(idx) == Some(&b'$');
        if row_abs {
            idx += 1;
        }
        let row_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == row_start || idx != bytes.len() {
            return Err(invalid());
        }

        let col = column_index(&a1[col_start..col_end])?;
        let row = parse_row_number(&a1[row_start..idx]).ok_or_else(invalid)??;
        Ok(Self {
            cell: CellRef::new(row, col),
            col_abs,
            row_abs,
        })
    }

    pub fn to_a1(self) -> String {
        format_a1(self.cell.col, self.cell.row, self.col_abs, self.row_abs)
    }
}

impl fmt::Display for AnchoredCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// Parse 1-based row digits into a 0-based row.
///
/// Returns `None` for `0` (never a valid row) and `Some(Err(RowOverflow))` past the sheet.
fn parse_row_number(digits: &str) -> Option<Result<u32, ModelError>> {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return None;
    }
    // More digits than the largest row can hold is an overflow, not junk.
    if trimmed.len() > 7 {
        return Some(Err(ModelError::RowOverflow));
    }
    let value: u32 = trimmed.parse().ok()?;
    if value > EXCEL_MAX_ROWS {
        return Some(Err(ModelError::RowOverflow));
    }
    Some(Ok(value - 1))
}

/// A rectangular region within a worksheet.
///
/// The range is inclusive and always normalized such that:
/// - `start.row <= end.row`
/// - `start.col <= end.col`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: CellRef,
    pub end: CellRef,
}

impl Range {
    /// Construct a new range, normalizing coordinates if needed.
    pub const fn new(a: CellRef, b: CellRef) -> Self {
        let start_row = if a.row <= b.row { a.row } else { b.row };
        let end_row = if a.row <= b.row { b.row } else { a.row };
        let start_col = if a.col <= b.col { a.col } else { b.col };
        let end_col = if a.col <= b.col { b.col } else { a.col };
        Self {
            start: CellRef::new(start_row, start_col),
            end: CellRef::new(end_row, end_col),
        }
    }

    /// Returns true if `cell` lies within this range.
    #[inline]
    pub const fn contains(&self, cell: CellRef) -> bool {
        cell.row >= self.start.row
            && cell.row <= self.end.row
            && cell.col >= self.start.col
            && cell.col <= self.end.col
    }

    #[inline]
    pub const fn intersects(&self, other: &Range) -> bool {
        self.start.row <= other.end.row
            && other.start.row <= self.end.row
            && self.start.col <= other.end.col
            && other.start.col <= self.end.col
    }

    /// Number of columns in the range.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Number of rows in the range.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Returns true if the range is exactly one cell.
    #[inline]
    pub const fn is_single_cell(&self) -> bool {
        self.start.row == self.end.row && self.start.col == self.end.col
    }

    /// Parse an Excel A1-style range like `A1:B2` or a single-cell reference like `C3`.
    ///
    /// Each half is parsed on its own; a failure names the offending half
    /// (`"A:B1"` fails with `InvalidCellReference("A")`).
    pub fn from_a1(a1: &str) -> Result<Self, ModelError> {
        match a1.split_once(':') {
            None => {
                let cell = CellRef::from_a1(a1)?;
                Ok(Range::new(cell, cell))
            }
            Some((a, b)) => {
                let start = CellRef::from_a1(a)?;
                let end = CellRef::from_a1(b)?;
                Ok(Range::new(start, end))
            }
        }
    }

    pub fn to_a1(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

/// Render a coordinate in A1 form with optional `$` anchors.
pub fn format_a1(col: u32, row: u32, col_abs: bool, row_abs: bool) -> String {
    let mut out = String::with_capacity(10);
    if col_abs {
        out.push('$');
    }
    out.push_str(&column_name(col));
    if row_abs {
        out.push('$');
    }
    out.push_str(&(u64::from(row) + 1).to_string());
    out
}

/// 0-based row index for 1-based row digits (`"1"` → `0`).
///
/// Non-digits and `0` yield `InvalidCellReference`; rows past the sheet yield `RowOverflow`.
pub fn row_index(digits: &str) -> Result<u32, ModelError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ModelError::InvalidCellReference(digits.to_string()));
    }
    parse_row_number(digits)
        .ok_or_else(|| ModelError::InvalidCellReference(digits.to_string()))?
}

/// Column letters for a 0-based column index (`0` → `A`, `26` → `AA`).
pub fn column_name(col: u32) -> String {
    let mut n = u64::from(col) + 1;
    let mut letters = Vec::with_capacity(3);
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(char::from(b'A' + rem));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// 0-based column index for column letters (case-insensitive).
///
/// Non-letters yield `InvalidCellReference`; letters past `XFD` yield `ColumnOverflow`.
pub fn column_index(name: &str) -> Result<u32, ModelError> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(ModelError::InvalidCellReference(name.to_string()));
    }
    let mut col: u64 = 0;
    for b in name.bytes() {
        col = col * 26 + u64::from(b.to_ascii_uppercase() - b'A') + 1;
        if col > u64::from(EXCEL_MAX_COLS) {
            return Err(ModelError::ColumnOverflow);
        }
    }
    Ok((col - 1) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a1_roundtrip() {
        let c = CellRef::new(0, 0);
        assert_eq!(c.to_a1(), "A1");
        assert_eq!(CellRef::from_a1("A1").unwrap(), c);
        assert_eq!(CellRef::from_a1("$A$1").unwrap(), c);

        let c2 = CellRef::new(31, 54); // BC32
        assert_eq!(c2.to_a1(), "BC32");
        assert_eq!(CellRef::from_a1("bc32").unwrap(), c2);
    }

    #[test]
    fn anchors_survive_formatting() {
        let anchored = AnchoredCell::from_a1("$C5").unwrap();
        assert!(anchored.col_abs);
        assert!(!anchored.row_abs);
        assert_eq!(anchored.to_a1(), "$C5");
        assert_eq!(format_a1(0, 9, false, true), "A$10");
    }

    #[test]
    fn a1_range_parsing() {
        let r = Range::from_a1("A1:B2").unwrap();
        assert_eq!(r.start, CellRef::new(0, 0));
        assert_eq!(r.end, CellRef::new(1, 1));

        let single = Range::from_a1("C3").unwrap();
        assert!(single.is_single_cell());
        assert_eq!(single.start, CellRef::new(2, 2));

        let reversed = Range::from_a1("B26:A21").unwrap();
        assert_eq!(reversed.to_string(), "A21:B26");
    }

    #[test]
    fn range_errors_name_the_failing_half() {
        assert_eq!(
            Range::from_a1("A:B1"),
            Err(ModelError::InvalidCellReference("A".into()))
        );
        assert_eq!(
            Range::from_a1("A1:B"),
            Err(ModelError::InvalidCellReference("B".into()))
        );
        assert_eq!(
            Range::from_a1("-"),
            Err(ModelError::InvalidCellReference("-".into()))
        );
        assert_eq!(
            CellRef::from_a1("A0"),
            Err(ModelError::InvalidCellReference("A0".into()))
        );
    }

    #[test]
    fn a1_bounds_are_excel_compatible() {
        assert!(CellRef::from_a1("XFD1048576").is_ok());
        assert_eq!(CellRef::from_a1("XFE1"), Err(ModelError::ColumnOverflow));
        assert_eq!(CellRef::from_a1("A1048577"), Err(ModelError::RowOverflow));
        assert_eq!(CellRef::from_a1("A99999999999"), Err(ModelError::RowOverflow));
    }

    #[test]
    fn column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(EXCEL_MAX_COLS - 1), "XFD");
        assert_eq!(column_index("xfd").unwrap(), EXCEL_MAX_COLS - 1);
        assert_eq!(column_index("A1"), Err(ModelError::InvalidCellReference("A1".into())));
        assert_eq!(row_index("10").unwrap(), 9);
        assert_eq!(row_index("0"), Err(ModelError::InvalidCellReference("0".into())));
        assert_eq!(row_index("1048577"), Err(ModelError::RowOverflow));
    }
}
