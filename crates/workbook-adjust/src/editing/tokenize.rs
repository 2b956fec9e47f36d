//! Formula text → token stream.
//!
//! The tokenizer is lossless: concatenating every token's text reproduces the
//! input exactly. Reference-shaped tokens additionally carry their parsed
//! coordinates so the rewriter can move them and re-render only what changed.

use core::fmt;

use smallvec::SmallVec;
use workbook_model::{column_index, column_name, format_a1, row_index, AnchoredCell, ModelError};

use super::interval::AdjustDirection;

/// Replacement text for references whose target was deleted.
pub const REF_ERROR: &str = "#REF!";

/// What a sheet qualifier points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetTarget {
    Sheet(String),
    /// 3D reference across a run of tabs (`Sheet1:Sheet3!A1`).
    Span { start: String, end: String },
    /// Reference into another workbook (`[1]Sheet1!A1`).
    External,
}

/// Sheet qualifier exactly as written, including the trailing `!`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetPrefix {
    pub raw: String,
    pub target: SheetTarget,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellPart {
    pub col: u32,
    pub row: u32,
    pub col_abs: bool,
    pub row_abs: bool,
}

impl fmt::Display for CellPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_a1(self.col, self.row, self.col_abs, self.row_abs))
    }
}

/// One end of a whole-row range (`2` in `2:3`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RowBound {
    pub row: u32,
    pub abs: bool,
}

impl fmt::Display for RowBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.abs {
            f.write_str("$")?;
        }
        write!(f, "{}", u64::from(self.row) + 1)
    }
}

/// One end of a whole-column range (`C` in `C:D`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColBound {
    pub col: u32,
    pub abs: bool,
}

impl fmt::Display for ColBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.abs {
            f.write_str("$")?;
        }
        f.write_str(&column_name(self.col))
    }
}

/// Coordinates of one reference component along each axis.
pub trait RefPart: Copy + PartialEq + fmt::Display {
    /// Position on `direction`'s axis, `None` if this part spans that whole axis.
    fn line(&self, direction: AdjustDirection) -> Option<u32>;
    fn is_abs(&self, direction: AdjustDirection) -> bool;
    fn with_line(self, direction: AdjustDirection, line: u32) -> Self;
}

impl RefPart for CellPart {
    fn line(&self, direction: AdjustDirection) -> Option<u32> {
        Some(match direction {
            AdjustDirection::Rows => self.row,
            AdjustDirection::Columns => self.col,
        })
    }

    fn is_abs(&self, direction: AdjustDirection) -> bool {
        match direction {
            AdjustDirection::Rows => self.row_abs,
            AdjustDirection::Columns => self.col_abs,
        }
    }

    fn with_line(mut self, direction: AdjustDirection, line: u32) -> Self {
        match direction {
            AdjustDirection::Rows => self.row = line,
            AdjustDirection::Columns => self.col = line,
        }
        self
    }
}

impl RefPart for RowBound {
    fn line(&self, direction: AdjustDirection) -> Option<u32> {
        (direction == AdjustDirection::Rows).then_some(self.row)
    }

    fn is_abs(&self, _: AdjustDirection) -> bool {
        self.abs
    }

    fn with_line(mut self, direction: AdjustDirection, line: u32) -> Self {
        if direction == AdjustDirection::Rows {
            self.row = line;
        }
        self
    }
}

impl RefPart for ColBound {
    fn line(&self, direction: AdjustDirection) -> Option<u32> {
        (direction == AdjustDirection::Columns).then_some(self.col)
    }

    fn is_abs(&self, _: AdjustDirection) -> bool {
        self.abs
    }

    fn with_line(mut self, direction: AdjustDirection, line: u32) -> Self {
        if direction == AdjustDirection::Columns {
            self.col = line;
        }
        self
    }
}

/// A reference token: optional sheet qualifier plus one to three `:`-joined parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference<P> {
    pub sheet: Option<SheetPrefix>,
    pub parts: SmallVec<[P; 3]>,
    /// Text as it appears in the formula.
    pub raw: String,
}

impl<P: RefPart> Reference<P> {
    /// Same qualifier, new parts, text re-rendered.
    pub fn with_parts(&self, parts: SmallVec<[P; 3]>) -> Self {
        let mut raw = self
            .sheet
            .as_ref()
            .map(|s| s.raw.clone())
            .unwrap_or_default();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                raw.push(':');
            }
            raw.push_str(&part.to_string());
        }
        Self {
            sheet: self.sheet.clone(),
            parts,
            raw,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormulaToken {
    /// Numbers, booleans, error literals, whitespace.
    Literal(String),
    Operator(String),
    FunctionName(String),
    /// Quoted string including its quotes.
    StringLiteral(String),
    CellRef(Reference<CellPart>),
    /// Two- or three-part cell range (`A1:B2`, `A2:A3:A4`).
    RangeRef(Reference<CellPart>),
    RowRangeRef(Reference<RowBound>),
    ColRangeRef(Reference<ColBound>),
    /// Passed through untouched: structured references, names, external names.
    Opaque(String),
}

impl FormulaToken {
    pub fn text(&self) -> &str {
        match self {
            FormulaToken::Literal(s)
            | FormulaToken::Operator(s)
            | FormulaToken::FunctionName(s)
            | FormulaToken::StringLiteral(s)
            | FormulaToken::Opaque(s) => s,
            FormulaToken::CellRef(r) | FormulaToken::RangeRef(r) => &r.raw,
            FormulaToken::RowRangeRef(r) => &r.raw,
            FormulaToken::ColRangeRef(r) => &r.raw,
        }
    }

    pub fn sheet(&self) -> Option<&SheetPrefix> {
        match self {
            FormulaToken::CellRef(r) | FormulaToken::RangeRef(r) => r.sheet.as_ref(),
            FormulaToken::RowRangeRef(r) => r.sheet.as_ref(),
            FormulaToken::ColRangeRef(r) => r.sheet.as_ref(),
            _ => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            FormulaToken::CellRef(_)
                | FormulaToken::RangeRef(_)
                | FormulaToken::RowRangeRef(_)
                | FormulaToken::ColRangeRef(_)
        )
    }
}

/// Concatenate token texts back into formula text.
pub fn render(tokens: &[FormulaToken]) -> String {
    tokens.iter().map(FormulaToken::text).collect()
}

/// Split formula text (without leading `=`) into tokens.
///
/// Fails only on reference-shaped text that cannot be a valid reference: a
/// range mixing cell and whole-line parts (`A1:B`), a zero row, or a
/// coordinate past the sheet bounds.
pub fn tokenize(formula: &str) -> Result<Vec<FormulaToken>, ModelError> {
    let mut lexer = Lexer {
        chars: formula.chars().collect(),
        pos: 0,
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '$' | '\\')
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Shape {
    Cell,
    Row,
    Col,
    Other,
}

/// Classify a word by its form only; no bounds checks.
fn shape(word: &str) -> Shape {
    let bytes = word.as_bytes();
    let mut i = usize::from(bytes.first() == Some(&b'$'));
    let letters_start = i;
    while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
        i += 1;
    }
    let letters = i - letters_start;
    if letters > 3 {
        return Shape::Other;
    }
    if letters > 0 && i == bytes.len() {
        return Shape::Col;
    }
    if letters > 0 && bytes.get(i) == Some(&b'$') {
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i != bytes.len() || i == digits_start {
        return Shape::Other;
    }
    if letters == 0 {
        // `$` alone before digits is a row anchor; `$` after letters was consumed above.
        Shape::Row
    } else {
        Shape::Cell
    }
}

fn cell_part(word: &str) -> Result<CellPart, ModelError> {
    let anchored = AnchoredCell::from_a1(word)?;
    Ok(CellPart {
        col: anchored.cell.col,
        row: anchored.cell.row,
        col_abs: anchored.col_abs,
        row_abs: anchored.row_abs,
    })
}

fn row_bound(word: &str) -> Result<RowBound, ModelError> {
    let (abs, digits) = match word.strip_prefix('$') {
        Some(rest) => (true, rest),
        None => (false, word),
    };
    let row = row_index(digits).map_err(|err| match err {
        ModelError::InvalidCellReference(_) => ModelError::InvalidCellReference(word.to_string()),
        other => other,
    })?;
    Ok(RowBound { row, abs })
}

fn col_bound(word: &str) -> Result<ColBound, ModelError> {
    let (abs, letters) = match word.strip_prefix('$') {
        Some(rest) => (true, rest),
        None => (false, word),
    };
    Ok(ColBound {
        col: column_index(letters)?,
        abs,
    })
}

fn classify(
    sheet: Option<SheetPrefix>,
    words: &[String],
    raw: String,
) -> Result<FormulaToken, ModelError> {
    let shapes: SmallVec<[Shape; 3]> = words.iter().map(|w| shape(w)).collect();

    if let [only] = words {
        return Ok(match shapes[0] {
            Shape::Cell => FormulaToken::CellRef(Reference {
                sheet,
                parts: SmallVec::from_elem(cell_part(only)?, 1),
                raw,
            }),
            _ if sheet.is_none()
                && only.starts_with(|c: char| c.is_ascii_digit() || c == '.') =>
            {
                FormulaToken::Literal(raw)
            }
            _ => FormulaToken::Opaque(raw),
        });
    }

    // `Name1:Name2` is a legal range between names; leave it alone.
    if shapes.contains(&Shape::Other) {
        return Ok(FormulaToken::Opaque(raw));
    }

    let expected = if shapes.contains(&Shape::Cell) {
        Shape::Cell
    } else {
        shapes[0]
    };
    if let Some(bad) = words.iter().zip(&shapes).find(|(_, s)| **s != expected) {
        return Err(ModelError::InvalidCellReference(bad.0.clone()));
    }

    Ok(match expected {
        Shape::Cell => FormulaToken::RangeRef(Reference {
            sheet,
            parts: words.iter().map(|w| cell_part(w)).collect::<Result<_, _>>()?,
            raw,
        }),
        Shape::Row => FormulaToken::RowRangeRef(Reference {
            sheet,
            parts: words.iter().map(|w| row_bound(w)).collect::<Result<_, _>>()?,
            raw,
        }),
        Shape::Col => FormulaToken::ColRangeRef(Reference {
            sheet,
            parts: words.iter().map(|w| col_bound(w)).collect::<Result<_, _>>()?,
            raw,
        }),
        Shape::Other => FormulaToken::Opaque(raw),
    })
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    tokens: Vec<FormulaToken>,
}

impl Lexer {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn slice(&self, start: usize) -> String {
        self.chars[start..self.pos].iter().collect()
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        self.slice(start)
    }

    fn run(&mut self) -> Result<(), ModelError> {
        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => {
                    let ws = self.take_while(char::is_whitespace);
                    self.tokens.push(FormulaToken::Literal(ws));
                }
                '"' => self.string_literal(),
                '\'' => self.quoted_sheet()?,
                '[' => self.bracketed()?,
                '#' => {
                    let text = self.error_literal();
                    self.tokens.push(text);
                }
                c if is_word_char(c) => self.word(None)?,
                _ => self.operator(),
            }
        }
        Ok(())
    }

    fn string_literal(&mut self) {
        let start = self.pos;
        self.pos += 1;
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == '"' {
                if self.peek() == Some('"') {
                    self.pos += 1;
                    continue;
                }
                break;
            }
        }
        let text = self.slice(start);
        self.tokens.push(FormulaToken::StringLiteral(text));
    }

    fn operator(&mut self) {
        let start = self.pos;
        let first = self.chars[self.pos];
        self.pos += 1;
        if let Some(next) = self.peek() {
            if matches!((first, next), ('<', '=') | ('>', '=') | ('<', '>')) {
                self.pos += 1;
            }
        }
        let text = self.slice(start);
        self.tokens.push(FormulaToken::Operator(text));
    }

    /// `#REF!`, `#N/A`, `#DIV/0!`... or the spill operator `#`.
    fn error_literal(&mut self) -> FormulaToken {
        let start = self.pos;
        self.pos += 1;
        if !self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            return FormulaToken::Operator(self.slice(start));
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '/' || c == '_')
        {
            self.pos += 1;
        }
        if matches!(self.peek(), Some('!' | '?')) {
            self.pos += 1;
        }
        FormulaToken::Literal(self.slice(start))
    }

    /// Consume a balanced `[...]` run; `'` escapes the next character.
    fn skip_brackets(&mut self) {
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                '\'' => self.pos = (self.pos + 1).min(self.chars.len()),
                '[' => depth += 1,
                ']' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn quoted_sheet(&mut self) -> Result<(), ModelError> {
        let start = self.pos;
        self.pos += 1;
        let mut name = String::new();
        let mut closed = false;
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == '\'' {
                if self.peek() == Some('\'') {
                    name.push('\'');
                    self.pos += 1;
                    continue;
                }
                closed = true;
                break;
            }
            name.push(c);
        }

        if !closed || self.peek() != Some('!') {
            let text = self.slice(start);
            self.tokens.push(FormulaToken::Opaque(text));
            return Ok(());
        }
        self.pos += 1;

        let target = if name.starts_with('[') {
            SheetTarget::External
        } else if let Some((first, last)) = name.split_once(':') {
            SheetTarget::Span {
                start: first.to_string(),
                end: last.to_string(),
            }
        } else {
            SheetTarget::Sheet(name)
        };
        let prefix = SheetPrefix {
            raw: self.slice(start),
            target,
        };
        self.after_prefix(prefix)
    }

    /// `[1]Sheet1!A1` external prefix, or an opaque bracket run like `[@Qty]`.
    fn bracketed(&mut self) -> Result<(), ModelError> {
        let start = self.pos;
        self.skip_brackets();

        let word_start = self.pos;
        let word = self.take_while(is_word_char);
        if self.peek() == Some('!') {
            self.pos += 1;
            let prefix = SheetPrefix {
                raw: self.slice(start),
                target: SheetTarget::External,
            };
            return self.after_prefix(prefix);
        }
        if !word.is_empty() {
            self.pos = word_start;
        }
        let text = self.slice(start);
        self.tokens.push(FormulaToken::Opaque(text));
        Ok(())
    }

    fn after_prefix(&mut self, prefix: SheetPrefix) -> Result<(), ModelError> {
        match self.peek() {
            Some(c) if is_word_char(c) => self.word(Some(prefix)),
            Some('#') => {
                let err = self.error_literal();
                self.tokens
                    .push(FormulaToken::Opaque(format!("{}{}", prefix.raw, err.text())));
                Ok(())
            }
            _ => {
                self.tokens.push(FormulaToken::Opaque(prefix.raw));
                Ok(())
            }
        }
    }

    /// True when `:` at the cursor starts the second half of a `Sheet1:Sheet3!` span.
    fn sheet_span_ahead(&self) -> bool {
        if self.peek() != Some(':') {
            return false;
        }
        let mut i = self.pos + 1;
        let word_start = i;
        while self.chars.get(i).is_some_and(|c| is_word_char(*c)) {
            i += 1;
        }
        i > word_start && self.chars.get(i) == Some(&'!')
    }

    fn word(&mut self, prefix: Option<SheetPrefix>) -> Result<(), ModelError> {
        let start = self.pos;
        let word = self.take_while(is_word_char);

        match (self.peek(), prefix) {
            (Some('!'), None) => {
                self.pos += 1;
                let prefix = SheetPrefix {
                    raw: self.slice(start),
                    target: SheetTarget::Sheet(word),
                };
                self.after_prefix(prefix)
            }
            (Some(':'), None) if self.sheet_span_ahead() => {
                self.pos += 1;
                let end = self.take_while(is_word_char);
                self.pos += 1; // '!'
                let prefix = SheetPrefix {
                    raw: self.slice(start),
                    target: SheetTarget::Span { start: word, end },
                };
                self.after_prefix(prefix)
            }
            (Some('('), None) => {
                self.tokens.push(FormulaToken::FunctionName(word));
                Ok(())
            }
            (Some('['), prefix) => {
                self.skip_brackets();
                let mut text = prefix.map(|p| p.raw).unwrap_or_default();
                text.push_str(&self.slice(start));
                self.tokens.push(FormulaToken::Opaque(text));
                Ok(())
            }
            (_, prefix) => self.reference_chain(prefix, word),
        }
    }

    /// Collect `:`-joined words following `first` and classify them as one token.
    fn reference_chain(
        &mut self,
        prefix: Option<SheetPrefix>,
        first: String,
    ) -> Result<(), ModelError> {
        let mut words = vec![first];
        while self.peek() == Some(':') && self.peek_at(1).is_some_and(is_word_char) {
            let save = self.pos;
            self.pos += 1;
            let next = self.take_while(is_word_char);
            if matches!(self.peek(), Some('!' | '(' | '[')) {
                self.pos = save;
                break;
            }
            words.push(next);
        }

        let mut raw = prefix.as_ref().map(|p| p.raw.clone()).unwrap_or_default();
        raw.push_str(&words.join(":"));
        let token = classify(prefix, &words, raw)?;
        self.tokens.push(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(formula: &str) -> Vec<&'static str> {
        tokenize(formula)
            .unwrap()
            .iter()
            .map(|t| match t {
                FormulaToken::Literal(_) => "lit",
                FormulaToken::Operator(_) => "op",
                FormulaToken::FunctionName(_) => "fn",
                FormulaToken::StringLiteral(_) => "str",
                FormulaToken::CellRef(_) => "cell",
                FormulaToken::RangeRef(_) => "range",
                FormulaToken::RowRangeRef(_) => "rows",
                FormulaToken::ColRangeRef(_) => "cols",
                FormulaToken::Opaque(_) => "opaque",
            })
            .collect()
    }

    #[test]
    fn rendering_is_lossless() {
        for formula in [
            "SUM(A2:A3:A4,,Table1[])",
            "IF(a1<>\"x\"\"y\", 'My Sheet'!$B$2, #N/A)",
            "Sheet1:Sheet3!A1+[1]Ext!B2+Table1[[#This Row],[Qty]]",
            "1.5E+10*-$A$1%",
            "SUM(2:3) + SUM($C:D)",
            "_xlfn.XLOOKUP(A1,B:B,C:C)",
        ] {
            assert_eq!(render(&tokenize(formula).unwrap()), formula);
        }
    }

    #[test]
    fn classifies_reference_shapes() {
        assert_eq!(
            kinds("SUM(A2:A3:A4,,Table1[])"),
            ["fn", "op", "range", "op", "op", "opaque", "op"]
        );
        assert_eq!(kinds("SUM(2:3)"), ["fn", "op", "rows", "op"]);
        assert_eq!(kinds("SUM(XFD:A:B)"), ["fn", "op", "cols", "op"]);
        assert_eq!(kinds("Amount+B3"), ["opaque", "op", "cell"]);
        assert_eq!(kinds("10+TRUE"), ["lit", "op", "opaque"]);
    }

    #[test]
    fn sheet_prefixes() {
        let tokens = tokenize("'It''s'!A1:B2").unwrap();
        let FormulaToken::RangeRef(r) = &tokens[0] else {
            panic!("expected range, got {tokens:?}");
        };
        let prefix = r.sheet.as_ref().unwrap();
        assert_eq!(prefix.raw, "'It''s'!");
        assert_eq!(prefix.target, SheetTarget::Sheet("It's".into()));

        let tokens = tokenize("Jan:Mar!C3").unwrap();
        assert_eq!(
            tokens[0].sheet().unwrap().target,
            SheetTarget::Span {
                start: "Jan".into(),
                end: "Mar".into()
            }
        );

        let tokens = tokenize("[2]Prices!A1").unwrap();
        assert_eq!(tokens[0].sheet().unwrap().target, SheetTarget::External);
        assert!(tokens[0].is_reference());

        // A sheet-qualified name stays opaque.
        assert_eq!(kinds("Sheet1!Amount"), ["opaque"]);
    }

    #[test]
    fn malformed_references_fail() {
        assert_eq!(
            tokenize("SUM(A1:B)"),
            Err(ModelError::InvalidCellReference("B".into()))
        );
        assert_eq!(
            tokenize("SUM(A:B1)"),
            Err(ModelError::InvalidCellReference("A".into()))
        );
        assert_eq!(tokenize("XFE1+1"), Err(ModelError::ColumnOverflow));
        assert_eq!(tokenize("SUM(1:1048577)"), Err(ModelError::RowOverflow));
    }
}
