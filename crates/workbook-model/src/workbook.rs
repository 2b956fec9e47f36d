use serde::{Deserialize, Serialize};

use crate::names::{validate_defined_name, DefinedName, DefinedNameScope};
use crate::table::{validate_table_name, Table, TableOptions, TablePart};
use crate::{
    sheet_name_eq_case_insensitive, validate_sheet_name, CalcChain, ModelError, PartState, Range,
    RangeRecord, SheetDefaults, Worksheet, WorksheetId,
};

/// A workbook: ordered worksheets plus workbook-level parts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// Worksheets in tab order.
    #[serde(default)]
    pub sheets: Vec<Worksheet>,

    /// Defined names (named ranges / constants / formulas).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defined_names: Vec<DefinedName>,

    /// `xl/calcChain.xml`, when the package has one.
    #[serde(default)]
    pub calc_chain: PartState<CalcChain>,

    /// Defaults applied to sheets created through [`Workbook::add_sheet`].
    #[serde(default)]
    pub sheet_defaults: SheetDefaults,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet_defaults(sheet_defaults: SheetDefaults) -> Self {
        Self {
            sheet_defaults,
            ..Self::default()
        }
    }

    /// Add a worksheet at the end of the tab order.
    pub fn add_sheet(&mut self, name: &str) -> Result<WorksheetId, ModelError> {
        validate_sheet_name(name)?;
        if self.sheet_index(name).is_some() {
            return Err(ModelError::DuplicateSheetName(name.to_string()));
        }
        let id = self.sheets.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let mut sheet = Worksheet::new(id, name);
        sheet.defaults = self.sheet_defaults;
        self.sheets.push(sheet);
        Ok(id)
    }

    /// Tab position of the sheet called `name` (case-insensitive).
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets
            .iter()
            .position(|s| sheet_name_eq_case_insensitive(&s.name, name))
    }

    pub fn sheet(&self, id: WorksheetId) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.id == id)
    }

    pub fn sheet_mut(&mut self, id: WorksheetId) -> Option<&mut Worksheet> {
        self.sheets.iter_mut().find(|s| s.id == id)
    }

    pub fn sheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.sheet_index(name).map(|idx| &self.sheets[idx])
    }

    pub fn sheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        let idx = self.sheet_index(name)?;
        Some(&mut self.sheets[idx])
    }

    /// Like [`Workbook::sheet_by_name_mut`], reporting `SheetNotFound`.
    pub fn require_sheet_mut(&mut self, name: &str) -> Result<&mut Worksheet, ModelError> {
        self.sheet_by_name_mut(name)
            .ok_or_else(|| ModelError::SheetNotFound(name.to_string()))
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Find a loaded table by name anywhere in the workbook.
    pub fn table_by_name(&self, name: &str) -> Option<(&Worksheet, &Table)> {
        self.sheets.iter().find_map(|sheet| {
            sheet
                .tables()
                .find(|t| t.name.eq_ignore_ascii_case(name))
                .map(|t| (sheet, t))
        })
    }

    /// Create a table over `reference` on `sheet`.
    ///
    /// The range may be given in either corner order; it is stored normalized.
    /// Returns the new table id.
    pub fn add_table(
        &mut self,
        sheet: &str,
        reference: &str,
        options: TableOptions,
    ) -> Result<u32, ModelError> {
        let sheet_idx = self
            .sheet_index(sheet)
            .ok_or_else(|| ModelError::SheetNotFound(sheet.to_string()))?;
        let range = Range::from_a1(reference)?;

        // Unreadable parts still own their id and path.
        let id = self
            .sheets
            .iter()
            .flat_map(|sheet| sheet.tables.iter())
            .filter_map(TablePart::id)
            .max()
            .unwrap_or(0)
            + 1;
        let name = match options.name {
            Some(name) => {
                validate_table_name(&name)?;
                name
            }
            None => format!("Table{id}"),
        };
        if self.table_by_name(&name).is_some() {
            return Err(ModelError::DuplicateTableName(name));
        }

        let header_row_count = u32::from(options.show_header_row);
        let mut table = Table {
            id,
            name: name.clone(),
            display_name: name,
            area: RangeRecord::new(range),
            header_row_count,
            totals_row_count: 0,
            columns: Vec::new(),
            auto_filter: (header_row_count > 0).then(|| RangeRecord::new(range)),
            style_name: options.style_name,
        };
        table.insert_columns(0, range.width());

        self.sheets[sheet_idx].tables.push(TablePart {
            path: format!("xl/tables/table{id}.xml"),
            content: PartState::Loaded(table),
        });
        Ok(id)
    }

    /// Define (or fail on an existing) name in `scope`.
    pub fn set_defined_name(
        &mut self,
        name: &str,
        scope: DefinedNameScope,
        refers_to: &str,
    ) -> Result<(), ModelError> {
        validate_defined_name(name).map_err(|_| ModelError::InvalidDefinedName(name.to_string()))?;
        if let DefinedNameScope::Sheet(id) = scope {
            if self.sheet(id).is_none() {
                return Err(ModelError::SheetNotFound(id.to_string()));
            }
        }
        if self.defined_name(name, scope).is_some() {
            return Err(ModelError::DuplicateDefinedName(name.to_string()));
        }
        self.defined_names.push(DefinedName {
            name: name.to_string(),
            scope,
            refers_to: crate::normalize_formula_text(refers_to),
        });
        Ok(())
    }

    pub fn defined_name(&self, name: &str, scope: DefinedNameScope) -> Option<&DefinedName> {
        self.defined_names
            .iter()
            .find(|n| n.scope == scope && n.name.eq_ignore_ascii_case(name))
    }
}
