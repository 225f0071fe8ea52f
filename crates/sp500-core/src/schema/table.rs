use crate::error::TableError;
use std::collections::{BTreeSet, HashSet};

pub const SYMBOL: &str = "Symbol";
pub const SECURITY: &str = "Security";
pub const SECTOR: &str = "GICS Sector";

/// One company, with every scraped cell kept in column order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompanyRow {
    symbol: String,
    name: String,
    sector: String,
    cells: Vec<String>,
}

impl CompanyRow {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// The S&P 500 constituent table, in scrape order.
///
/// Filtering never mutates a table; it derives a new one that shares the
/// same columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompanyTable {
    columns: Vec<String>,
    rows: Vec<CompanyRow>,
}

impl CompanyTable {
    /// Build a table from its header and raw records.
    ///
    /// The `Symbol`, `Security` and `GICS Sector` columns must be present, every
    /// record must have one cell per column, and symbols must be unique
    /// (compared case-insensitively).
    pub fn new(columns: Vec<String>, records: Vec<Vec<String>>) -> Result<Self, TableError> {
        let position = |name: &'static str| {
            columns
                .iter()
                .position(|col| col == name)
                .ok_or(TableError::MissingColumn(name))
        };
        let symbol_idx = position(SYMBOL)?;
        let name_idx = position(SECURITY)?;
        let sector_idx = position(SECTOR)?;

        let mut seen = HashSet::with_capacity(records.len());
        let mut rows = Vec::with_capacity(records.len());
        for (i, cells) in records.into_iter().enumerate() {
            if cells.len() != columns.len() {
                return Err(TableError::RaggedRow {
                    row: i,
                    expected: columns.len(),
                    found: cells.len(),
                });
            }

            let symbol = cells[symbol_idx].clone();
            if !seen.insert(symbol.to_uppercase()) {
                return Err(TableError::DuplicateSymbol(symbol));
            }

            rows.push(CompanyRow {
                symbol,
                name: cells[name_idx].clone(),
                sector: cells[sector_idx].clone(),
                cells,
            });
        }

        Ok(Self { columns, rows })
    }

    /// A table over the same columns holding `rows`, which were taken from `self`.
    pub(crate) fn derive(&self, rows: Vec<CompanyRow>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[CompanyRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Distinct sector names, sorted.
    pub fn sectors(&self) -> BTreeSet<String> {
        self.rows.iter().map(|row| row.sector.clone()).collect()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.symbol.as_str())
    }

    /// Case-insensitive symbol lookup.
    pub fn find_symbol(&self, symbol: &str) -> Option<&CompanyRow> {
        let wanted = symbol.trim().to_uppercase();
        self.rows
            .iter()
            .find(|row| row.symbol.to_uppercase() == wanted)
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.find_symbol(symbol).is_some()
    }
}
