use crate::fetcher::validate_override;
use crate::filter::filter_by_sectors;
use crate::schema::table::CompanyTable;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, trace};

pub const MIN_COMPANIES: usize = 1;
pub const MAX_COMPANIES: usize = 10;

/// Number of companies to plot, always within `1..=10`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompanyCount(usize);

impl CompanyCount {
    /// Out-of-range values are clamped, like a slider.
    pub fn new(count: usize) -> Self {
        Self(count.clamp(MIN_COMPANIES, MAX_COMPANIES))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for CompanyCount {
    fn default() -> Self {
        Self(MIN_COMPANIES)
    }
}

/// Everything the user can change between two evaluations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub sectors: BTreeSet<String>,
    pub count: CompanyCount,
    pub override_symbol: Option<String>,
}

impl SelectionState {
    /// Every sector selected, the initial state of a session.
    pub fn all_sectors(table: &CompanyTable) -> Self {
        Self {
            sectors: table.sectors(),
            ..Default::default()
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = CompanyCount::new(count);
        self
    }

    pub fn with_override(mut self, symbol: impl Into<String>) -> Self {
        self.override_symbol = Some(symbol.into());
        self
    }

    fn override_input(&self) -> Option<&str> {
        self.override_symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// The symbols a "show plots" action renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlotTarget {
    /// A validated override symbol.
    Single(String),
    /// The first N symbols of the sector-filtered table.
    Multi(Vec<String>),
}

impl PlotTarget {
    pub fn symbols(&self) -> &[String] {
        match self {
            PlotTarget::Single(symbol) => std::slice::from_ref(symbol),
            PlotTarget::Multi(symbols) => symbols,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionNotice {
    SymbolNotFound(String),
}

impl fmt::Display for SelectionNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionNotice::SymbolNotFound(_) => f.write_str("Symbol not found"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub target: PlotTarget,
    pub notice: Option<SelectionNotice>,
}

/// Reconcile the sidebar inputs into the effective plot target.
///
/// A valid override wins. Otherwise the first `count` symbols passing the
/// sector filter are used; an invalid override only adds a notice.
pub fn resolve(state: &SelectionState, table: &CompanyTable) -> Selection {
    let mut notice = None;

    if let Some(input) = state.override_input() {
        match validate_override(table, input) {
            Ok(symbol) => {
                debug!("override symbol {symbol} selected");
                return Selection {
                    target: PlotTarget::Single(symbol.to_string()),
                    notice: None,
                };
            }
            Err(e) => {
                debug!("{e}");
                notice = Some(SelectionNotice::SymbolNotFound(input.to_string()));
            }
        }
    }

    let symbols: Vec<String> = filter_by_sectors(table, &state.sectors)
        .symbols()
        .take(state.count.get())
        .map(str::to_string)
        .collect();
    trace!("multi-symbol target: {symbols:?}");

    Selection {
        target: PlotTarget::Multi(symbols),
        notice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::table::tests::sample_table;

    fn sectors(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn count_is_clamped_to_slider_bounds() {
        assert_eq!(CompanyCount::new(0).get(), 1);
        assert_eq!(CompanyCount::new(4).get(), 4);
        assert_eq!(CompanyCount::new(25).get(), 10);
        assert_eq!(CompanyCount::default().get(), 1);
    }

    #[test]
    fn first_n_symbols_of_selected_sector() {
        let table = sample_table();
        let state = SelectionState {
            sectors: sectors(&["Information Technology"]),
            ..Default::default()
        }
        .with_count(2);

        let selection = resolve(&state, &table);
        assert_eq!(
            selection.target,
            PlotTarget::Multi(vec!["AAPL".to_string(), "ADBE".to_string()])
        );
        assert_eq!(selection.notice, None);
    }

    #[test]
    fn target_is_first_count_of_filtered_rows() {
        let table = sample_table();
        let all: Vec<String> = table.symbols().map(String::from).collect();
        for count in 0..=12 {
            let state = SelectionState::all_sectors(&table).with_count(count);
            let selection = resolve(&state, &table);
            let symbols = selection.target.symbols();
            let expected = count.clamp(1, 10).min(table.len());
            assert_eq!(symbols.len(), expected);
            assert_eq!(symbols, &all[..expected]);
        }
    }

    #[test]
    fn valid_override_selects_single_symbol() {
        let table = sample_table();
        let state = SelectionState::all_sectors(&table).with_override("adbe");

        let selection = resolve(&state, &table);
        assert_eq!(selection.target, PlotTarget::Single("ADBE".to_string()));
        assert_eq!(selection.target.symbols(), ["ADBE".to_string()]);
    }

    #[test]
    fn invalid_override_falls_back_with_notice() {
        let table = sample_table();
        let state = SelectionState::all_sectors(&table)
            .with_count(1)
            .with_override("zzzz");

        let selection = resolve(&state, &table);
        assert_eq!(selection.target, PlotTarget::Multi(vec!["MMM".to_string()]));
        assert_eq!(
            selection.notice,
            Some(SelectionNotice::SymbolNotFound("zzzz".to_string()))
        );
        assert_eq!(selection.notice.unwrap().to_string(), "Symbol not found");
    }

    #[test]
    fn blank_override_is_ignored() {
        let table = sample_table();
        let state = SelectionState::all_sectors(&table).with_override("   ");

        let selection = resolve(&state, &table);
        assert!(matches!(selection.target, PlotTarget::Multi(_)));
        assert_eq!(selection.notice, None);
    }

    #[test]
    fn no_sectors_means_no_targets() {
        let table = sample_table();
        let state = SelectionState::default().with_count(5);
        assert!(resolve(&state, &table).target.symbols().is_empty());
    }
}
