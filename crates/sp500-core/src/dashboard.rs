use crate::api::{CompanySource, PriceSource};
use crate::error::Result;
use crate::export::{export_csv, DownloadPayload};
use crate::fetcher::PriceFetcher;
use crate::filter::filter_by_sectors;
use crate::loader::{self, TableCache};
use crate::plot::{render_close_chart, Chart};
use crate::schema::table::CompanyTable;
use crate::selection::{resolve, Selection, SelectionState};
use std::sync::Arc;
use tracing::{debug, info, warn};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// One evaluation of the dashboard per user interaction
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// The session: an injected table cache plus the two external sources.
pub struct Dashboard {
    cache: TableCache,
    companies: Box<dyn CompanySource>,
    prices: Box<dyn PriceSource>,
}

/// What a single evaluation shows the user.
#[derive(Debug)]
pub struct View {
    /// Filtered companies, in table order.
    pub table: CompanyTable,
    pub download: DownloadPayload,
    pub selection: Selection,
    /// One entry per target symbol; empty unless plots were requested.
    pub plots: Vec<PlotOutcome>,
}

impl View {
    /// `Dimensions: 503 rows and 8 columns`
    pub fn dimensions(&self) -> String {
        let (rows, columns) = self.table.shape();
        format!("Dimensions: {rows} rows and {columns} columns")
    }
}

#[derive(Debug)]
pub enum PlotOutcome {
    Rendered(Chart),
    /// The price source or the renderer failed for this symbol.
    Missing { symbol: String, reason: String },
}

impl Dashboard {
    pub fn new(
        cache: TableCache,
        companies: Box<dyn CompanySource>,
        prices: Box<dyn PriceSource>,
    ) -> Self {
        Self {
            cache,
            companies,
            prices,
        }
    }

    /// The full, unfiltered table; loaded once per session.
    pub async fn table(&self) -> Result<Arc<CompanyTable>> {
        loader::load(&self.cache, self.companies.as_ref()).await
    }

    /// Run the pipeline for `state`: load, filter, export, resolve the
    /// selection and, when `show_plots` is set, fetch and render each target.
    pub async fn evaluate(&self, state: &SelectionState, show_plots: bool) -> Result<View> {
        let table = self.table().await?;

        let filtered = filter_by_sectors(&table, &state.sectors);
        let download = export_csv(&filtered)?;
        let selection = resolve(state, &table);
        if let Some(notice) = &selection.notice {
            info!("{notice}: {:?}", state.override_symbol);
        }

        let plots = if show_plots {
            self.plot(&selection).await
        } else {
            vec![]
        };

        Ok(View {
            table: filtered,
            download,
            selection,
            plots,
        })
    }

    async fn plot(&self, selection: &Selection) -> Vec<PlotOutcome> {
        let fetcher = PriceFetcher::new(self.prices.as_ref());
        let fetched = fetcher.fetch_many(selection.target.symbols()).await;

        let outcomes: Vec<PlotOutcome> = fetched
            .into_iter()
            .map(|(symbol, series)| match series.and_then(|s| render_close_chart(&s)) {
                Ok(chart) => PlotOutcome::Rendered(chart),
                Err(e) => {
                    warn!("[{symbol}] no plot: {e}");
                    PlotOutcome::Missing {
                        symbol,
                        reason: e.to_string(),
                    }
                }
            })
            .collect();

        debug!("{} plot outcomes", outcomes.len());
        outcomes
    }
}
