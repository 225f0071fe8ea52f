use crate::api::PriceSource;
use crate::error::{DashboardError, Result};
use crate::schema::prices::PriceSeries;
use crate::schema::table::CompanyTable;
use tokio_stream::{self as stream, StreamExt};
use tracing::{debug, trace, warn};

/// Most symbols fetched in one multi-symbol request.
pub const MAX_SYMBOLS: usize = 10;

/// Check a user-supplied override symbol against the full company table.
///
/// The comparison ignores case; the table's own spelling is returned.
pub fn validate_override<'t>(table: &'t CompanyTable, input: &str) -> Result<&'t str> {
    table
        .find_symbol(input)
        .map(|row| row.symbol())
        .ok_or_else(|| DashboardError::SymbolNotFound(input.trim().to_string()))
}

pub struct PriceFetcher<'a> {
    source: &'a dyn PriceSource,
}

impl<'a> PriceFetcher<'a> {
    pub fn new(source: &'a dyn PriceSource) -> Self {
        Self { source }
    }

    pub async fn fetch_one(&self, symbol: &str) -> Result<PriceSeries> {
        self.source.fetch_prices(symbol).await
    }

    /// Fetch each symbol in turn, keeping input order.
    ///
    /// A failure only affects its own symbol; nothing is retried. Symbols past
    /// [`MAX_SYMBOLS`] are ignored.
    pub async fn fetch_many(&self, symbols: &[String]) -> Vec<(String, Result<PriceSeries>)> {
        if symbols.len() > MAX_SYMBOLS {
            warn!(
                "{} symbols requested, only the first {MAX_SYMBOLS} are fetched",
                symbols.len()
            );
        }

        let mut fetched = Vec::with_capacity(symbols.len().min(MAX_SYMBOLS));
        let mut stream = stream::iter(symbols.iter().take(MAX_SYMBOLS));
        while let Some(symbol) = stream.next().await {
            let result = self.fetch_one(symbol).await;
            match &result {
                Ok(series) => trace!("[{symbol}] {} bars", series.len()),
                Err(e) => warn!("[{symbol}] skipped: {e}"),
            }
            fetched.push((symbol.clone(), result));
        }

        debug!(
            "{}/{} price series fetched",
            fetched.iter().filter(|(_, r)| r.is_ok()).count(),
            fetched.len()
        );
        fetched
    }
}
