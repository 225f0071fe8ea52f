use crate::api::{HttpClient, PriceSource};
use crate::error::{DashboardError, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use sp500_util::Util;
use tracing::{debug, error, trace, warn};
use url::Url;

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Prices from Yahoo Finance, per ticker
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

pub const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// From 1 January of the current year to the latest trading day.
pub const PERIOD: &str = "ytd";
pub const INTERVAL: &str = "1d";

pub struct YahooFinance {
    http_client: HttpClient,
    base_url: String,
}

impl YahooFinance {
    pub fn new(http_client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, symbol: &str) -> Result<Url> {
        let tckr = market_symbol(symbol);
        let base = self.base_url.trim_end_matches('/');
        Url::parse_with_params(
            &format!("{base}/{tckr}"),
            &[
                ("symbol", tckr.as_str()),
                ("range", PERIOD),
                ("interval", INTERVAL),
                ("includePrePost", "true"),
                ("events", "div|split"),
            ],
        )
        .map_err(|e| unavailable(symbol, e))
    }
}

#[async_trait]
impl PriceSource for YahooFinance {
    async fn fetch_prices(&self, symbol: &str) -> Result<PriceSeries> {
        let time = std::time::Instant::now();
        let url = self.url(symbol)?;

        trace!("Fetching price data for [{symbol}] from Yahoo Finance");
        let response = self.http_client.get_bytes(url.as_str()).await.map_err(|e| {
            error!("[{symbol}] price fetching error: {e}\nURL: {url}");
            unavailable(symbol, e)
        })?;

        let series = parse_chart(symbol, &response)?;
        debug!(
            "[{symbol}] {} daily bars fetched. Elapsed time: {} ms",
            series.len(),
            time.elapsed().as_millis()
        );

        Ok(series)
    }
}

/// Wikipedia lists class shares with a dot (`BRK.B`); the chart API wants a dash.
pub fn market_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase().replace('.', "-")
}

fn unavailable(symbol: &str, reason: impl ToString) -> DashboardError {
    DashboardError::DataUnavailable {
        symbol: symbol.to_string(),
        reason: reason.to_string(),
    }
}

/// Transform a chart API response into a [`PriceSeries`].
///
/// Bars with a missing open/high/low/close are dropped. When an adjusted close
/// is present the whole bar is scaled by `adjclose / close`, so the series is
/// split and dividend adjusted.
pub fn parse_chart(symbol: &str, body: &[u8]) -> Result<PriceSeries> {
    trace!("Deserializing price data for [{symbol}]");
    let de = serde_json::from_slice::<PriceHistory>(body).map_err(|e| {
        error!("[{symbol}] deserialization error: {e}");
        unavailable(symbol, e)
    })?;

    if let Some(err) = de.chart.error {
        warn!("[{symbol}] chart API error: {} - {}", err.code, err.description);
        return Err(unavailable(symbol, format!("{}: {}", err.code, err.description)));
    }

    let Some(base) = de.chart.result.and_then(|results| results.into_iter().next()) else {
        error!("[{symbol}] contained no \"chart.result\" object");
        return Err(unavailable(symbol, "empty chart result"));
    };

    let offset = base.meta.and_then(|meta| meta.gmtoffset).unwrap_or(0);
    let empty = Quote::default();
    let quote = base.indicators.quote.first().unwrap_or(&empty);
    let adjclose = base
        .indicators
        .adjclose
        .first()
        .map(|adj| adj.adjclose.as_slice())
        .unwrap_or(&[]);

    let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();
    let bars = base
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, timestamp)| {
            let date = DateTime::from_timestamp(timestamp.checked_add(offset)?, 0)?.date_naive();
            let (open, high, low, close) = (
                at(quote.open.as_slice(), i)?,
                at(quote.high.as_slice(), i)?,
                at(quote.low.as_slice(), i)?,
                at(quote.close.as_slice(), i)?,
            );
            let ratio = match at(adjclose, i) {
                Some(adj) if close != 0.0 => adj / close,
                _ => 1.0,
            };
            Some(PriceBar {
                date,
                open: open * ratio,
                high: high * ratio,
                low: low * ratio,
                close: close * ratio,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            })
        })
        .collect();

    Ok(PriceSeries::new(symbol, bars))
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Price series
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Daily bars for one symbol; dates strictly increasing.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Sorts `bars` by date; when a date repeats, the later bar wins.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|bar| bar.date);
        let mut unique: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match unique.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => unique.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            bars: unique,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// `(date, close)` pairs in date order.
    pub fn closes(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.bars.iter().map(|bar| (bar.date, bar.close))
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Deserialize, Debug)]
struct PriceHistory {
    chart: PriceResponse,
}

#[derive(Deserialize, Debug)]
struct PriceResponse {
    result: Option<Vec<PriceCategories>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize, Debug)]
struct PriceCategories {
    meta: Option<Meta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Deserialize, Debug)]
struct Meta {
    gmtoffset: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

// Yahoo leaves `null` holes in every array on halted or partial days
#[derive(Deserialize, Debug, Default)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Deserialize, Debug)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}
