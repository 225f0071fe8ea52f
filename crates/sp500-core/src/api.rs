use crate::error::Result;
use crate::schema::prices::PriceSeries;
use crate::schema::table::CompanyTable;
use async_trait::async_trait;

pub type HttpClient = reqwest::Client;

/// Where the constituent table comes from.
#[async_trait]
pub trait CompanySource: Send + Sync {
    async fn fetch_table(&self) -> Result<CompanyTable>;
}

/// Year-to-date daily bars for one ticker symbol.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_prices(&self, symbol: &str) -> Result<PriceSeries>;
}
