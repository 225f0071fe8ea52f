use crate::api::{CompanySource, HttpClient};
use crate::error::{DashboardError, Result};
use crate::schema::table::{CompanyTable, SECTOR, SYMBOL};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use sp500_util::Util;
use tracing::{debug, error, trace};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// S&P 500 constituents, scraped from Wikipedia
//
////////////////////////////////////////////////////////////////////////////////////////////////////

pub const CONSTITUENTS_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

pub struct Wikipedia {
    http_client: HttpClient,
    url: String,
}

impl Wikipedia {
    pub fn new(http_client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl CompanySource for Wikipedia {
    async fn fetch_table(&self) -> Result<CompanyTable> {
        let time = std::time::Instant::now();
        let url = &self.url;

        trace!("fetching constituents page from {url}");
        let html = self.http_client.get_text(url).await.map_err(|e| {
            error!("failed to fetch constituents page: {e}\nURL: {url}");
            DashboardError::SourceUnavailable(e.to_string())
        })?;

        let table = parse_constituents(&html)?;
        debug!(
            "{} constituents scraped. Elapsed time: {} ms",
            table.len(),
            time.elapsed().as_millis()
        );

        Ok(table)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// HTML parsing
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Parse the first `<table>` whose header row names both the `Symbol` and
/// `GICS Sector` columns.
pub fn parse_constituents(html: &str) -> Result<CompanyTable> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let header_sel = selector("th")?;
    let cell_sel = selector("td, th")?;

    for table in document.select(&table_sel) {
        let mut rows = table.select(&row_sel);
        let Some(header) = rows.next() else {
            continue;
        };

        let columns: Vec<String> = header.select(&header_sel).map(cell_text).collect();
        if !columns.iter().any(|c| c == SYMBOL) || !columns.iter().any(|c| c == SECTOR) {
            trace!("skipping table with columns {columns:?}");
            continue;
        }

        let records: Vec<Vec<String>> = rows
            .map(|row| row.select(&cell_sel).map(cell_text).collect::<Vec<_>>())
            .filter(|cells| !cells.is_empty())
            .collect();
        trace!("constituents table found with {} rows", records.len());

        return CompanyTable::new(columns, records).map_err(|e| {
            error!("constituents table is malformed: {e}");
            DashboardError::SourceUnavailable(e.to_string())
        });
    }

    Err(DashboardError::SourceUnavailable(format!(
        "no table with \"{SYMBOL}\" and \"{SECTOR}\" columns"
    )))
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| DashboardError::SourceUnavailable(format!("invalid selector {css}: {e}")))
}

// whitespace is collapsed, the way a rendered page shows it
fn cell_text(cell: ElementRef) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <html><body>
          <table class="infobox"><tr><th>Type</th><td>Stock market index</td></tr></table>
          <table class="wikitable sortable" id="constituents">
            <tbody>
              <tr>
                <th>Symbol</th><th>Security</th><th>GICS Sector</th>
                <th>GICS Sub-Industry</th><th>Headquarters Location</th>
              </tr>
              <tr>
                <td><a href="#">MMM</a></td><td><a href="#">3M</a></td><td>Industrials</td>
                <td>Industrial Conglomerates</td><td>Saint Paul,
                    Minnesota</td>
              </tr>
              <tr>
                <td><a href="#">AOS</a></td><td>A. O. Smith</td><td>Industrials</td>
                <td>Building Products</td><td>Milwaukee, Wisconsin</td>
              </tr>
              <tr>
                <td><a href="#">ABT</a></td><td>Abbott Laboratories</td><td>Health Care</td>
                <td>Health Care Equipment</td><td>North Chicago, Illinois</td>
              </tr>
            </tbody>
          </table>
          <table class="wikitable" id="changes">
            <tr><th>Date</th><th>Added</th></tr>
            <tr><td>2024-01-01</td><td>XYZ</td></tr>
          </table>
        </body></html>
    "##;

    #[test]
    fn first_matching_table_is_used_verbatim() {
        let table = parse_constituents(PAGE).unwrap();
        assert_eq!(
            table.columns(),
            [
                "Symbol",
                "Security",
                "GICS Sector",
                "GICS Sub-Industry",
                "Headquarters Location"
            ]
        );
        assert_eq!(table.symbols().collect::<Vec<_>>(), ["MMM", "AOS", "ABT"]);
        assert_eq!(table.rows()[0].cells()[4], "Saint Paul, Minnesota");
        assert_eq!(table.rows()[2].sector(), "Health Care");
    }

    #[test]
    fn page_without_constituents_is_unavailable() {
        let page = "<table><tr><th>Date</th></tr><tr><td>2024</td></tr></table>";
        let err = parse_constituents(page).unwrap_err();
        assert!(matches!(err, DashboardError::SourceUnavailable(_)));
    }

    #[test]
    fn schema_change_is_unavailable() {
        let page = "<table><tr><th>Symbol</th><th>GICS Sector</th></tr></table>";
        let err = parse_constituents(page).unwrap_err();
        assert!(matches!(err, DashboardError::SourceUnavailable(_)));
    }
}
