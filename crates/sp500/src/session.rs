use crate::config::Config;
use crate::ui;
use anyhow::{bail, Result};
use async_trait::async_trait;
use colored::Colorize;
use sp500_core::api::CompanySource;
use sp500_core::export::parse_csv;
use sp500_core::loader::TableCache;
use sp500_core::schema::{constituents::Wikipedia, prices::YahooFinance};
use sp500_core::{CompanyTable, Dashboard, DashboardError, PlotOutcome, SelectionState, View};
use sp500_util::{http_client, read_text, write_file};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Session wiring
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Wikipedia and Yahoo Finance behind one HTTP client, or a local CSV export
/// in place of Wikipedia when `table` is given.
pub fn build(config: &Config, table: Option<&Path>) -> Result<Dashboard> {
    let http_client = http_client(&config.user_agent, config.timeout)?;
    let prices = Box::new(YahooFinance::new(http_client.clone(), &config.chart_url));

    let companies: Box<dyn CompanySource> = match table {
        Some(path) => {
            debug!("company list read from {}", path.display());
            Box::new(CsvFile::new(path))
        }
        None => Box::new(Wikipedia::new(http_client, &config.table_url)),
    };

    Ok(Dashboard::new(TableCache::new(), companies, prices))
}

/// A company list previously exported with `companies --csv`.
pub struct CsvFile {
    path: PathBuf,
}

impl CsvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CompanySource for CsvFile {
    async fn fetch_table(&self) -> sp500_core::Result<CompanyTable> {
        let text = read_text(&self.path)
            .await
            .map_err(|e| unavailable(&self.path, e))?;
        parse_csv(&text).map_err(|e| unavailable(&self.path, e))
    }
}

fn unavailable(path: &Path, e: impl std::fmt::Display) -> DashboardError {
    DashboardError::SourceUnavailable(format!("{}: {e}", path.display()))
}

/// Load the company table behind a spinner.
pub async fn load_table(dashboard: &Dashboard) -> Result<Arc<CompanyTable>> {
    let pb = ui::spinner("Loading S&P 500 companies")?;
    let table = dashboard.table().await;
    pb.finish_and_clear();
    Ok(table?)
}

/// Evaluate `state` behind a spinner.
pub async fn evaluate(dashboard: &Dashboard, state: &SelectionState, show_plots: bool) -> Result<View> {
    let msg = if show_plots {
        "Fetching closing prices"
    } else {
        "Filtering companies"
    };
    let pb = ui::spinner(msg)?;
    let view = dashboard.evaluate(state, show_plots).await;
    pb.finish_and_clear();
    Ok(view?)
}

/// The sector selection given on the command line; every sector when empty.
/// Names must match a sector of `table` exactly.
pub fn selected_sectors(table: &CompanyTable, sectors: &[String]) -> Result<SelectionState> {
    if sectors.is_empty() {
        return Ok(SelectionState::all_sectors(table));
    }

    let known = table.sectors();
    let mut picked = BTreeSet::new();
    for sector in sectors {
        let sector = sector.trim();
        if !known.contains(sector) {
            let valid = known.iter().cloned().collect::<Vec<_>>().join(", ");
            bail!("unknown sector \"{sector}\"; choose from: {valid}");
        }
        picked.insert(sector.to_string());
    }

    Ok(SelectionState {
        sectors: picked,
        ..Default::default()
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Terminal output
//
////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn print_companies(view: &View) {
    println!("{}", "Displaying companies in selected sector".bold());
    println!("{}", view.dimensions());
    for row in view.table.rows() {
        println!("{:>8} | {:<40} | {}", row.symbol(), row.name(), row.sector());
    }
}

pub fn print_notice(view: &View) {
    if let Some(notice) = &view.selection.notice {
        eprintln!("{}", notice.to_string().red());
    }
}

/// Write every rendered chart to `out_dir` and report the ones that are missing.
pub async fn write_plots(view: &View, out_dir: &Path) -> Result<Vec<PathBuf>> {
    if view.plots.is_empty() {
        return Ok(vec![]);
    }

    println!("{}", "Stock Closing Price".bold());
    let mut written = Vec::with_capacity(view.plots.len());
    for outcome in &view.plots {
        match outcome {
            PlotOutcome::Rendered(chart) => {
                let path = out_dir.join(chart.filename());
                write_file(&path, chart.svg.as_bytes()).await?;
                println!("{:>8} | {}", chart.title, path.display());
                written.push(path);
            }
            PlotOutcome::Missing { symbol, reason } => {
                let msg = format!("{symbol:>8} | no price data: {reason}");
                println!("{}", msg.yellow());
            }
        }
    }

    info!("{} charts written to {}", written.len(), out_dir.display());
    Ok(written)
}

/// Save the CSV download of `view` to `path`.
pub async fn write_csv(view: &View, path: &Path) -> Result<()> {
    write_file(path, view.download.bytes()).await?;
    println!("Download CSV File: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Symbol,Security,GICS Sector\nMMM,3M,Industrials\nXOM,ExxonMobil,Energy\n";

    #[tokio::test]
    async fn csv_file_reads_exported_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SP500.csv");
        write_file(&path, CSV.as_bytes()).await.unwrap();

        let table = CsvFile::new(&path).fetch_table().await.unwrap();
        assert_eq!(table.symbols().collect::<Vec<_>>(), ["MMM", "XOM"]);
    }

    #[tokio::test]
    async fn missing_csv_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvFile::new(dir.path().join("nope.csv"))
            .fetch_table()
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn offline_session_plots_nothing_without_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SP500.csv");
        write_file(&path, CSV.as_bytes()).await.unwrap();

        let config = Config::from_env().unwrap();
        let dashboard = build(&config, Some(path.as_path())).unwrap();
        let table = dashboard.table().await.unwrap();

        let state = selected_sectors(&table, &["Energy".to_string()]).unwrap();
        let view = dashboard.evaluate(&state, false).await.unwrap();
        assert_eq!(view.table.symbols().collect::<Vec<_>>(), ["XOM"]);

        let written = write_plots(&view, dir.path()).await.unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn no_sector_arguments_select_everything() {
        let table = parse_csv(CSV).unwrap();
        let state = selected_sectors(&table, &[]).unwrap();
        assert_eq!(state.sectors, table.sectors());
    }

    #[test]
    fn sector_names_are_trimmed() {
        let table = parse_csv(CSV).unwrap();
        let state = selected_sectors(&table, &[" Energy ".to_string()]).unwrap();
        assert_eq!(state.sectors, BTreeSet::from(["Energy".to_string()]));
    }

    #[test]
    fn unknown_sector_is_rejected_with_valid_names() {
        let table = parse_csv(CSV).unwrap();
        let err = selected_sectors(&table, &["industrials".to_string()]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("\"industrials\""));
        assert!(msg.contains("Energy, Industrials"));
    }
}
