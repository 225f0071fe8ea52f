use crate::error::{DashboardError, Result};
use crate::schema::prices::PriceSeries;
use chrono::{Datelike, NaiveDate, Utc};
use plotters::prelude::*;
use plotters::style::{FontStyle, FontTransform};
use std::ops::Range;
use tracing::trace;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const FONT: &str = "sans-serif";

/// A rendered closing-price chart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chart {
    pub symbol: String,
    pub title: String,
    pub svg: String,
}

impl Chart {
    /// `AAPL.svg`
    pub fn filename(&self) -> String {
        format!("{}.svg", self.title)
    }
}

/// Filled line chart of `series` closes against date.
///
/// An empty series renders blank axes instead of failing.
pub fn render_close_chart(series: &PriceSeries) -> Result<Chart> {
    let title = series.symbol().to_uppercase();
    let (x_range, y_range) = axis_ranges(series);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, (FONT, 22).into_font().style(FontStyle::Bold))
            .margin(15)
            .x_label_area_size(110)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, y_range)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(12)
            .x_label_formatter(&|date: &NaiveDate| date.format("%Y-%m-%d").to_string())
            .x_label_style((FONT, 12).into_font().transform(FontTransform::Rotate90))
            .x_desc("Date")
            .y_desc("Closing Price")
            .axis_desc_style((FONT, 15).into_font().style(FontStyle::Bold))
            .draw()
            .map_err(plot_err)?;

        if !series.is_empty() {
            chart
                .draw_series(
                    AreaSeries::new(series.closes(), 0.0, SKY_BLUE.mix(0.3))
                        .border_style(SKY_BLUE.mix(0.8)),
                )
                .map_err(plot_err)?;
        }

        root.present().map_err(plot_err)?;
    }
    trace!("[{title}] chart rendered from {} bars", series.len());

    Ok(Chart {
        symbol: series.symbol().to_string(),
        title,
        svg,
    })
}

// matplotlib-like autoscale: the shaded area starts at zero
fn axis_ranges(series: &PriceSeries) -> (Range<NaiveDate>, Range<f64>) {
    let bars = series.bars();
    let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
        let today = Utc::now().date_naive();
        let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        return (start..today.succ_opt().unwrap_or(today), 0.0..1.0);
    };

    let top = series
        .closes()
        .map(|(_, close)| close)
        .fold(f64::MIN, f64::max);
    let top = if top > 0.0 { top * 1.05 } else { 1.0 };

    let start = first.date.pred_opt().unwrap_or(first.date);
    let end = last.date.succ_opt().unwrap_or(last.date);
    (start..end, 0.0..top)
}

fn plot_err(e: impl std::fmt::Display) -> DashboardError {
    DashboardError::Plot(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::prices::PriceBar;

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, close)| PriceBar {
                date: start + chrono::Days::new(i as u64),
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: 1_000,
            })
            .collect();
        PriceSeries::new(symbol, bars)
    }

    #[test]
    fn chart_is_titled_with_uppercased_symbol() {
        let chart = render_close_chart(&series("aapl", &[185.6, 184.2, 181.9])).unwrap();
        assert_eq!(chart.title, "AAPL");
        assert_eq!(chart.symbol, "aapl");
        assert_eq!(chart.filename(), "AAPL.svg");
        assert!(chart.svg.contains("<svg"));
        assert!(chart.svg.contains("AAPL"));
        assert!(chart.svg.contains("Closing Price"));
        assert!(chart.svg.contains("Date"));
    }

    #[test]
    fn empty_series_renders_blank_plot() {
        let chart = render_close_chart(&series("MMM", &[])).unwrap();
        assert!(chart.svg.contains("MMM"));
    }

    #[test]
    fn single_bar_still_has_a_date_span() {
        let (x, y) = axis_ranges(&series("MMM", &[100.0]));
        assert!(x.start < x.end);
        assert_eq!(y.start, 0.0);
        assert!((y.end - 105.0).abs() < 1e-9);
    }
}
