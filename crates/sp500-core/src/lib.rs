pub mod api;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod filter;
pub mod loader;
pub mod plot;
pub mod schema;
pub mod selection;

pub use dashboard::{Dashboard, PlotOutcome, View};
pub use error::{DashboardError, Result, TableError};
pub use schema::prices::{PriceBar, PriceSeries};
pub use schema::table::{CompanyRow, CompanyTable};
pub use selection::{CompanyCount, PlotTarget, Selection, SelectionNotice, SelectionState};
