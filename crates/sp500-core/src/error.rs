use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors raised while evaluating the dashboard pipeline.
///
/// Only [`DashboardError::SourceUnavailable`] ends an interaction; the others are
/// recovered locally and shown to the user.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The company list could not be fetched or parsed.
    #[error("company list unavailable: {0}")]
    SourceUnavailable(String),

    /// An override symbol is not a member of the company table.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The price source failed for a single symbol.
    #[error("price data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("plot rendering failed: {0}")]
    Plot(String),

    #[error("csv export failed: {0}")]
    Export(#[from] csv::Error),
}

/// Structural problems with a scraped or parsed company table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("missing required column \"{0}\"")]
    MissingColumn(&'static str),

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("duplicate symbol \"{0}\"")]
    DuplicateSymbol(String),
}
