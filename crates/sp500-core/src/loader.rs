use crate::api::CompanySource;
use crate::error::Result;
use crate::schema::table::CompanyTable;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, trace};

/// Session-scoped memo of the constituent table.
///
/// Populated by the first successful [`load`]; every later call returns the
/// same snapshot. There is no invalidation, the cache lives as long as its
/// owner. A failed load leaves it empty.
#[derive(Debug, Default)]
pub struct TableCache {
    cell: OnceCell<Arc<CompanyTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache already holding `table`, for offline sessions and tests.
    pub fn with_table(table: CompanyTable) -> Self {
        Self {
            cell: OnceCell::new_with(Some(Arc::new(table))),
        }
    }

    pub fn get(&self) -> Option<Arc<CompanyTable>> {
        self.cell.get().cloned()
    }

    pub fn is_populated(&self) -> bool {
        self.cell.initialized()
    }
}

/// Return the cached table, fetching it from `source` on first use.
pub async fn load(cache: &TableCache, source: &dyn CompanySource) -> Result<Arc<CompanyTable>> {
    if let Some(table) = cache.get() {
        trace!("constituents served from cache");
        return Ok(table);
    }

    info!("Loading S&P 500 constituents");
    let table = cache
        .cell
        .get_or_try_init(|| async { source.fetch_table().await.map(Arc::new) })
        .await?
        .clone();
    debug!("constituents cached: {} rows", table.len());

    Ok(table)
}
