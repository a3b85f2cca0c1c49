use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info};
use vidboard_proto::catalog::{Catalog, CatalogError, CatalogSource};

/// Lazily-loaded, process-wide catalog.
///
/// The first request triggers the load.  A successful load is kept for the
/// life of the process; a failed one is not, so the next request retries.
pub struct CatalogStore {
    source: CatalogSource,
    cell: OnceCell<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
        }
    }

    /// Store that already holds `catalog` and never touches its source.
    pub fn preloaded(catalog: Catalog) -> Self {
        Self {
            source: CatalogSource::File(Default::default()),
            cell: OnceCell::from(Arc::new(catalog)),
        }
    }

    pub async fn get(&self) -> Result<Arc<Catalog>, CatalogError> {
        self.cell
            .get_or_try_init(|| async {
                match self.source.load().await {
                    Ok(catalog) => {
                        info!("catalog ready: {} items from {}", catalog.len(), self.source);
                        Ok(Arc::new(catalog))
                    }
                    Err(e) => {
                        error!("catalog load from {} failed: {}", self.source, e);
                        Err(e)
                    }
                }
            })
            .await
            .cloned()
    }
}
