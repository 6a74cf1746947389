use std::sync::Arc;
use std::time::Instant;

use config_engine::Settings;
use price_catalog::{Catalog, CatalogResult};

/// Shared application state handed to every handler.
///
/// The catalog is built once at startup and never mutated afterwards, so
/// requests read it concurrently through the `Arc` without locking.
#[derive(Clone)]
pub struct CareCostServer {
    pub settings: Arc<Settings>,
    pub catalog: Arc<Catalog>,
    pub started_at: Instant,
}

impl CareCostServer {
    /// Load the catalog named by `settings.catalog.path`, or the embedded
    /// seed catalog when none is configured.
    ///
    /// # Errors
    ///
    /// Returns the catalog error when the file cannot be read or fails
    /// validation.
    pub fn new(settings: Settings) -> CatalogResult<Self> {
        let catalog = Catalog::load_or_seed(settings.catalog.path.as_deref())?;
        Ok(Self::with_catalog(settings, catalog))
    }

    pub fn with_catalog(settings: Settings, catalog: Catalog) -> Self {
        Self {
            settings: Arc::new(settings),
            catalog: Arc::new(catalog),
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
