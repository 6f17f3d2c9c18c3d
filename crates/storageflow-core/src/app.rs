//! Application wiring
//!
//! Opens the store, seeds install defaults, and owns the router. The
//! sweeper task is the hourly cleanup the background context runs for
//! the life of the process.

use std::sync::Arc;

use storageflow_router::{Router, TabChannel};
use storageflow_store::Database;

use crate::config::Config;
use crate::Result;

pub struct App {
    store: Database,
    router: Arc<Router>,
}

impl App {
    pub fn new(config: &Config, channel: Arc<dyn TabChannel>) -> Result<Self> {
        let store = Database::open(&config.database_path)?;
        Self::with_store(store, channel)
    }

    /// Wire an app over an already-open store (tests use the in-memory
    /// database here).
    pub fn with_store(store: Database, channel: Arc<dyn TabChannel>) -> Result<Self> {
        let router = Arc::new(Router::new(channel, store.clone()));
        router.apply_install_defaults()?;

        tracing::info!("StorageFlow core initialized");

        Ok(Self { store, router })
    }

    pub fn router(&self) -> Arc<Router> {
        Arc::clone(&self.router)
    }

    pub fn store(&self) -> Database {
        self.store.clone()
    }

    /// Run the stale-tab sweep on a fixed interval until the handle is
    /// aborted or the runtime shuts down.
    pub fn spawn_sweeper(&self, interval: std::time::Duration) -> tokio::task::JoinHandle<()> {
        let router = Arc::clone(&self.router);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; skip it
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = router.sweep_stale_tabs();
                tracing::debug!(evicted, "Periodic tab sweep");
            }
        })
    }
}
