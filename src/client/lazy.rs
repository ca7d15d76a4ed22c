//! Lazily constructed, process-wide client handle.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{error, info};

use super::{ClientConfig, TourismClient};
use crate::Result;

/// Owns the client configuration and builds the [`TourismClient`] on first
/// use.
///
/// Concurrent first callers share a single construction. A failed
/// construction is returned to the caller and leaves the cell empty, so the
/// next call tries again (and, with an unchanged configuration, reports the
/// same error).
pub struct LazyClient {
    config: ClientConfig,
    cell: OnceCell<Arc<TourismClient>>,
}

impl LazyClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            cell: OnceCell::new(),
        }
    }

    /// Get the client, constructing it if this is the first call.
    pub async fn get(&self) -> Result<Arc<TourismClient>> {
        self.cell
            .get_or_try_init(|| async {
                TourismClient::new(self.config.clone())
                    .map(Arc::new)
                    .inspect_err(|e| error!(error = %e, "failed to initialize tourism client"))
            })
            .await
            .cloned()
    }

    /// Whether the client has been constructed.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Close pooled connections.
    ///
    /// Safe to call any number of times, and a no-op when the client was
    /// never constructed.
    pub fn shutdown(&self) {
        match self.cell.get() {
            Some(client) => client.close(),
            None => info!("tourism client was never initialized, nothing to close"),
        }
    }
}
