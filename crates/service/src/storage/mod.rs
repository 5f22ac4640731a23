//! Storage abstractions for the service layer
//!
//! `DataStore` is the capability set every backend offers. Backends are picked
//! at startup by name through [`new_data_store`].

pub mod memory_store;

use std::{fmt, str::FromStr, sync::Arc};

use async_trait::async_trait;
use configs::DataStoreConfig;
use models::{Risk, RiskAttributes, RiskId};
use tracing::info;

use crate::errors::ServiceError;
pub use memory_store::MemoryDataStore;

/// Key-value storage for risks.
/// Implementations must be safe to share across tasks without caller-side locking.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Acquire backing resources. Called once before first use.
    async fn connect(&self) -> Result<(), ServiceError>;
    /// Release backing resources.
    async fn close(&self) -> Result<(), ServiceError>;
    /// Fails with [`ServiceError::NotFound`] when `id` was never stored.
    async fn get_risk(&self, id: RiskId) -> Result<RiskAttributes, ServiceError>;
    /// Insert or overwrite. Last write wins.
    async fn put_risk(&self, id: RiskId, attrs: RiskAttributes) -> Result<(), ServiceError>;
    /// Every stored risk, in no particular order.
    async fn list_risks(&self) -> Result<Vec<Risk>, ServiceError>;
}

/// Backend names accepted in `datastore.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStoreKind {
    /// In-process concurrent map. Also accepted as `memory`.
    SyncMap,
}

impl FromStr for DataStoreKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "syncmap" | "memory" => Ok(DataStoreKind::SyncMap),
            _ => Err(ServiceError::UnsupportedDataStore(s.to_string())),
        }
    }
}

impl fmt::Display for DataStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataStoreKind::SyncMap => f.write_str("syncmap"),
        }
    }
}

/// Build the backend named by the configuration.
pub fn new_data_store(cfg: &DataStoreConfig) -> Result<Arc<dyn DataStore>, ServiceError> {
    let kind: DataStoreKind = cfg.kind.parse()?;
    info!(datastore = %kind, "creating data store");
    match kind {
        DataStoreKind::SyncMap => Ok(Arc::new(MemoryDataStore::new())),
    }
}
