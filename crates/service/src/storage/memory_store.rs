use async_trait::async_trait;
use dashmap::DashMap;
use models::{Risk, RiskAttributes, RiskId};
use tracing::debug;

use crate::errors::ServiceError;
use crate::storage::DataStore;

/// In-memory data store backed by a sharded concurrent map.
///
/// Readers and writers on different shards never contend. Racing writes to the
/// same id are last-write-wins with no ordering between the racers.
///
/// Listing walks the shards one at a time, so it is not a point-in-time snapshot:
/// a write landing during the walk may or may not show up. Entries not touched
/// concurrently always appear exactly once.
#[derive(Debug, Default)]
pub struct MemoryDataStore {
    risks: DashMap<RiskId, RiskAttributes>,
}

impl MemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &RiskId) -> Option<RiskAttributes> {
        self.risks.get(id).map(|entry| entry.value().clone())
    }

    /// Insert or overwrite; returns the previous attributes if any.
    pub fn insert(&self, id: RiskId, attrs: RiskAttributes) -> Option<RiskAttributes> {
        self.risks.insert(id, attrs)
    }

    pub fn list(&self) -> Vec<Risk> {
        self.risks
            .iter()
            .map(|entry| Risk::new(*entry.key(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.risks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.risks.is_empty()
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn connect(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn get_risk(&self, id: RiskId) -> Result<RiskAttributes, ServiceError> {
        self.get(&id).ok_or_else(|| ServiceError::not_found(&id))
    }

    async fn put_risk(&self, id: RiskId, attrs: RiskAttributes) -> Result<(), ServiceError> {
        if self.insert(id, attrs).is_some() {
            debug!(risk_id = %id, "overwrote existing risk");
        }
        Ok(())
    }

    async fn list_risks(&self) -> Result<Vec<Risk>, ServiceError> {
        Ok(self.list())
    }
}
