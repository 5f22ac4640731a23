use std::sync::Arc;

use models::{Risk, RiskAttributes, RiskId};
use tracing::{debug, instrument};

use crate::errors::ServiceError;
use crate::storage::DataStore;

/// Application service for risks.
///
/// Holds nothing but the store handle. Content validation (state membership)
/// is done by the caller; this layer records whatever id/attributes pair it is
/// given and passes store errors through untouched, without retrying.
pub struct RiskService<S: DataStore + ?Sized = dyn DataStore> {
    store: Arc<S>,
}

impl<S: DataStore + ?Sized> Clone for RiskService<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}

impl<S: DataStore + ?Sized> RiskService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    pub fn store(&self) -> &Arc<S> { &self.store }

    #[instrument(skip_all, fields(risk_id = %id))]
    pub async fn get_risk(&self, id: RiskId) -> Result<Risk, ServiceError> {
        let attributes = self.store.get_risk(id).await?;
        Ok(Risk::new(id, attributes))
    }

    /// The caller generates `id` (see [`RiskId::new`]) before calling this.
    #[instrument(skip_all, fields(risk_id = %id, state = %attrs.state))]
    pub async fn create_risk(&self, id: RiskId, attrs: RiskAttributes) -> Result<(), ServiceError> {
        self.store.put_risk(id, attrs).await?;
        debug!("risk stored");
        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn list_risks(&self) -> Result<Vec<Risk>, ServiceError> {
        let risks = self.store.list_risks().await?;
        debug!(count = risks.len(), "listed risks");
        Ok(risks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDataStore;
    use async_trait::async_trait;
    use models::RiskState;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service() -> (Arc<MemoryDataStore>, RiskService<MemoryDataStore>) {
        let store = Arc::new(MemoryDataStore::new());
        (Arc::clone(&store), RiskService::new(store))
    }

    #[tokio::test]
    async fn get_risk_not_found() {
        let (_, svc) = service();
        let id = RiskId::new();
        let err = svc.get_risk(id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref s) if *s == id.to_string()));
    }

    #[tokio::test]
    async fn get_risk_found() -> Result<(), anyhow::Error> {
        let (store, svc) = service();
        let id = RiskId::new();
        let attrs = RiskAttributes::new(RiskState::Open);
        store.insert(id, attrs.clone());

        let risk = svc.get_risk(id).await?;
        assert_eq!(risk, Risk::new(id, attrs));
        Ok(())
    }

    #[tokio::test]
    async fn create_risk_persists_in_store() -> Result<(), anyhow::Error> {
        let (store, svc) = service();
        let id = RiskId::new();
        let attrs = RiskAttributes::new(RiskState::Open).with_description("d");
        svc.create_risk(id, attrs.clone()).await?;
        assert_eq!(store.get(&id), Some(attrs));
        Ok(())
    }

    #[tokio::test]
    async fn list_risks_empty() -> Result<(), anyhow::Error> {
        let (_, svc) = service();
        assert!(svc.list_risks().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn list_risks_returns_every_put() -> Result<(), anyhow::Error> {
        let (_, svc) = service();
        let expected = vec![
            Risk::new(RiskId::new(), RiskAttributes::new(RiskState::Open)),
            Risk::new(RiskId::new(), RiskAttributes::new(RiskState::Closed)),
            Risk::new(RiskId::new(), RiskAttributes::new(RiskState::Accepted)),
        ];
        for r in &expected {
            svc.create_risk(r.id, r.attributes.clone()).await?;
        }

        let mut got = svc.list_risks().await?;
        got.sort_by_key(|r| r.id);
        let mut want = expected;
        want.sort_by_key(|r| r.id);
        assert_eq!(got, want);
        Ok(())
    }

    /// Store whose every call fails, counting attempts.
    #[derive(Default)]
    struct BrokenStore {
        calls: AtomicUsize,
    }

    impl BrokenStore {
        fn fail(&self) -> ServiceError {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ServiceError::Store("backend unavailable".into())
        }
    }

    #[async_trait]
    impl DataStore for BrokenStore {
        async fn connect(&self) -> Result<(), ServiceError> {
            Err(ServiceError::Connection("refused".into()))
        }
        async fn close(&self) -> Result<(), ServiceError> { Ok(()) }
        async fn get_risk(&self, _id: RiskId) -> Result<RiskAttributes, ServiceError> { Err(self.fail()) }
        async fn put_risk(&self, _id: RiskId, _attrs: RiskAttributes) -> Result<(), ServiceError> { Err(self.fail()) }
        async fn list_risks(&self) -> Result<Vec<Risk>, ServiceError> { Err(self.fail()) }
    }

    #[tokio::test]
    async fn store_errors_pass_through_without_retry() {
        let store = Arc::new(BrokenStore::default());
        let svc: RiskService = RiskService::new(store.clone() as Arc<dyn DataStore>);

        let err = svc.create_risk(RiskId::new(), RiskAttributes::new(RiskState::Open)).await.unwrap_err();
        assert_eq!(err.to_string(), "store error: backend unavailable");
        assert!(matches!(svc.get_risk(RiskId::new()).await, Err(ServiceError::Store(_))));
        assert!(matches!(svc.list_risks().await, Err(ServiceError::Store(_))));
        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
        assert!(matches!(svc.store().connect().await, Err(ServiceError::Connection(_))));
    }
}
