use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Carries the textual id of the missing risk.
    #[error("risk {0} was not found")]
    NotFound(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("unsupported data store type: {0}")]
    UnsupportedDataStore(String),
}

impl ServiceError {
    pub fn not_found(id: &models::RiskId) -> Self { Self::NotFound(id.to_string()) }

    pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }
}
