use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Input was not a canonical UUID string. The offending input is kept for logging.
    #[error("invalid UUID format")]
    MalformedIdentifier(String),
    #[error("invalid risk state: {0}")]
    InvalidState(String),
}
