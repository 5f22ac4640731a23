//! Domain types for risk records.
//! - `RiskId` identity generation and parsing.
//! - `RiskAttributes` payload and state validation.

pub mod errors;
pub mod risk;

pub use errors::ModelError;
pub use risk::{Risk, RiskAttributes, RiskId, RiskState};
