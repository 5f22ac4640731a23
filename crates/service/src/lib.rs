//! Service layer for risk records.
//! - `storage` holds the `DataStore` capability trait and its backends.
//! - `risk` exposes the get/create/list operations used by the transport layer.

pub mod errors;
pub mod risk;
pub mod storage;

pub use errors::ServiceError;
pub use risk::RiskService;
pub use storage::{new_data_store, DataStore, DataStoreKind, MemoryDataStore};
