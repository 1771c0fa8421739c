//! Persistence layer for the product catalog.
//!
//! [`ProductStore`] is the seam between the request handlers and the
//! database. [`mongo::MongoProductStore`] is the production implementation;
//! [`memory::MemoryProductStore`] keeps documents in process and backs the
//! test suites. [`repositories::ProductRepo`] holds the persistence rules
//! (ID allocation, change detection, soft delete) on top of either store.

pub mod error;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod repositories;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::{ProductStore, SharedStore};

/// Check that the store is reachable.
pub async fn health_check(store: &dyn ProductStore) -> StoreResult<()> {
    store.ping().await
}
