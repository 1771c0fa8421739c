//! The product persistence trait and the query types it accepts.

use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use catalog_core::product::FIELD_PRODUCT_ID;
use catalog_core::search::Visibility;
use catalog_core::types::ProductId;

use crate::error::StoreResult;

/// Shared handle to a store, as held in application state.
pub type SharedStore = Arc<dyn ProductStore>;

/// Filter for product listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Normalized (trimmed, non-empty) search term.
    pub search: Option<String>,
    pub visibility: Visibility,
}

/// One page of a listing. Both values are already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub skip: i64,
}

/// Single-collection document operations used by the repository.
///
/// Every method is one round trip to the store. Implementations must be
/// safe to share across request tasks.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Liveness probe.
    async fn ping(&self) -> StoreResult<()>;

    /// Find the product whose `product_id` equals `product_id`.
    async fn find_by_product_id(&self, product_id: ProductId) -> StoreResult<Option<Document>>;

    /// Find the product whose `_id` equals `id`.
    async fn find_by_object_id(&self, id: ObjectId) -> StoreResult<Option<Document>>;

    /// List matching products, ascending by `product_id`, projected to the
    /// listing fields.
    async fn list(&self, filter: &ProductFilter, page: Page) -> StoreResult<Vec<Document>>;

    /// Count all products matching `filter`, ignoring pagination.
    async fn count(&self, filter: &ProductFilter) -> StoreResult<u64>;

    /// Largest numeric `product_id` in the collection, if any.
    async fn max_product_id(&self) -> StoreResult<Option<ProductId>>;

    /// Atomically advance the sequence counter to `max(counter, floor) + 1`
    /// and return the new value.
    async fn allocate_product_id(&self, floor: ProductId) -> StoreResult<ProductId>;

    /// Insert a document and return its `_id`.
    async fn insert(&self, doc: Document) -> StoreResult<ObjectId>;

    /// `$set` the given fields on one document. Returns the number of
    /// documents actually modified (0 or 1).
    async fn set_fields(&self, id: ObjectId, fields: Document) -> StoreResult<u64>;

    /// Set `show_in_app = false` and `updated_at = at` unless the product is
    /// already hidden. Returns whether the document changed.
    async fn deactivate(&self, id: ObjectId, at: bson::DateTime) -> StoreResult<bool>;
}

/// Read an integral numeric field regardless of its BSON width.
pub fn integer_field(doc: &Document, key: &str) -> Option<i64> {
    match doc.get(key)? {
        Bson::Int64(v) => Some(*v),
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Double(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
        _ => None,
    }
}

/// The `product_id` of a stored document, if it carries a numeric one.
pub fn product_id_of(doc: &Document) -> Option<ProductId> {
    integer_field(doc, FIELD_PRODUCT_ID)
}
