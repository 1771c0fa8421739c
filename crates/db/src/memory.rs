//! In-process implementation of [`ProductStore`].
//!
//! Mirrors the MongoDB query semantics the catalog relies on: literal,
//! case-insensitive search on name and code with an exact `product_id`
//! alternative, `show_in_app` filtering where a missing flag counts as
//! visible, ascending `product_id` order with missing IDs first, and
//! `modified_count`-style change reporting.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, Document};
use catalog_core::product::{
    FIELD_OBJECT_ID, FIELD_PRODUCT_CODE, FIELD_PRODUCT_NAME, FIELD_SHOW_IN_APP, FIELD_UPDATED_AT,
    LIST_FIELDS,
};
use catalog_core::search::numeric_term;
use catalog_core::types::ProductId;
use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::store::{product_id_of, Page, ProductFilter, ProductStore};

#[derive(Debug, Default)]
struct Inner {
    docs: Vec<Document>,
    counter: ProductId,
}

/// Product store holding documents in memory.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    inner: RwLock<Inner>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing documents. Documents without an `_id`
    /// get a fresh ObjectId.
    pub fn with_documents(docs: impl IntoIterator<Item = Document>) -> Self {
        let docs = docs.into_iter().map(with_object_id).collect();
        Self {
            inner: RwLock::new(Inner { docs, counter: 0 }),
        }
    }

    /// Copy of every stored document, in insertion order.
    pub async fn documents(&self) -> Vec<Document> {
        self.inner.read().await.docs.clone()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_by_product_id(&self, product_id: ProductId) -> StoreResult<Option<Document>> {
        let inner = self.inner.read().await;
        Ok(inner
            .docs
            .iter()
            .find(|d| product_id_of(d) == Some(product_id))
            .cloned())
    }

    async fn find_by_object_id(&self, id: ObjectId) -> StoreResult<Option<Document>> {
        let inner = self.inner.read().await;
        Ok(inner.docs.iter().find(|d| object_id_of(d) == Some(id)).cloned())
    }

    async fn list(&self, filter: &ProductFilter, page: Page) -> StoreResult<Vec<Document>> {
        let inner = self.inner.read().await;

        let mut matching: Vec<&Document> =
            inner.docs.iter().filter(|d| matches(filter, d)).collect();
        // Stable sort keeps insertion order among equal IDs.
        matching.sort_by_key(|d| product_id_of(d));

        Ok(matching
            .into_iter()
            .skip(page.skip.max(0) as usize)
            .take(page.limit.max(0) as usize)
            .map(project)
            .collect())
    }

    async fn count(&self, filter: &ProductFilter) -> StoreResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner.docs.iter().filter(|d| matches(filter, d)).count() as u64)
    }

    async fn max_product_id(&self) -> StoreResult<Option<ProductId>> {
        let inner = self.inner.read().await;
        Ok(inner.docs.iter().filter_map(product_id_of).max())
    }

    async fn allocate_product_id(&self, floor: ProductId) -> StoreResult<ProductId> {
        let mut inner = self.inner.write().await;
        inner.counter = inner.counter.max(floor) + 1;
        Ok(inner.counter)
    }

    async fn insert(&self, doc: Document) -> StoreResult<ObjectId> {
        let doc = with_object_id(doc);
        let id = object_id_of(&doc).unwrap_or_else(ObjectId::new);
        self.inner.write().await.docs.push(doc);
        Ok(id)
    }

    async fn set_fields(&self, id: ObjectId, fields: Document) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let Some(doc) = inner.docs.iter_mut().find(|d| object_id_of(d) == Some(id)) else {
            return Ok(0);
        };

        let mut modified = false;
        for (key, value) in fields {
            if doc.get(&key) != Some(&value) {
                doc.insert(key, value);
                modified = true;
            }
        }
        Ok(u64::from(modified))
    }

    async fn deactivate(&self, id: ObjectId, at: bson::DateTime) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let Some(doc) = inner.docs.iter_mut().find(|d| object_id_of(d) == Some(id)) else {
            return Ok(false);
        };

        if doc.get(FIELD_SHOW_IN_APP) == Some(&Bson::Boolean(false)) {
            return Ok(false);
        }
        doc.insert(FIELD_SHOW_IN_APP, false);
        doc.insert(FIELD_UPDATED_AT, at);
        Ok(true)
    }
}

fn object_id_of(doc: &Document) -> Option<ObjectId> {
    doc.get_object_id(FIELD_OBJECT_ID).ok()
}

/// Ensure `_id` exists and comes first, as MongoDB stores it.
fn with_object_id(doc: Document) -> Document {
    if doc.contains_key(FIELD_OBJECT_ID) {
        return doc;
    }
    let mut stored = doc! { FIELD_OBJECT_ID: ObjectId::new() };
    for (key, value) in doc {
        stored.insert(key, value);
    }
    stored
}

fn matches(filter: &ProductFilter, doc: &Document) -> bool {
    if !filter.visibility.admits(doc.get_bool(FIELD_SHOW_IN_APP).ok()) {
        return false;
    }

    let Some(term) = &filter.search else {
        return true;
    };

    let needle = term.to_lowercase();
    let contains = |field: &str| {
        doc.get_str(field)
            .map(|value| value.to_lowercase().contains(&needle))
            .unwrap_or(false)
    };

    contains(FIELD_PRODUCT_NAME)
        || contains(FIELD_PRODUCT_CODE)
        || numeric_term(term).is_some_and(|id| product_id_of(doc) == Some(id))
}

fn project(doc: &Document) -> Document {
    doc.iter()
        .filter(|(key, _)| key.as_str() == FIELD_OBJECT_ID || LIST_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
