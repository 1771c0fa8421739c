//! Repository for the product collection.

use bson::oid::ObjectId;
use bson::Document;
use catalog_core::product::{ProductRef, FIELD_OBJECT_ID, FIELD_UPDATED_AT};
use catalog_core::types::{ProductId, Timestamp};

use crate::error::{StoreError, StoreResult};
use crate::models::product::{NewProduct, ProductDraft, ProductPatch};
use crate::store::{Page, ProductFilter, ProductStore};

/// One page of a listing plus the unpaginated match count.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub items: Vec<Document>,
    pub total: u64,
}

/// Result of [`ProductRepo::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The document changed; carries the re-read document.
    Updated(Document),
    /// Nothing changed; carries the document as it was.
    Unchanged(Document),
}

/// Result of [`ProductRepo::soft_delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    AlreadyInactive,
}

/// Provides catalog operations on top of a [`ProductStore`].
pub struct ProductRepo;

impl ProductRepo {
    /// Look a product up by sequence ID or ObjectId.
    pub async fn find(
        store: &dyn ProductStore,
        product_ref: ProductRef,
    ) -> StoreResult<Option<Document>> {
        match product_ref {
            ProductRef::Sequence(product_id) => store.find_by_product_id(product_id).await,
            ProductRef::Object(id) => store.find_by_object_id(id).await,
        }
    }

    /// One page of products matching `filter`, with the total match count.
    pub async fn list(
        store: &dyn ProductStore,
        filter: &ProductFilter,
        page: Page,
    ) -> StoreResult<ProductPage> {
        let items = store.list(filter, page).await?;
        let total = store.count(filter).await?;
        Ok(ProductPage { items, total })
    }

    /// Allocate the next `product_id`.
    ///
    /// The current maximum is used as a floor for the sequence counter, so
    /// the result is never below `max + 1` even if the counter is missing or
    /// behind.
    pub async fn next_product_id(store: &dyn ProductStore) -> StoreResult<ProductId> {
        let floor = store.max_product_id().await?.unwrap_or(0);
        let product_id = store.allocate_product_id(floor).await?;
        tracing::debug!(floor, product_id, "Allocated product_id");
        Ok(product_id)
    }

    /// Insert a new product and return it as stored.
    pub async fn create(
        store: &dyn ProductStore,
        draft: ProductDraft,
        now: Timestamp,
    ) -> StoreResult<Document> {
        let product_id = Self::next_product_id(store).await?;
        let doc = NewProduct::new(product_id, draft, now).to_document()?;
        let id = store.insert(doc).await?;

        let stored = store
            .find_by_object_id(id)
            .await?
            .ok_or(StoreError::Vanished(id))?;
        tracing::info!(product_id, object_id = %id, "Product inserted");
        Ok(stored)
    }

    /// Apply `patch` to `existing`.
    ///
    /// When every patched value already equals the stored one, or the store
    /// reports no modification, nothing is written and the existing document
    /// is returned unchanged.
    pub async fn update(
        store: &dyn ProductStore,
        existing: &Document,
        patch: &ProductPatch,
        now: Timestamp,
    ) -> StoreResult<UpdateOutcome> {
        let id = object_id(existing)?;
        let mut fields = patch.to_document();

        let differs = fields
            .iter()
            .any(|(key, value)| existing.get(key) != Some(value));
        if !differs {
            return Ok(UpdateOutcome::Unchanged(existing.clone()));
        }

        fields.insert(FIELD_UPDATED_AT, bson::DateTime::from_chrono(now));
        let modified = store.set_fields(id, fields).await?;
        if modified == 0 {
            return Ok(UpdateOutcome::Unchanged(existing.clone()));
        }

        let updated = store
            .find_by_object_id(id)
            .await?
            .ok_or(StoreError::Vanished(id))?;
        tracing::info!(object_id = %id, "Product updated");
        Ok(UpdateOutcome::Updated(updated))
    }

    /// Hide a product (`show_in_app = false`).
    pub async fn soft_delete(
        store: &dyn ProductStore,
        existing: &Document,
        now: Timestamp,
    ) -> StoreResult<DeleteOutcome> {
        let id = object_id(existing)?;
        if store
            .deactivate(id, bson::DateTime::from_chrono(now))
            .await?
        {
            tracing::info!(object_id = %id, "Product deactivated");
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::AlreadyInactive)
        }
    }
}

fn object_id(doc: &Document) -> StoreResult<ObjectId> {
    doc.get_object_id(FIELD_OBJECT_ID)
        .map_err(|_| StoreError::MissingObjectId)
}
