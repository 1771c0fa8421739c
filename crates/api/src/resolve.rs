//! Path identifier resolution shared by the single-product endpoints.

use bson::Document;
use catalog_core::error::CoreError;
use catalog_core::product::{ProductRef, ENTITY};
use catalog_db::repositories::ProductRepo;
use catalog_db::ProductStore;

use crate::error::AppResult;

/// Resolve a `{id}` path parameter to a stored product.
///
/// An integer is looked up as `product_id`, otherwise as an ObjectId. An
/// identifier that is neither is `InvalidIdentifier` (400); a well-formed
/// identifier with no match is `NotFound` (404).
pub async fn resolve_product(store: &dyn ProductStore, raw: &str) -> AppResult<Document> {
    let product_ref = ProductRef::parse(raw)?;

    ProductRepo::find(store, product_ref)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: ENTITY,
                id: product_ref.to_string(),
            }
            .into()
        })
}
