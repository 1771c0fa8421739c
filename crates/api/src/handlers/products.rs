//! Handlers for the `/products` resource.

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use catalog_core::serialize::document_to_json;
use catalog_db::models::product::{CreateProduct, UpdateProduct};
use catalog_db::repositories::{DeleteOutcome, ProductRepo, UpdateOutcome};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::query::ListProductsParams;
use crate::resolve::resolve_product;
use crate::response::{DataResponse, ListResponse, MessageResponse};
use crate::state::AppState;

/// GET /products
pub async fn list(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<impl IntoResponse> {
    let params = ListProductsParams::from_pairs(pairs);
    let filter = params.filter();
    let page = params.page();

    let listing = ProductRepo::list(state.store.as_ref(), &filter, page).await?;
    let items: Vec<Value> = listing.items.iter().map(document_to_json).collect();

    tracing::debug!(
        count = items.len(),
        total = listing.total,
        limit = page.limit,
        skip = page.skip,
        "Listed products"
    );

    Ok(Json(ListResponse::new(
        items,
        listing.total,
        page.limit,
        page.skip,
    )))
}

/// GET /products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = path?;
    let product = resolve_product(state.store.as_ref(), &id).await?;
    Ok(Json(DataResponse::new(document_to_json(&product))))
}

/// POST /products
pub async fn create(State(state): State<AppState>, body: Bytes) -> AppResult<impl IntoResponse> {
    let input: CreateProduct = parse_body(&body)?;
    let draft = input.into_draft()?;

    let created = ProductRepo::create(state.store.as_ref(), draft, chrono::Utc::now()).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            document_to_json(&created),
            "Product created successfully",
        )),
    ))
}

/// PUT /products/{id}
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let Path(id) = path?;
    let input: UpdateProduct = parse_body(&body)?;
    let existing = resolve_product(state.store.as_ref(), &id).await?;
    let patch = input.into_patch()?;

    let outcome =
        ProductRepo::update(state.store.as_ref(), &existing, &patch, chrono::Utc::now()).await?;

    let response = match outcome {
        UpdateOutcome::Updated(doc) => {
            tracing::info!(id = %id, "Product updated");
            DataResponse::with_message(document_to_json(&doc), "Product updated successfully")
        }
        UpdateOutcome::Unchanged(doc) => {
            tracing::debug!(id = %id, "Update left product unchanged");
            DataResponse::with_message(document_to_json(&doc), "No changes made")
        }
    };
    Ok(Json(response))
}

/// DELETE /products/{id}
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = path?;
    let existing = resolve_product(state.store.as_ref(), &id).await?;

    let message =
        match ProductRepo::soft_delete(state.store.as_ref(), &existing, chrono::Utc::now()).await? {
            DeleteOutcome::Deleted => {
                tracing::info!(id = %id, "Product soft-deleted");
                "Product deleted successfully"
            }
            DeleteOutcome::AlreadyInactive => "Product was already inactive",
        };
    Ok(Json(MessageResponse::new(message)))
}

/// Decode a JSON request body.
///
/// An empty body, `null`, a non-object or an empty object is "No data
/// provided"; anything that fails to parse or to match the request schema
/// is reported with the decoder's message.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(no_data());
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

    match &value {
        Value::Object(map) if !map.is_empty() => {}
        _ => return Err(no_data()),
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}

fn no_data() -> AppError {
    AppError::BadRequest("No data provided".to_string())
}
