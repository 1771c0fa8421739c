//! Route definitions for the `/products` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Product routes.
///
/// ```text
/// GET    /products          -> list
/// POST   /products          -> create
/// GET    /products/{id}     -> get_by_id
/// PUT    /products/{id}     -> update
/// DELETE /products/{id}     -> delete (soft)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::delete),
        )
}
