//! HTTP-level tests for the `/products` endpoints over the in-memory store.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use bson::oid::ObjectId;
use bson::{doc, Document};
use common::{body_json, delete, empty_app, get, post_json, put_json, seeded_app, send};
use serde_json::json;

fn widget() -> serde_json::Value {
    json!({
        "product_name": "Widget",
        "category_name": "Tools",
        "brand_name": "Acme",
    })
}

fn seeded(id: i64, name: &str, code: &str) -> Document {
    doc! {
        "product_id": id,
        "product_code": code,
        "product_name": name,
        "category_name": "Tools",
        "brand_name": "Acme",
        "price_cash": 10.0,
        "description": "Long form text",
        "link": ["https://example.test/a"],
        "show_in_app": true,
    }
}

// ---------------------------------------------------------------------------
// Test: POST /products on an empty collection creates product 1 with defaults
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_minimal_product_on_empty_collection() {
    let (_, app) = empty_app();
    let response = post_json(app, "/products", widget()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Product created successfully");
    assert_eq!(json["data"]["product_id"], 1);
    assert_eq!(json["data"]["show_in_app"], true);
    assert_eq!(json["data"]["price_cash"], 0.0);
    assert_eq!(json["data"]["description"], "");
    assert_eq!(json["data"]["link"], json!([]));
    assert_eq!(json["data"]["main_boost"], 1.0);
    assert!(json["data"].get("discount").is_none());
    assert_eq!(json["data"]["_id"].as_str().unwrap().len(), 24);
}

// ---------------------------------------------------------------------------
// Test: created product_id is one past the current maximum
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_allocates_max_plus_one() {
    let (_, app) = seeded_app(vec![seeded(3, "a", "A"), seeded(41, "b", "B")]);

    let json = body_json(post_json(app.clone(), "/products", widget()).await).await;
    assert_eq!(json["data"]["product_id"], 42);

    let json = body_json(post_json(app, "/products", widget()).await).await;
    assert_eq!(json["data"]["product_id"], 43);
}

// ---------------------------------------------------------------------------
// Test: POST /products validation failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_requires_fields_in_order() {
    let (_, app) = empty_app();
    let response = post_json(app, "/products", json!({ "product_name": "Widget" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Missing required field: category_name");
}

#[tokio::test]
async fn create_rejects_empty_body() {
    let (_, app) = empty_app();
    let response = post_json(app.clone(), "/products", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No data provided");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/products")
        .body(Body::empty())
        .unwrap();
    let response = send(app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No data provided");
}

#[tokio::test]
async fn create_rejects_malformed_json() {
    let (_, app) = empty_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/products")
        .header("content-type", "application/json")
        .body(Body::from("{\"product_name\": "))
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn create_rejects_malformed_price() {
    let (store, app) = empty_app();
    let mut body = widget();
    body["price_cash"] = json!("a lot");
    let response = post_json(app, "/products", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid price format");
    assert!(store.documents().await.is_empty());
}

#[tokio::test]
async fn create_accepts_numeric_strings() {
    let (_, app) = empty_app();
    let mut body = widget();
    body["price_cash"] = json!("19.5");
    body["discount"] = json!(5);
    let response = post_json(app, "/products", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["price_cash"], 19.5);
    assert_eq!(json["data"]["discount"], 5.0);
}

// ---------------------------------------------------------------------------
// Test: GET /products/{id} resolution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_by_sequence_id_returns_full_document() {
    let (_, app) = seeded_app(vec![seeded(7, "Drill", "D-7")]);
    let response = get(app, "/products/7").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["product_name"], "Drill");
    assert_eq!(json["data"]["description"], "Long form text");
}

#[tokio::test]
async fn get_by_object_id() {
    let oid = ObjectId::new();
    let mut doc = seeded(7, "Drill", "D-7");
    doc.insert("_id", oid);
    let (_, app) = seeded_app(vec![doc]);

    let response = get(app, &format!("/products/{oid}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["_id"], oid.to_hex());
}

#[tokio::test]
async fn get_with_malformed_id_returns_400() {
    let (_, app) = empty_app();
    let response = get(app, "/products/abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({ "success": false, "error": "Invalid product ID format" })
    );
}

#[tokio::test]
async fn get_missing_product_returns_404() {
    let (_, app) = seeded_app(vec![seeded(1, "Drill", "D-1")]);

    let response = get(app.clone(), "/products/2").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Product not found");

    let response = get(app, &format!("/products/{}", ObjectId::new())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_finite_numbers_serialize_as_null() {
    let mut doc = seeded(5, "Odd", "O-5");
    doc.insert("price_cash", f64::NAN);
    doc.insert("popularity", f64::INFINITY);
    doc.insert("legacy_field", "kept");
    let (_, app) = seeded_app(vec![doc]);

    let json = body_json(get(app, "/products/5").await).await;
    assert!(json["data"]["price_cash"].is_null());
    assert!(json["data"]["popularity"].is_null());
    assert_eq!(json["data"]["legacy_field"], "kept");
    assert_eq!(json["data"]["product_name"], "Odd");
}

// ---------------------------------------------------------------------------
// Test: GET /products listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_is_ordered_and_projected() {
    let (_, app) = seeded_app(vec![
        seeded(3, "Saw", "S-3"),
        seeded(1, "Drill", "D-1"),
        seeded(2, "Hammer", "H-2"),
    ]);
    let response = get(app, "/products").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 3);
    assert_eq!(json["total"], 3);
    assert_eq!(json["limit"], 100);
    assert_eq!(json["skip"], 0);

    let items = json["data"].as_array().unwrap();
    let ids: Vec<i64> = items
        .iter()
        .map(|p| p["product_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(items[0].get("description").is_none());
    assert_eq!(items[0]["link"], json!(["https://example.test/a"]));
}

#[tokio::test]
async fn list_clamps_limit_and_paginates() {
    let docs = (1..=5)
        .map(|id| seeded(id, &format!("Item {id}"), &format!("I-{id}")))
        .collect();
    let (_, app) = seeded_app(docs);

    let json = body_json(get(app.clone(), "/products?limit=500").await).await;
    assert_eq!(json["limit"], 100);
    assert_eq!(json["count"], 5);

    let json = body_json(get(app.clone(), "/products?limit=2&skip=3").await).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["total"], 5);
    assert_eq!(json["data"][0]["product_id"], 4);

    let response = get(app, "/products?limit=abc&skip=-4").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["limit"], 100);
    assert_eq!(json["skip"], 0);
}

#[tokio::test]
async fn list_repeated_query_keys_use_first_value() {
    let docs = (1..=12)
        .map(|id| seeded(id, &format!("Item {id}"), &format!("I-{id}")))
        .collect();
    let (_, app) = seeded_app(docs);

    let response = get(app, "/products?limit=5&limit=10&skip=1&skip=oops").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["limit"], 5);
    assert_eq!(json["skip"], 1);
    assert_eq!(json["count"], 5);
    assert_eq!(json["data"][0]["product_id"], 2);
}

#[tokio::test]
async fn list_search_matches_numeric_product_id() {
    let (_, app) = seeded_app(vec![
        seeded(99, "Hammer", "H-1"),
        seeded(100, "Drill", "D-2"),
    ]);
    let json = body_json(get(app, "/products?search=99").await).await;

    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["product_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![99]);
}

#[tokio::test]
async fn list_search_is_case_insensitive_on_name_and_code() {
    let (_, app) = seeded_app(vec![
        seeded(1, "Cordless DRILL", "X-1"),
        seeded(2, "Hammer", "drl-2"),
        seeded(3, "Saw", "S-3"),
    ]);
    let json = body_json(get(app, "/products?search=dr").await).await;
    assert_eq!(json["total"], 2);
}

#[tokio::test]
async fn list_visibility_filter() {
    let mut hidden = seeded(2, "Hidden", "H-2");
    hidden.insert("show_in_app", false);
    let (_, app) = seeded_app(vec![seeded(1, "Shown", "S-1"), hidden]);

    let json = body_json(get(app.clone(), "/products").await).await;
    assert_eq!(json["total"], 2);

    let json = body_json(get(app.clone(), "/products?show_in_app=true").await).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["product_name"], "Shown");

    let json = body_json(get(app, "/products?show_in_app=false").await).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["product_name"], "Hidden");
}

// ---------------------------------------------------------------------------
// Test: PUT /products/{id}
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_hides_product_and_refreshes_updated_at() {
    let (_, app) = empty_app();
    let created = body_json(post_json(app.clone(), "/products", widget()).await).await;
    tokio::time::sleep(Duration::from_millis(5)).await;

    let response = put_json(app, "/products/1", json!({ "show_in_app": false })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Product updated successfully");
    assert_eq!(json["data"]["show_in_app"], false);

    let before = chrono::DateTime::parse_from_rfc3339(
        created["data"]["updated_at"].as_str().unwrap(),
    )
    .unwrap();
    let after =
        chrono::DateTime::parse_from_rfc3339(json["data"]["updated_at"].as_str().unwrap())
            .unwrap();
    assert!(after > before);
    assert_eq!(json["data"]["created_at"], created["data"]["created_at"]);
}

#[tokio::test]
async fn update_with_identical_values_reports_no_changes() {
    let (_, app) = seeded_app(vec![seeded(1, "Drill", "D-1")]);
    let response = put_json(app, "/products/1", json!({ "product_name": "Drill" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "No changes made");
    assert_eq!(json["data"]["product_name"], "Drill");
    assert!(json["data"].get("updated_at").is_none());
}

#[tokio::test]
async fn update_ignores_fields_outside_allow_list() {
    let (_, app) = seeded_app(vec![seeded(1, "Drill", "D-1")]);

    let response = put_json(
        app.clone(),
        "/products/1",
        json!({ "product_id": 50, "product_code": "NEW" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No valid fields to update");

    let json = body_json(get(app, "/products/1").await).await;
    assert_eq!(json["data"]["product_code"], "D-1");
}

#[tokio::test]
async fn update_coerces_price() {
    let (_, app) = seeded_app(vec![seeded(1, "Drill", "D-1")]);

    let response = put_json(app.clone(), "/products/1", json!({ "price_cash": "25" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["price_cash"], 25.0);

    let response = put_json(app, "/products/1", json!({ "price_cash": "free" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid price format");
}

#[tokio::test]
async fn update_resolution_errors() {
    let (_, app) = empty_app();

    let response = put_json(app.clone(), "/products/xyz", json!({ "product_name": "A" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid product ID format");

    let response = put_json(app, "/products/9", json!({ "product_name": "A" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: DELETE /products/{id}
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_is_idempotent() {
    let (store, app) = seeded_app(vec![seeded(1, "Drill", "D-1")]);

    let response = delete(app.clone(), "/products/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({ "success": true, "message": "Product deleted successfully" })
    );

    let response = delete(app.clone(), "/products/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Product was already inactive"
    );

    let stored = store.documents().await;
    assert!(!stored[0].get_bool("show_in_app").unwrap());

    // Still fetchable by ID after a soft delete.
    let json = body_json(get(app, "/products/1").await).await;
    assert_eq!(json["data"]["show_in_app"], false);
}

#[tokio::test]
async fn delete_resolution_errors() {
    let (_, app) = empty_app();

    let response = delete(app.clone(), "/products/not-an-id").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete(app, "/products/12").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Product not found");
}

// ---------------------------------------------------------------------------
// Test: a path segment that is not valid UTF-8 is an invalid identifier
// ---------------------------------------------------------------------------

#[tokio::test]
async fn undecodable_path_is_invalid_identifier() {
    let (_, app) = seeded_app(vec![seeded(1, "Drill", "D-1")]);

    let response = get(app.clone(), "/products/%FF").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({ "success": false, "error": "Invalid product ID format" })
    );

    let response = put_json(app.clone(), "/products/%FF", json!({ "product_name": "A" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid product ID format");

    let response = delete(app, "/products/%FF").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid product ID format");
}
