//! End-to-end tests: the full router over an in-memory database.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rstest::rstest;
use serde_json::{json, Value};
use tower::ServiceExt;

use stockroom_api::{create_router, AppState};
use stockroom_db::{Database, DbConfig};

// =============================================================================
// Helpers
// =============================================================================

async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    create_router(Arc::new(AppState::new(db, "test")))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_monitor(app: &Router) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/products",
        Some(json!({
            "name": "Monitor",
            "category": "Displays",
            "quantity": 10,
            "price": 100,
            "cost": 60
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn create_product_applies_defaults() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({
            "name": "Keyboard",
            "category": "Peripherals",
            "quantity": 4,
            "price": "49.90",
            "cost": 30.5
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Keyboard");
    assert_eq!(body["min_stock"], 5);
    assert_eq!(body["notes"], "");
    assert_eq!(body["price"], "49.90");
    assert_eq!(body["cost"], "30.50");
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn list_products_newest_first() {
    let app = test_app().await;
    let first = create_monitor(&app).await;
    let second = create_monitor(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/products", None).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
}

#[tokio::test]
async fn update_replaces_fields() {
    let app = test_app().await;
    let id = create_monitor(&app).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{}", id),
        Some(json!({
            "name": "Monitor 27\"",
            "category": "Displays",
            "quantity": 12,
            "price": 120,
            "cost": 70,
            "minStock": 2,
            "notes": "IPS"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 12);
    assert_eq!(body["price"], "120.00");
    assert_eq!(body["min_stock"], 2);
    assert_eq!(body["notes"], "IPS");
}

#[rstest]
#[case(Method::GET)]
#[case(Method::DELETE)]
#[tokio::test]
async fn missing_product_is_404(#[case] method: Method) {
    let app = test_app().await;

    let (status, body) = send(&app, method, "/api/products/9999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn update_missing_product_is_404() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/products/9999",
        Some(json!({"name": "X", "category": "Y", "quantity": 1, "price": 1, "cost": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/products/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[rstest]
#[case("{not json")]
#[case(r#"{"name":"Lamp"}"#)]
#[tokio::test]
async fn malformed_body_is_400(#[case] raw: &str) {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/products")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(raw.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn negative_quantity_is_refused() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({"name": "X", "category": "Y", "quantity": -1, "price": 1, "cost": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error creating product");

    let (_, list) = send(&app, Method::GET, "/api/products", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

// =============================================================================
// Sales
// =============================================================================

#[tokio::test]
async fn sale_freezes_totals_and_decrements_stock() {
    let app = test_app().await;
    let id = create_monitor(&app).await;

    let (status, sale) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({"productId": id, "quantity": 3})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["product_id"], id);
    assert_eq!(sale["product_name"], "Monitor");
    assert_eq!(sale["category"], "Displays");
    assert_eq!(sale["price"], "100.00");
    assert_eq!(sale["total"], "300.00");
    assert_eq!(sale["profit"], "120.00");
    assert_eq!(sale["customer"], "General customer");
    assert_eq!(sale["payment"], "Cash");

    let (_, product) = send(&app, Method::GET, &format!("/api/products/{}", id), None).await;
    assert_eq!(product["quantity"], 7);

    let (_, sales) = send(&app, Method::GET, "/api/sales", None).await;
    assert_eq!(sales.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn oversell_is_rejected_without_writes() {
    let app = test_app().await;
    let id = create_monitor(&app).await;
    send(&app, Method::POST, "/api/sales", Some(json!({"productId": id, "quantity": 3}))).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({"productId": id, "quantity": 999})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient stock");
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert_eq!(body["available"], 7);
    assert_eq!(body["requested"], 999);

    let (_, product) = send(&app, Method::GET, &format!("/api/products/{}", id), None).await;
    assert_eq!(product["quantity"], 7);
    let (_, sales) = send(&app, Method::GET, "/api/sales", None).await;
    assert_eq!(sales.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn sale_for_unknown_product_is_404() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({"productId": 42, "quantity": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");
}

#[rstest]
#[case(0)]
#[case(-2)]
#[tokio::test]
async fn non_positive_sale_quantity_is_400(#[case] quantity: i64) {
    let app = test_app().await;
    let id = create_monitor(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({"productId": id, "quantity": quantity})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, product) = send(&app, Method::GET, &format!("/api/products/{}", id), None).await;
    assert_eq!(product["quantity"], 10);
}

// =============================================================================
// Stock
// =============================================================================

#[tokio::test]
async fn add_stock_records_inbound_movement() {
    let app = test_app().await;
    let id = create_monitor(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/stock/add",
        Some(json!({"productId": id, "quantity": 5, "supplier": "Northwind", "cost": "58.00"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Stock added successfully");
    assert_eq!(body["movement"]["movement_type"], "INBOUND");
    assert_eq!(body["movement"]["quantity"], 5);
    assert_eq!(body["movement"]["supplier"], "Northwind");
    assert_eq!(body["movement"]["cost"], "58.00");

    let (_, product) = send(&app, Method::GET, &format!("/api/products/{}", id), None).await;
    assert_eq!(product["quantity"], 15);
}

#[tokio::test]
async fn add_stock_for_unknown_product_is_404() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/stock/add",
        Some(json!({"productId": 77, "quantity": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn delete_removes_product_and_movements() {
    let app = test_app().await;
    let id = create_monitor(&app).await;
    send(&app, Method::POST, "/api/stock/add", Some(json!({"productId": id, "quantity": 2}))).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/api/products/{}", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Product deleted successfully");
    assert_eq!(body["product"], "Monitor");

    let (status, _) = send(&app, Method::GET, &format!("/api/products/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_with_sales_is_refused() {
    let app = test_app().await;
    let id = create_monitor(&app).await;
    send(&app, Method::POST, "/api/sales", Some(json!({"productId": id, "quantity": 1}))).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/api/products/{}", id), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "HAS_SALES");
    assert!(body["error"].as_str().unwrap().contains("Monitor"));

    let (status, _) = send(&app, Method::GET, &format!("/api/products/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Stats
// =============================================================================

#[tokio::test]
async fn stats_on_empty_database_are_zero() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "totalproducts": 0,
            "totalvalue": "0.00",
            "lowstock": 0,
            "totalsales": 0,
            "totalrevenue": "0.00",
            "totalprofit": "0.00",
            "todaysales": 0
        })
    );
}

#[tokio::test]
async fn stats_reflect_sales() {
    let app = test_app().await;
    let id = create_monitor(&app).await;
    send(&app, Method::POST, "/api/sales", Some(json!({"productId": id, "quantity": 3}))).await;

    let (_, body) = send(&app, Method::GET, "/api/stats", None).await;

    assert_eq!(body["totalproducts"], 1);
    assert_eq!(body["totalvalue"], "700.00");
    assert_eq!(body["lowstock"], 0);
    assert_eq!(body["totalsales"], 1);
    assert_eq!(body["totalrevenue"], "300.00");
    assert_eq!(body["totalprofit"], "120.00");
    assert_eq!(body["todaysales"], 1);
}

#[tokio::test]
async fn stats_overflow_is_a_clear_500() {
    let app = test_app().await;
    for i in 0..10 {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/products",
            Some(json!({
                "name": format!("Vault {i}"),
                "category": "Safes",
                "quantity": 10_000_000,
                "price": "1000000000.00",
                "cost": 0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/api/stats", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error fetching statistics");
    assert!(body["details"].as_str().unwrap().contains("overflow"));

    let (status, body) = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 10);
}

// =============================================================================
// Large values
// =============================================================================

#[rstest]
#[case(json!(90_000_000_000_000_000_i64))]
#[case(json!("1000000000.01"))]
#[case(json!(1e17))]
#[tokio::test]
async fn price_past_the_ceiling_is_400(#[case] price: Value) {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({
            "name": "Bullion",
            "category": "Metals",
            "quantity": 2,
            "price": price,
            "cost": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn quantity_past_the_ceiling_is_400() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({
            "name": "Bolts",
            "category": "Hardware",
            "quantity": 10_000_001,
            "price": 1,
            "cost": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "quantity must not exceed 10000000");
}

#[tokio::test]
async fn stock_add_near_i64_max_is_400_and_row_survives() {
    let app = test_app().await;
    let id = create_monitor(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/stock/add",
        Some(json!({"productId": id, "quantity": i64::MAX})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(&app, Method::GET, &format!("/api/products/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 10);

    let (status, _) = send(&app, Method::GET, "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn sale_at_max_price_and_stock() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({
            "name": "Vault",
            "category": "Safes",
            "quantity": 10_000_000,
            "price": 1_000_000_000,
            "cost": "999999999.99"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({"productId": id, "quantity": 10_000_000})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total"], "10000000000000000.00");
    assert_eq!(body["profit"], "100000.00");
}

// =============================================================================
// Surface
// =============================================================================

#[tokio::test]
async fn unknown_route_reports_path_and_method() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::DELETE, "/api/nothing/here", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
    assert_eq!(body["path"], "/api/nothing/here");
    assert_eq!(body["method"], "DELETE");
}

#[tokio::test]
async fn responses_carry_open_cors_header() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/products")
                .header(header::ORIGIN, "https://shop.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
