//! HTTP-level tests: the router over an in-memory database, driven with
//! `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use stockx_api::{create_router, AppState};
use stockx_db::{Database, DbConfig};
use tower::ServiceExt;

async fn test_app() -> (Router, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    (create_router(AppState::new(db.clone())), db)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Creates an owner and a store, returns the store id.
async fn create_store(app: &Router, tg_id: i64) -> String {
    let (status, user) = send(
        app,
        "POST",
        "/users/create/",
        Some(json!({ "tg_id": tg_id, "first_name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, store) = send(
        app,
        "POST",
        "/stores/create/",
        Some(json!({ "name": "Shoe Shop", "owner": user["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    store["id"].as_str().unwrap().to_string()
}

async fn create_product(app: &Router, store: &str, code: &str, initial: i64) -> String {
    let (status, product) = send(
        app,
        "POST",
        "/products/create/",
        Some(json!({
            "store": store,
            "created_by": "alice",
            "name": format!("Product {code}"),
            "code": code,
            "initial_quantity": initial,
            "cost_price_cents": 500,
            "selling_price_cents": 800,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{product}");
    product["id"].as_str().unwrap().to_string()
}

async fn sell(app: &Router, store: &str, product: &str, quantity: i64) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/sales/create/",
        Some(json!({
            "product": product,
            "quantity_sold": quantity,
            "sold_by": "alice",
            "store": store,
        })),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let (app, _db) = test_app().await;

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_health_reports_closed_database() {
    let (app, db) = test_app().await;
    db.close().await;

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], false);
}

#[tokio::test]
async fn test_abc123_flow() {
    let (app, _db) = test_app().await;
    let store = create_store(&app, 1).await;
    let product = create_product(&app, &store, "ABC123", 10).await;

    let (status, stock) = send(&app, "GET", &format!("/stocks/{product}/?store={store}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stock["stock_on_hand"], 10);

    let (status, sale) = sell(&app, &store, &product, 3).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["unit_price_cents"], 800);
    assert_eq!(sale["total_amount_cents"], 2400);
    assert_eq!(sale["sold_by"], "alice");

    let (status, err) = sell(&app, &store, &product, 8).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "INSUFFICIENT_STOCK");
    assert_eq!(
        err["error"],
        "Insufficient stock for ABC123: available 7, requested 8"
    );

    let (status, stock) = send(
        &app,
        "PUT",
        "/stocks/update/",
        Some(json!({
            "product": product,
            "stock_on_hand": 5,
            "created_by": "alice",
            "store": store,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stock["stock_on_hand"], 12);

    let (status, report) = send(&app, "GET", &format!("/reports/?store={store}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_stock_in"], 15);
    assert_eq!(report["total_stock_out"], 3);
    assert_eq!(report["total_stock_on_hand"], 12);
    assert_eq!(report["total_stock_value"], 6000);
    assert_eq!(report["best_selling_product"]["products"], json!(["ABC123"]));
    assert_eq!(report["best_selling_product"]["quantity_sold"], 3);

    let (status, log) = send(
        &app,
        "GET",
        &format!("/stock-transactions/?store={store}&product={product}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(log.as_array().unwrap().len(), 3);

    let (_, reconciliation) = send(
        &app,
        "GET",
        &format!("/reports/reconciliation/?store={store}"),
        None,
    )
    .await;
    assert_eq!(reconciliation["in_sync"], true);
}

#[tokio::test]
async fn test_sale_without_stock_row_is_bad_request() {
    let (app, _db) = test_app().await;
    let store = create_store(&app, 2).await;
    let product = create_product(&app, &store, "NOSTK1", 0).await;

    let (status, err) = sell(&app, &store, &product, 1).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "STOCK_NOT_FOUND");
    assert_eq!(err["error"], "Stock does not exist for product NOSTK1");
}

#[tokio::test]
async fn test_update_without_stock_row_is_not_found() {
    let (app, _db) = test_app().await;
    let store = create_store(&app, 3).await;
    let product = create_product(&app, &store, "NOSTK2", 0).await;

    let (status, err) = send(
        &app,
        "PUT",
        "/stocks/update/",
        Some(json!({
            "product": product,
            "stock_on_hand": 5,
            "created_by": "alice",
            "store": store,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], "STOCK_NOT_FOUND");

    // create/ opens the row instead
    let (status, stock) = send(
        &app,
        "POST",
        "/stocks/create/",
        Some(json!({
            "product": product,
            "stock_on_hand": 5,
            "created_by": "alice",
            "store": store,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stock["stock_on_hand"], 5);
}

#[tokio::test]
async fn test_missing_store_is_validation_error() {
    let (app, _db) = test_app().await;

    let (status, err) = send(&app, "GET", "/reports/", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");

    let (status, err) = sell(&app, "", "some-product", 1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_store_and_product_are_not_found() {
    let (app, _db) = test_app().await;
    let store = create_store(&app, 4).await;

    let (status, err) = send(
        &app,
        "POST",
        "/stocks/create/",
        Some(json!({
            "product": "missing",
            "stock_on_hand": 5,
            "created_by": "alice",
            "store": store,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], "NOT_FOUND");

    let (status, _) = send(&app, "GET", "/stores/missing/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_is_validation_error() {
    let (app, _db) = test_app().await;

    let (status, err) = send(
        &app,
        "POST",
        "/sales/create/",
        Some(json!({ "product": "p", "store": "s" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_catalog_and_low_stock_listing() {
    let (app, _db) = test_app().await;
    let store = create_store(&app, 5).await;

    let (status, color) = send(
        &app,
        "POST",
        "/colors/create/",
        Some(json!({
            "store": store,
            "created_by": "alice",
            "name": "Black",
            "color_code": "#000000",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(color["color_code"], "#000000");

    let (status, err) = send(
        &app,
        "POST",
        "/colors/create/",
        Some(json!({
            "store": store,
            "created_by": "alice",
            "name": "Bad",
            "color_code": "black",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");

    let (status, colors) = send(&app, "GET", &format!("/colors/?store={store}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(colors.as_array().unwrap().len(), 1);

    create_product(&app, &store, "LOW001", 1).await;
    create_product(&app, &store, "OK0001", 20).await;

    let (status, low) = send(&app, "GET", &format!("/stocks/low-stock/?store={store}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = low
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["LOW001"]);
}

#[tokio::test]
async fn test_duplicate_code_is_bad_request() {
    let (app, _db) = test_app().await;
    let store = create_store(&app, 6).await;
    create_product(&app, &store, "DUP001", 1).await;

    let (status, err) = send(
        &app,
        "POST",
        "/products/create/",
        Some(json!({
            "store": store,
            "created_by": "alice",
            "name": "Again",
            "code": "DUP001",
            "cost_price_cents": 1,
            "selling_price_cents": 2,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "DUPLICATE");
}

#[tokio::test]
async fn test_update_and_delete_product() {
    let (app, _db) = test_app().await;
    let store = create_store(&app, 7).await;
    let product = create_product(&app, &store, "EDIT01", 6).await;
    let (status, _) = sell(&app, &store, &product, 2).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, err) = send(
        &app,
        "PUT",
        &format!("/products/{product}/"),
        Some(json!({
            "store": store,
            "modified_by": "alice",
            "code": "EDIT02",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/products/{product}/"),
        Some(json!({
            "store": store,
            "modified_by": "alice",
            "name": "Edited",
            "cost_price_cents": 700,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["code"], "EDIT01");
    assert_eq!(updated["name"], "Edited");
    assert_eq!(updated["cost_price_cents"], 700);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/products/{product}/?store={store}&deleted_by=alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/products/{product}/?store={store}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", &format!("/stocks/{product}/?store={store}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, sales) = send(&app, "GET", &format!("/sales-transactions/?store={store}"), None).await;
    assert!(sales.as_array().unwrap().is_empty());

    let (_, report) = send(&app, "GET", &format!("/reports/?store={store}"), None).await;
    assert_eq!(report["total_stock_in"], 0);
    assert_eq!(report["total_stock_out"], 0);
    assert_eq!(report["total_stock_value"], 0);
    assert_eq!(report["best_selling_product"]["products"], json!([]));

    let (status, err) = send(
        &app,
        "DELETE",
        &format!("/products/{product}/?store={store}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");
}
