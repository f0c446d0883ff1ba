//! Stock ledger routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use stockx_core::{Product, Stock, StockTransaction, StockType};

use crate::error::ApiError;
use crate::extractors::{tenant, ApiJson, ApiQuery, StoreQuery};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stocks/", get(list_stocks))
        .route("/stocks/create/", post(create_stock))
        .route("/stocks/update/", put(update_stock))
        .route("/stocks/remove/", post(remove_stock))
        .route("/stocks/low-stock/", get(low_stock))
        .route("/stocks/{product_id}/", get(get_stock))
        .route("/stock-transactions/", get(list_transactions))
}

/// Body of `/stocks/create/` and `/stocks/update/`. `stock_on_hand` is the
/// amount to add, not the new level.
#[derive(Debug, Deserialize)]
pub struct StockInRequest {
    pub product: String,
    pub stock_on_hand: i64,
    pub created_by: String,
    pub store: String,
}

#[derive(Debug, Deserialize)]
pub struct StockOutRequest {
    pub product: String,
    pub quantity: i64,
    pub created_by: String,
    pub store: String,
}

/// POST `/stocks/create/` - creates or increments the stock row.
async fn create_stock(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<StockInRequest>,
) -> Result<(StatusCode, Json<Stock>), ApiError> {
    let ctx = tenant(&body.store, &body.created_by)?;
    let stock = state
        .db
        .stock(&ctx)
        .adjust_stock(&body.product, body.stock_on_hand, StockType::In)
        .await?;
    Ok((StatusCode::CREATED, Json(stock)))
}

/// PUT `/stocks/update/` - increments an existing stock row; 404 without one.
async fn update_stock(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<StockInRequest>,
) -> Result<Json<Stock>, ApiError> {
    let ctx = tenant(&body.store, &body.created_by)?;
    let stock = state
        .db
        .stock(&ctx)
        .restock(&body.product, body.stock_on_hand)
        .await?;
    Ok(Json(stock))
}

/// POST `/stocks/remove/` - manual stock-out (damage, loss, returns to supplier).
async fn remove_stock(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<StockOutRequest>,
) -> Result<Json<Stock>, ApiError> {
    let ctx = tenant(&body.store, &body.created_by)?;
    let stock = state
        .db
        .stock(&ctx)
        .adjust_stock(&body.product, body.quantity, StockType::Out)
        .await?;
    Ok(Json(stock))
}

async fn list_stocks(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StoreQuery>,
) -> Result<Json<Vec<Stock>>, ApiError> {
    let ctx = query.context()?;
    Ok(Json(state.db.stock(&ctx).list().await?))
}

/// GET `/stocks/low-stock/` - products at or below their threshold.
pub(crate) async fn low_stock(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StoreQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let ctx = query.context()?;
    Ok(Json(state.db.stock(&ctx).low_stock().await?))
}

async fn get_stock(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    ApiQuery(query): ApiQuery<StoreQuery>,
) -> Result<Json<Stock>, ApiError> {
    let ctx = query.context()?;
    state
        .db
        .stock(&ctx)
        .get_stock(&product_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Stock", &product_id))
}

/// GET `/stock-transactions/?store=[&product=]`, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StoreQuery>,
) -> Result<Json<Vec<StockTransaction>>, ApiError> {
    let ctx = query.context()?;
    let rows = state
        .db
        .stock(&ctx)
        .transactions(query.product.as_deref())
        .await?;
    Ok(Json(rows))
}
