//! Sales routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use stockx_core::{NewSale, SalesTransaction};

use crate::error::{ApiError, ErrorCode};
use crate::extractors::{tenant, ApiJson, ApiQuery, StoreQuery};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales/create/", post(create_sale))
        .route("/sales-transactions/", get(list_sales))
}

#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub product: String,
    pub quantity_sold: i64,
    pub sold_by: String,
    pub store: String,
    /// Defaults to the product's selling price.
    #[serde(default)]
    pub unit_price_cents: Option<i64>,
}

/// POST `/sales/create/`
///
/// A product that was never stocked cannot be sold; that is a 400 here,
/// same as insufficient stock.
async fn create_sale(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateSaleRequest>,
) -> Result<(StatusCode, Json<SalesTransaction>), ApiError> {
    let ctx = tenant(&body.store, &body.sold_by)?;
    let sale = NewSale {
        product_id: body.product,
        quantity_sold: body.quantity_sold,
        unit_price_cents: body.unit_price_cents,
    };

    let recorded = state
        .db
        .sales(&ctx)
        .record_sale(&sale)
        .await
        .map_err(|e| match ApiError::from(e) {
            err if err.code == ErrorCode::StockNotFound => {
                err.with_status(StatusCode::BAD_REQUEST)
            }
            err => err,
        })?;

    Ok((StatusCode::CREATED, Json(recorded)))
}

/// GET `/sales-transactions/?store=[&product=]`, newest first.
async fn list_sales(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StoreQuery>,
) -> Result<Json<Vec<SalesTransaction>>, ApiError> {
    let ctx = query.context()?;
    Ok(Json(state.db.sales(&ctx).list(query.product.as_deref()).await?))
}
