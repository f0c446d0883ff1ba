//! Report routes.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use stockx_core::{Reconciliation, Report};

use crate::error::ApiError;
use super::stocks;
use crate::extractors::{ApiQuery, StoreQuery};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/", get(get_report))
        .route("/reports/low-stock/", get(stocks::low_stock))
        .route("/reports/reconciliation/", get(get_reconciliation))
}

/// GET `/reports/?store=`
async fn get_report(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StoreQuery>,
) -> Result<Json<Report>, ApiError> {
    let ctx = query.context()?;
    Ok(Json(state.db.reports(&ctx).compute_report().await?))
}

/// GET `/reports/reconciliation/?store=` - stock rows against the ledger.
async fn get_reconciliation(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StoreQuery>,
) -> Result<Json<Reconciliation>, ApiError> {
    let ctx = query.context()?;
    Ok(Json(state.db.reports(&ctx).reconcile().await?))
}
