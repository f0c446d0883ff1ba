//! API route definitions.
//!
//! Paths keep their trailing slash (`/stocks/create/`). Mutations read the
//! store and the acting user from the JSON body. Reads take `?store=`.

use axum::Router;

use crate::AppState;

pub mod catalog;
pub mod health;
pub mod products;
pub mod reports;
pub mod sales;
pub mod stocks;
pub mod stores;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(stores::routes())
        .merge(catalog::routes())
        .merge(products::routes())
        .merge(stocks::routes())
        .merge(sales::routes())
        .merge(reports::routes())
}
