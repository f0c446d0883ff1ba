//! # stockx-api: REST API for the StockX Ledger
//!
//! This crate provides:
//! - REST routes over the store-scoped repositories
//! - Request extractors that reject with JSON errors
//! - Configuration loading
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /sales/create/ {product, quantity_sold, sold_by, store}           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TraceLayer ─► CorsLayer ─► routes::sales::create_sale                  │
//! │                                   │                                     │
//! │                                   │ TenantContext::new(store, sold_by)  │
//! │                                   ▼                                     │
//! │                        db.sales(&ctx).record_sale(..)                   │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                   201 SalesTransaction | 4xx {"error", "code"}          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod routes;

use axum::Router;
use stockx_db::Database;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::AppConfig;
pub use error::{ApiError, ErrorCode};

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database handle; repositories are scoped per request.
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
