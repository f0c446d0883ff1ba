//! Request extractors that reject with [`ApiError`] JSON bodies, plus the
//! helpers that turn request data into a [`TenantContext`].

use axum::extract::{FromRequest, FromRequestParts};
use serde::Deserialize;
use stockx_core::TenantContext;

use crate::error::ApiError;

/// `Json<T>` whose rejection is an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query<T>` whose rejection is an [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// `?store=<id>[&product=<id>]` on read endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct StoreQuery {
    pub store: Option<String>,
    pub product: Option<String>,
}

impl StoreQuery {
    /// Read-only context for the requested store. A missing `store` is a 400.
    pub fn context(&self) -> Result<TenantContext, ApiError> {
        Ok(TenantContext::reader(self.store.clone().unwrap_or_default())?)
    }
}

/// Context for a mutation: both store and actor come from the body.
pub fn tenant(store: &str, actor: &str) -> Result<TenantContext, ApiError> {
    Ok(TenantContext::new(store, actor)?)
}
