//! Catalog routes: categories, brands, size ranges and colors.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use stockx_core::{Brand, Category, Color, NewCatalogEntry, SizeRange};
use stockx_db::CatalogRecord;

use crate::error::ApiError;
use crate::extractors::{tenant, ApiJson, ApiQuery, StoreQuery};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories/", get(list_entries::<Category>))
        .route("/categories/create/", post(create_category))
        .route("/categories/{id}/", get(get_entry::<Category>))
        .route("/brands/", get(list_entries::<Brand>))
        .route("/brands/create/", post(create_brand))
        .route("/brands/{id}/", get(get_entry::<Brand>))
        .route("/size-ranges/", get(list_entries::<SizeRange>))
        .route("/size-ranges/create/", post(create_size_range))
        .route("/size-ranges/{id}/", get(get_entry::<SizeRange>))
        .route("/colors/", get(list_entries::<Color>))
        .route("/colors/create/", post(create_color))
        .route("/colors/{id}/", get(get_entry::<Color>))
}

/// Body for every `.../create/` catalog endpoint.
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub store: String,
    pub created_by: String,
    pub name: String,
    /// Size ranges only.
    #[serde(default)]
    pub size_value: Option<String>,
    /// Colors only.
    #[serde(default)]
    pub color_code: Option<String>,
}

impl CreateEntryRequest {
    fn entry(&self, detail: Option<&String>) -> NewCatalogEntry {
        NewCatalogEntry {
            name: self.name.clone(),
            detail: detail.cloned(),
        }
    }
}

async fn list_entries<T>(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StoreQuery>,
) -> Result<Json<Vec<T>>, ApiError>
where
    T: CatalogRecord + Serialize + 'static,
{
    let ctx = query.context()?;
    Ok(Json(state.db.catalog(&ctx).list::<T>().await?))
}

async fn get_entry<T>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<StoreQuery>,
) -> Result<Json<T>, ApiError>
where
    T: CatalogRecord + Serialize + 'static,
{
    let ctx = query.context()?;
    state
        .db
        .catalog(&ctx)
        .get::<T>(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(T::ENTITY, &id))
}

async fn create_category(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateEntryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let ctx = tenant(&body.store, &body.created_by)?;
    let row = state.db.catalog(&ctx).create_category(&body.entry(None)).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn create_brand(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateEntryRequest>,
) -> Result<(StatusCode, Json<Brand>), ApiError> {
    let ctx = tenant(&body.store, &body.created_by)?;
    let row = state.db.catalog(&ctx).create_brand(&body.entry(None)).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn create_size_range(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateEntryRequest>,
) -> Result<(StatusCode, Json<SizeRange>), ApiError> {
    let ctx = tenant(&body.store, &body.created_by)?;
    let entry = body.entry(body.size_value.as_ref());
    let row = state.db.catalog(&ctx).create_size_range(&entry).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn create_color(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateEntryRequest>,
) -> Result<(StatusCode, Json<Color>), ApiError> {
    let ctx = tenant(&body.store, &body.created_by)?;
    let entry = body.entry(body.color_code.as_ref());
    let row = state.db.catalog(&ctx).create_color(&entry).await?;
    Ok((StatusCode::CREATED, Json(row)))
}
