//! Product routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use stockx_core::{NewProduct, Product, ProductUpdate};

use crate::error::ApiError;
use crate::extractors::{tenant, ApiJson, ApiQuery, StoreQuery};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products/", get(list_products))
        .route("/products/create/", post(create_product))
        .route("/products/code/{code}/", get(get_product_by_code))
        .route("/categories/{id}/products/", get(list_by_category))
        .route("/products/brand/{id}/", get(list_by_brand))
        .route(
            "/products/{id}/",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// POST `/products/create/` body.
///
/// Catalog references accept either `category` or `category_id` (same for
/// brand and size range) and `colors` or `color_ids`.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub store: String,
    pub created_by: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "category")]
    pub category_id: Option<String>,
    #[serde(default, alias = "brand")]
    pub brand_id: Option<String>,
    #[serde(default, alias = "size_range")]
    pub size_range_id: Option<String>,
    #[serde(default, alias = "colors")]
    pub color_ids: Vec<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub initial_quantity: i64,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        NewProduct {
            name: req.name,
            code: req.code,
            description: req.description,
            category_id: req.category_id,
            brand_id: req.brand_id,
            size_range_id: req.size_range_id,
            color_ids: req.color_ids,
            barcode: req.barcode,
            initial_quantity: req.initial_quantity,
            cost_price_cents: req.cost_price_cents,
            selling_price_cents: req.selling_price_cents,
            low_stock_threshold: req.low_stock_threshold,
            supplier: req.supplier,
            location: req.location,
            image_url: req.image_url,
        }
    }
}

/// PUT `/products/{id}/` body. Absent fields stay unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub store: String,
    pub modified_by: String,
    /// Product codes are immutable; sending one is rejected.
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "category")]
    pub category_id: Option<String>,
    #[serde(default, alias = "brand")]
    pub brand_id: Option<String>,
    #[serde(default, alias = "size_range")]
    pub size_range_id: Option<String>,
    #[serde(default, alias = "colors")]
    pub color_ids: Option<Vec<String>>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub cost_price_cents: Option<i64>,
    #[serde(default)]
    pub selling_price_cents: Option<i64>,
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(req: UpdateProductRequest) -> Self {
        ProductUpdate {
            name: req.name,
            description: req.description,
            category_id: req.category_id,
            brand_id: req.brand_id,
            size_range_id: req.size_range_id,
            color_ids: req.color_ids,
            barcode: req.barcode,
            cost_price_cents: req.cost_price_cents,
            selling_price_cents: req.selling_price_cents,
            low_stock_threshold: req.low_stock_threshold,
            supplier: req.supplier,
            location: req.location,
            image_url: req.image_url,
            is_active: req.is_active,
        }
    }
}

/// `?store=&deleted_by=` on DELETE.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub store: String,
    #[serde(default)]
    pub deleted_by: String,
}

/// POST `/products/create/`
///
/// A positive `initial_quantity` also opens the stock row with an IN entry.
async fn create_product(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let ctx = tenant(&body.store, &body.created_by)?;
    let product = state
        .db
        .products(&ctx)
        .create_product(&NewProduct::from(body))
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StoreQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let ctx = query.context()?;
    Ok(Json(state.db.products(&ctx).list().await?))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<StoreQuery>,
) -> Result<Json<Product>, ApiError> {
    let ctx = query.context()?;
    state
        .db
        .products(&ctx)
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", &id))
}

async fn get_product_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ApiQuery(query): ApiQuery<StoreQuery>,
) -> Result<Json<Product>, ApiError> {
    let ctx = query.context()?;
    state
        .db
        .products(&ctx)
        .get_by_code(&code)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", &code))
}

async fn list_by_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<StoreQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let ctx = query.context()?;
    Ok(Json(state.db.products(&ctx).list_by_category(&id).await?))
}

async fn list_by_brand(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<StoreQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let ctx = query.context()?;
    Ok(Json(state.db.products(&ctx).list_by_brand(&id).await?))
}

/// PUT `/products/{id}/`
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let ctx = tenant(&body.store, &body.modified_by)?;
    if body.code.is_some() {
        return Err(ApiError::validation("code cannot be changed"));
    }

    let product = state
        .db
        .products(&ctx)
        .update_product(&id, &ProductUpdate::from(body))
        .await?;
    Ok(Json(product))
}

/// DELETE `/products/{id}/?store=&deleted_by=`
///
/// Removes the stock row and both logs for the product as well.
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<DeleteQuery>,
) -> Result<StatusCode, ApiError> {
    let ctx = tenant(&query.store, &query.deleted_by)?;
    state.db.products(&ctx).delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
