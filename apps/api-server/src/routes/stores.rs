//! Users and stores: the tenant directory.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use stockx_core::{NewStore, NewUser, Store, User};

use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiQuery};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/", get(find_user))
        .route("/users/create/", post(create_user))
        .route("/stores/", get(list_stores))
        .route("/stores/create/", post(create_store))
        .route("/stores/{id}/", get(get_store))
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub tg_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub owner: Option<String>,
}

/// POST `/users/create/`
async fn create_user(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.db.stores().create_user(&body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET `/users/?tg_id=`
async fn find_user(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<User>, ApiError> {
    let tg_id = query
        .tg_id
        .ok_or_else(|| ApiError::validation("tg_id is required"))?;

    state
        .db
        .stores()
        .find_user_by_tg_id(tg_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User", &tg_id.to_string()))
}

/// POST `/stores/create/`
async fn create_store(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewStore>,
) -> Result<(StatusCode, Json<Store>), ApiError> {
    let store = state.db.stores().create_store(&body).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

/// GET `/stores/?owner=`
async fn list_stores(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<OwnerQuery>,
) -> Result<Json<Vec<Store>>, ApiError> {
    let owner = query
        .owner
        .filter(|o| !o.trim().is_empty())
        .ok_or_else(|| ApiError::validation("owner is required"))?;

    Ok(Json(state.db.stores().list_stores_for_owner(&owner).await?))
}

/// GET `/stores/{id}/`
async fn get_store(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Store>, ApiError> {
    Ok(Json(state.db.stores().get_store(&id).await?))
}
