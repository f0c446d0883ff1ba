//! # Store Repository
//!
//! Users and stores. This is the tenant directory itself, so it is the one
//! repository that is not built from a [`stockx_core::TenantContext`].

use chrono::Utc;
use sqlx::SqlitePool;
use stockx_core::validation::{validate_name, validate_required, MAX_NAME_LEN};
use stockx_core::{CoreError, NewStore, NewUser, Store, User};
use tracing::{debug, info};

use super::{begin_write, new_id};
use crate::error::{DbError, DbResult};

/// Repository for users and stores.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Registers a chat user.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - `tg_id` already registered
    pub async fn create_user(&self, user: &NewUser) -> DbResult<User> {
        validate_name("first_name", &user.first_name, MAX_NAME_LEN)?;

        debug!(tg_id = user.tg_id, "Creating user");

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, tg_id, first_name, last_name, username, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING *
            "#,
        )
        .bind(new_id())
        .bind(user.tg_id)
        .bind(user.first_name.trim())
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(user.tg_id.to_string()))?;

        info!(user_id = %created.id, tg_id = created.tg_id, "User created");
        Ok(created)
    }

    pub async fn find_user_by_tg_id(&self, tg_id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE tg_id = ?1")
            .bind(tg_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // =========================================================================
    // Stores
    // =========================================================================

    /// Creates a store owned by an existing user.
    pub async fn create_store(&self, store: &NewStore) -> DbResult<Store> {
        validate_name("name", &store.name, MAX_NAME_LEN)?;
        validate_required("owner", &store.owner)?;
        if let Some(location) = &store.location {
            validate_name("location", location, MAX_NAME_LEN)?;
        }

        let mut tx = begin_write(&self.pool).await?;

        let owner: Option<String> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?1")
            .bind(&store.owner)
            .fetch_optional(&mut *tx)
            .await?;
        if owner.is_none() {
            return Err(DbError::not_found("User", &store.owner));
        }

        let now = Utc::now();
        let created = sqlx::query_as::<_, Store>(
            r#"
            INSERT INTO stores (id, name, location, owner_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING *
            "#,
        )
        .bind(new_id())
        .bind(store.name.trim())
        .bind(&store.location)
        .bind(&store.owner)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(store_id = %created.id, owner = %created.owner_id, "Store created");
        Ok(created)
    }

    pub async fn get_store(&self, id: &str) -> DbResult<Store> {
        sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CoreError::StoreNotFound(id.to_string()).into())
    }

    /// Stores owned by a user, oldest first.
    pub async fn list_stores_for_owner(&self, owner_id: &str) -> DbResult<Vec<Store>> {
        let stores = sqlx::query_as::<_, Store>(
            "SELECT * FROM stores WHERE owner_id = ?1 ORDER BY created_at, name",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(stores)
    }
}
