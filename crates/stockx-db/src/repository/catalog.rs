//! # Catalog Repository
//!
//! Per-store reference data: categories, brands, size ranges and colors.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};
use stockx_core::validation::{
    validate_color_code, validate_name, validate_size_value, MAX_NAME_LEN,
};
use stockx_core::{Brand, Category, Color, NewCatalogEntry, SizeRange, TenantContext, ValidationError};
use tracing::{debug, info};

use super::{ensure_store, new_id};
use crate::error::DbResult;

/// A catalog table whose rows are scoped by `store_id`.
pub trait CatalogRecord: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    const TABLE: &'static str;
    const ENTITY: &'static str;
}

impl CatalogRecord for Category {
    const TABLE: &'static str = "categories";
    const ENTITY: &'static str = "Category";
}

impl CatalogRecord for Brand {
    const TABLE: &'static str = "brands";
    const ENTITY: &'static str = "Brand";
}

impl CatalogRecord for SizeRange {
    const TABLE: &'static str = "size_ranges";
    const ENTITY: &'static str = "SizeRange";
}

impl CatalogRecord for Color {
    const TABLE: &'static str = "colors";
    const ENTITY: &'static str = "Color";
}

/// Store-scoped catalog access.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
    ctx: TenantContext,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool, ctx: TenantContext) -> Self {
        CatalogRepository { pool, ctx }
    }

    /// All rows of one kind in this store, by name.
    pub async fn list<T: CatalogRecord>(&self) -> DbResult<Vec<T>> {
        let sql = format!(
            "SELECT * FROM {} WHERE store_id = ?1 ORDER BY name, id",
            T::TABLE
        );
        let rows = sqlx::query_as::<_, T>(&sql)
            .bind(self.ctx.store_id())
            .fetch_all(&self.pool)
            .await?;

        debug!(table = T::TABLE, count = rows.len(), "Listed catalog entries");
        Ok(rows)
    }

    pub async fn get<T: CatalogRecord>(&self, id: &str) -> DbResult<Option<T>> {
        let sql = format!("SELECT * FROM {} WHERE id = ?1 AND store_id = ?2", T::TABLE);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .bind(self.ctx.store_id())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn create_category(&self, entry: &NewCatalogEntry) -> DbResult<Category> {
        self.insert_named::<Category>(entry, None).await
    }

    pub async fn create_brand(&self, entry: &NewCatalogEntry) -> DbResult<Brand> {
        self.insert_named::<Brand>(entry, None).await
    }

    /// `entry.detail` is the size value.
    pub async fn create_size_range(&self, entry: &NewCatalogEntry) -> DbResult<SizeRange> {
        let size_value = required_detail(entry, "size_value")?;
        validate_size_value(size_value)?;
        self.insert_named::<SizeRange>(entry, Some(("size_value", size_value)))
            .await
    }

    /// `entry.detail` is the color code.
    pub async fn create_color(&self, entry: &NewCatalogEntry) -> DbResult<Color> {
        let color_code = required_detail(entry, "color_code")?;
        validate_color_code(color_code)?;
        self.insert_named::<Color>(entry, Some(("color_code", color_code)))
            .await
    }

    async fn insert_named<T: CatalogRecord>(
        &self,
        entry: &NewCatalogEntry,
        detail: Option<(&str, &str)>,
    ) -> DbResult<T> {
        validate_name("name", &entry.name, MAX_NAME_LEN)?;

        let mut conn = self.pool.acquire().await?;
        ensure_store(&mut conn, self.ctx.store_id()).await?;

        let (extra_column, extra_value) = match detail {
            Some((column, value)) => (format!(", {column}"), Some(value.trim())),
            None => (String::new(), None),
        };
        let extra_param = if extra_value.is_some() { ", ?5" } else { "" };

        let sql = format!(
            "INSERT INTO {table} (id, store_id, name, created_at, updated_at{extra_column}) \
             VALUES (?1, ?2, ?3, ?4, ?4{extra_param}) RETURNING *",
            table = T::TABLE,
        );

        let mut query = sqlx::query_as::<_, T>(&sql)
            .bind(new_id())
            .bind(self.ctx.store_id())
            .bind(entry.name.trim())
            .bind(Utc::now());
        if let Some(value) = extra_value {
            query = query.bind(value);
        }

        let row = query.fetch_one(&mut *conn).await?;

        info!(
            entity = T::ENTITY,
            store_id = %self.ctx.store_id(),
            name = %entry.name.trim(),
            "Catalog entry created"
        );
        Ok(row)
    }
}

fn required_detail<'a>(entry: &'a NewCatalogEntry, field: &str) -> Result<&'a str, ValidationError> {
    entry
        .detail
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ValidationError::Required {
            field: field.to_string(),
        })
}
