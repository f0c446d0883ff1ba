//! # Product Repository
//!
//! Product creation, updates, deletion and lookups, scoped to one store.
//!
//! ## Creation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    create_product (one transaction)                     │
//! │                                                                         │
//! │  validate_new_product(data)           field rules (stockx-core)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store exists? category/brand/size/colors in the same store?           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT products, INSERT product_colors                                │
//! │       │                                                                 │
//! │       ▼  initial_quantity > 0                                           │
//! │  stock_in(product, initial_quantity, actor = creator)                  │
//! │       │     └── upsert stocks + append IN transaction                   │
//! │       ▼                                                                 │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use stockx_core::validation::{validate_new_product, validate_product_update};
use stockx_core::{
    CoreError, NewProduct, Product, ProductUpdate, TenantContext, ValidationError,
    DEFAULT_LOW_STOCK_THRESHOLD,
};
use tracing::{debug, info};

use super::stock::stock_in;
use super::{attach_colors, begin_write, ensure_store, find_product, new_id};
use crate::error::{DbError, DbResult};

/// Store-scoped product access.
///
/// ## Usage
/// ```rust,ignore
/// let ctx = TenantContext::new(store_id, "alice")?;
/// let product = db.products(&ctx).create_product(&data).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    ctx: TenantContext,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool, ctx: TenantContext) -> Self {
        ProductRepository { pool, ctx }
    }

    /// Creates a product and, when `initial_quantity > 0`, seeds its stock.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - code or barcode already used
    /// * `Err(DbError::Core(StoreNotFound))` - the context's store is unknown
    /// * `Err(DbError::Core(Validation(ForeignStore)))` - a catalog reference
    ///   belongs to another store or does not exist
    pub async fn create_product(&self, data: &NewProduct) -> DbResult<Product> {
        validate_new_product(data)?;

        let store_id = self.ctx.store_id();
        let code = data.code.trim();
        debug!(store_id = %store_id, code = %code, "Creating product");

        let mut tx = begin_write(&self.pool).await?;

        ensure_store(&mut tx, store_id).await?;
        self.check_references(
            &mut tx,
            [&data.category_id, &data.brand_id, &data.size_range_id],
            &data.color_ids,
        )
        .await?;

        let now = Utc::now();
        let product_id = new_id();

        sqlx::query(
            r#"
            INSERT INTO products (
                id, store_id, name, code, description,
                category_id, brand_id, size_range_id, barcode,
                initial_quantity, cost_price_cents, selling_price_cents,
                low_stock_threshold, supplier, location, image_url,
                created_by, is_active, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, ?11, ?12,
                ?13, ?14, ?15, ?16,
                ?17, 1, ?18, ?18
            )
            "#,
        )
        .bind(&product_id)
        .bind(store_id)
        .bind(data.name.trim())
        .bind(code)
        .bind(&data.description)
        .bind(&data.category_id)
        .bind(&data.brand_id)
        .bind(&data.size_range_id)
        .bind(&data.barcode)
        .bind(data.initial_quantity)
        .bind(data.cost_price_cents)
        .bind(data.selling_price_cents)
        .bind(data.low_stock_threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD))
        .bind(&data.supplier)
        .bind(&data.location)
        .bind(&data.image_url)
        .bind(self.ctx.actor())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field == "barcode" => {
                DbError::duplicate(field, data.barcode.clone().unwrap_or_default())
            }
            other => other.with_duplicate_value(code),
        })?;

        for color_id in &data.color_ids {
            sqlx::query("INSERT OR IGNORE INTO product_colors (product_id, color_id) VALUES (?1, ?2)")
                .bind(&product_id)
                .bind(color_id)
                .execute(&mut *tx)
                .await?;
        }

        if data.initial_quantity > 0 {
            stock_in(&mut tx, &self.ctx, &product_id, data.initial_quantity).await?;
        }

        let product = find_product(&mut tx, store_id, &product_id)
            .await?
            .ok_or_else(|| DbError::Internal("product vanished inside its own transaction".into()))?;

        tx.commit().await?;

        info!(
            product_id = %product.id,
            code = %product.code,
            initial_quantity = product.initial_quantity,
            created_by = %product.created_by,
            "Product created"
        );
        Ok(product)
    }

    /// Updates the mutable fields of a product.
    ///
    /// ## Returns
    /// * `Err(Core(ProductNotFound))` - product not in this store
    /// * `Err(DbError::UniqueViolation)` - barcode already used
    /// * `Err(Core(Validation(ForeignStore)))` - a catalog reference
    ///   belongs to another store or does not exist
    pub async fn update_product(&self, id: &str, update: &ProductUpdate) -> DbResult<Product> {
        validate_product_update(update)?;

        let store_id = self.ctx.store_id();
        debug!(store_id = %store_id, product_id = %id, "Updating product");

        let mut tx = begin_write(&self.pool).await?;

        self.check_references(
            &mut tx,
            [&update.category_id, &update.brand_id, &update.size_range_id],
            update.color_ids.as_deref().unwrap_or_default(),
        )
        .await?;

        let now = Utc::now();
        let updated: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE products SET
                name = COALESCE(?3, name),
                description = COALESCE(?4, description),
                category_id = COALESCE(?5, category_id),
                brand_id = COALESCE(?6, brand_id),
                size_range_id = COALESCE(?7, size_range_id),
                barcode = COALESCE(?8, barcode),
                cost_price_cents = COALESCE(?9, cost_price_cents),
                selling_price_cents = COALESCE(?10, selling_price_cents),
                low_stock_threshold = COALESCE(?11, low_stock_threshold),
                supplier = COALESCE(?12, supplier),
                location = COALESCE(?13, location),
                image_url = COALESCE(?14, image_url),
                is_active = COALESCE(?15, is_active),
                updated_at = ?16
            WHERE id = ?1 AND store_id = ?2
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(store_id)
        .bind(update.name.as_deref().map(str::trim))
        .bind(&update.description)
        .bind(&update.category_id)
        .bind(&update.brand_id)
        .bind(&update.size_range_id)
        .bind(&update.barcode)
        .bind(update.cost_price_cents)
        .bind(update.selling_price_cents)
        .bind(update.low_stock_threshold)
        .bind(&update.supplier)
        .bind(&update.location)
        .bind(&update.image_url)
        .bind(update.is_active)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            DbError::from(e).with_duplicate_value(update.barcode.clone().unwrap_or_default())
        })?;

        if updated.is_none() {
            return Err(CoreError::ProductNotFound(id.to_string()).into());
        }

        if let Some(color_ids) = &update.color_ids {
            sqlx::query("DELETE FROM product_colors WHERE product_id = ?1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for color_id in color_ids {
                sqlx::query("INSERT OR IGNORE INTO product_colors (product_id, color_id) VALUES (?1, ?2)")
                    .bind(id)
                    .bind(color_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        // The stock row carries its own copy of the threshold.
        if let Some(threshold) = update.low_stock_threshold {
            sqlx::query(
                "UPDATE stocks SET low_stock_threshold = ?1, updated_at = ?2 \
                 WHERE product_id = ?3 AND store_id = ?4",
            )
            .bind(threshold)
            .bind(now)
            .bind(id)
            .bind(store_id)
            .execute(&mut *tx)
            .await?;
        }

        let product = find_product(&mut tx, store_id, id)
            .await?
            .ok_or_else(|| DbError::Internal("product vanished inside its own transaction".into()))?;

        tx.commit().await?;

        info!(
            product_id = %product.id,
            code = %product.code,
            actor = %self.ctx.actor(),
            "Product updated"
        );
        Ok(product)
    }

    /// Deletes a product. Its stock row, color links and both transaction
    /// logs go with it.
    pub async fn delete_product(&self, id: &str) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        let code: Option<String> = sqlx::query_scalar(
            "DELETE FROM products WHERE id = ?1 AND store_id = ?2 RETURNING code",
        )
        .bind(id)
        .bind(self.ctx.store_id())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(code) = code else {
            return Err(CoreError::ProductNotFound(id.to_string()).into());
        };

        tx.commit().await?;

        info!(product_id = %id, code = %code, actor = %self.ctx.actor(), "Product deleted");
        Ok(())
    }

    /// Every catalog id given must name a row in this store.
    async fn check_references(
        &self,
        conn: &mut SqliteConnection,
        singles: [&Option<String>; 3],
        color_ids: &[String],
    ) -> DbResult<()> {
        let [category_id, brand_id, size_range_id] = singles;
        let singles = [
            ("categories", "category", category_id),
            ("brands", "brand", brand_id),
            ("size_ranges", "size_range", size_range_id),
        ];

        for (table, field, id) in singles {
            if let Some(id) = id {
                self.check_reference(conn, table, field, id).await?;
            }
        }
        for color_id in color_ids {
            self.check_reference(conn, "colors", "color", color_id).await?;
        }

        Ok(())
    }

    async fn check_reference(
        &self,
        conn: &mut SqliteConnection,
        table: &str,
        field: &str,
        id: &str,
    ) -> DbResult<()> {
        let sql = format!("SELECT 1 FROM {table} WHERE id = ?1 AND store_id = ?2");
        let found: Option<i64> = sqlx::query_scalar(&sql)
            .bind(id)
            .bind(self.ctx.store_id())
            .fetch_optional(&mut *conn)
            .await?;

        if found.is_none() {
            return Err(ValidationError::ForeignStore {
                field: field.to_string(),
                value: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Gets a product by id, if it belongs to this store.
    pub async fn get(&self, id: &str) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        find_product(&mut conn, self.ctx.store_id(), id).await
    }

    /// Gets a product by its code, if it belongs to this store.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        let id: Option<String> =
            sqlx::query_scalar("SELECT id FROM products WHERE code = ?1 AND store_id = ?2")
                .bind(code.trim())
                .bind(self.ctx.store_id())
                .fetch_optional(&mut *conn)
                .await?;

        match id {
            Some(id) => find_product(&mut conn, self.ctx.store_id(), &id).await,
            None => Ok(None),
        }
    }

    /// All products in the store, by code.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        self.list_filtered(None).await
    }

    pub async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<Product>> {
        self.list_filtered(Some(("category_id", category_id))).await
    }

    pub async fn list_by_brand(&self, brand_id: &str) -> DbResult<Vec<Product>> {
        self.list_filtered(Some(("brand_id", brand_id))).await
    }

    async fn list_filtered(&self, filter: Option<(&str, &str)>) -> DbResult<Vec<Product>> {
        let mut conn = self.pool.acquire().await?;

        let mut sql = String::from("SELECT * FROM products WHERE store_id = ?1");
        if let Some((column, _)) = filter {
            sql.push_str(&format!(" AND {column} = ?2"));
        }
        sql.push_str(" ORDER BY code");

        let mut query = sqlx::query_as::<_, Product>(&sql).bind(self.ctx.store_id());
        if let Some((_, value)) = filter {
            query = query.bind(value);
        }

        let mut products = query.fetch_all(&mut *conn).await?;
        attach_colors(&mut conn, self.ctx.store_id(), &mut products).await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }
}
