//! # Sales Recorder
//!
//! Validates a sale against current stock, debits the ledger and appends
//! the sales-transaction record, all in one database transaction.
//!
//! ```text
//! record_sale(product, qty, [unit_price])
//!      │
//!      ▼
//! BEGIN
//!      ├── stock_out: conditional UPDATE stocks ... WHERE stock_on_hand >= qty
//!      │       └── miss → StockNotFound / InsufficientStock (rollback)
//!      ├── append stock_transactions (OUT, qty, sold_by)
//!      ├── unit = supplied ?? product.selling_price_cents
//!      ├── total = qty × unit
//!      └── append sales_transactions
//! COMMIT
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use stockx_core::validation::{validate_price_cents, validate_quantity, validate_required};
use stockx_core::{Money, NewSale, SalesTransaction, TenantContext, ValidationError};
use tracing::info;

use super::stock::stock_out;
use super::{begin_write, new_id, require_product};
use crate::error::DbResult;

/// Store-scoped sales access. The context's actor is recorded as `sold_by`.
#[derive(Debug, Clone)]
pub struct SalesRecorder {
    pool: SqlitePool,
    ctx: TenantContext,
}

impl SalesRecorder {
    pub fn new(pool: SqlitePool, ctx: TenantContext) -> Self {
        SalesRecorder { pool, ctx }
    }

    /// Records a sale and returns the persisted transaction.
    ///
    /// ## Returns
    /// * `Err(Core(ProductNotFound))` - product not in this store
    /// * `Err(Core(StockNotFound))` - product never stocked
    /// * `Err(Core(InsufficientStock))` - `quantity_sold > stock_on_hand`;
    ///   nothing is written
    pub async fn record_sale(&self, sale: &NewSale) -> DbResult<SalesTransaction> {
        validate_required("product", &sale.product_id)?;
        validate_quantity("quantity_sold", sale.quantity_sold)?;
        if let Some(unit) = sale.unit_price_cents {
            validate_price_cents("unit_price_cents", unit)?;
        }

        let store_id = self.ctx.store_id();
        let mut tx = begin_write(&self.pool).await?;

        let stock = stock_out(&mut tx, &self.ctx, &sale.product_id, sale.quantity_sold).await?;
        let product = require_product(&mut tx, store_id, &sale.product_id).await?;

        let unit_price = sale
            .unit_price_cents
            .map(Money::from_cents)
            .unwrap_or_else(|| product.selling_price());
        let total = unit_price
            .checked_multiply_quantity(sale.quantity_sold)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "total_amount_cents".to_string(),
                min: 0,
                max: i64::MAX,
            })?;

        let recorded = sqlx::query_as::<_, SalesTransaction>(
            r#"
            INSERT INTO sales_transactions (
                id, store_id, product_id, quantity_sold,
                unit_price_cents, total_amount_cents, sold_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING *
            "#,
        )
        .bind(new_id())
        .bind(store_id)
        .bind(&sale.product_id)
        .bind(sale.quantity_sold)
        .bind(unit_price.cents())
        .bind(total.cents())
        .bind(self.ctx.actor())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            sale_id = %recorded.id,
            code = %product.code,
            quantity_sold = recorded.quantity_sold,
            total = %recorded.total_amount(),
            sold_by = %recorded.sold_by,
            stock_on_hand = stock.stock_on_hand,
            "Sale recorded"
        );
        Ok(recorded)
    }

    /// Sales log, newest first, optionally for one product.
    pub async fn list(&self, product_id: Option<&str>) -> DbResult<Vec<SalesTransaction>> {
        let rows = sqlx::query_as::<_, SalesTransaction>(
            r#"
            SELECT * FROM sales_transactions
            WHERE store_id = ?1 AND (?2 IS NULL OR product_id = ?2)
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(self.ctx.store_id())
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
