//! # Report Repository
//!
//! Grouped aggregate queries feeding [`stockx_core::Report::build`].

use sqlx::SqlitePool;
use stockx_core::{
    total_stock_value, ProductSales, Reconciliation, ReconciliationRow, Report, StockTotals,
    TenantContext,
};
use tracing::debug;

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
    ctx: TenantContext,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool, ctx: TenantContext) -> Self {
        ReportRepository { pool, ctx }
    }

    /// Totals, stock valuation and best/least sellers for the store.
    ///
    /// A store with no stock rows yields zero totals, empty product lists
    /// and `null` quantities.
    pub async fn compute_report(&self) -> DbResult<Report> {
        let mut conn = self.pool.acquire().await?;
        let store_id = self.ctx.store_id();

        let (total_in, total_out): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN stock_type = 'in' THEN quantity ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN stock_type = 'out' THEN quantity ELSE 0 END), 0)
            FROM stock_transactions
            WHERE store_id = ?1
            "#,
        )
        .bind(store_id)
        .fetch_one(&mut *conn)
        .await?;

        let valued: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT s.stock_on_hand, p.cost_price_cents
            FROM stocks s
            INNER JOIN products p ON p.id = s.product_id
            WHERE s.store_id = ?1
            "#,
        )
        .bind(store_id)
        .fetch_all(&mut *conn)
        .await?;
        let stock_value = total_stock_value(&valued)
            .ok_or_else(|| DbError::Internal("total stock value overflows i64".into()))?;

        let sales = sqlx::query_as::<_, ProductSales>(
            r#"
            SELECT
                p.id AS product_id,
                p.code AS code,
                COALESCE(SUM(st.quantity_sold), 0) AS quantity_sold
            FROM stocks s
            INNER JOIN products p ON p.id = s.product_id
            LEFT JOIN sales_transactions st
                ON st.product_id = s.product_id AND st.store_id = s.store_id
            WHERE s.store_id = ?1
            GROUP BY p.id, p.code
            "#,
        )
        .bind(store_id)
        .fetch_all(&mut *conn)
        .await?;

        debug!(
            store_id = %store_id,
            total_in,
            total_out,
            stock_value = stock_value.cents(),
            products = sales.len(),
            "Report aggregates loaded"
        );

        Ok(Report::build(
            StockTotals {
                total_in,
                total_out,
            },
            stock_value,
            &sales,
        ))
    }

    /// Compares every stock row against sum(IN) - sum(OUT) from the log.
    pub async fn reconcile(&self) -> DbResult<Reconciliation> {
        let rows = sqlx::query_as::<_, ReconciliationRow>(
            r#"
            SELECT
                p.id AS product_id,
                p.code AS code,
                s.stock_on_hand AS stock_on_hand,
                COALESCE(SUM(CASE
                    WHEN t.stock_type = 'in' THEN t.quantity
                    WHEN t.stock_type = 'out' THEN -t.quantity
                    ELSE 0
                END), 0) AS ledger_quantity
            FROM stocks s
            INNER JOIN products p ON p.id = s.product_id
            LEFT JOIN stock_transactions t
                ON t.product_id = s.product_id AND t.store_id = s.store_id
            WHERE s.store_id = ?1
            GROUP BY p.id, p.code, s.stock_on_hand
            ORDER BY p.code
            "#,
        )
        .bind(self.ctx.store_id())
        .fetch_all(&self.pool)
        .await?;

        Ok(Reconciliation::from_rows(rows))
    }
}
