//! # Report Assembly
//!
//! Pure functions that turn aggregate rows into the store report. The
//! database layer runs the grouped queries; everything here is arithmetic.
//!
//! ```text
//!   SUM(quantity) GROUP BY stock_type ──► StockTotals ──┐
//!   (on_hand, cost_price) rows        ──► Money       ──┼──► Report::build
//!   stocks ⟕ sales GROUP BY product   ──► [ProductSales]┘        │
//!                                                                ▼
//!                                   best / least = select_extremes (ties kept)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Inputs
// =============================================================================

/// Quantity sold for one stocked product. Products with a stock row but no
/// sales appear with `quantity_sold == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductSales {
    pub product_id: String,
    pub code: String,
    pub quantity_sold: i64,
}

/// Ledger totals for a store, both as non-negative magnitudes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockTotals {
    pub total_in: i64,
    pub total_out: i64,
}

impl StockTotals {
    /// Derived on-hand quantity.
    #[inline]
    pub fn on_hand(&self) -> i64 {
        self.total_in - self.total_out
    }
}

// =============================================================================
// Output
// =============================================================================

/// Products sharing an extreme sales quantity.
///
/// `quantity_sold` is `None` only when the store has no stocked products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SellingRanking {
    /// Product codes, sorted.
    pub products: Vec<String>,
    pub quantity_sold: Option<i64>,
}

/// Store report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Report {
    pub total_stock_in: i64,
    pub total_stock_out: i64,
    pub total_stock_on_hand: i64,
    /// Sum of `stock_on_hand × cost_price`, in cents.
    pub total_stock_value: i64,
    pub best_selling_product: SellingRanking,
    pub least_selling_product: SellingRanking,
}

impl Report {
    pub fn build(totals: StockTotals, stock_value: Money, sales: &[ProductSales]) -> Self {
        let (best, least) = select_extremes(sales);

        Report {
            total_stock_in: totals.total_in,
            total_stock_out: totals.total_out,
            total_stock_on_hand: totals.on_hand(),
            total_stock_value: stock_value.cents(),
            best_selling_product: best,
            least_selling_product: least,
        }
    }
}

/// Sum of `stock_on_hand × cost_price` over `(stock_on_hand, cost_price_cents)`
/// pairs. `None` if the total does not fit in an `i64`.
pub fn total_stock_value(lines: &[(i64, i64)]) -> Option<Money> {
    lines.iter().try_fold(Money::zero(), |total, &(on_hand, cost_cents)| {
        let line = Money::from_cents(cost_cents).checked_multiply_quantity(on_hand)?;
        total.cents().checked_add(line.cents()).map(Money::from_cents)
    })
}

/// Returns `(best, least)`. Every product tied at an extreme is included.
///
/// ## Example
/// ```rust
/// use stockx_core::report::{select_extremes, ProductSales};
///
/// let sales = vec![
///     ProductSales { product_id: "1".into(), code: "A".into(), quantity_sold: 5 },
///     ProductSales { product_id: "2".into(), code: "B".into(), quantity_sold: 5 },
///     ProductSales { product_id: "3".into(), code: "C".into(), quantity_sold: 0 },
/// ];
/// let (best, least) = select_extremes(&sales);
/// assert_eq!(best.products, vec!["A", "B"]);
/// assert_eq!(least.products, vec!["C"]);
/// assert_eq!(least.quantity_sold, Some(0));
/// ```
pub fn select_extremes(sales: &[ProductSales]) -> (SellingRanking, SellingRanking) {
    let max = sales.iter().map(|s| s.quantity_sold).max();
    let min = sales.iter().map(|s| s.quantity_sold).min();

    (ranking_at(sales, max), ranking_at(sales, min))
}

fn ranking_at(sales: &[ProductSales], target: Option<i64>) -> SellingRanking {
    let Some(target) = target else {
        return SellingRanking::default();
    };

    let mut products: Vec<String> = sales
        .iter()
        .filter(|s| s.quantity_sold == target)
        .map(|s| s.code.clone())
        .collect();
    products.sort();
    products.dedup();

    SellingRanking {
        products,
        quantity_sold: Some(target),
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

/// On-hand quantity next to what the log says it should be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ReconciliationRow {
    pub product_id: String,
    pub code: String,
    pub stock_on_hand: i64,
    /// sum(IN) - sum(OUT) for the product.
    pub ledger_quantity: i64,
}

impl ReconciliationRow {
    #[inline]
    pub fn in_sync(&self) -> bool {
        self.stock_on_hand == self.ledger_quantity
    }

    /// Positive when the stock row holds more than the log accounts for.
    #[inline]
    pub fn drift(&self) -> i64 {
        self.stock_on_hand - self.ledger_quantity
    }
}

/// Reconciliation result for one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Reconciliation {
    pub in_sync: bool,
    pub products: Vec<ReconciliationRow>,
}

impl Reconciliation {
    pub fn from_rows(products: Vec<ReconciliationRow>) -> Self {
        let in_sync = products.iter().all(ReconciliationRow::in_sync);
        Reconciliation { in_sync, products }
    }

    /// Rows whose stock disagrees with the log.
    pub fn mismatches(&self) -> impl Iterator<Item = &ReconciliationRow> {
        self.products.iter().filter(|r| !r.in_sync())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sales(rows: &[(&str, i64)]) -> Vec<ProductSales> {
        rows.iter()
            .enumerate()
            .map(|(i, (code, qty))| ProductSales {
                product_id: format!("p-{i}"),
                code: code.to_string(),
                quantity_sold: *qty,
            })
            .collect()
    }

    #[test]
    fn test_ties_and_never_sold() {
        let rows = sales(&[("B", 5), ("A", 5), ("C", 0)]);
        let (best, least) = select_extremes(&rows);

        assert_eq!(best.products, vec!["A", "B"]);
        assert_eq!(best.quantity_sold, Some(5));
        assert_eq!(least.products, vec!["C"]);
        assert_eq!(least.quantity_sold, Some(0));
    }

    #[test]
    fn test_single_product_is_both_extremes() {
        let rows = sales(&[("ABC123", 3)]);
        let (best, least) = select_extremes(&rows);
        assert_eq!(best, least);
        assert_eq!(best.products, vec!["ABC123"]);
    }

    #[test]
    fn test_empty_store() {
        let report = Report::build(StockTotals::default(), Money::zero(), &[]);

        assert_eq!(report.total_stock_on_hand, 0);
        assert_eq!(report.total_stock_value, 0);
        assert!(report.best_selling_product.products.is_empty());
        assert_eq!(report.best_selling_product.quantity_sold, None);
        assert_eq!(report.least_selling_product.quantity_sold, None);
    }

    #[test]
    fn test_build_report() {
        let totals = StockTotals {
            total_in: 15,
            total_out: 3,
        };
        let report = Report::build(totals, Money::from_cents(6000), &sales(&[("ABC123", 3)]));

        assert_eq!(report.total_stock_in, 15);
        assert_eq!(report.total_stock_out, 3);
        assert_eq!(report.total_stock_on_hand, 12);
        assert_eq!(report.total_stock_value, 6000);
    }

    #[test]
    fn test_report_json_shape() {
        let report = Report::build(StockTotals::default(), Money::zero(), &[]);
        let json = serde_json::to_value(&report).unwrap();

        assert!(json["best_selling_product"]["products"].as_array().unwrap().is_empty());
        assert!(json["least_selling_product"]["quantity_sold"].is_null());
    }

    #[test]
    fn test_total_stock_value() {
        assert_eq!(total_stock_value(&[]), Some(Money::zero()));
        assert_eq!(
            total_stock_value(&[(12, 500), (3, 1_000)]),
            Some(Money::from_cents(9_000))
        );
        assert_eq!(total_stock_value(&[(2, i64::MAX)]), None);
        assert_eq!(total_stock_value(&[(1, i64::MAX), (1, 1)]), None);
    }

    #[test]
    fn test_reconciliation() {
        let rows = vec![
            ReconciliationRow {
                product_id: "p-1".into(),
                code: "A".into(),
                stock_on_hand: 7,
                ledger_quantity: 7,
            },
            ReconciliationRow {
                product_id: "p-2".into(),
                code: "B".into(),
                stock_on_hand: 4,
                ledger_quantity: 6,
            },
        ];
        let recon = Reconciliation::from_rows(rows);

        assert!(!recon.in_sync);
        let bad: Vec<_> = recon.mismatches().collect();
        assert_eq!(bad.len(), 1);
        assert_eq!(bad[0].drift(), -2);
    }
}
