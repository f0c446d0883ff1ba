//! Concurrent writers against a file-backed WAL database with a
//! multi-connection pool.

use std::time::Duration;

use stockx_core::{CoreError, NewProduct, NewSale, NewStore, NewUser, TenantContext};
use stockx_db::{Database, DbConfig, DbError};
use tempfile::TempDir;

// =============================================================================
// Fixtures
// =============================================================================

/// The `TempDir` must outlive the database.
async fn file_db(busy_timeout: Duration) -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::new(dir.path().join("ledger.db"))
        .max_connections(8)
        .busy_timeout(busy_timeout);
    let db = Database::new(config).await.unwrap();
    (dir, db)
}

async fn owner(db: &Database) -> String {
    db.stores()
        .create_user(&NewUser {
            tg_id: 1,
            first_name: "Owner".into(),
            last_name: None,
            username: None,
        })
        .await
        .unwrap()
        .id
}

async fn store(db: &Database) -> TenantContext {
    let owner = owner(db).await;
    let store = db
        .stores()
        .create_store(&NewStore {
            name: "Main".into(),
            location: None,
            owner,
        })
        .await
        .unwrap();
    TenantContext::new(store.id, "alice").unwrap()
}

fn product(code: &str, initial: i64) -> NewProduct {
    NewProduct {
        name: format!("Product {code}"),
        code: code.into(),
        initial_quantity: initial,
        cost_price_cents: 100,
        selling_price_cents: 150,
        ..Default::default()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sales_never_oversell() {
    let (_dir, db) = file_db(Duration::from_secs(10)).await;
    let ctx = store(&db).await;
    let p = db
        .products(&ctx)
        .create_product(&product("RACE", 20))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..40 {
        let db = db.clone();
        let ctx = ctx.clone();
        let product_id = p.id.clone();
        handles.push(tokio::spawn(async move {
            db.sales(&ctx)
                .record_sale(&NewSale {
                    product_id,
                    quantity_sold: 1,
                    unit_price_cents: None,
                })
                .await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(DbError::Core(CoreError::InsufficientStock { available: 0, .. })) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(succeeded, 20);
    let stock = db.stock(&ctx).get_stock(&p.id).await.unwrap().unwrap();
    assert_eq!(stock.stock_on_hand, 0);
    assert_eq!(db.sales(&ctx).list(Some(&p.id)).await.unwrap().len(), 20);
    assert!(db.reports(&ctx).reconcile().await.unwrap().in_sync);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_product_creation() {
    let (_dir, db) = file_db(Duration::from_secs(10)).await;
    let ctx = store(&db).await;

    let mut handles = Vec::new();
    for i in 0..40 {
        let db = db.clone();
        let ctx = ctx.clone();
        handles.push(tokio::spawn(async move {
            db.products(&ctx)
                .create_product(&product(&format!("P{i:03}"), 3))
                .await
        }));
    }

    for handle in handles {
        if let Err(e) = handle.await.unwrap() {
            panic!("create_product failed: {e:?}");
        }
    }

    assert_eq!(db.products(&ctx).list().await.unwrap().len(), 40);
    let report = db.reports(&ctx).compute_report().await.unwrap();
    assert_eq!(report.total_stock_in, 120);
    assert_eq!(report.total_stock_on_hand, 120);
    assert!(db.reports(&ctx).reconcile().await.unwrap().in_sync);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_store_creation() {
    let (_dir, db) = file_db(Duration::from_secs(10)).await;
    let owner = owner(&db).await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let db = db.clone();
        let owner = owner.clone();
        handles.push(tokio::spawn(async move {
            db.stores()
                .create_store(&NewStore {
                    name: format!("Branch {i}"),
                    location: None,
                    owner,
                })
                .await
        }));
    }

    for handle in handles {
        if let Err(e) = handle.await.unwrap() {
            panic!("create_store failed: {e:?}");
        }
    }

    let stores = db.stores().list_stores_for_owner(&owner).await.unwrap();
    assert_eq!(stores.len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_held_write_lock_times_out_cleanly() {
    let (_dir, db) = file_db(Duration::from_millis(200)).await;
    let ctx = store(&db).await;
    let p = db
        .products(&ctx)
        .create_product(&product("LOCK", 5))
        .await
        .unwrap();

    let blocker = db.pool().begin_with("BEGIN IMMEDIATE").await.unwrap();

    let err = db
        .sales(&ctx)
        .record_sale(&NewSale {
            product_id: p.id.clone(),
            quantity_sold: 1,
            unit_price_cents: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::TransactionFailed(_)), "{err:?}");

    blocker.rollback().await.unwrap();

    let stock = db.stock(&ctx).get_stock(&p.id).await.unwrap().unwrap();
    assert_eq!(stock.stock_on_hand, 5);
    assert!(db.sales(&ctx).list(None).await.unwrap().is_empty());
}
