//! # Seed Data Generator
//!
//! Populates the database with a demo owner, store, catalog and a few
//! stocked products for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p stockx-db --bin seed
//! cargo run -p stockx-db --bin seed -- --db ./data/stockx.db
//! ```

use std::env;

use anyhow::{bail, Context};
use stockx_core::{NewCatalogEntry, NewProduct, NewStore, NewUser, TenantContext};
use stockx_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// (code, name, cost cents, selling cents, initial quantity)
const PRODUCTS: &[(&str, &str, i64, i64, i64)] = &[
    ("RUN-001", "Trail Runner", 4500, 7900, 12),
    ("RUN-002", "Road Runner", 3800, 6500, 8),
    ("SND-001", "Beach Sandal", 900, 1900, 30),
    ("BOT-001", "Hiking Boot", 6200, 11900, 1),
];

const DEMO_TG_ID: i64 = 100_000_001;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let db_path = parse_args()?;

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening database at {db_path}"))?;

    let stores = db.stores();
    let owner = match stores.find_user_by_tg_id(DEMO_TG_ID).await? {
        Some(user) => user,
        None => {
            stores
                .create_user(&NewUser {
                    tg_id: DEMO_TG_ID,
                    first_name: "Demo".into(),
                    last_name: Some("Owner".into()),
                    username: Some("demo_owner".into()),
                })
                .await?
        }
    };

    let store = stores
        .create_store(&NewStore {
            name: "Demo Shoes".into(),
            location: Some("Main Street 1".into()),
            owner: owner.id.clone(),
        })
        .await?;

    let ctx = TenantContext::new(&store.id, "seed")?;
    let catalog = db.catalog(&ctx);

    let category = catalog.create_category(&entry("Footwear", None)).await?;
    let brand = catalog.create_brand(&entry("Stride", None)).await?;
    let size = catalog.create_size_range(&entry("EU", Some("42"))).await?;
    let black = catalog.create_color(&entry("Black", Some("#000000"))).await?;
    let white = catalog.create_color(&entry("White", Some("#FFFFFF"))).await?;

    let products = db.products(&ctx);
    for (code, name, cost, selling, quantity) in PRODUCTS {
        // Codes are unique system-wide, so a second run would collide.
        if products.get_by_code(code).await?.is_some() {
            continue;
        }

        let product = products
            .create_product(&NewProduct {
                name: (*name).into(),
                code: (*code).into(),
                description: format!("{name} by Stride"),
                category_id: Some(category.id.clone()),
                brand_id: Some(brand.id.clone()),
                size_range_id: Some(size.id.clone()),
                color_ids: vec![black.id.clone(), white.id.clone()],
                initial_quantity: *quantity,
                cost_price_cents: *cost,
                selling_price_cents: *selling,
                low_stock_threshold: Some(2),
                ..Default::default()
            })
            .await
            .with_context(|| format!("creating product {code}"))?;

        info!(code = %product.code, quantity, "Seeded product");
    }

    println!("Seeded store {} ({}) for owner {}", store.name, store.id, owner.id);

    db.close().await;
    Ok(())
}

fn entry(name: &str, detail: Option<&str>) -> NewCatalogEntry {
    NewCatalogEntry {
        name: name.into(),
        detail: detail.map(Into::into),
    }
}

fn parse_args() -> anyhow::Result<String> {
    let mut db_path = String::from("stockx.db");
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => {
                db_path = args.next().context("--db requires a path")?;
            }
            "--help" | "-h" => {
                println!("Usage: seed [--db PATH]");
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    Ok(db_path)
}
