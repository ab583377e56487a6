//! # Seed Data Writer
//!
//! Writes the default collections into a database file.
//!
//! ## Usage
//! ```bash
//! # Seed ./vendinha_dev.db (absent collections only)
//! cargo run -p vendinha-db --bin seed
//!
//! # Specify database path
//! cargo run -p vendinha-db --bin seed -- --db ./data/vendinha.db
//!
//! # Overwrite every collection with the defaults
//! cargo run -p vendinha-db --bin seed -- --force
//! ```

use std::env;

use vendinha_core::seed::ShopData;
use vendinha_db::{Collection, CollectionSnapshot, Database, DbConfig, ShopStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./vendinha_dev.db");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Vendinha Seed Data Writer");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./vendinha_dev.db)");
                println!("  -f, --force        Overwrite existing collections");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Vendinha Seed Data Writer");
    println!("===========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if force {
        let seed = ShopData::seed();
        db.save(CollectionSnapshot::Products(seed.products)).await?;
        db.save(CollectionSnapshot::Clients(seed.clients)).await?;
        db.save(CollectionSnapshot::Sales(seed.sales)).await?;
        db.save(CollectionSnapshot::StoreDebts(seed.store_debts))
            .await?;
        println!("✓ All collections overwritten with defaults");
    } else {
        let mut absent = Vec::new();
        for collection in Collection::ALL {
            if !db.collections().exists(collection).await? {
                absent.push(collection.key());
            }
        }
        db.load_all().await?;

        if absent.is_empty() {
            println!("⚠ Every collection already exists, nothing seeded");
            println!("  Use --force to overwrite.");
        } else {
            println!("✓ Seeded: {}", absent.join(", "));
        }
    }

    println!();
    for (key, count) in db.collections().counts().await? {
        println!("  {:<12} {} items", key, count);
    }

    db.close().await;
    Ok(())
}
