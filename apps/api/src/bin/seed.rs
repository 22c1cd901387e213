//! # Seed Data Generator
//!
//! Populates the database with sellers, storefronts, products and a funded
//! buyer for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./data/bazaar.db with 10 products per store (default)
//! cargo run -p bazaar-api --bin seed
//!
//! # Custom amount and database
//! cargo run -p bazaar-api --bin seed -- --count 25 --db ./data/dev.db
//! ```
//!
//! Every seeded account uses the password `password123`.

use std::env;
use std::path::Path;

use anyhow::{bail, Context};
use chrono::Utc;

use bazaar_api::password::hash_password;
use bazaar_core::{Money, Product, Store, User};
use bazaar_db::repository::generate_id;
use bazaar_db::{Database, DbConfig};

const SEED_PASSWORD: &str = "password123";

/// (owner email, first name, store name, product names)
const SELLERS: &[(&str, &str, &str, &[&str])] = &[
    (
        "ada@example.com",
        "Ada",
        "Ada's Lamps",
        &["Desk Lamp", "Floor Lamp", "Reading Light", "Lantern", "Bulb Pack"],
    ),
    (
        "grace@example.com",
        "Grace",
        "Grace's Kitchen",
        &["Chef Knife", "Cutting Board", "Cast Iron Pan", "Whisk", "Ladle"],
    ),
    (
        "linus@example.com",
        "Linus",
        "Linus Outdoors",
        &["Tent", "Sleeping Bag", "Headlamp", "Water Bottle", "Camp Stove"],
    ),
];

const BUYER_EMAIL: &str = "buyer@example.com";
const BUYER_BALANCE: i64 = 100_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 10;
    let mut db_path = String::from("./data/bazaar.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                let raw = args.get(i + 1).context("--count needs a value")?;
                count = raw.parse().with_context(|| format!("invalid count: {raw}"))?;
                i += 1;
            }
            "--db" | "-d" => {
                db_path = args.get(i + 1).context("--db needs a value")?.clone();
                i += 1;
            }
            "--help" | "-h" => {
                println!("Bazaar Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Products per store (default: 10)");
                println!("  -d, --db <PATH>    Database file path (default: ./data/bazaar.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => bail!("unknown argument: {other}"),
        }
        i += 1;
    }

    println!("Bazaar Seed Data Generator");
    println!("==========================");
    println!("Database: {db_path}");
    println!("Products per store: {count}");
    println!();

    if let Some(parent) = Path::new(&db_path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let existing = db.users().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {existing} users");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // One hash for every account keeps seeding fast.
    let password_hash = hash_password(SEED_PASSWORD)?;

    for (seller_idx, (email, first_name, store_name, names)) in SELLERS.iter().enumerate() {
        db.users()
            .insert(&account(email, first_name, &password_hash, 0))
            .await?;

        let store = Store {
            id: generate_id(),
            owner_email: email.to_string(),
            name: store_name.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        db.stores().insert(&store).await?;

        for n in 0..count {
            let seed = seller_idx * 1000 + n;
            db.products()
                .insert(&generate_product(&store.id, names[n % names.len()], n, seed))
                .await?;
        }

        println!("✓ {store_name} ({email}): {count} products");
    }

    db.users()
        .insert(&account(BUYER_EMAIL, "Buyer", &password_hash, BUYER_BALANCE))
        .await?;
    println!(
        "✓ {BUYER_EMAIL} with balance {}",
        Money::from_cents(BUYER_BALANCE)
    );

    println!();
    println!(
        "✓ Seed complete: {} users, {} products",
        db.users().count().await?,
        db.products().count().await?
    );
    println!("  Log in with any seeded email and password '{SEED_PASSWORD}'.");

    db.close().await;
    Ok(())
}

fn account(email: &str, first_name: &str, password_hash: &str, balance: i64) -> User {
    let now = Utc::now();
    User {
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: "Example".to_string(),
        password_hash: password_hash.to_string(),
        balance: Money::from_cents(balance),
        created_at: now,
        updated_at: now,
    }
}

/// Builds a product with deterministic price and stock.
fn generate_product(store_id: &str, name: &str, n: usize, seed: usize) -> Product {
    let now = Utc::now();

    // Price: 1.99 - 49.99
    let price = 199 + ((seed * 37) % 4800) as i64;

    // Stock: 0 - 50
    let stock = (seed % 51) as i64;

    Product {
        id: generate_id(),
        store_id: store_id.to_string(),
        name: format!("{name} #{}", n + 1),
        description: format!("Seeded {} for development", name.to_lowercase()),
        price: Money::from_cents(price),
        stock,
        created_at: now,
        updated_at: now,
    }
}
