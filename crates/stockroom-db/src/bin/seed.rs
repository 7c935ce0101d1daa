//! # Seed Data Generator
//!
//! Populates a development database with products, their initial stock
//! receipts and a handful of sales.
//!
//! ## Usage
//! ```bash
//! # Generate 60 products (default)
//! cargo run -p stockroom-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p stockroom-db --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p stockroom-db --bin seed -- --db ./data/stockroom.db
//! ```
//!
//! ## Generated Data
//! - Products across five categories, created with zero stock
//! - One INBOUND stock movement per product from a rotating supplier
//! - A sale on every seventh product, so the dashboard has revenue to show
//!
//! Values are derived from the product index, so two runs produce the
//! same catalogue.

use std::env;
use stockroom_core::{Money, NewProduct, NewSale, NewStockEntry};
use stockroom_db::{Database, DbConfig};

/// Product categories and base names
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Peripherals",
        &[
            "Mechanical Keyboard",
            "Wireless Mouse",
            "Trackball",
            "Drawing Tablet",
            "USB Microphone",
            "Webcam",
        ],
    ),
    (
        "Displays",
        &[
            "Office Monitor",
            "Gaming Monitor",
            "Portable Monitor",
            "Monitor Arm",
        ],
    ),
    (
        "Networking",
        &[
            "Wi-Fi Router",
            "Network Switch",
            "Mesh Node",
            "Ethernet Cable",
            "Powerline Adapter",
        ],
    ),
    (
        "Storage",
        &[
            "External SSD",
            "Portable HDD",
            "USB Flash Drive",
            "microSD Card",
            "NAS Enclosure",
        ],
    ),
    (
        "Accessories",
        &[
            "USB-C Hub",
            "Laptop Stand",
            "Desk Mat",
            "HDMI Cable",
            "Charging Dock",
            "Cable Organizer",
        ],
    ),
];

/// Variants appended to the base name, with a price addon in cents
const VARIANTS: &[(&str, i64)] = &[("Basic", 0), ("Plus", 1_500), ("Pro", 4_000)];

const SUPPLIERS: &[&str] = &["Northwind Supply", "Contoso Distribution", "Fabrikam Wholesale"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 60;
    let mut db_path = String::from("./stockroom_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(60);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 60)");
                println!("  -d, --db <PATH>    Database file path (default: ./stockroom_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Stockroom Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Schema ready");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut sold = 0;

    let catalogue = CATEGORIES.iter().flat_map(|(category, names)| {
        names.iter().flat_map(move |name| {
            VARIANTS
                .iter()
                .map(move |(variant, addon)| (*category, *name, *variant, *addon))
        })
    });

    for (seed, (category, name, variant, addon)) in catalogue.take(count).enumerate() {
        let product = generate_product(category, name, variant, addon, seed);
        let product_name = product.name.clone();

        let created = match db.products().create(product).await {
            Ok(created) => created,
            Err(e) => {
                eprintln!("Failed to insert {}: {}", product_name, e);
                continue;
            }
        };

        let receipt = generate_receipt(created.id, created.cost, seed);
        if let Err(e) = db.stock().add_stock(receipt).await {
            eprintln!("Failed to stock {}: {}", created.name, e);
            continue;
        }

        if seed % 7 == 0 {
            let mut sale = NewSale::new(created.id, 1 + (seed % 3) as i64);
            sale.payment = Some(if seed % 2 == 0 { "Card" } else { "Cash" }.to_string());
            match db.sales().record_sale(sale).await {
                Ok(_) => sold += 1,
                Err(e) => eprintln!("Failed to sell {}: {}", created.name, e),
            }
        }

        generated += 1;
        if generated % 20 == 0 {
            println!("  Generated {} products...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products and {} sales in {:?}", generated, sold, elapsed);

    let stats = db.stats().summary().await?;
    println!();
    println!("Inventory summary:");
    println!("  Inventory value: {}", stats.total_value);
    println!("  Low stock:       {}", stats.low_stock);
    println!("  Revenue:         {}", stats.total_revenue);
    println!("  Profit:          {}", stats.total_profit);

    let low: Vec<String> = db
        .products()
        .list()
        .await?
        .into_iter()
        .filter(|p| p.is_low_stock())
        .map(|p| format!("{} ({} left)", p.name, p.quantity))
        .collect();
    if !low.is_empty() {
        println!();
        println!("Running low:");
        for line in &low {
            println!("  {}", line);
        }
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

/// Builds one product with zero stock; stock arrives via a receipt.
fn generate_product(category: &str, name: &str, variant: &str, addon: i64, seed: usize) -> NewProduct {
    // Base price 9.99 - 89.99 plus the variant addon
    let price_cents = 999 + ((seed * 37) % 8_000) as i64 + addon;

    // Cost is 55-74% of price
    let cost_pct = 55 + (seed % 20) as i64;
    let cost_cents = price_cents * cost_pct / 100;

    NewProduct::new(
        format!("{} {}", name, variant),
        category,
        0,
        Money::from_cents(price_cents),
        Money::from_cents(cost_cents),
    )
    .min_stock(3 + (seed % 5) as i64)
}

/// Initial receipt: 1-24 units, some of which land under the low-stock line.
fn generate_receipt(product_id: i64, unit_cost: Money, seed: usize) -> NewStockEntry {
    let mut entry = NewStockEntry::new(product_id, 1 + ((seed * 7) % 24) as i64);
    entry.supplier = Some(SUPPLIERS[seed % SUPPLIERS.len()].to_string());
    entry.cost = Some(unit_cost);
    entry.notes = Some("Initial stock".to_string());
    entry
}
