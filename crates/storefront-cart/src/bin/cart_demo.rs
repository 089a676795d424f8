//! # Cart Demo
//!
//! Runs a scripted shopping session against the cart service: two adds,
//! a valid update, an update past the stock, and a removal.
//!
//! ## Usage
//! ```bash
//! # In-memory inventory, cart persisted under the platform data dir
//! cargo run -p storefront-cart --bin cart_demo
//!
//! # Against a running storefront API
//! STOREFRONT_API_URL=http://localhost:3333 cargo run -p storefront-cart --bin cart_demo
//!
//! # Custom config file, debug logging
//! cargo run -p storefront-cart --bin cart_demo -- --config ./cart.toml --verbose
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use storefront_cart::adapters::{ApiClient, FileStore, MemoryInventory};
use storefront_cart::notify::TracingNotifier;
use storefront_cart::{
    logging, CartConfig, CartDeps, CartManager, CartResult, CatalogQuery, StockQuery,
};
use storefront_core::{Money, Product, UpdateProductAmount};

/// Demo catalog: (id, title, price in cents, stock).
const CATALOG: &[(u64, &str, i64, i64)] = &[
    (1, "Tênis de Caminhada Leve Confortável", 17990, 10),
    (2, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 13990, 5),
    (3, "Tênis Adidas Duramo Lite 2.0", 21990, 2),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => {
                println!("Storefront Cart Demo");
                println!();
                println!("Usage: cart_demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  TOML config file");
                println!("  -v, --verbose        Debug logging");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    logging::init(verbose);

    println!("🛒 Storefront Cart Demo");
    println!("=======================");

    let config = CartConfig::load(config_path)?;
    let data_dir = config
        .resolved_data_dir()
        .unwrap_or_else(|| env::temp_dir().join("storefront"));
    let store = Arc::new(FileStore::open(&data_dir)?);

    let (stock, catalog): (Arc<dyn StockQuery>, Arc<dyn CatalogQuery>) =
        if env::var("STOREFRONT_API_URL").is_ok() {
            let api = Arc::new(ApiClient::from_config(&config)?);
            println!("Inventory: {}", config.api_base_url);
            (api.clone() as Arc<dyn StockQuery>, api as Arc<dyn CatalogQuery>)
        } else {
            let inventory = CATALOG.iter().fold(
                MemoryInventory::new(),
                |inv, &(id, title, cents, available)| {
                    let image = format!("https://example.com/{}.jpg", id);
                    inv.with_product(
                        Product::new(id, title, Money::from_cents(cents), image),
                        available,
                    )
                },
            );
            let inventory = Arc::new(inventory);
            println!("Inventory: in-memory ({} products)", CATALOG.len());
            (inventory.clone() as Arc<dyn StockQuery>, inventory as Arc<dyn CatalogQuery>)
        };

    println!("Storage:   {}", data_dir.display());
    println!();

    let manager = CartManager::load(
        config,
        CartDeps {
            stock,
            catalog,
            store,
            notifier: Arc::new(TracingNotifier),
        },
    );

    // Start from an empty cart so the session is repeatable.
    for product in manager.cart().items() {
        let _ = manager.remove_product(product.id).await;
    }

    // Refusals are already logged by the notifier; the session keeps going.
    step(&manager, "add 1", manager.add_product(1).await);
    step(&manager, "add 1", manager.add_product(1).await);
    let result = manager
        .update_product_amount(UpdateProductAmount::new(1, 5))
        .await;
    step(&manager, "set 1 to 5", result);
    let result = manager
        .update_product_amount(UpdateProductAmount::new(1, 11))
        .await;
    step(&manager, "set 1 to 11", result);
    step(&manager, "remove 1", manager.remove_product(1).await);

    println!();
    println!("✓ Session complete");

    Ok(())
}

/// Prints the outcome of one operation and the cart it left behind.
fn step(manager: &CartManager, label: &str, result: CartResult<()>) {
    let config = manager.config();
    match result {
        Ok(()) => println!("✓ {}", label),
        Err(e) => println!("✗ {} ({})", label, e),
    }

    for product in manager.cart().items() {
        println!(
            "    {:>3} x {:<55} {:>12}",
            product.amount,
            product.title,
            config.format_currency(product.subtotal())
        );
    }

    let totals = manager.totals();
    println!(
        "    {} products, {} units, total {}",
        totals.item_count,
        totals.total_quantity,
        config.format_currency(totals.total)
    );
}
