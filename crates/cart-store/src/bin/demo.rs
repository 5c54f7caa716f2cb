//! # Checkout Demo
//!
//! Runs a scripted shopping session against a freshly configured store and
//! prints each cart's summary as JSON.
//!
//! ## Usage
//! ```bash
//! # Default rules, customer 99
//! cargo run -p cart-store --bin demo
//!
//! # Custom config file and customer
//! cargo run -p cart-store --bin demo -- --config ./cart.toml --customer 42
//!
//! # See every rejected operation
//! RUST_LOG=debug cargo run -p cart-store --bin demo
//! ```

use std::env;
use std::path::PathBuf;

use cart_core::{Cart, CartHandle, CustomerId, ItemId, Money};
use cart_store::{MemoryCartStore, StoreConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// (item, quantity, unit price) lines the demo customer adds.
const BASKET: &[(i64, i64, &str)] = &[(123, 4, "19.99"), (456, 2, "9.99"), (123, 5, "19.99")];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut customer = CustomerId::new(99);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--customer" if i + 1 < args.len() => {
                customer = CustomerId::new(args[i + 1].parse()?);
                i += 1;
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let config = StoreConfig::load(config_path)?;
    info!(rules = ?config.rules, "Starting checkout demo");
    let store = MemoryCartStore::from_config(&config);

    let cart = Cart::create_or_fetch(&store, customer);
    for &(item, qty, price) in BASKET {
        let price: Money = price.parse()?;
        let added = cart.with_cart_mut(|c| c.add_item(ItemId::new(item), qty, price));
        info!(item, qty, price = %price, added, "Add item");
    }

    // Over the per-line limit: rejected, cart unchanged
    let added = cart.with_cart_mut(|c| c.add_item(ItemId::new(123), 5, Money::from_cents(1999)));
    info!(added, "Add item past the line limit");

    let outcome = cart.with_cart_mut(Cart::finalize);
    info!(?outcome, "Checkout");
    print_summary(&cart)?;

    // The next visit gets a fresh cart
    let next = Cart::create_or_fetch(&store, customer);
    info!(
        fresh = !next.same_cart(&cart),
        carts_on_file = store.carts_for(customer).len(),
        "Customer returned"
    );
    print_summary(&next)?;

    Ok(())
}

fn print_summary(cart: &CartHandle) -> Result<(), serde_json::Error> {
    let summary = cart.with_cart(Cart::summary);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
