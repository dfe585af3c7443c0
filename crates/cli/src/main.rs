//! Verto CLI - browse the catalog and manage the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products from the catalog service
//! verto products
//!
//! # Put two units of product 3 in the cart and look at it
//! verto add 3
//! verto add 3
//! verto cart
//!
//! # Place the order
//! verto checkout
//! ```
//!
//! The cart is persisted under `VERTO_CART_DIR`, so each invocation picks up
//! where the last one left off.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use verto_cart::{CartConfig, CatalogClient, ShoppingCart};
use verto_core::ProductId;

mod commands;
mod render;

#[derive(Debug, Parser)]
#[command(name = "verto")]
#[command(author, version, about = "Verto storefront cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Commands {
    /// List every product in the catalog
    Products,
    /// Show one product in detail
    Product { id: ProductId },
    /// Show the cart with prices and totals
    Cart,
    /// Add one unit of a product
    Add { id: ProductId },
    /// Remove one unit of a product
    Decrease { id: ProductId },
    /// Remove a product entirely
    Remove { id: ProductId },
    /// Empty the cart
    Clear,
    /// Place an order for the current cart
    Checkout,
    /// Check that the catalog service is up
    Health,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never mix with command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let config = CartConfig::from_env()?;
    let cart = ShoppingCart::from_config(&config)?;

    match cli.command {
        Commands::Products => commands::catalog::list(&cart).await?,
        Commands::Product { id } => commands::catalog::show(&cart, id).await?,
        Commands::Cart => commands::cart::show(&cart).await,
        Commands::Add { id } => commands::cart::add(&cart, id).await?,
        Commands::Decrease { id } => commands::cart::decrease(&cart, id).await,
        Commands::Remove { id } => commands::cart::remove(&cart, id).await,
        Commands::Clear => commands::cart::clear(&cart),
        Commands::Checkout => commands::checkout::run(&cart).await?,
        Commands::Health => {
            let client = CatalogClient::new(&config.api_url)?;
            commands::catalog::health(&client).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_product_ids() {
        let cli = Cli::try_parse_from(["verto", "add", "7"]).unwrap();
        assert_eq!(cli.command, Commands::Add { id: ProductId::new(7) });

        let cli = Cli::try_parse_from(["verto", "product", "12"]).unwrap();
        assert_eq!(cli.command, Commands::Product { id: ProductId::new(12) });
    }

    #[test]
    fn test_rejects_non_numeric_ids() {
        assert!(Cli::try_parse_from(["verto", "remove", "abc"]).is_err());
        assert!(Cli::try_parse_from(["verto", "add"]).is_err());
    }
}
