//! Shelfcart CLI - Inspect and edit a persisted cart and favorites list.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! sc-cli cart show
//!
//! # Add two units of a catalog product
//! sc-cli cart add p1 -q 2
//!
//! # Add a product the catalog does not know
//! sc-cli cart add gift-wrap --price 3.50 --title "Gift wrap"
//!
//! # Set a quantity (zero or below removes the line)
//! sc-cli cart update p1 5
//!
//! # Toggle a favorite
//! sc-cli favorites toggle p1
//!
//! # List the catalog
//! sc-cli catalog list --category snacks
//! ```
//!
//! # Commands
//!
//! - `cart` - Show, add, remove, update, clear
//! - `favorites` - Toggle, list, clear
//! - `catalog` - List products with stock

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use shelfcart_core::{CategoryId, ProductId};
use shelfcart_store::StoreConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Session;

#[derive(Parser)]
#[command(name = "sc-cli")]
#[command(author, version, about = "Shelfcart cart and favorites tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogCommand,
    },
}

#[derive(Subcommand)]
enum CartCommand {
    /// Show cart lines and totals
    Show {
        /// Print the cart as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a product to the cart
    Add {
        /// Product ID
        product_id: ProductId,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,

        /// Unit price, for products missing from the catalog
        #[arg(long)]
        price: Option<Decimal>,

        /// Display title, for products missing from the catalog
        #[arg(long)]
        title: Option<String>,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a cart line
    Update {
        /// Product ID
        product_id: ProductId,

        /// New quantity (zero or below removes the line)
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every line from the cart
    Clear,
}

#[derive(Subcommand)]
enum FavoritesCommand {
    /// Add or remove a favorite
    Toggle {
        /// Product ID
        product_id: ProductId,
    },
    /// List favorites
    List,
    /// Remove every favorite
    Clear,
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// List products
    List {
        /// Only show products in this category
        #[arg(short, long)]
        category: Option<CategoryId>,
    },
}

fn main() {
    // Defaults to info for the CLI and warnings from the store if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sc_cli=info,shelfcart_store=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreConfig::from_env()?;
    let mut session = Session::open(config)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Cart { action } => match action {
            CartCommand::Show { json } => commands::cart::show(&session, json, &mut out)?,
            CartCommand::Add {
                product_id,
                quantity,
                price,
                title,
            } => commands::cart::add(&mut session, &product_id, quantity, price, title)?,
            CartCommand::Remove { product_id } => commands::cart::remove(&mut session, &product_id),
            CartCommand::Update {
                product_id,
                quantity,
            } => commands::cart::update(&mut session, &product_id, quantity),
            CartCommand::Clear => commands::cart::clear(&mut session),
        },
        Commands::Favorites { action } => match action {
            FavoritesCommand::Toggle { product_id } => {
                commands::favorites::toggle(&mut session, &product_id);
            }
            FavoritesCommand::List => commands::favorites::list(&session, &mut out)?,
            FavoritesCommand::Clear => commands::favorites::clear(&mut session),
        },
        Commands::Catalog { action } => match action {
            CatalogCommand::List { category } => {
                commands::catalog::list(&session, category.as_ref(), &mut out)?;
            }
        },
    }

    session.flush_notifications(&mut out)?;
    Ok(())
}
