//! Go Marketplace CLI - Inspect and edit the locally stored cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the stored cart
//! gm-cart show
//!
//! # Add a product (or one more unit of it)
//! gm-cart add --id p1 --title "Shirt" --image-url https://cdn.example.com/shirt.png --price 20
//!
//! # Change quantities
//! gm-cart increment p1
//! gm-cart decrement p1
//!
//! # Machine-readable output, custom storage directory
//! gm-cart --json --storage-dir /tmp/cart show
//! ```
//!
//! # Commands
//!
//! - `show` - Print the cart
//! - `add` - Add a product
//! - `increment` - Add one unit of a product
//! - `decrement` - Remove one unit of a product (never below one)
//!
//! Storage location and key come from `CART_STORAGE_DIR` / `CART_STORAGE_KEY`
//! (see `go_marketplace_cart::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

use commands::cart::{CartAction, OutputFormat};

#[derive(Parser)]
#[command(name = "gm-cart")]
#[command(author, version, about = "Go Marketplace cart tools")]
struct Cli {
    /// Directory holding the stored cart (overrides `CART_STORAGE_DIR`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Print the cart as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stored cart
    Show,
    /// Add a product, or one more unit if it is already in the cart
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product title
        #[arg(long)]
        title: String,

        /// Product image URL
        #[arg(long)]
        image_url: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,
    },
    /// Add one unit of a product
    Increment {
        /// Product ID
        id: String,
    },
    /// Remove one unit of a product
    Decrement {
        /// Product ID
        id: String,
    },
}

impl From<Commands> for CartAction {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Show => Self::Show,
            Commands::Add {
                id,
                title,
                image_url,
                price,
            } => Self::Add {
                id,
                title,
                image_url,
                price,
            },
            Commands::Increment { id } => Self::Increment { id },
            Commands::Decrement { id } => Self::Decrement { id },
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "go_marketplace_cart=info,go_marketplace_cli=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = go_marketplace_cart::CartConfig::from_env()?;
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let output = commands::cart::run(&config, cli.command.into(), format).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}
