//! Cart commands.
//!
//! Each invocation loads the stored cart, applies at most one operation
//! (which writes the cart back), and renders the result.

use std::fmt::Write as _;

use go_marketplace_cart::{CartConfig, CartError, CartProvider};
use go_marketplace_core::{Cart, NewCartItem, Price, ProductId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Cart store operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Output could not be rendered as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Price is negative.
    #[error("Invalid price: {0}")]
    InvalidPrice(Decimal),
}

/// Operation requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Show,
    Add {
        id: String,
        title: String,
        image_url: String,
        price: Decimal,
    },
    Increment {
        id: String,
    },
    Decrement {
        id: String,
    },
}

/// How the resulting cart is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Run `action` against the cart described by `config` and render the result.
pub async fn run(
    config: &CartConfig,
    action: CartAction,
    format: OutputFormat,
) -> Result<String, CommandError> {
    let provider = CartProvider::from_config(config).await?;
    let cart = provider.handle();

    let updated = match action {
        CartAction::Show => cart.products()?,
        CartAction::Add {
            id,
            title,
            image_url,
            price,
        } => {
            if price.is_sign_negative() {
                return Err(CommandError::InvalidPrice(price));
            }
            tracing::info!(id = %id, "Adding product to cart");
            cart.add_to_cart(NewCartItem {
                id: ProductId::new(id),
                title,
                image_url,
                price: Price::new(price),
            })
            .await?
        }
        CartAction::Increment { id } => cart.increment(&ProductId::new(id)).await?,
        CartAction::Decrement { id } => cart.decrement(&ProductId::new(id)).await?,
    };

    match format {
        OutputFormat::Table => Ok(render_table(&updated)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&updated)?),
    }
}

/// Render the cart as a plain-text table with totals.
///
/// Totals too large to represent print as `overflow`.
pub fn render_table(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let id_width = cart
        .iter()
        .map(|item| item.id.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max("ID".len());
    let title_width = cart
        .iter()
        .map(|item| item.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("TITLE".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<id_width$}  {:<title_width$}  {:>10}  {:>4}  {:>10}",
        "ID", "TITLE", "PRICE", "QTY", "TOTAL"
    );
    for item in cart {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:<title_width$}  {:>10}  {:>4}  {:>10}",
            item.id,
            item.title,
            item.price.to_string(),
            item.quantity.get(),
            format_total(item.line_total()),
        );
    }
    let _ = write!(
        out,
        "{} item(s), subtotal {}",
        cart.total_quantity(),
        format_total(cart.subtotal())
    );
    out
}

fn format_total(total: Option<Price>) -> String {
    total.map_or_else(|| "overflow".to_string(), |price| price.to_string())
}
