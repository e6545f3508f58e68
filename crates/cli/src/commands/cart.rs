//! Shopping cart commands.
//!
//! # Usage
//!
//! ```bash
//! gigashop cart show
//! gigashop cart add 3 --quantity 2
//! gigashop cart set 3 5
//! gigashop cart set 3 0      # removes the line
//! gigashop cart remove 3
//! gigashop cart clear
//! ```

use std::io::Write;

use clap::Subcommand;

use gigashop_core::{ProductId, Quantity};
use gigashop_storefront::state::AppState;
use gigashop_storefront::views::CartView;

use super::{CliError, load_listing, truncate};

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show cart contents and subtotal
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        id: ProductId,

        /// How many to add
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Set the quantity of a cart line (zero or less removes it)
    Set {
        /// Product ID
        id: ProductId,

        /// New quantity
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

/// Run a cart command.
///
/// # Errors
///
/// Returns an error for a quantity below one on `add`, a product that is
/// unknown or out of stock, or if writing output fails.
pub async fn run(
    command: CartCommand,
    state: &mut AppState,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        CartCommand::Show => {
            if !state.store().cart().is_empty() {
                load_listing(state).await;
            }
            write_cart(out, &CartView::from(state.store().state()))?;
        }
        CartCommand::Add { id, quantity } => {
            let quantity = Quantity::try_from(quantity)?;
            let product = state.add_to_cart(id, quantity).await?;
            writeln!(out, "Added {quantity} x {} to the cart.", product.name)?;
        }
        CartCommand::Remove { id } => {
            state.store_mut().remove_from_cart(id);
            writeln!(out, "Removed product {id} from the cart.")?;
        }
        CartCommand::Set { id, quantity } => {
            if state.store().cart().get(id).is_none() {
                return Err(CliError::Usage(format!("product {id} is not in the cart")));
            }
            state.store_mut().update_cart_quantity(id, quantity);
            match state.store().cart().quantity_of(id) {
                Some(q) => writeln!(out, "Product {id} quantity is now {q}.")?,
                None => writeln!(out, "Removed product {id} from the cart.")?,
            }
        }
        CartCommand::Clear => {
            state.store_mut().clear_cart();
            writeln!(out, "Cart cleared.")?;
        }
    }
    Ok(())
}

fn write_cart(out: &mut impl Write, cart: &CartView) -> std::io::Result<()> {
    if cart.items.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }
    for item in &cart.items {
        writeln!(
            out,
            "{:>4}  {:<40}  {:>3} x {:>9}  {:>10}",
            item.product_id,
            truncate(&item.title, 40),
            item.quantity,
            item.price.as_deref().unwrap_or("-"),
            item.line_price.as_deref().unwrap_or("-"),
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{} item(s), subtotal {}", cart.item_count, cart.subtotal)
}
