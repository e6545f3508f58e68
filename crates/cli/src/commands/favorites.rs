//! Favorite product commands.
//!
//! # Usage
//!
//! ```bash
//! gigashop favorites list
//! gigashop favorites add 3
//! gigashop favorites toggle 3
//! ```

use std::io::Write;

use clap::Subcommand;

use gigashop_core::ProductId;
use gigashop_storefront::state::AppState;
use gigashop_storefront::store::selectors;
use gigashop_storefront::views::ProductView;

use super::{CliError, load_listing, write_product_row};

#[derive(Subcommand)]
pub enum FavoritesCommand {
    /// List favorite products
    List,
    /// Mark a product as favorite
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Unmark a favorite
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Flip the favorite flag of a product
    Toggle {
        /// Product ID
        id: ProductId,
    },
}

/// Run a favorites command.
///
/// # Errors
///
/// Returns an error if writing output fails.
pub async fn run(
    command: FavoritesCommand,
    state: &mut AppState,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        FavoritesCommand::List => {
            if state.store().favorites().is_empty() {
                writeln!(out, "No favorites yet.")?;
                return Ok(());
            }
            load_listing(state).await;
            write_favorites(out, state)?;
        }
        FavoritesCommand::Add { id } => {
            state.store_mut().add_to_favorites(id);
            writeln!(out, "Product {id} is a favorite.")?;
        }
        FavoritesCommand::Remove { id } => {
            state.store_mut().remove_from_favorites(id);
            writeln!(out, "Product {id} is not a favorite.")?;
        }
        FavoritesCommand::Toggle { id } => {
            state.store_mut().toggle_favorite(id);
            if state.store().favorites().contains(id) {
                writeln!(out, "Added product {id} to favorites.")?;
            } else {
                writeln!(out, "Removed product {id} from favorites.")?;
            }
        }
    }
    Ok(())
}

fn write_favorites(out: &mut impl Write, state: &AppState) -> std::io::Result<()> {
    let store_state = state.store().state();
    for id in state.store().favorites().iter() {
        match selectors::find_product(store_state, id) {
            Some(product) => write_product_row(out, &ProductView::new(product, store_state))?,
            None => writeln!(out, "{id:>4}  ♥  Product #{id} (not in catalog)")?,
        }
    }
    Ok(())
}
