//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! gigashop products list
//! gigashop products list --category "men's clothing" --limit 3
//! gigashop products show 1
//! gigashop products categories
//! ```

use std::io::Write;

use clap::Subcommand;

use gigashop_core::ProductId;
use gigashop_storefront::state::AppState;
use gigashop_storefront::views::ProductView;

use super::{CliError, write_product_detail, write_product_row};

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List products
    List {
        /// Only show products in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Show at most this many products
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one product
    Show {
        /// Product ID
        id: ProductId,
    },
    /// List categories
    Categories,
}

/// Run a products command.
///
/// # Errors
///
/// Returns an error if the catalog request or writing output fails.
pub async fn run(
    command: ProductsCommand,
    state: &mut AppState,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        ProductsCommand::List { category, limit } => {
            match category {
                Some(category) => {
                    let products = state
                        .catalog()
                        .get_products_by_category(&category)
                        .await?;
                    state.store_mut().set_products(products);
                }
                None => state.refresh_products().await?,
            }

            let store = state.store();
            if store.products().is_empty() {
                writeln!(out, "No products found.")?;
                return Ok(());
            }
            for product in store.products().iter().take(limit.unwrap_or(usize::MAX)) {
                write_product_row(out, &ProductView::new(product, store.state()))?;
            }
        }
        ProductsCommand::Show { id } => {
            let product = state.product(id).await?;
            write_product_detail(out, &ProductView::new(&product, state.store().state()))?;
        }
        ProductsCommand::Categories => {
            let categories = state
                .catalog()
                .get_categories()
                .await?;
            for category in categories.iter() {
                writeln!(out, "{category}")?;
            }
        }
    }
    Ok(())
}
