//! Admin panel commands.
//!
//! # Usage
//!
//! ```bash
//! gigashop admin login "$ADMIN_TOKEN"
//! gigashop admin stats
//! gigashop admin users
//! gigashop admin orders
//! gigashop admin products list
//! gigashop admin products create --name Lamp --price 19.99 --category electronics
//! gigashop admin products update 3 --price 24.50
//! gigashop admin products delete 3
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_API_URL` - Catalog API base URL
//! - `ADMIN_STORAGE_PATH` - File holding the admin token

use std::io::Write;
use std::sync::Arc;

use clap::Subcommand;
use secrecy::SecretString;

use gigashop_admin::AdminApiClient;
use gigashop_admin::config::AdminConfig;
use gigashop_admin::models::{AdminProduct, NewProduct, ProductPatch};
use gigashop_core::{FileStorage, KeyValueStore, Price, ProductId};

use super::{CliError, truncate};

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Show dashboard figures
    Stats,
    /// List shop users
    Users,
    /// List orders
    Orders,
    /// Store the admin token
    Login {
        /// Opaque bearer token
        token: String,
    },
    /// Forget the admin token
    Logout,
    /// Manage products
    Products {
        #[command(subcommand)]
        action: AdminProductsCommand,
    },
}

#[derive(Subcommand)]
pub enum AdminProductsCommand {
    /// List all products
    List,
    /// Show one product
    Show {
        /// Product ID
        id: ProductId,
    },
    /// Create a product
    Create {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Unit price, e.g. 19.99
        #[arg(short, long)]
        price: Price,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Image URL
        #[arg(short, long, default_value = "")]
        image: String,

        /// Category
        #[arg(short, long)]
        category: String,
    },
    /// Update the given fields of a product
    Update {
        /// Product ID
        id: ProductId,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        price: Option<Price>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        image: Option<String>,

        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: ProductId,
    },
}

/// Run an admin command.
///
/// # Errors
///
/// Returns an error if the API request, the token storage or writing output
/// fails.
pub async fn run(
    command: AdminCommand,
    config: &AdminConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStorage::new(&config.storage_path));
    let client = AdminApiClient::new(config, storage)?;

    match command {
        AdminCommand::Stats => {
            let stats = client.get_dashboard_stats().await?;
            writeln!(out, "Products:  {}", stats.total_products)?;
            writeln!(out, "Users:     {}", stats.total_users)?;
            writeln!(out, "Orders:    {}", stats.total_orders)?;
            writeln!(out, "Revenue:   ${:.2}", stats.revenue)?;
        }
        AdminCommand::Users => {
            for user in client.get_users().await? {
                writeln!(
                    out,
                    "{:>4}  {:<20}  {:<28}  {:<8}  {}  {}",
                    user.id,
                    user.name,
                    user.email,
                    user.role,
                    user.created_at,
                    if user.is_active { "active" } else { "inactive" }
                )?;
            }
        }
        AdminCommand::Orders => {
            for order in client.get_orders().await? {
                writeln!(
                    out,
                    "#{:<4}  user {:<4}  {} line(s)  ${:>9.2}  {:<10}  {}",
                    order.id,
                    order.user_id,
                    order.products.len(),
                    order.total,
                    order.status,
                    order.created_at
                )?;
            }
        }
        AdminCommand::Login { token } => {
            client.sign_in(&SecretString::from(token))?;
            writeln!(out, "Admin signed in.")?;
        }
        AdminCommand::Logout => {
            client.sign_out()?;
            writeln!(out, "Admin signed out.")?;
        }
        AdminCommand::Products { action } => run_products(action, &client, out).await?,
    }
    Ok(())
}

async fn run_products(
    command: AdminProductsCommand,
    client: &AdminApiClient,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        AdminProductsCommand::List => {
            for product in client.get_products().await? {
                write_admin_row(out, &product)?;
            }
        }
        AdminProductsCommand::Show { id } => {
            let product = client.get_product(id).await?;
            write_admin_row(out, &product)?;
            if !product.description.is_empty() {
                writeln!(out, "{}", product.description)?;
            }
        }
        AdminProductsCommand::Create {
            name,
            price,
            description,
            image,
            category,
        } => {
            let created = client
                .create_product(&NewProduct {
                    name,
                    price,
                    description,
                    image,
                    category,
                })
                .await?;
            writeln!(out, "Created product {}.", created.id)?;
            write_admin_row(out, &created)?;
        }
        AdminProductsCommand::Update {
            id,
            name,
            price,
            description,
            image,
            category,
        } => {
            let patch = ProductPatch {
                name,
                price,
                description,
                image,
                category,
            };
            let applied = client.update_product(id, &patch).await?;
            writeln!(out, "Updated product {}.", applied.id)?;
        }
        AdminProductsCommand::Delete { id } => {
            client.delete_product(id).await?;
            writeln!(out, "Deleted product {id}.")?;
        }
    }
    Ok(())
}

fn write_admin_row(out: &mut impl Write, product: &AdminProduct) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>4}  {:<40}  {:>9}  {:<20}  {}",
        product.id,
        truncate(&product.name, 40),
        product.price,
        product.category,
        if product.in_stock { "In Stock" } else { "Out of Stock" }
    )
}
