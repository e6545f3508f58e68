//! GigaShop CLI - storefront and admin from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! gigashop products list --category electronics --limit 5
//! gigashop products show 3
//!
//! # Favorites and cart (persisted between runs)
//! gigashop favorites toggle 3
//! gigashop cart add 3 --quantity 2
//! gigashop cart set 3 0
//! gigashop cart show
//!
//! # Admin panel
//! gigashop admin login "$ADMIN_TOKEN"
//! gigashop admin products create --name Lamp --price 19.99 --category electronics
//! gigashop admin stats
//! ```
//!
//! # Commands
//!
//! - `products` - Catalog listings and product details
//! - `favorites` - Favorite products
//! - `cart` - Shopping cart
//! - `auth` - Storefront token
//! - `admin` - Admin panel (products CRUD, dashboard, users, orders)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gigashop_admin::config::AdminConfig;
use gigashop_storefront::config::StorefrontConfig;
use gigashop_storefront::error::AppError;

mod commands;

use commands::CliError;
use commands::admin::AdminCommand;
use commands::auth::AuthCommand;
use commands::cart::CartCommand;
use commands::favorites::FavoritesCommand;
use commands::products::ProductsCommand;

#[derive(Parser)]
#[command(name = "gigashop")]
#[command(author, version, about = "GigaShop storefront and admin CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsCommand,
    },
    /// Manage favorite products
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Manage the storefront auth token
    Auth {
        #[command(subcommand)]
        action: AuthCommand,
    },
    /// Admin panel operations
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
}

/// Configuration for whichever side a command runs against.
enum Config {
    Storefront(StorefrontConfig),
    Admin(AdminConfig),
}

impl Config {
    fn load(command: &Commands) -> Result<Self, CliError> {
        match command {
            Commands::Admin { .. } => Ok(Self::Admin(
                AdminConfig::from_env().map_err(gigashop_admin::error::AdminError::from)?,
            )),
            _ => Ok(Self::Storefront(
                StorefrontConfig::from_env().map_err(AppError::from)?,
            )),
        }
    }

    fn sentry(&self) -> (Option<&str>, Option<String>) {
        match self {
            Self::Storefront(c) => (c.sentry_dsn.as_deref(), c.sentry_environment.clone()),
            Self::Admin(c) => (c.sentry_dsn.as_deref(), c.sentry_environment.clone()),
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &Config) -> Option<sentry::ClientInitGuard> {
    let (dsn, environment) = config.sentry();
    let dsn = dsn?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: environment.map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Map tracing levels to Sentry: warnings and errors become events, the rest
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = Config::load(&cli.command);
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "gigashop=info,gigashop_storefront=info,gigashop_admin=info".into()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: Config) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();

    match (command, config) {
        (Commands::Admin { action }, Config::Admin(config)) => {
            commands::admin::run(action, &config, &mut out).await
        }
        (command, Config::Storefront(config)) => {
            let mut state = gigashop_storefront::state::AppState::new(config)?;
            match command {
                Commands::Products { action } => {
                    commands::products::run(action, &mut state, &mut out).await
                }
                Commands::Favorites { action } => {
                    commands::favorites::run(action, &mut state, &mut out).await
                }
                Commands::Cart { action } => commands::cart::run(action, &mut state, &mut out).await,
                Commands::Auth { action } => commands::auth::run(action, &state, &mut out),
                Commands::Admin { .. } => Err(CliError::Usage(
                    "admin commands need the admin configuration".to_string(),
                )),
            }
        }
        (_, Config::Admin(_)) => Err(CliError::Usage(
            "storefront commands need the storefront configuration".to_string(),
        )),
    }
}
