use std::io;

use clap::{Parser, Subcommand};
use vitrine::{catalog::Catalog, fixtures};
use vitrine_app::{
    config::{LoggingConfig, StoreConfig},
    storage::FileStorage,
    storefront::Storefront,
};

mod cart;
mod checkout;
mod orders;
mod products;
mod support;

#[derive(Debug, Parser)]
#[command(name = "vitrine", about = "TechStore storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    store: StoreConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the catalog
    Products(products::ProductsCommand),

    /// Manage the shopping cart
    Cart(cart::CartCommand),

    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),

    /// Order history and tracking
    Orders(orders::OrdersCommand),

    /// Help center, chatbot and support forms
    Support(support::SupportCommand),
}

impl Cli {
    pub(crate) fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Products(command) => products::run(&self.store, command),
            Commands::Cart(command) => cart::run(&self.store, command),
            Commands::Checkout(args) => checkout::run(&self.store, args).await,
            Commands::Orders(command) => orders::run(&self.store, command),
            Commands::Support(command) => support::run(&self.store, command).await,
        }
    }
}

fn load_catalog(config: &StoreConfig) -> Result<Catalog, String> {
    let catalog = match &config.fixtures_dir {
        Some(dir) => {
            let mut fixture = fixtures::Fixture::with_base_path(dir);

            fixture
                .load_catalog(&config.catalog)
                .map_err(|error| format!("failed to load catalog: {error}"))?;

            fixture
                .into_parts()
                .map(|(catalog, _orders)| catalog)
                .map_err(|error| format!("failed to load catalog: {error}"))?
        }
        None => fixtures::default_catalog()
            .map_err(|error| format!("failed to load bundled catalog: {error}"))?,
    };

    Ok(catalog)
}

fn open_storefront(config: &StoreConfig) -> Result<Storefront<FileStorage>, String> {
    let catalog = load_catalog(config)?;

    Storefront::load(catalog, FileStorage::new(&config.data_dir))
        .map_err(|error| format!("failed to restore storefront state: {error}"))
}

fn save_storefront(storefront: &mut Storefront<FileStorage>) -> Result<(), String> {
    storefront
        .save()
        .map_err(|error| format!("failed to save storefront state: {error}"))
}

fn stdout() -> io::StdoutLock<'static> {
    io::stdout().lock()
}
