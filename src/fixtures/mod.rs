//! Fixtures
//!
//! The catalog and the seeded order history are YAML documents. A default set
//! is compiled in; other sets can be loaded from a fixtures directory laid out
//! as `catalog/{name}.yml` and `orders/{name}.yml`.

use std::{fs, path::PathBuf};

use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    orders::{Order, OrdersStore},
    products::ProductId,
};

pub mod catalog;
pub mod orders;
pub mod products;

/// Bundled catalog document.
pub const DEFAULT_CATALOG: &str = include_str!("../../fixtures/catalog/default.yml");

/// Bundled seed orders document.
pub const DEFAULT_ORDERS: &str = include_str!("../../fixtures/orders/default.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Rating is not a number between 0 and 5
    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    /// Original price is below the selling price
    #[error("Original price below price for product {0}")]
    OriginalBelowPrice(ProductId),

    /// Date is neither a calendar date nor a timestamp
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Order status is not recognised
    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    /// Order has no lines
    #[error("Order {0} has no items")]
    EmptyOrder(String),

    /// Catalog identity constraint violated
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// No catalog loaded yet
    #[error("No catalog loaded")]
    NoCatalog,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    catalog: Option<Catalog>,
    orders: Vec<Order>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            orders: Vec::new(),
        }
    }

    /// Load a catalog from `catalog/{name}.yml`, replacing any loaded one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if it breaks catalog invariants.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        self.catalog = Some(catalog::parse(&contents)?);

        Ok(self)
    }

    /// Load orders from `orders/{name}.yml`, appending to any loaded ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_orders(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("orders").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        self.orders.extend(orders::parse(&contents)?);

        Ok(self)
    }

    /// Loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCatalog`] if no catalog was loaded.
    pub fn catalog(&self) -> Result<&Catalog, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoCatalog)
    }

    /// Store holding the loaded orders, in file order.
    pub fn orders_store(&self) -> OrdersStore {
        OrdersStore::new(self.orders.clone())
    }

    /// Take the loaded catalog and orders.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCatalog`] if no catalog was loaded.
    pub fn into_parts(self) -> Result<(Catalog, OrdersStore), FixtureError> {
        let catalog = self.catalog.ok_or(FixtureError::NoCatalog)?;

        Ok((catalog, OrdersStore::new(self.orders)))
    }
}

/// The bundled catalog.
///
/// # Errors
///
/// Returns an error if the bundled document is malformed.
pub fn default_catalog() -> Result<Catalog, FixtureError> {
    catalog::parse(DEFAULT_CATALOG)
}

/// The bundled order history, most recent first as listed.
///
/// # Errors
///
/// Returns an error if the bundled document is malformed.
pub fn seeded_orders() -> Result<OrdersStore, FixtureError> {
    Ok(OrdersStore::new(orders::parse(DEFAULT_ORDERS)?))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use testresult::TestResult;

    use crate::orders::{OrderId, OrderStatus};

    use super::*;

    #[test]
    fn bundled_catalog_loads() -> TestResult {
        let catalog = default_catalog()?;

        assert_eq!(catalog.categories().len(), 6);
        assert_eq!(catalog.featured().len(), 4);
        assert!(catalog.len() >= 25);

        let smart_home: Vec<&str> = catalog
            .category("casa-inteligente")
            .map(|category| category.subcategories.iter().map(String::as_str).collect())
            .unwrap_or_default();

        assert_eq!(
            smart_home,
            ["Assistentes", "Iluminação", "Segurança", "Automação", "Sensores"]
        );

        Ok(())
    }

    #[test]
    fn bundled_orders_match_the_seed() -> TestResult {
        let store = seeded_orders()?;

        let ids: Vec<&str> = store.iter().map(|order| order.id.as_str()).collect();

        assert_eq!(ids, ["TXK8H9P2L", "ABC123XYZ"]);

        let delivered = store.order_by_id(&OrderId::from("TXK8H9P2L")).ok_or("missing")?;

        assert_eq!(delivered.status, OrderStatus::Delivered);
        assert_eq!(delivered.total, 1598_00);
        assert_eq!(delivered.date.to_string(), "2024-01-15T00:00:00Z");

        let in_transit = store.order_by_id(&OrderId::from("ABC123XYZ")).ok_or("missing")?;

        assert_eq!(in_transit.status, OrderStatus::InTransit);
        assert_eq!(in_transit.total, 459_00);
        assert_eq!(in_transit.items.len(), 2);
        assert!(in_transit.subtotal.is_none());

        Ok(())
    }

    #[test]
    fn loads_from_a_fixtures_directory() -> TestResult {
        let dir = tempfile::tempdir()?;

        fs::create_dir_all(dir.path().join("catalog"))?;
        fs::create_dir_all(dir.path().join("orders"))?;
        fs::write(dir.path().join("catalog/mini.yml"), DEFAULT_CATALOG)?;
        fs::write(dir.path().join("orders/mini.yml"), DEFAULT_ORDERS)?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_catalog("mini")?.load_orders("mini")?;

        assert!(!fixture.catalog()?.is_empty());
        assert_eq!(fixture.orders_store().len(), 2);

        let (catalog, orders) = fixture.into_parts()?;

        assert!(!catalog.is_empty());
        assert_eq!(orders.len(), 2);

        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut fixture = Fixture::with_base_path("/nonexistent/fixtures");

        assert!(matches!(fixture.load_catalog("default"), Err(FixtureError::Io(_))));
        assert!(matches!(fixture.catalog(), Err(FixtureError::NoCatalog)));
    }
}
