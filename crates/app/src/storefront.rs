//! Storefront session state.

use thiserror::Error;
use tracing::{debug, info};
use vitrine::{
    cart::{Cart, CartStore},
    catalog::Catalog,
    fixtures::{FixtureError, seeded_orders},
    orders::{Order, OrderId, OrderStatus, OrdersStore},
    products::{Product, ProductId},
};

use crate::storage::{
    CART_NAMESPACE, ORDERS_NAMESPACE, StateStorage, StorageError, load_state, save_state,
};

/// Errors raised by storefront operations.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Persisted state could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Seed data could not be loaded.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// No product with this id.
    #[error("product not found: {0}")]
    UnknownProduct(ProductId),

    /// No order with this id.
    #[error("order not found: {0}")]
    UnknownOrder(OrderId),
}

/// The catalog plus the session's cart and order history, bound to a storage backend.
#[derive(Debug)]
pub struct Storefront<S> {
    catalog: Catalog,
    cart: CartStore,
    orders: OrdersStore,
    storage: S,
}

impl<S: StateStorage> Storefront<S> {
    /// Restore the cart and orders from storage. Missing namespaces start from an
    /// empty cart and the seeded order history.
    ///
    /// # Errors
    ///
    /// Returns an error if stored state is unreadable or the seed orders are malformed.
    pub fn load(catalog: Catalog, storage: S) -> Result<Self, StorefrontError> {
        let cart = load_state::<Cart>(&storage, CART_NAMESPACE)?.unwrap_or_default();

        let orders = match load_state::<OrdersStore>(&storage, ORDERS_NAMESPACE)? {
            Some(orders) => orders,
            None => seeded_orders()?,
        };

        debug!(
            cart_lines = cart.len(),
            orders = orders.len(),
            "restored storefront state"
        );

        Ok(Self {
            catalog,
            cart: CartStore::new(cart),
            orders,
            storage,
        })
    }

    /// Write the cart and orders back to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if either namespace cannot be written.
    pub fn save(&mut self) -> Result<(), StorefrontError> {
        save_state(&mut self.storage, CART_NAMESPACE, self.cart.cart())?;
        save_state(&mut self.storage, ORDERS_NAMESPACE, &self.orders)?;

        debug!("saved storefront state");

        Ok(())
    }

    /// Product catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current cart contents.
    pub fn cart(&self) -> &Cart {
        self.cart.cart()
    }

    /// Cart store, for mutations and observers.
    pub fn cart_store(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// Order history.
    pub fn orders(&self) -> &OrdersStore {
        &self.orders
    }

    /// Look up a product.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownProduct`] if the id is not in the catalog.
    pub fn product(&self, id: &ProductId) -> Result<&Product, StorefrontError> {
        self.catalog
            .product(id)
            .ok_or_else(|| StorefrontError::UnknownProduct(id.clone()))
    }

    /// Add one unit of a catalog product to the cart, returning its new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownProduct`] if the id is not in the catalog.
    pub fn add_to_cart(&mut self, id: &ProductId) -> Result<u32, StorefrontError> {
        let product = self
            .catalog
            .product(id)
            .ok_or_else(|| StorefrontError::UnknownProduct(id.clone()))?;

        let quantity = self.cart.add_item(product);

        info!(product_id = %id, quantity, "added to cart");

        Ok(quantity)
    }

    /// Look up an order.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownOrder`] if no order has this id.
    pub fn order(&self, id: &OrderId) -> Result<&Order, StorefrontError> {
        self.orders
            .order_by_id(id)
            .ok_or_else(|| StorefrontError::UnknownOrder(id.clone()))
    }

    /// Record a placed order and empty the cart.
    pub fn place_order(&mut self, order: Order) {
        info!(order_id = %order.id, total = order.total, "order placed");

        self.orders.add_order(order);
        self.cart.clear();
    }

    /// Change an order's status.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownOrder`] if no order has this id.
    pub fn update_order_status(
        &mut self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), StorefrontError> {
        if !self.orders.update_order_status(id, status) {
            return Err(StorefrontError::UnknownOrder(id.clone()));
        }

        info!(order_id = %id, %status, "order status updated");

        Ok(())
    }

    /// Release the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;
    use vitrine::{
        checkout::PaymentMethod,
        fixtures::default_catalog,
        orders::OrderLine,
    };

    use crate::storage::{MemoryStorage, MockStateStorage};

    use super::*;

    fn storefront() -> TestResult<Storefront<MemoryStorage>> {
        Ok(Storefront::load(default_catalog()?, MemoryStorage::new())?)
    }

    #[test]
    fn fresh_storage_starts_with_seeded_orders_and_empty_cart() -> TestResult {
        let storefront = storefront()?;

        assert!(storefront.cart().is_empty());
        assert_eq!(storefront.orders().len(), 2);

        Ok(())
    }

    #[test]
    fn state_survives_a_save_and_reload() -> TestResult {
        let mut storefront = storefront()?;

        storefront.add_to_cart(&ProductId::from("1"))?;
        storefront.add_to_cart(&ProductId::from("1"))?;
        storefront.update_order_status(&OrderId::from("ABC123XYZ"), OrderStatus::Delivered)?;
        storefront.cart_store().set_open(true);
        storefront.save()?;

        let storage = storefront.into_storage();
        let restored = Storefront::load(default_catalog()?, storage)?;

        assert_eq!(
            restored.cart().get(&ProductId::from("1")).map(|item| item.quantity),
            Some(2)
        );
        assert!(!restored.cart().is_open());
        assert_eq!(
            restored.order(&OrderId::from("ABC123XYZ"))?.status,
            OrderStatus::Delivered
        );

        Ok(())
    }

    #[test]
    fn unknown_ids_are_errors() -> TestResult {
        let mut storefront = storefront()?;

        assert!(matches!(
            storefront.add_to_cart(&ProductId::from("999")),
            Err(StorefrontError::UnknownProduct(_))
        ));
        assert!(matches!(
            storefront.update_order_status(&OrderId::from("NOPE"), OrderStatus::Canceled),
            Err(StorefrontError::UnknownOrder(_))
        ));
        assert!(storefront.cart().is_empty());

        Ok(())
    }

    #[test]
    fn placing_an_order_prepends_it_and_clears_the_cart() -> TestResult {
        let mut storefront = storefront()?;

        storefront.add_to_cart(&ProductId::from("2"))?;

        let order = Order::place(
            OrderId::from("NEW000001"),
            Timestamp::UNIX_EPOCH,
            vec![OrderLine::from(
                storefront.cart().items().first().ok_or("empty cart")?,
            )],
            PaymentMethod::Debit,
        )?;

        storefront.place_order(order);

        assert!(storefront.cart().is_empty());
        assert_eq!(
            storefront.orders().orders().first().map(|order| order.id.as_str()),
            Some("NEW000001")
        );

        Ok(())
    }

    #[test]
    fn stored_cart_with_duplicate_lines_is_rejected() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.write(
            CART_NAMESPACE,
            r#"{"state":{"items":[
                {"id":"1","name":"Teclado","price":29900,"image":"/1.png","category":"Hardware","quantity":0},
                {"id":"1","name":"Teclado","price":29900,"image":"/1.png","category":"Hardware","quantity":2}
            ]},"version":0}"#,
        )?;

        assert!(matches!(
            Storefront::load(default_catalog()?, storage),
            Err(StorefrontError::Storage(StorageError::Json(_)))
        ));

        Ok(())
    }

    #[test]
    fn stored_order_without_lines_is_rejected() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.write(
            ORDERS_NAMESPACE,
            r#"{"state":{"orders":[
                {"id":"ABC123XYZ","date":"2024-01-20T00:00:00Z","status":"in_transit","total":45900,"items":[]}
            ]},"version":0}"#,
        )?;

        assert!(matches!(
            Storefront::load(default_catalog()?, storage),
            Err(StorefrontError::Storage(StorageError::Json(_)))
        ));

        Ok(())
    }

    #[test]
    fn write_failures_surface_from_save() -> TestResult {
        let mut storage = MockStateStorage::new();

        storage.expect_read().returning(|_| Ok(None));
        storage
            .expect_write()
            .once()
            .withf(|namespace: &str, _: &str| namespace == CART_NAMESPACE)
            .returning(|_, _| Err(StorageError::Io(std::io::Error::other("disk full"))));

        let mut storefront = Storefront::load(default_catalog()?, storage)?;

        assert!(matches!(
            storefront.save(),
            Err(StorefrontError::Storage(StorageError::Io(_)))
        ));

        Ok(())
    }
}
