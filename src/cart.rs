//! Cart

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    pricing::{LineItem, TotalPriceError, brl, total_price},
    products::{Product, ProductId},
};

/// A product selected for purchase, with a price snapshot taken when it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price in centavos
    pub price: i64,

    /// Pre-discount unit price in centavos
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<i64>,

    /// Display asset reference
    pub image: String,

    /// Category display name
    pub category: String,

    /// Units selected, always positive
    pub quantity: u32,
}

impl CartItem {
    /// Snapshot a product into a new line with quantity 1.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price.to_minor_units(),
            original_price: product.original_price.map(|price| price.to_minor_units()),
            image: product.image.clone(),
            category: product.category.clone(),
            quantity: 1,
        }
    }

    /// Unit price as money.
    pub fn unit_price(&self) -> Money<'static, Currency> {
        brl(self.price)
    }
}

impl LineItem for CartItem {
    fn unit_price_minor(&self) -> i64 {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Errors found while restoring a stored cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A line had no units.
    #[error("cart line {0} has a zero quantity")]
    ZeroQuantity(ProductId),

    /// Two lines shared a product id.
    #[error("cart has more than one line for product {0}")]
    DuplicateItem(ProductId),
}

#[derive(Deserialize)]
struct CartRecord {
    items: Vec<CartItem>,
}

impl TryFrom<CartRecord> for Cart {
    type Error = CartError;

    fn try_from(record: CartRecord) -> Result<Self, Self::Error> {
        for (idx, item) in record.items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(CartError::ZeroQuantity(item.id.clone()));
            }

            if record.items.iter().take(idx).any(|seen| seen.id == item.id) {
                return Err(CartError::DuplicateItem(item.id.clone()));
            }
        }

        Ok(Self {
            items: record.items,
            open: false,
        })
    }
}

/// Line items selected for purchase.
///
/// Holds at most one line per product id and never a line with a zero quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CartRecord")]
pub struct Cart {
    items: Vec<CartItem>,

    #[serde(skip)]
    open: bool,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product, merging with an existing line.
    ///
    /// Returns the line's quantity after the add.
    pub fn add_item(&mut self, product: &Product) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);

            return item.quantity;
        }

        self.items.push(CartItem::from_product(product));

        1
    }

    /// Remove a line; absent ids are ignored.
    pub fn remove_item(&mut self, id: &ProductId) {
        self.items.retain(|item| item.id != *id);
    }

    /// Set a line's quantity; zero or less removes the line, absent ids are ignored.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|item| item.id == *id) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of unit price times quantity over every line.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if the total overflows.
    pub fn total_price(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        total_price(&self.items)
    }

    /// Amount saved against original prices.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if the total overflows.
    pub fn savings(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        self.items.iter().try_fold(brl(0), |acc, item| {
            let Some(original) = item.original_price else {
                return Ok(acc);
            };

            let saved = original
                .saturating_sub(item.price)
                .max(0)
                .checked_mul(i64::from(item.quantity))
                .ok_or(TotalPriceError::Overflow)?;

            Ok(acc.add(brl(saved))?)
        })
    }

    /// Total units across lines, for the cart badge.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Get a line by product id.
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Lines in the order they were first added.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the cart panel is shown. Not persisted.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Show or hide the cart panel.
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }
}

/// Receives the cart after every mutation.
pub trait CartObserver {
    /// Called with the cart's new contents.
    fn cart_changed(&mut self, cart: &Cart);
}

/// A [`Cart`] that notifies observers whenever its contents change.
#[derive(Default)]
pub struct CartStore {
    cart: Cart,
    observers: Vec<Box<dyn CartObserver + Send>>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CartStore {
    /// Wrap an existing cart.
    pub fn new(cart: Cart) -> Self {
        Self {
            cart,
            observers: Vec::new(),
        }
    }

    /// Register an observer.
    pub fn subscribe(&mut self, observer: Box<dyn CartObserver + Send>) {
        self.observers.push(observer);
    }

    /// Current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// See [`Cart::add_item`].
    pub fn add_item(&mut self, product: &Product) -> u32 {
        let quantity = self.cart.add_item(product);

        self.notify();

        quantity
    }

    /// See [`Cart::remove_item`].
    pub fn remove_item(&mut self, id: &ProductId) {
        self.cart.remove_item(id);
        self.notify();
    }

    /// See [`Cart::set_quantity`].
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) {
        self.cart.set_quantity(id, quantity);
        self.notify();
    }

    /// See [`Cart::clear`].
    pub fn clear(&mut self) {
        self.cart.clear();
        self.notify();
    }

    /// See [`Cart::set_open`].
    pub fn set_open(&mut self, open: bool) {
        self.cart.set_open(open);
    }

    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer.cart_changed(&self.cart);
        }
    }
}
