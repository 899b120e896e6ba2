//! Products

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::pricing::minor_to_decimal;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Stable product identifier, unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Display name of the category the product is listed under
    pub category: String,

    /// Subcategory within the category
    pub subcategory: String,

    /// Brand name
    pub brand: String,

    /// Current selling price
    pub price: Money<'static, Currency>,

    /// Price before discount, never below `price`
    pub original_price: Option<Money<'static, Currency>>,

    /// Average rating between 0 and 5
    pub rating: Decimal,

    /// Number of reviews
    pub reviews: u32,

    /// Whether the product can currently be shipped
    pub in_stock: bool,

    /// Display asset reference
    pub image: String,

    /// Optional merchandising label
    pub badge: Option<String>,
}

impl Product {
    /// Selling price in reais, for range comparisons.
    pub fn price_amount(&self) -> Decimal {
        minor_to_decimal(self.price.to_minor_units())
    }

    /// Whole-percent discount against the original price, if discounted.
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?.to_minor_units();
        let price = self.price.to_minor_units();

        if original <= price || original == 0 {
            return None;
        }

        let off = (original - price).checked_mul(100)?;
        let rounded = (off + original / 2) / original;

        u32::try_from(rounded).ok()
    }
}
