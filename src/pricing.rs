//! Prices

use rust_decimal::Decimal;
use rusty_money::{
    Money, MoneyError,
    iso::{BRL, Currency},
};
use thiserror::Error;

/// Subtotals strictly above this amount (in centavos) ship for free.
pub const FREE_SHIPPING_THRESHOLD: i64 = 299_00;

/// Flat shipping fee (in centavos) charged at or below the free shipping threshold.
pub const FLAT_SHIPPING_FEE: i64 = 29_90;

/// Errors that can occur while calculating total price.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// A line total or running sum did not fit in minor units.
    #[error("price overflow while totalling line items")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Something priced per unit and bought in some quantity.
pub trait LineItem {
    /// Unit price in centavos.
    fn unit_price_minor(&self) -> i64;

    /// Number of units.
    fn quantity(&self) -> u32;
}

/// Build a store-currency amount from centavos.
pub fn brl(minor_units: i64) -> Money<'static, Currency> {
    Money::from_minor(minor_units, BRL)
}

/// Convert centavos to a decimal amount in reais.
pub fn minor_to_decimal(minor_units: i64) -> Decimal {
    Decimal::new(minor_units, 2)
}

/// Price of a single line: unit price times quantity.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if the product does not fit in minor units.
pub fn line_total(item: &impl LineItem) -> Result<Money<'static, Currency>, TotalPriceError> {
    item.unit_price_minor()
        .checked_mul(i64::from(item.quantity()))
        .map(brl)
        .ok_or(TotalPriceError::Overflow)
}

/// Calculates the total price of a list of line items.
///
/// An empty list totals zero.
///
/// # Errors
///
/// - [`TotalPriceError::Overflow`]: a line total does not fit in minor units.
/// - [`TotalPriceError::Money`]: wrapped money arithmetic error.
pub fn total_price<L: LineItem>(items: &[L]) -> Result<Money<'static, Currency>, TotalPriceError> {
    items
        .iter()
        .try_fold(brl(0), |acc, item| Ok(acc.add(line_total(item)?)?))
}

/// Shipping fee for a given subtotal.
pub fn shipping_for(subtotal: &Money<'static, Currency>) -> Money<'static, Currency> {
    if subtotal.to_minor_units() > FREE_SHIPPING_THRESHOLD {
        brl(0)
    } else {
        brl(FLAT_SHIPPING_FEE)
    }
}

/// Subtotal, shipping and grand total for an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    /// Sum of line totals.
    pub subtotal: Money<'static, Currency>,

    /// Shipping fee derived from the subtotal.
    pub shipping: Money<'static, Currency>,

    /// Subtotal plus shipping.
    pub total: Money<'static, Currency>,
}

impl OrderTotals {
    /// Compute totals from a subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if adding shipping fails.
    pub fn from_subtotal(subtotal: Money<'static, Currency>) -> Result<Self, TotalPriceError> {
        let shipping = shipping_for(&subtotal);
        let total = subtotal.add(shipping)?;

        Ok(Self {
            subtotal,
            shipping,
            total,
        })
    }

    /// Compute totals for a list of line items.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] on overflow or money arithmetic errors.
    pub fn for_items<L: LineItem>(items: &[L]) -> Result<Self, TotalPriceError> {
        Self::from_subtotal(total_price(items)?)
    }

    /// Whether the order qualifies for free shipping.
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.to_minor_units() == 0
    }
}

/// Format centavos the way the storefront displays prices, e.g. `R$ 1.598,00`.
pub fn format_brl(minor_units: i64) -> String {
    format_money(&brl(minor_units))
}

/// Format a store-currency amount, e.g. `R$ 29,90`.
///
/// Uses the currency's own grouping and separators, with a space after the symbol.
pub fn format_money(money: &Money<'static, Currency>) -> String {
    let symbol = money.currency().symbol;

    money.to_string().replacen(symbol, &format!("{symbol} "), 1)
}
