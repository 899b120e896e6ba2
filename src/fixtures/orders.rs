//! Order Fixtures

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, products::parse_price},
    orders::{Order, OrderId, OrderLine, OrderStatus},
    products::ProductId,
};

/// Wrapper for orders in YAML
#[derive(Debug, Deserialize)]
pub struct OrdersFixture {
    /// Orders, most recent first
    pub orders: Vec<OrderFixture>,
}

/// Order Fixture
#[derive(Debug, Deserialize)]
pub struct OrderFixture {
    /// Order code
    pub id: String,

    /// Calendar date (midnight UTC) or RFC 3339 timestamp
    pub date: String,

    /// Status key, e.g. `in_transit`
    pub status: String,

    /// Grand total (e.g., "1598.00 BRL")
    pub total: String,

    /// Purchased lines
    pub items: Vec<OrderLineFixture>,
}

/// Order Line Fixture
#[derive(Debug, Deserialize)]
pub struct OrderLineFixture {
    /// Product identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Display asset reference
    pub image: String,

    /// Units purchased
    pub quantity: u32,

    /// Unit price (e.g., "299.00 BRL")
    pub price: String,
}

impl TryFrom<OrderLineFixture> for OrderLine {
    type Error = FixtureError;

    fn try_from(fixture: OrderLineFixture) -> Result<Self, Self::Error> {
        let (price, _currency) = parse_price(&fixture.price)?;

        Ok(OrderLine {
            id: ProductId::new(fixture.id),
            name: fixture.name,
            image: fixture.image,
            quantity: fixture.quantity,
            price,
        })
    }
}

impl TryFrom<OrderFixture> for Order {
    type Error = FixtureError;

    /// Totals are taken as written, not recomputed from the lines.
    fn try_from(fixture: OrderFixture) -> Result<Self, Self::Error> {
        if fixture.items.is_empty() {
            return Err(FixtureError::EmptyOrder(fixture.id));
        }

        let status = fixture
            .status
            .parse::<OrderStatus>()
            .map_err(|_err| FixtureError::InvalidStatus(fixture.status.clone()))?;

        let (total, _currency) = parse_price(&fixture.total)?;

        let items = fixture
            .items
            .into_iter()
            .map(OrderLine::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Order {
            id: OrderId::new(fixture.id),
            date: parse_date(&fixture.date)?,
            status,
            total,
            items,
            subtotal: None,
            shipping: None,
            payment_method: None,
        })
    }
}

/// Parse a calendar date as midnight UTC, or a full timestamp.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidDate`] if the value is neither.
pub fn parse_date(s: &str) -> Result<Timestamp, FixtureError> {
    let s = s.trim();

    if let Ok(timestamp) = s.parse::<Timestamp>() {
        return Ok(timestamp);
    }

    s.parse::<Date>()
        .and_then(|date| date.to_zoned(TimeZone::UTC))
        .map(|zoned| zoned.timestamp())
        .map_err(|_err| FixtureError::InvalidDate(s.to_string()))
}

/// Parse an orders document.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or an order is invalid.
pub fn parse(contents: &str) -> Result<Vec<Order>, FixtureError> {
    let fixture: OrdersFixture = serde_norway::from_str(contents)?;

    fixture.orders.into_iter().map(Order::try_from).collect()
}
