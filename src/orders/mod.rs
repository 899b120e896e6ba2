//! Orders

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::CartItem,
    checkout::PaymentMethod,
    pricing::{LineItem, OrderTotals, TotalPriceError, brl},
    products::ProductId,
};

pub mod tracking;

pub use tracking::{Tracking, TrackingStep};

/// Errors that can occur while placing an order.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// Orders must contain at least one line.
    #[error("an order needs at least one item")]
    Empty,

    /// Totals could not be computed.
    #[error(transparent)]
    Price(#[from] TotalPriceError),

    /// Status text did not name a known status.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    /// A stored order had no lines or a line with no units.
    #[error("order {0} has no purchasable lines")]
    MissingItems(OrderId),

    /// Two stored orders shared an id.
    #[error("duplicate order id {0}")]
    DuplicateId(OrderId),
}

/// Opaque order code, e.g. `TXK8H9P2L`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create an order identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Paid and being prepared
    Processing,

    /// Handed over to the carrier
    InTransit,

    /// Received by the customer
    Delivered,

    /// Canceled before delivery
    Canceled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Processing,
        Self::InTransit,
        Self::Delivered,
        Self::Canceled,
    ];

    /// Machine key used on the command line and in storage.
    pub fn key(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Canceled => "canceled",
        }
    }

    /// Customer-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Processing => "Processando",
            Self::InTransit => "Em Trânsito",
            Self::Delivered => "Entregue",
            Self::Canceled => "Cancelado",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "processing" | "processando" => Ok(Self::Processing),
            "in_transit" | "em_transito" | "em_trânsito" => Ok(Self::InTransit),
            "delivered" | "entregue" => Ok(Self::Delivered),
            "canceled" | "cancelled" | "cancelado" => Ok(Self::Canceled),
            _ => Err(OrderError::UnknownStatus(s.to_string())),
        }
    }
}

/// Snapshot of a purchased product, decoupled from the cart and catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product identifier
    pub id: ProductId,

    /// Product name at purchase time
    pub name: String,

    /// Display asset reference
    pub image: String,

    /// Units purchased
    pub quantity: u32,

    /// Unit price in centavos
    pub price: i64,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

impl LineItem for OrderLine {
    fn unit_price_minor(&self) -> i64 {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order code
    pub id: OrderId,

    /// Placement time
    pub date: Timestamp,

    /// Lifecycle status
    pub status: OrderStatus,

    /// Grand total in centavos
    pub total: i64,

    /// Purchased lines, never empty
    pub items: Vec<OrderLine>,

    /// Sum of line totals in centavos, recorded for orders placed at checkout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<i64>,

    /// Shipping fee in centavos, recorded for orders placed at checkout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<i64>,

    /// How the order was paid, recorded for orders placed at checkout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

impl Order {
    /// Build a new order in the processing state, computing its totals from its lines.
    ///
    /// # Errors
    ///
    /// - [`OrderError::Empty`]: no lines were given.
    /// - [`OrderError::Price`]: totals overflowed.
    pub fn place(
        id: OrderId,
        date: Timestamp,
        items: Vec<OrderLine>,
        payment_method: PaymentMethod,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::Empty);
        }

        let totals = OrderTotals::for_items(&items)?;

        Ok(Self {
            id,
            date,
            status: OrderStatus::Processing,
            total: totals.total.to_minor_units(),
            items,
            subtotal: Some(totals.subtotal.to_minor_units()),
            shipping: Some(totals.shipping.to_minor_units()),
            payment_method: Some(payment_method),
        })
    }

    /// Grand total as money.
    pub fn total_money(&self) -> Money<'static, Currency> {
        brl(self.total)
    }

    /// Total units across lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Delivery timeline for this order.
    pub fn tracking(&self) -> Tracking {
        Tracking::for_order(self)
    }
}

#[derive(Deserialize)]
struct OrdersRecord {
    orders: Vec<Order>,
}

impl TryFrom<OrdersRecord> for OrdersStore {
    type Error = OrderError;

    fn try_from(record: OrdersRecord) -> Result<Self, Self::Error> {
        for (idx, order) in record.orders.iter().enumerate() {
            if order.items.is_empty() || order.items.iter().any(|line| line.quantity == 0) {
                return Err(OrderError::MissingItems(order.id.clone()));
            }

            if record.orders.iter().take(idx).any(|seen| seen.id == order.id) {
                return Err(OrderError::DuplicateId(order.id.clone()));
            }
        }

        Ok(Self::new(record.orders))
    }
}

/// Placed orders, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrdersRecord")]
pub struct OrdersStore {
    orders: Vec<Order>,
}

impl OrdersStore {
    /// Create a store holding the given orders, most recent first.
    pub fn new(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    /// Prepend a newly placed order.
    ///
    /// The id must not already be present.
    pub fn add_order(&mut self, order: Order) {
        debug_assert!(
            self.order_by_id(&order.id).is_none(),
            "duplicate order id {}",
            order.id
        );

        self.orders.insert(0, order);
    }

    /// Replace an order's status. Returns whether the order exists.
    pub fn update_order_status(&mut self, id: &OrderId, status: OrderStatus) -> bool {
        match self.orders.iter_mut().find(|order| order.id == *id) {
            Some(order) => {
                order.status = status;
                true
            }
            None => false,
        }
    }

    /// Look up an order by id.
    pub fn order_by_id(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == *id)
    }

    /// Orders whose id contains the term, ignoring case. A blank term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Order> {
        let needle = term.trim().to_lowercase();

        self.orders
            .iter()
            .filter(|order| needle.is_empty() || order.id.as_str().to_lowercase().contains(&needle))
            .collect()
    }

    /// Orders, most recent first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Iterate over orders, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether there are no orders.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn line(id: &str, price: i64, quantity: u32) -> OrderLine {
        OrderLine {
            id: ProductId::from(id),
            name: format!("Produto {id}"),
            image: format!("/images/{id}.png"),
            quantity,
            price,
        }
    }

    fn placed(id: &str) -> Result<Order, OrderError> {
        Order::place(
            OrderId::from(id),
            Timestamp::UNIX_EPOCH,
            vec![line("1", 299_00, 1)],
            PaymentMethod::Credit,
        )
    }

    #[test]
    fn place_computes_totals_with_free_shipping() -> TestResult {
        let order = Order::place(
            OrderId::from("NEW000001"),
            Timestamp::UNIX_EPOCH,
            vec![line("1", 299_00, 1), line("3", 1299_00, 1)],
            PaymentMethod::Pix,
        )?;

        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.subtotal, Some(1598_00));
        assert_eq!(order.shipping, Some(0));
        assert_eq!(order.total, 1598_00);
        assert_eq!(order.payment_method, Some(PaymentMethod::Pix));

        Ok(())
    }

    #[test]
    fn place_charges_flat_shipping_on_small_orders() -> TestResult {
        let order = Order::place(
            OrderId::from("NEW000002"),
            Timestamp::UNIX_EPOCH,
            vec![line("9", 75_00, 2)],
            PaymentMethod::Debit,
        )?;

        assert_eq!(order.shipping, Some(29_90));
        assert_eq!(order.total, 179_90);
        assert_eq!(order.item_count(), 2);

        Ok(())
    }

    #[test]
    fn place_rejects_empty_orders() {
        let result = Order::place(
            OrderId::from("EMPTY"),
            Timestamp::UNIX_EPOCH,
            Vec::new(),
            PaymentMethod::Credit,
        );

        assert_eq!(result, Err(OrderError::Empty));
    }

    #[test]
    fn add_order_prepends() -> TestResult {
        let mut store = OrdersStore::default();

        store.add_order(placed("FIRST")?);
        store.add_order(placed("SECOND")?);

        let ids: Vec<&str> = store.iter().map(|order| order.id.as_str()).collect();

        assert_eq!(ids, ["SECOND", "FIRST"]);

        Ok(())
    }

    #[test]
    fn update_status_only_touches_existing_orders() -> TestResult {
        let mut store = OrdersStore::new(vec![placed("A1")?]);

        assert!(store.update_order_status(&OrderId::from("A1"), OrderStatus::Delivered));
        assert!(!store.update_order_status(&OrderId::from("ZZ"), OrderStatus::Canceled));

        let status = store.order_by_id(&OrderId::from("A1")).map(|order| order.status);

        assert_eq!(status, Some(OrderStatus::Delivered));
        assert_eq!(store.len(), 1);

        Ok(())
    }

    #[test]
    fn restoring_rejects_orders_without_lines() -> TestResult {
        let mut empty = serde_json::to_value(OrdersStore::new(vec![placed("AAA")?]))?;

        if let Some(items) = empty.pointer_mut("/orders/0/items") {
            *items = serde_json::json!([]);
        }

        let duplicated = OrdersStore::new(vec![placed("AAA")?, placed("AAA")?]);

        assert!(
            serde_json::from_value::<OrdersStore>(empty)
                .is_err_and(|err| err.to_string().contains("AAA has no purchasable lines"))
        );
        assert!(
            serde_json::from_value::<OrdersStore>(serde_json::to_value(duplicated)?)
                .is_err_and(|err| err.to_string().contains("duplicate order id AAA"))
        );

        Ok(())
    }

    #[test]
    fn order_by_id_returns_none_for_unknown_ids() {
        let store = OrdersStore::default();

        assert!(store.order_by_id(&OrderId::from("NOPE")).is_none());
    }

    #[test]
    fn search_is_case_insensitive_substring() -> TestResult {
        let store = OrdersStore::new(vec![placed("TXK8H9P2L")?, placed("ABC123XYZ")?]);

        let hits: Vec<&str> = store.search("h9p").iter().map(|o| o.id.as_str()).collect();

        assert_eq!(hits, ["TXK8H9P2L"]);
        assert_eq!(store.search("").len(), 2);
        assert!(store.search("qqq").is_empty());

        Ok(())
    }

    #[test]
    fn status_parses_english_and_portuguese() -> TestResult {
        assert_eq!("in_transit".parse::<OrderStatus>()?, OrderStatus::InTransit);
        assert_eq!("em-transito".parse::<OrderStatus>()?, OrderStatus::InTransit);
        assert_eq!("Entregue".parse::<OrderStatus>()?, OrderStatus::Delivered);
        assert!("lost".parse::<OrderStatus>().is_err());

        Ok(())
    }

    #[test]
    fn status_serializes_as_snake_case() -> TestResult {
        assert_eq!(serde_json::to_string(&OrderStatus::InTransit)?, "\"in_transit\"");

        Ok(())
    }

    #[test]
    fn seeded_style_orders_omit_checkout_fields() -> TestResult {
        let order = Order {
            id: OrderId::from("ABC123XYZ"),
            date: Timestamp::UNIX_EPOCH,
            status: OrderStatus::InTransit,
            total: 459_00,
            items: vec![line("2", 159_00, 1)],
            subtotal: None,
            shipping: None,
            payment_method: None,
        };

        let json = serde_json::to_value(&order)?;

        assert!(json.get("subtotal").is_none());
        assert!(json.get("paymentMethod").is_none());
        assert_eq!(json.get("status"), Some(&serde_json::json!("in_transit")));

        Ok(())
    }
}
