//! Checkout
//!
//! Turns a cart and a filled-in form into an order. The deterministic part
//! lives here: guards, validation, order codes and totals. Waiting for
//! payment happens in the application layer.

use jiff::Timestamp;
use rand::Rng;
use thiserror::Error;

use crate::{
    cart::Cart,
    orders::{Order, OrderError, OrderId, OrderLine},
    pricing::{OrderTotals, TotalPriceError},
};

pub mod form;
pub mod order_id;
pub mod payment;
pub mod pix;

pub use form::{Address, CheckoutForm, FieldError, ValidationErrors};
pub use order_id::generate_order_id;
pub use payment::PaymentMethod;
pub use pix::PixPayment;

/// Errors that stop a checkout.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// The customer did not accept the terms and conditions.
    #[error("Você deve aceitar os termos e condições")]
    TermsNotAccepted,

    /// There is nothing to buy.
    #[error("cart is empty")]
    EmptyCart,

    /// Required fields are missing or malformed.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// Totals could not be computed.
    #[error(transparent)]
    Price(#[from] TotalPriceError),

    /// The order could not be built.
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Where a checkout stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    /// The form is being filled in.
    #[default]
    Editing,

    /// Payment is being processed.
    Processing(OrderId),

    /// Waiting for a PIX transfer.
    PixPending(PixPayment),

    /// The order was placed and the cart emptied.
    Confirmed(OrderId),
}

impl CheckoutState {
    /// The order the checkout is working on, once one was assigned.
    pub fn order_id(&self) -> Option<&OrderId> {
        match self {
            Self::Editing => None,
            Self::Processing(id) | Self::Confirmed(id) => Some(id),
            Self::PixPending(payment) => Some(&payment.order_id),
        }
    }

    /// Whether the checkout finished.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }
}

/// An accepted checkout whose order has an id and totals but is not placed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOrder {
    id: OrderId,
    lines: Vec<OrderLine>,
    totals: OrderTotals,
    payment_method: PaymentMethod,
}

impl PendingOrder {
    /// Check the guards in order (terms, then cart, then fields) and price the cart.
    ///
    /// Nothing is mutated, so a rejected checkout leaves the cart and orders untouched.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::TermsNotAccepted`]: `accept_terms` is false.
    /// - [`CheckoutError::EmptyCart`]: the cart has no lines.
    /// - [`CheckoutError::Invalid`]: required form fields are missing.
    /// - [`CheckoutError::Price`]: the cart total overflowed.
    pub fn prepare<R: Rng + ?Sized>(
        cart: &Cart,
        form: &CheckoutForm,
        accept_terms: bool,
        rng: &mut R,
    ) -> Result<Self, CheckoutError> {
        if !accept_terms {
            return Err(CheckoutError::TermsNotAccepted);
        }

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        form.validate()?;

        let Some(payment_method) = form.payment_method else {
            let mut errors = ValidationErrors::default();
            errors.push("payment_method", "obrigatório");

            return Err(errors.into());
        };

        let lines: Vec<OrderLine> = cart.items().iter().map(OrderLine::from).collect();
        let totals = OrderTotals::from_subtotal(cart.total_price()?)?;

        Ok(Self {
            id: generate_order_id(rng),
            lines,
            totals,
            payment_method,
        })
    }

    /// Assigned order code.
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Lines snapshotted from the cart.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Subtotal, shipping and total.
    pub fn totals(&self) -> &OrderTotals {
        &self.totals
    }

    /// Chosen payment method.
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// The PIX charge to show, when paying by PIX.
    pub fn pix_payment(&self) -> Option<PixPayment> {
        (self.payment_method == PaymentMethod::Pix)
            .then(|| PixPayment::new(self.id.clone(), self.totals.total.to_minor_units()))
    }

    /// Place the order at the given time.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Order`] if the order cannot be built.
    pub fn into_order(self, placed_at: Timestamp) -> Result<Order, CheckoutError> {
        Ok(Order::place(
            self.id,
            placed_at,
            self.lines,
            self.payment_method,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        orders::OrderStatus,
        pricing::brl,
        products::{Product, ProductId},
    };

    use super::*;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("Produto {id}"),
            category: "Hardware".to_string(),
            subcategory: "Monitores".to_string(),
            brand: "LG".to_string(),
            price: brl(price),
            original_price: None,
            rating: Decimal::new(45, 1),
            reviews: 3,
            in_stock: true,
            image: String::new(),
            badge: None,
        }
    }

    fn form(method: PaymentMethod) -> CheckoutForm {
        CheckoutForm {
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            email: "ana@example.com".to_string(),
            phone: "11999999999".to_string(),
            cpf: "00000000000".to_string(),
            cep: "01310100".to_string(),
            street: "Avenida Paulista".to_string(),
            number: "1000".to_string(),
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            payment_method: Some(method),
            card_number: "4111111111111111".to_string(),
            card_name: "ANA SOUZA".to_string(),
            card_expiry: "12/30".to_string(),
            card_cvv: "123".to_string(),
            ..CheckoutForm::default()
        }
    }

    fn cart_with(prices: &[i64]) -> Cart {
        let mut cart = Cart::new();

        for (idx, price) in prices.iter().enumerate() {
            cart.add_item(&product(&idx.to_string(), *price));
        }

        cart
    }

    #[test]
    fn terms_are_checked_before_anything_else() {
        let result = PendingOrder::prepare(
            &Cart::new(),
            &CheckoutForm::default(),
            false,
            &mut StdRng::seed_from_u64(1),
        );

        assert_eq!(result, Err(CheckoutError::TermsNotAccepted));
    }

    #[test]
    fn empty_cart_is_rejected() {
        let result = PendingOrder::prepare(
            &Cart::new(),
            &form(PaymentMethod::Pix),
            true,
            &mut StdRng::seed_from_u64(1),
        );

        assert_eq!(result, Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn missing_fields_are_reported() {
        let result = PendingOrder::prepare(
            &cart_with(&[100_00]),
            &CheckoutForm::default(),
            true,
            &mut StdRng::seed_from_u64(1),
        );

        assert!(matches!(result, Err(CheckoutError::Invalid(errors)) if errors.contains("email")));
    }

    #[test]
    fn totals_include_free_shipping_over_threshold() -> TestResult {
        let pending = PendingOrder::prepare(
            &cart_with(&[299_00, 1299_00]),
            &form(PaymentMethod::Credit),
            true,
            &mut StdRng::seed_from_u64(1),
        )?;

        assert_eq!(pending.totals().subtotal, brl(1598_00));
        assert_eq!(pending.totals().shipping, brl(0));
        assert_eq!(pending.totals().total, brl(1598_00));
        assert_eq!(pending.lines().len(), 2);
        assert!(order_id::is_order_code(pending.id().as_str()));
        assert!(pending.pix_payment().is_none());

        Ok(())
    }

    #[test]
    fn small_cart_pays_shipping() -> TestResult {
        let pending = PendingOrder::prepare(
            &cart_with(&[150_00]),
            &form(PaymentMethod::Debit),
            true,
            &mut StdRng::seed_from_u64(1),
        )?;

        assert_eq!(pending.totals().shipping, brl(29_90));
        assert_eq!(pending.totals().total, brl(179_90));

        Ok(())
    }

    #[test]
    fn pix_checkout_offers_a_charge_for_the_total() -> TestResult {
        let pending = PendingOrder::prepare(
            &cart_with(&[150_00]),
            &form(PaymentMethod::Pix),
            true,
            &mut StdRng::seed_from_u64(1),
        )?;

        let payment = pending.pix_payment().ok_or("expected a PIX charge")?;

        assert_eq!(payment.amount, 179_90);
        assert_eq!(&payment.order_id, pending.id());
        assert!(pix::verify(&payment.code));

        Ok(())
    }

    #[test]
    fn into_order_snapshots_lines_and_totals() -> TestResult {
        let pending = PendingOrder::prepare(
            &cart_with(&[299_00, 1299_00]),
            &form(PaymentMethod::Credit),
            true,
            &mut StdRng::seed_from_u64(9),
        )?;

        let id = pending.id().clone();
        let order = pending.into_order(Timestamp::UNIX_EPOCH)?;

        assert_eq!(order.id, id);
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.total, 1598_00);
        assert_eq!(order.payment_method, Some(PaymentMethod::Credit));

        Ok(())
    }

    #[test]
    fn state_reports_its_order() {
        let id = OrderId::from("TXK8H9P2L");

        assert_eq!(CheckoutState::Editing.order_id(), None);
        assert_eq!(CheckoutState::Processing(id.clone()).order_id(), Some(&id));
        assert!(CheckoutState::Confirmed(id).is_confirmed());
    }
}
