//! Checkout service.
//!
//! Drives a [`PendingOrder`] through the simulated payment: a processing
//! delay for every method, plus a countdown for PIX before the transfer is
//! treated as received.

use std::time::Duration;

use jiff::Timestamp;
use rand::Rng;
use tracing::{debug, info, warn};
use vitrine::{
    checkout::{CheckoutError, CheckoutForm, CheckoutState, PendingOrder, PixPayment},
    orders::OrderId,
};

use crate::{
    address::AddressLookup,
    storage::StateStorage,
    storefront::Storefront,
};

/// Default wait while a payment is "processed".
pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_secs(2);

/// Default time a PIX charge waits before it counts as paid.
pub const DEFAULT_PIX_COUNTDOWN: Duration = Duration::from_secs(10);

/// Simulated latencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Wait after submit, for every payment method.
    pub processing_delay: Duration,

    /// PIX countdown before confirmation.
    pub pix_countdown: Duration,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            processing_delay: DEFAULT_PROCESSING_DELAY,
            pix_countdown: DEFAULT_PIX_COUNTDOWN,
        }
    }
}

/// A PIX charge waiting for its countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct PixCheckout {
    pending: PendingOrder,
    payment: PixPayment,
}

impl PixCheckout {
    /// The charge shown to the customer.
    pub fn payment(&self) -> &PixPayment {
        &self.payment
    }

    /// The order that will be placed once paid.
    pub fn pending(&self) -> &PendingOrder {
        &self.pending
    }
}

/// Outcome of a submitted checkout.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The order was placed and the cart emptied.
    Confirmed(OrderId),

    /// Waiting for a PIX transfer; nothing was placed yet.
    PixPending(PixCheckout),
}

impl Submission {
    /// The matching checkout state.
    pub fn state(&self) -> CheckoutState {
        match self {
            Self::Confirmed(id) => CheckoutState::Confirmed(id.clone()),
            Self::PixPending(pix) => CheckoutState::PixPending(pix.payment.clone()),
        }
    }
}

/// Checkout orchestration over an address lookup collaborator.
#[derive(Debug)]
pub struct CheckoutService<A> {
    lookup: A,
    settings: CheckoutSettings,
}

impl<A: AddressLookup> CheckoutService<A> {
    /// Create a service.
    pub fn new(lookup: A, settings: CheckoutSettings) -> Self {
        Self { lookup, settings }
    }

    /// Configured latencies.
    pub fn settings(&self) -> CheckoutSettings {
        self.settings
    }

    /// Fill the address from the form's CEP, when it has eight digits.
    ///
    /// Lookup failures and unknown codes leave the form untouched. Returns whether
    /// the address was filled in.
    pub async fn autofill_address(&self, form: &mut CheckoutForm) -> bool {
        let Some(cep) = form.cep_digits() else {
            return false;
        };

        match self.lookup.lookup(&cep).await {
            Ok(Some(address)) => {
                debug!(%cep, city = %address.city, "address found for cep");

                form.apply_address(address);

                true
            }
            Ok(None) => {
                debug!(%cep, "cep not found");

                false
            }
            Err(error) => {
                warn!(%cep, %error, "address lookup failed");

                false
            }
        }
    }

    /// Submit the checkout.
    ///
    /// Rejected checkouts return before any waiting and leave the storefront
    /// untouched. Card payments place the order after the processing delay; PIX
    /// payments return a pending charge for [`Self::confirm_pix`].
    ///
    /// # Errors
    ///
    /// Returns the first failing guard: terms, empty cart, then form validation.
    pub async fn submit<S, R>(
        &self,
        storefront: &mut Storefront<S>,
        form: &CheckoutForm,
        accept_terms: bool,
        rng: &mut R,
    ) -> Result<Submission, CheckoutError>
    where
        S: StateStorage,
        R: Rng + ?Sized,
    {
        let pending = PendingOrder::prepare(storefront.cart(), form, accept_terms, rng)
            .inspect_err(|error| debug!(%error, "checkout rejected"))?;

        info!(
            order_id = %pending.id(),
            payment_method = %pending.payment_method(),
            total = pending.totals().total.to_minor_units(),
            "processing payment"
        );

        tokio::time::sleep(self.settings.processing_delay).await;

        if let Some(payment) = pending.pix_payment() {
            info!(order_id = %payment.order_id, "awaiting pix transfer");

            return Ok(Submission::PixPending(PixCheckout { pending, payment }));
        }

        let order = pending.into_order(Timestamp::now())?;
        let id = order.id.clone();

        storefront.place_order(order);

        Ok(Submission::Confirmed(id))
    }

    /// Wait out the PIX countdown, then place the order and empty the cart.
    ///
    /// `on_tick` is called once per second with the time remaining.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Order`] if the order cannot be built.
    pub async fn confirm_pix<S: StateStorage>(
        &self,
        storefront: &mut Storefront<S>,
        pix: PixCheckout,
        mut on_tick: impl FnMut(Duration),
    ) -> Result<OrderId, CheckoutError> {
        let tick = Duration::from_secs(1);
        let mut remaining = self.settings.pix_countdown;

        while !remaining.is_zero() {
            on_tick(remaining);

            let step = remaining.min(tick);

            tokio::time::sleep(step).await;
            remaining = remaining.saturating_sub(step);
        }

        info!(order_id = %pix.payment.order_id, "pix transfer received");

        let order = pix.pending.into_order(Timestamp::now())?;
        let id = order.id.clone();

        storefront.place_order(order);

        Ok(id)
    }
}
