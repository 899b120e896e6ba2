//! Checkout against file-backed state, reloaded between sessions.

use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};
use testresult::TestResult;
use vitrine::{
    checkout::{Address, CheckoutForm, PaymentMethod},
    fixtures::default_catalog,
    orders::OrderStatus,
    products::ProductId,
};
use vitrine_app::{
    address::MockAddressLookup,
    checkout::{CheckoutService, CheckoutSettings, Submission},
    storage::{CART_NAMESPACE, FileStorage, ORDERS_NAMESPACE, StateStorage},
    storefront::Storefront,
};

fn form() -> CheckoutForm {
    CheckoutForm {
        first_name: "Bruno".to_string(),
        last_name: "Lima".to_string(),
        email: "bruno@example.com".to_string(),
        phone: "21988887777".to_string(),
        cpf: "98765432100".to_string(),
        cep: "20040-020".to_string(),
        number: "55".to_string(),
        payment_method: Some(PaymentMethod::Pix),
        ..CheckoutForm::default()
    }
}

#[tokio::test(start_paused = true)]
async fn pix_order_persists_across_sessions() -> TestResult {
    let dir = tempfile::tempdir()?;

    let mut storefront = Storefront::load(default_catalog()?, FileStorage::new(dir.path()))?;

    storefront.add_to_cart(&ProductId::from("19"))?;
    storefront.save()?;

    let mut lookup = MockAddressLookup::new();

    lookup.expect_lookup().once().return_once(|_| {
        Ok(Some(Address {
            street: "Avenida Rio Branco".to_string(),
            neighborhood: "Centro".to_string(),
            city: "Rio de Janeiro".to_string(),
            state: "RJ".to_string(),
        }))
    });

    let service = CheckoutService::new(
        lookup,
        CheckoutSettings {
            processing_delay: Duration::from_millis(500),
            pix_countdown: Duration::from_secs(3),
        },
    );

    let mut form = form();

    assert!(service.autofill_address(&mut form).await);

    let mut storefront = Storefront::load(default_catalog()?, FileStorage::new(dir.path()))?;

    assert_eq!(storefront.cart().len(), 1);

    let submission = service
        .submit(&mut storefront, &form, true, &mut StdRng::seed_from_u64(21))
        .await?;

    let Submission::PixPending(pix) = submission else {
        return Err("expected a pending pix charge".into());
    };

    assert_eq!(pix.payment().amount, 1499_00);

    let id = service.confirm_pix(&mut storefront, pix, |_| {}).await?;

    storefront.save()?;

    let storage = FileStorage::new(dir.path());

    assert!(storage.read(CART_NAMESPACE)?.is_some());
    assert!(storage.read(ORDERS_NAMESPACE)?.is_some());

    let restored = Storefront::load(default_catalog()?, storage)?;
    let order = restored.order(&id)?;

    assert!(restored.cart().is_empty());
    assert_eq!(restored.orders().len(), 3);
    assert_eq!(order.status, OrderStatus::Processing);
    assert_eq!(order.total, 1499_00);
    assert_eq!(order.payment_method, Some(PaymentMethod::Pix));

    Ok(())
}
