//! Checkout Session

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
    time::{Duration, Instant},
};

use jiff::Timestamp;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    domain::{
        carts::Cart,
        checkout::{
            errors::CheckoutError,
            models::{CheckoutStep, Field, FormData, Identity, OrderStatus},
            payment::{PaymentAuthorization, PaymentAuthorizer, PaymentDetails},
            retry::RetryPolicy,
            validation::{validate_step, validate_through},
        },
        customers::models::{LeadStatus, NewCompletedCustomer, NewLead},
        orders::models::{FulfilmentStatus, NewOrder, OrderId, OrderItem, order_number},
    },
    gateway::StoreGateway,
};

/// Confirmation handed back after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub order_number: String,
    /// Charged total in minor units.
    pub total: u64,
    pub item_count: u64,
    /// Time from submission to confirmation.
    pub elapsed: Duration,
}

/// A charge already approved for this session.
#[derive(Debug, Clone)]
struct AuthorizedCharge {
    amount: u64,
    details: PaymentDetails,
    authorization: PaymentAuthorization,
}

/// One shopper's pass through the Contact, Address and Payment steps.
pub struct CheckoutSession {
    gateway: Arc<dyn StoreGateway>,
    payments: Arc<dyn PaymentAuthorizer>,
    retry: RetryPolicy,
    step: CheckoutStep,
    form: FormData,
    status: OrderStatus,
    user_id: Option<String>,
    idempotency_key: Uuid,
    lead_captured: bool,
    charge: Option<AuthorizedCharge>,
}

impl CheckoutSession {
    /// Start at the contact step, pre-filled from `identity` when signed in.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn StoreGateway>,
        payments: Arc<dyn PaymentAuthorizer>,
        retry: RetryPolicy,
        identity: Option<&Identity>,
    ) -> Self {
        Self {
            gateway,
            payments,
            retry,
            step: CheckoutStep::Contact,
            form: identity.map_or_else(FormData::new, FormData::from_identity),
            status: OrderStatus::InProgress,
            user_id: identity.map(|identity| identity.uid.clone()),
            idempotency_key: Uuid::now_v7(),
            lead_captured: false,
            charge: None,
        }
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn status(&self) -> &OrderStatus {
        &self.status
    }

    /// Key sent with every order write of this session.
    pub fn idempotency_key(&self) -> Uuid {
        self.idempotency_key
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.status, OrderStatus::Complete { .. })
    }

    /// Whether a submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.step == CheckoutStep::Payment
            && matches!(
                self.status,
                OrderStatus::InProgress | OrderStatus::Failed { .. }
            )
    }

    /// Whether the current step's guard passes and there is a step after it.
    pub fn can_advance(&self) -> bool {
        !self.is_complete()
            && self.step.next().is_some()
            && validate_step(self.step, &self.form).is_ok()
    }

    /// Update one form field. Navigation never clears values.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyComplete`] once the order is placed.
    pub fn set_field(
        &mut self,
        field: Field,
        value: impl Into<String>,
    ) -> Result<(), CheckoutError> {
        if self.is_complete() {
            return Err(CheckoutError::AlreadyComplete);
        }

        self.form.set(field, value);

        Ok(())
    }

    /// Move to the next step if the current step's guard passes.
    ///
    /// Leaving the contact step for the first time records a lead.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] when the guard fails, there is no next
    /// step, or the order is already placed.
    pub async fn advance(&mut self) -> Result<CheckoutStep, CheckoutError> {
        if self.is_complete() {
            return Err(CheckoutError::AlreadyComplete);
        }

        let next = self.step.next().ok_or(CheckoutError::NoNextStep)?;

        validate_step(self.step, &self.form)?;

        if self.step == CheckoutStep::Contact && !self.lead_captured {
            self.lead_captured = true;
            self.capture_lead().await;
        }

        debug!(from = %self.step, to = %next, "checkout step advanced");

        self.step = next;

        Ok(next)
    }

    /// Move to the previous step. Does nothing on the first step or once the
    /// order is placed.
    pub fn back(&mut self) -> CheckoutStep {
        if self.is_complete() {
            return self.step;
        }

        if let Some(previous) = self.step.previous() {
            debug!(from = %self.step, to = %previous, "checkout step back");

            self.step = previous;
        }

        self.step
    }

    /// Authorize payment, write the order and clear `cart`.
    ///
    /// On failure the cart and form are left untouched and the session may
    /// submit again. A resubmission for the same amount and card reuses the
    /// earlier authorization instead of charging again.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] when a guard fails, the cart is empty,
    /// payment is declined or the order cannot be written.
    pub async fn submit(&mut self, cart: &mut Cart) -> Result<OrderReceipt, CheckoutError> {
        if self.is_complete() {
            return Err(CheckoutError::AlreadyComplete);
        }

        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::NotAtPayment(self.step));
        }

        validate_through(CheckoutStep::Payment, &self.form)?;

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.status = OrderStatus::Submitting;

        let started_at = Instant::now();
        let total = cart.total();
        let details = PaymentDetails::from_form(&self.form);

        let authorization = match self.authorize(details, total).await {
            Ok(authorization) => authorization,
            Err(source) => return Err(self.fail(source)),
        };

        let order = NewOrder {
            idempotency_key: self.idempotency_key,
            user_id: self.user_id.clone(),
            customer: self.form.customer(),
            shipping_address: self.form.shipping_address(),
            items: cart
                .items()
                .iter()
                .map(|line| OrderItem {
                    product_id: line.product.id.clone(),
                    name: line.product.name.clone(),
                    price: line.product.price,
                    quantity: line.quantity,
                    image: line.product.thumbnail().map(str::to_string),
                })
                .collect(),
            total,
            status: FulfilmentStatus::Pending,
            payment_status: authorization.status,
            payment_reference: authorization.reference,
            created_at: Timestamp::now(),
        };

        let gateway = Arc::clone(&self.gateway);

        let created = self
            .retry
            .run("create_order", || {
                let gateway = Arc::clone(&gateway);
                let order = order.clone();

                async move { gateway.create_order(order).await }
            })
            .await;

        let order_id = match created {
            Ok(order_id) => order_id,
            Err(source) => return Err(self.fail(source.into())),
        };

        self.record_customer(&order_id, &order).await;

        let receipt = OrderReceipt {
            order_number: order_number(&order_id),
            order_id: order_id.clone(),
            total,
            item_count: cart.count(),
            elapsed: started_at.elapsed(),
        };

        cart.clear_cart();

        self.status = OrderStatus::Complete { order_id };

        info!(
            order = %receipt.order_number,
            total = receipt.total,
            items = receipt.item_count,
            "order placed"
        );

        Ok(receipt)
    }

    async fn authorize(
        &mut self,
        details: PaymentDetails,
        amount: u64,
    ) -> Result<PaymentAuthorization, CheckoutError> {
        let earlier = self
            .charge
            .as_ref()
            .filter(|charge| charge.amount == amount && charge.details == details);

        if let Some(charge) = earlier {
            debug!("reusing earlier payment authorization");

            return Ok(charge.authorization.clone());
        }

        let authorization = self
            .payments
            .authorize(&details, amount)
            .await
            .map_err(CheckoutError::PaymentDeclined)?;

        self.charge = Some(AuthorizedCharge {
            amount,
            details,
            authorization: authorization.clone(),
        });

        Ok(authorization)
    }

    async fn capture_lead(&self) {
        let lead = NewLead {
            contact: self.form.customer(),
            step: self.step,
            status: LeadStatus::Incomplete,
            created_at: Timestamp::now(),
        };

        match timeout(self.retry.attempt_timeout, self.gateway.create_lead(lead)).await {
            Ok(Ok(())) => debug!("lead captured"),
            Ok(Err(source)) => warn!("failed to capture lead: {source}"),
            Err(_elapsed) => warn!("lead capture timed out"),
        }
    }

    async fn record_customer(&self, order_id: &OrderId, order: &NewOrder) {
        if order.customer.email.is_empty() {
            debug!("no email on order, skipping customer record");

            return;
        }

        let customer = NewCompletedCustomer {
            contact: order.customer.clone(),
            address: order.shipping_address.clone(),
            order_id: order_id.clone(),
            user_id: order.user_id.clone(),
            status: LeadStatus::Completed,
            created_at: Timestamp::now(),
        };

        match timeout(
            self.retry.attempt_timeout,
            self.gateway.create_completed_customer(customer),
        )
        .await
        {
            Ok(Ok(())) => debug!("customer recorded"),
            Ok(Err(source)) => warn!("failed to record customer: {source}"),
            Err(_elapsed) => warn!("customer record timed out"),
        }
    }

    fn fail(&mut self, error: CheckoutError) -> CheckoutError {
        error!("order submission failed: {error}");

        self.status = OrderStatus::Failed {
            reason: error.to_string(),
        };

        error
    }
}

impl Debug for CheckoutSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CheckoutSession")
            .field("step", &self.step)
            .field("status", &self.status)
            .field("form", &self.form)
            .field("idempotency_key", &self.idempotency_key)
            .field("lead_captured", &self.lead_captured)
            .field("charge", &self.charge)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, OnceLock,
        atomic::{AtomicUsize, Ordering},
    };

    use testresult::TestResult;

    use super::*;
    use crate::{
        domain::{
            checkout::payment::{MockPaymentAuthorizer, PaymentError, SimulatedPayments},
            orders::models::PaymentStatus,
        },
        gateway::{GatewayError, MockStoreGateway},
        test::helpers::{fill_checkout_form, product},
    };

    fn session(gateway: MockStoreGateway) -> CheckoutSession {
        CheckoutSession::new(
            Arc::new(gateway),
            Arc::new(SimulatedPayments),
            RetryPolicy::single_attempt(Duration::from_secs(1)),
            None,
        )
    }

    fn cart_with_items() -> TestResult<Cart> {
        let mut cart = Cart::new();

        cart.add_to_cart(&product("A", 100), 2)?;
        cart.add_to_cart(&product("B", 250), 1)?;

        Ok(cart)
    }

    async fn walk_to_payment(session: &mut CheckoutSession) -> TestResult {
        fill_checkout_form(session)?;

        session.advance().await?;
        session.advance().await?;

        assert_eq!(session.step(), CheckoutStep::Payment);

        Ok(())
    }

    #[tokio::test]
    async fn starts_on_contact_with_identity_prefill() {
        let identity = Identity {
            uid: "user-1".to_string(),
            email: Some("ali@example.com".to_string()),
            display_name: Some("Ali Veli".to_string()),
        };

        let session = CheckoutSession::new(
            Arc::new(MockStoreGateway::new()),
            Arc::new(SimulatedPayments),
            RetryPolicy::default(),
            Some(&identity),
        );

        assert_eq!(session.step(), CheckoutStep::Contact);
        assert_eq!(session.status(), &OrderStatus::InProgress);
        assert_eq!(session.form().get(Field::FirstName), "Ali");
        assert_eq!(session.form().get(Field::Email), "ali@example.com");
    }

    #[tokio::test]
    async fn empty_contact_fields_block_advancing_without_touching_the_store() -> TestResult {
        let mut gateway = MockStoreGateway::new();

        gateway.expect_create_lead().never();

        let mut session = session(gateway);

        session.set_field(Field::FirstName, "Zeynep")?;
        session.set_field(Field::LastName, "  ")?;
        session.set_field(Field::Phone, "05550000000")?;

        assert!(!session.can_advance());

        let result = session.advance().await;

        assert!(
            matches!(&result, Err(CheckoutError::Validation(error)) if error.missing.as_slice() == [Field::LastName]),
            "expected missing last name, got {result:?}"
        );
        assert_eq!(session.step(), CheckoutStep::Contact);

        Ok(())
    }

    #[tokio::test]
    async fn lead_is_captured_once_across_back_and_forward() -> TestResult {
        let mut gateway = MockStoreGateway::new();

        gateway
            .expect_create_lead()
            .withf(|lead| lead.status == LeadStatus::Incomplete && lead.step == CheckoutStep::Contact)
            .times(1)
            .returning(|_| Ok(()));

        let mut session = session(gateway);

        fill_checkout_form(&mut session)?;

        session.advance().await?;
        session.back();
        session.advance().await?;
        session.back();
        session.advance().await?;

        assert_eq!(session.step(), CheckoutStep::Address);

        Ok(())
    }

    #[tokio::test]
    async fn lead_failures_do_not_block_checkout() -> TestResult {
        let mut gateway = MockStoreGateway::new();

        gateway
            .expect_create_lead()
            .times(1)
            .returning(|_| Err(GatewayError::Unavailable("offline".to_string())));

        let mut session = session(gateway);

        fill_checkout_form(&mut session)?;

        assert_eq!(session.advance().await?, CheckoutStep::Address);

        Ok(())
    }

    #[tokio::test]
    async fn back_navigation_keeps_entered_values() -> TestResult {
        let mut gateway = MockStoreGateway::new();

        gateway.expect_create_lead().returning(|_| Ok(()));

        let mut session = session(gateway);

        walk_to_payment(&mut session).await?;

        session.back();
        session.back();

        assert_eq!(session.back(), CheckoutStep::Contact);
        assert_eq!(session.form().get(Field::City), "Istanbul");
        assert_eq!(session.form().get(Field::CardName), "Ayse Yilmaz");

        Ok(())
    }

    #[tokio::test]
    async fn advancing_past_payment_is_refused() -> TestResult {
        let mut gateway = MockStoreGateway::new();

        gateway.expect_create_lead().returning(|_| Ok(()));

        let mut session = session(gateway);

        walk_to_payment(&mut session).await?;

        let result = session.advance().await;

        assert!(
            matches!(result, Err(CheckoutError::NoNextStep)),
            "expected NoNextStep, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn submitting_before_payment_is_refused() -> TestResult {
        let mut session = session(MockStoreGateway::new());
        let mut cart = cart_with_items()?;

        let result = session.submit(&mut cart).await;

        assert!(
            matches!(result, Err(CheckoutError::NotAtPayment(CheckoutStep::Contact))),
            "expected NotAtPayment, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn submit_rechecks_earlier_steps() -> TestResult {
        let mut gateway = MockStoreGateway::new();

        gateway.expect_create_lead().returning(|_| Ok(()));
        gateway.expect_create_order().never();

        let mut session = session(gateway);
        let mut cart = cart_with_items()?;

        walk_to_payment(&mut session).await?;

        session.set_field(Field::Phone, "")?;

        let result = session.submit(&mut cart).await;

        assert!(
            matches!(&result, Err(CheckoutError::Validation(error)) if error.step == CheckoutStep::Contact),
            "expected contact validation failure, got {result:?}"
        );
        assert_eq!(session.status(), &OrderStatus::InProgress);

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_cannot_be_submitted() -> TestResult {
        let mut gateway = MockStoreGateway::new();

        gateway.expect_create_lead().returning(|_| Ok(()));
        gateway.expect_create_order().never();

        let mut session = session(gateway);

        walk_to_payment(&mut session).await?;

        let result = session.submit(&mut Cart::new()).await;

        assert!(
            matches!(result, Err(CheckoutError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn successful_submission_snapshots_cart_and_clears_it() -> TestResult {
        let mut gateway = MockStoreGateway::new();

        gateway.expect_create_lead().returning(|_| Ok(()));
        gateway
            .expect_create_order()
            .withf(|order| {
                order.total == 450
                    && order.items.len() == 2
                    && order.status == FulfilmentStatus::Pending
                    && order.customer.first_name == "Ayse"
                    && order.shipping_address.city == "Istanbul"
            })
            .times(1)
            .returning(|_| Ok(OrderId::new("0192abcdef")));
        gateway
            .expect_create_completed_customer()
            .withf(|customer| {
                customer.order_id.as_str() == "0192abcdef"
                    && customer.status == LeadStatus::Completed
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut session = session(gateway);
        let mut cart = cart_with_items()?;

        walk_to_payment(&mut session).await?;

        let receipt = session.submit(&mut cart).await?;

        assert_eq!(receipt.order_number, "0192ABCD");
        assert_eq!(receipt.total, 450);
        assert_eq!(receipt.item_count, 3);
        assert!(cart.is_empty());
        assert!(!session.can_submit());
        assert_eq!(
            session.status(),
            &OrderStatus::Complete {
                order_id: OrderId::new("0192abcdef"),
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn customer_record_is_skipped_without_email() -> TestResult {
        let mut gateway = MockStoreGateway::new();

        gateway.expect_create_lead().returning(|_| Ok(()));
        gateway
            .expect_create_order()
            .returning(|_| Ok(OrderId::new("order-1")));
        gateway.expect_create_completed_customer().never();

        let mut session = session(gateway);
        let mut cart = cart_with_items()?;

        walk_to_payment(&mut session).await?;

        session.set_field(Field::Email, "")?;
        session.submit(&mut cart).await?;

        Ok(())
    }

    #[tokio::test]
    async fn customer_record_failure_still_completes_the_order() -> TestResult {
        let mut gateway = MockStoreGateway::new();

        gateway.expect_create_lead().returning(|_| Ok(()));
        gateway
            .expect_create_order()
            .returning(|_| Ok(OrderId::new("order-1")));
        gateway
            .expect_create_completed_customer()
            .returning(|_| Err(GatewayError::Rejected("duplicate".to_string())));

        let mut session = session(gateway);
        let mut cart = cart_with_items()?;

        walk_to_payment(&mut session).await?;

        session.submit(&mut cart).await?;

        assert!(session.is_complete());
        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn rejected_order_keeps_cart_and_resubmission_succeeds() -> TestResult {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut gateway = MockStoreGateway::new();

        gateway.expect_create_lead().returning(|_| Ok(()));
        gateway
            .expect_create_order()
            .times(2)
            .returning(move |_| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(GatewayError::Rejected("write refused".to_string()))
                } else {
                    Ok(OrderId::new("order-2"))
                }
            });
        gateway
            .expect_create_completed_customer()
            .times(1)
            .returning(|_| Ok(()));

        let mut session = session(gateway);
        let mut cart = cart_with_items()?;

        walk_to_payment(&mut session).await?;

        let first = session.submit(&mut cart).await;

        assert!(
            matches!(first, Err(CheckoutError::Submission(GatewayError::Rejected(_)))),
            "expected Submission error, got {first:?}"
        );
        assert!(matches!(session.status(), OrderStatus::Failed { .. }));
        assert_eq!(cart.count(), 3);
        assert_eq!(cart.total(), 450);
        assert!(session.can_submit());

        let receipt = session.submit(&mut cart).await?;

        assert_eq!(receipt.order_id, OrderId::new("order-2"));
        assert!(cart.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        Ok(())
    }

    fn counting_payments(charges: &Arc<AtomicUsize>) -> MockPaymentAuthorizer {
        let counter = Arc::clone(charges);
        let mut payments = MockPaymentAuthorizer::new();

        payments.expect_authorize().returning(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);

            Ok(PaymentAuthorization {
                status: PaymentStatus::Paid,
                reference: Some("auth-1".to_string()),
            })
        });

        payments
    }

    #[tokio::test]
    async fn resubmitting_after_a_failed_write_charges_once() -> TestResult {
        let charges = Arc::new(AtomicUsize::new(0));
        let writes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&writes);

        let mut gateway = MockStoreGateway::new();

        gateway.expect_create_lead().returning(|_| Ok(()));
        gateway
            .expect_create_order()
            .times(2)
            .returning(move |order| {
                assert_eq!(order.payment_reference.as_deref(), Some("auth-1"));

                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(GatewayError::Rejected("write refused".to_string()))
                } else {
                    Ok(OrderId::new("order-4"))
                }
            });
        gateway
            .expect_create_completed_customer()
            .returning(|_| Ok(()));

        let mut session = CheckoutSession::new(
            Arc::new(gateway),
            Arc::new(counting_payments(&charges)),
            RetryPolicy::single_attempt(Duration::from_secs(1)),
            None,
        );
        let mut cart = cart_with_items()?;

        walk_to_payment(&mut session).await?;

        assert!(session.submit(&mut cart).await.is_err());

        session.submit(&mut cart).await?;

        assert_eq!(charges.load(Ordering::SeqCst), 1);
        assert_eq!(writes.load(Ordering::SeqCst), 2);

        Ok(())
    }

    #[tokio::test]
    async fn changed_cart_total_is_authorized_again() -> TestResult {
        let charges = Arc::new(AtomicUsize::new(0));

        let mut gateway = MockStoreGateway::new();

        gateway.expect_create_lead().returning(|_| Ok(()));
        gateway
            .expect_create_order()
            .returning(|_| Err(GatewayError::Rejected("write refused".to_string())));

        let mut session = CheckoutSession::new(
            Arc::new(gateway),
            Arc::new(counting_payments(&charges)),
            RetryPolicy::single_attempt(Duration::from_secs(1)),
            None,
        );
        let mut cart = cart_with_items()?;

        walk_to_payment(&mut session).await?;

        assert!(session.submit(&mut cart).await.is_err());

        cart.add_to_cart(&product("C", 75), 1)?;

        assert!(session.submit(&mut cart).await.is_err());
        assert_eq!(charges.load(Ordering::SeqCst), 2);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_retry_with_the_same_idempotency_key() -> TestResult {
        let calls = Arc::new(AtomicUsize::new(0));
        let first_key = Arc::new(OnceLock::new());
        let counter = Arc::clone(&calls);
        let key = Arc::clone(&first_key);

        let mut gateway = MockStoreGateway::new();

        gateway.expect_create_lead().returning(|_| Ok(()));
        gateway
            .expect_create_order()
            .times(2)
            .returning(move |order| {
                if *key.get_or_init(|| order.idempotency_key) != order.idempotency_key {
                    return Err(GatewayError::InvalidData("key changed".to_string()));
                }

                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(GatewayError::Unavailable("connection reset".to_string()))
                } else {
                    Ok(OrderId::new("order-3"))
                }
            });
        gateway
            .expect_create_completed_customer()
            .returning(|_| Ok(()));

        let mut session = CheckoutSession::new(
            Arc::new(gateway),
            Arc::new(SimulatedPayments),
            RetryPolicy::default(),
            None,
        );
        let mut cart = cart_with_items()?;

        walk_to_payment(&mut session).await?;

        session.submit(&mut cart).await?;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(first_key.get(), Some(&session.idempotency_key()));

        Ok(())
    }

    #[tokio::test]
    async fn declined_payment_fails_without_writing_an_order() -> TestResult {
        let mut gateway = MockStoreGateway::new();

        gateway.expect_create_lead().returning(|_| Ok(()));
        gateway.expect_create_order().never();

        let mut payments = MockPaymentAuthorizer::new();

        payments
            .expect_authorize()
            .withf(|details, amount| details.cvv == "123" && *amount == 450)
            .times(1)
            .returning(|_, _| Err(PaymentError::Declined("insufficient funds".to_string())));

        let mut session = CheckoutSession::new(
            Arc::new(gateway),
            Arc::new(payments),
            RetryPolicy::default(),
            None,
        );
        let mut cart = cart_with_items()?;

        walk_to_payment(&mut session).await?;

        let result = session.submit(&mut cart).await;

        assert!(
            matches!(result, Err(CheckoutError::PaymentDeclined(PaymentError::Declined(_)))),
            "expected PaymentDeclined, got {result:?}"
        );
        assert!(matches!(session.status(), OrderStatus::Failed { .. }));
        assert_eq!(cart.count(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn completed_session_rejects_further_changes() -> TestResult {
        let mut gateway = MockStoreGateway::new();

        gateway.expect_create_lead().returning(|_| Ok(()));
        gateway
            .expect_create_order()
            .times(1)
            .returning(|_| Ok(OrderId::new("order-4")));
        gateway
            .expect_create_completed_customer()
            .returning(|_| Ok(()));

        let mut session = session(gateway);
        let mut cart = cart_with_items()?;

        walk_to_payment(&mut session).await?;
        session.submit(&mut cart).await?;

        cart.add_to_cart(&product("C", 10), 1)?;

        let resubmit = session.submit(&mut cart).await;
        let edit = session.set_field(Field::City, "Ankara");
        let advance = session.advance().await;

        assert!(matches!(resubmit, Err(CheckoutError::AlreadyComplete)));
        assert!(matches!(edit, Err(CheckoutError::AlreadyComplete)));
        assert!(matches!(advance, Err(CheckoutError::AlreadyComplete)));
        assert_eq!(session.back(), CheckoutStep::Payment);
        assert_eq!(cart.count(), 1);

        Ok(())
    }
}
