//! Checkout orchestration.
//!
//! Converts a session cart into persisted order records through a fixed
//! stage sequence:
//!
//! 1. Precondition check (non-empty cart, resolved shipping address)
//! 2. Address resolution (upsert a submitted form as the default address)
//! 3. Order creation (unique order number, grand total, `confirmed` status)
//! 4. Order-line materialization (one immutable snapshot per cart line)
//! 5. Commit (clear the cart, hand back the receipt)
//!
//! Stages run strictly in sequence; each failure aborts the rest. Side
//! effects of completed stages are not rolled back: a stage-4 failure
//! leaves an order without lines, which is surfaced as its own error
//! variant carrying the orphaned order number rather than swallowed. The
//! cart is only ever cleared in stage 5, so any failure leaves it intact
//! for a retry.
//!
//! Every persistence call runs under an explicit timeout; a hung backend
//! becomes a reported failure instead of an indefinite "processing" state.

pub mod order_number;

use std::time::Duration;

use rust_decimal::Decimal;

use futstore_core::{OrderId, OrderStatus, PaymentMethod, UserId};

use crate::cart::pricing::{self, ShippingConfig};
use crate::cart::Cart;
use crate::db::RepositoryError;
use crate::models::{Address, AddressFields, NewOrder, NewOrderLine, Order};

/// How many order numbers to try before giving up on a conflict streak.
const MAX_ORDER_NUMBER_ATTEMPTS: u32 = 3;

/// The persistence operations checkout depends on.
///
/// Implemented by [`crate::db::PgStore`] in production and by in-memory
/// fakes in tests. Each method is a single atomic write on the backend;
/// there is no cross-call transaction, which is what creates the
/// orphaned-order window documented on [`CheckoutError::OrderLines`].
pub trait CheckoutStore {
    /// Create or update the user's default address.
    async fn upsert_default_address(
        &self,
        user_id: UserId,
        fields: &AddressFields,
    ) -> Result<Address, RepositoryError>;

    /// Create the order record.
    async fn create_order(&self, order: &NewOrder) -> Result<Order, RepositoryError>;

    /// Batch-insert the order's lines.
    async fn create_order_lines(
        &self,
        order_id: OrderId,
        lines: &[NewOrderLine],
    ) -> Result<(), RepositoryError>;
}

/// Checkout stages that perform I/O, for timeout and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AddressSave,
    OrderCreate,
    OrderLines,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddressSave => write!(f, "address save"),
            Self::OrderCreate => write!(f, "order creation"),
            Self::OrderLines => write!(f, "order line creation"),
        }
    }
}

/// Checkout failures.
///
/// The first two variants are validation failures: nothing was persisted
/// and correcting the input is enough. The rest are persistence failures;
/// the cart is preserved so the user can retry.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// Neither a stored default address nor a completed form is available.
    #[error("no shipping address available")]
    MissingAddress,

    /// The submitted address could not be saved; no order was created.
    #[error("failed to save shipping address: {0}")]
    AddressSave(#[source] RepositoryError),

    /// The order record could not be created.
    #[error("failed to create order: {0}")]
    OrderCreate(#[source] RepositoryError),

    /// The order exists but its lines do not.
    ///
    /// This is the known inconsistency window: the order referenced by
    /// `order_number` is orphaned until reconciled.
    #[error("order {order_number} was created but its lines were not: {source}")]
    OrderLines {
        order_number: String,
        #[source]
        source: RepositoryError,
    },

    /// A persistence stage exceeded the configured timeout.
    #[error("checkout timed out during {0}")]
    Timeout(Stage),
}

impl CheckoutError {
    /// Whether this failure is recoverable by correcting user input
    /// (as opposed to a persistence failure warranting a retry prompt).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyCart | Self::MissingAddress)
    }
}

/// What the caller submits to checkout.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Payment method selected by the user.
    pub payment_method: PaymentMethod,
    /// Address form contents, when the user edited or entered an address.
    pub address_form: Option<AddressFields>,
}

/// The result of a completed checkout.
#[derive(Debug, Clone)]
pub struct Receipt {
    /// Internal ID of the created order.
    pub order_id: OrderId,
    /// Human-facing order number for the confirmation view.
    pub order_number: String,
    /// Grand total charged.
    pub total: Decimal,
}

/// Run the checkout sequence.
///
/// `stored_default` is the user's default address as currently persisted
/// (stage 1 input); a submitted `address_form` takes precedence over it
/// and is upserted in stage 2. On success the cart is cleared; on any
/// failure it is left untouched.
///
/// # Errors
///
/// Returns a [`CheckoutError`] naming the failed stage; see the variant
/// docs for which side effects may already have been committed.
pub async fn run<S: CheckoutStore>(
    store: &S,
    user_id: UserId,
    cart: &mut Cart,
    stored_default: Option<Address>,
    request: CheckoutRequest,
    shipping: &ShippingConfig,
    stage_timeout: Duration,
) -> Result<Receipt, CheckoutError> {
    // Stage 1: preconditions. No side effects past this point on failure.
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let CheckoutRequest {
        payment_method,
        address_form,
    } = request;

    let submitted = address_form.filter(AddressFields::is_complete);

    if submitted.is_none() && stored_default.is_none() {
        return Err(CheckoutError::MissingAddress);
    }

    // Stage 2: address resolution. A submitted form must be persisted as
    // the default address before any order exists that references it.
    let shipping_address = match (submitted, stored_default) {
        (Some(fields), _) => {
            let saved = staged(Stage::AddressSave, stage_timeout, async {
                store.upsert_default_address(user_id, &fields).await
            })
            .await?
            .map_err(CheckoutError::AddressSave)?;
            saved.fields
        }
        (None, Some(address)) => address.fields,
        (None, None) => return Err(CheckoutError::MissingAddress),
    };

    let totals = pricing::totals(cart, shipping);

    // Stage 3: order creation. The order number is regenerated on a
    // uniqueness conflict; anything else aborts immediately.
    let order = create_order_with_retry(
        store,
        user_id,
        payment_method,
        &shipping_address,
        totals.total,
        stage_timeout,
    )
    .await?;

    // Stage 4: order-line materialization. Failing here leaves an order
    // without lines; surface the orphan instead of hiding it.
    let lines: Vec<NewOrderLine> = cart
        .lines()
        .iter()
        .map(|line| NewOrderLine {
            product_id: line.product_id,
            product_name: line.name.clone(),
            product_image: line.image.clone(),
            size: line.size,
            quantity: line.quantity,
            unit_price: line.unit_price,
        })
        .collect();

    let line_result = staged(Stage::OrderLines, stage_timeout, async {
        store.create_order_lines(order.id, &lines).await
    })
    .await?;

    if let Err(source) = line_result {
        tracing::error!(
            order_number = %order.order_number,
            error = %source,
            "order created without lines; needs reconciliation"
        );
        return Err(CheckoutError::OrderLines {
            order_number: order.order_number,
            source,
        });
    }

    // Stage 5: commit. The one and only place the cart is cleared.
    cart.clear();

    tracing::info!(
        order_number = %order.order_number,
        total = %order.total,
        "checkout completed"
    );

    Ok(Receipt {
        order_id: order.id,
        order_number: order.order_number,
        total: order.total,
    })
}

/// Create the order, regenerating the order number on a conflict.
async fn create_order_with_retry<S: CheckoutStore>(
    store: &S,
    user_id: UserId,
    payment_method: PaymentMethod,
    shipping_address: &AddressFields,
    total: Decimal,
    stage_timeout: Duration,
) -> Result<Order, CheckoutError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let new_order = NewOrder {
            user_id,
            order_number: order_number::generate(),
            total,
            payment_method,
            shipping_address: shipping_address.clone(),
            status: OrderStatus::Confirmed,
        };

        let result = staged(Stage::OrderCreate, stage_timeout, async {
            store.create_order(&new_order).await
        })
        .await?;

        match result {
            Ok(order) => return Ok(order),
            Err(RepositoryError::Conflict(reason)) if attempt < MAX_ORDER_NUMBER_ATTEMPTS => {
                tracing::warn!(attempt, %reason, "order number conflict; regenerating");
            }
            Err(e) => return Err(CheckoutError::OrderCreate(e)),
        }
    }
}

/// Run one persistence stage under the configured timeout.
async fn staged<T, F>(
    stage: Stage,
    stage_timeout: Duration,
    fut: F,
) -> Result<Result<T, RepositoryError>, CheckoutError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    tokio::time::timeout(stage_timeout, fut)
        .await
        .map_err(|_| CheckoutError::Timeout(stage))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::cart::CartLine;
    use futstore_core::{AddressId, ProductId, Size};

    const STAGE_TIMEOUT: Duration = Duration::from_secs(5);

    /// In-memory checkout store with failure injection.
    #[derive(Default)]
    struct MockStore {
        addresses: Mutex<Vec<Address>>,
        orders: Mutex<Vec<Order>>,
        lines: Mutex<Vec<(OrderId, Vec<NewOrderLine>)>>,
        order_attempts: AtomicU32,
        /// Report a conflict for this many `create_order` calls.
        conflicts: AtomicU32,
        fail_address: bool,
        fail_lines: bool,
        hang_order: bool,
    }

    impl CheckoutStore for MockStore {
        async fn upsert_default_address(
            &self,
            user_id: UserId,
            fields: &AddressFields,
        ) -> Result<Address, RepositoryError> {
            if self.fail_address {
                return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
            }
            let mut addresses = self.addresses.lock().unwrap();
            addresses.retain(|a| a.user_id != user_id);
            let address = Address {
                id: AddressId::new(i32::try_from(addresses.len()).unwrap() + 1),
                user_id,
                is_default: true,
                fields: fields.clone(),
            };
            addresses.push(address.clone());
            Ok(address)
        }

        async fn create_order(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
            if self.hang_order {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            self.order_attempts.fetch_add(1, Ordering::SeqCst);
            if self
                .conflicts
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(RepositoryError::Conflict(format!(
                    "order number already exists: {}",
                    order.order_number
                )));
            }
            let mut orders = self.orders.lock().unwrap();
            let created = Order {
                id: OrderId::new(i32::try_from(orders.len()).unwrap() + 1),
                user_id: order.user_id,
                order_number: order.order_number.clone(),
                total: order.total,
                payment_method: order.payment_method,
                shipping_address: order.shipping_address.clone(),
                status: order.status,
                created_at: chrono::Utc::now(),
            };
            orders.push(created.clone());
            Ok(created)
        }

        async fn create_order_lines(
            &self,
            order_id: OrderId,
            lines: &[NewOrderLine],
        ) -> Result<(), RepositoryError> {
            if self.fail_lines {
                return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
            }
            self.lines.lock().unwrap().push((order_id, lines.to_vec()));
            Ok(())
        }
    }

    fn address_fields() -> AddressFields {
        AddressFields {
            cep: "01310-100".to_owned(),
            street: "Av. Paulista".to_owned(),
            number: "1000".to_owned(),
            complement: Some("Apto 42".to_owned()),
            neighborhood: "Bela Vista".to_owned(),
            city: "São Paulo".to_owned(),
            state: "SP".to_owned(),
        }
    }

    fn stored_address() -> Address {
        Address {
            id: AddressId::new(1),
            user_id: UserId::new(1),
            is_default: true,
            fields: address_fields(),
        }
    }

    fn cart_with_two_jerseys() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(CartLine {
            product_id: ProductId::new(1),
            name: "Camisa Flamengo I 2024".to_owned(),
            image: "https://img.example/1.jpg".to_owned(),
            size: Size::M,
            quantity: 2,
            unit_price: Decimal::new(199_90, 2),
        });
        cart
    }

    fn request(address_form: Option<AddressFields>) -> CheckoutRequest {
        CheckoutRequest {
            payment_method: PaymentMethod::Pix,
            address_form,
        }
    }

    #[tokio::test]
    async fn test_happy_path_with_stored_address() {
        let store = MockStore::default();
        let mut cart = cart_with_two_jerseys();

        let receipt = run(
            &store,
            UserId::new(1),
            &mut cart,
            Some(stored_address()),
            request(None),
            &ShippingConfig::default(),
            STAGE_TIMEOUT,
        )
        .await
        .unwrap();

        // Subtotal 399.80 >= 300.00, so shipping is free.
        assert_eq!(receipt.total, Decimal::new(399_80, 2));
        assert!(receipt.order_number.starts_with("FS-"));

        let orders = store.orders.lock().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].total, Decimal::new(399_80, 2));
        assert_eq!(orders[0].payment_method, PaymentMethod::Pix);
        assert_eq!(orders[0].status, OrderStatus::Confirmed);

        let lines = store.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        let (order_id, ref order_lines) = lines[0];
        assert_eq!(order_id, receipt.order_id);
        assert_eq!(order_lines.len(), 1);
        assert_eq!(order_lines[0].quantity, 2);
        assert_eq!(order_lines[0].unit_price, Decimal::new(199_90, 2));

        // Stage 5 only: the cart is cleared after everything succeeded.
        assert!(cart.is_empty());

        // No address write happened; the stored default was used as-is.
        assert!(store.addresses.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submitted_address_is_upserted_before_order() {
        let store = MockStore::default();
        let mut cart = cart_with_two_jerseys();

        run(
            &store,
            UserId::new(1),
            &mut cart,
            None,
            request(Some(address_fields())),
            &ShippingConfig::default(),
            STAGE_TIMEOUT,
        )
        .await
        .unwrap();

        let addresses = store.addresses.lock().unwrap();
        assert_eq!(addresses.len(), 1);
        assert!(addresses[0].is_default);

        // The order snapshots the saved address.
        let orders = store.orders.lock().unwrap();
        assert_eq!(orders[0].shipping_address, address_fields());
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected_without_side_effects() {
        let store = MockStore::default();
        let mut cart = Cart::new();

        let err = run(
            &store,
            UserId::new(1),
            &mut cart,
            Some(stored_address()),
            request(None),
            &ShippingConfig::default(),
            STAGE_TIMEOUT,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(err.is_validation());
        assert!(store.orders.lock().unwrap().is_empty());
        assert!(store.lines.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_address_is_rejected() {
        let store = MockStore::default();
        let mut cart = cart_with_two_jerseys();

        let err = run(
            &store,
            UserId::new(1),
            &mut cart,
            None,
            request(None),
            &ShippingConfig::default(),
            STAGE_TIMEOUT,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CheckoutError::MissingAddress));
        assert!(!cart.is_empty());
        assert!(store.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_incomplete_form_without_default_is_rejected() {
        let store = MockStore::default();
        let mut cart = cart_with_two_jerseys();

        let mut fields = address_fields();
        fields.street = String::new();

        let err = run(
            &store,
            UserId::new(1),
            &mut cart,
            None,
            request(Some(fields)),
            &ShippingConfig::default(),
            STAGE_TIMEOUT,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CheckoutError::MissingAddress));
    }

    #[tokio::test]
    async fn test_address_failure_aborts_before_order_creation() {
        let store = MockStore {
            fail_address: true,
            ..MockStore::default()
        };
        let mut cart = cart_with_two_jerseys();

        let err = run(
            &store,
            UserId::new(1),
            &mut cart,
            None,
            request(Some(address_fields())),
            &ShippingConfig::default(),
            STAGE_TIMEOUT,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CheckoutError::AddressSave(_)));
        assert!(!err.is_validation());
        assert!(store.orders.lock().unwrap().is_empty());
        assert!(!cart.is_empty());
    }

    #[tokio::test]
    async fn test_line_failure_leaves_orphaned_order_and_intact_cart() {
        let store = MockStore {
            fail_lines: true,
            ..MockStore::default()
        };
        let mut cart = cart_with_two_jerseys();

        let err = run(
            &store,
            UserId::new(1),
            &mut cart,
            Some(stored_address()),
            request(None),
            &ShippingConfig::default(),
            STAGE_TIMEOUT,
        )
        .await
        .unwrap_err();

        // One order, zero lines, cart preserved: the documented window.
        let CheckoutError::OrderLines { order_number, .. } = &err else {
            panic!("expected OrderLines error, got {err:?}");
        };
        let orders = store.orders.lock().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(&orders[0].order_number, order_number);
        assert!(store.lines.lock().unwrap().is_empty());
        assert!(!cart.is_empty());
    }

    #[tokio::test]
    async fn test_order_number_conflict_is_retried() {
        let store = MockStore {
            conflicts: AtomicU32::new(1),
            ..MockStore::default()
        };
        let mut cart = cart_with_two_jerseys();

        let receipt = run(
            &store,
            UserId::new(1),
            &mut cart,
            Some(stored_address()),
            request(None),
            &ShippingConfig::default(),
            STAGE_TIMEOUT,
        )
        .await
        .unwrap();

        assert_eq!(store.order_attempts.load(Ordering::SeqCst), 2);
        assert_eq!(store.orders.lock().unwrap().len(), 1);
        assert!(cart.is_empty());
        assert!(!receipt.order_number.is_empty());
    }

    #[tokio::test]
    async fn test_conflict_streak_exhausts_retries() {
        let store = MockStore {
            conflicts: AtomicU32::new(u32::MAX),
            ..MockStore::default()
        };
        let mut cart = cart_with_two_jerseys();

        let err = run(
            &store,
            UserId::new(1),
            &mut cart,
            Some(stored_address()),
            request(None),
            &ShippingConfig::default(),
            STAGE_TIMEOUT,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::OrderCreate(RepositoryError::Conflict(_))
        ));
        assert_eq!(store.order_attempts.load(Ordering::SeqCst), 3);
        assert!(!cart.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_backend_times_out() {
        let store = MockStore {
            hang_order: true,
            ..MockStore::default()
        };
        let mut cart = cart_with_two_jerseys();

        let err = run(
            &store,
            UserId::new(1),
            &mut cart,
            Some(stored_address()),
            request(None),
            &ShippingConfig::default(),
            Duration::from_secs(30),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CheckoutError::Timeout(Stage::OrderCreate)));
        assert!(!cart.is_empty());
    }

    #[tokio::test]
    async fn test_sub_threshold_cart_includes_shipping_in_total() {
        let store = MockStore::default();
        let mut cart = Cart::new();
        cart.add_item(CartLine {
            product_id: ProductId::new(2),
            name: "Camisa Corinthians I 2024".to_owned(),
            image: "https://img.example/2.jpg".to_owned(),
            size: Size::G,
            quantity: 1,
            unit_price: Decimal::new(249_90, 2),
        });

        let receipt = run(
            &store,
            UserId::new(1),
            &mut cart,
            Some(stored_address()),
            request(None),
            &ShippingConfig::default(),
            STAGE_TIMEOUT,
        )
        .await
        .unwrap();

        // 249.90 + 29.90 flat fee
        assert_eq!(receipt.total, Decimal::new(279_80, 2));
    }
}
