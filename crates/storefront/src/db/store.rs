//! Production implementation of the checkout persistence trait.

use sqlx::PgPool;

use futstore_core::{OrderId, UserId};

use super::RepositoryError;
use super::addresses::AddressRepository;
use super::orders::OrderRepository;
use crate::checkout::CheckoutStore;
use crate::models::{Address, AddressFields, NewOrder, NewOrderLine, Order};

/// `PostgreSQL`-backed [`CheckoutStore`], delegating to the repositories.
pub struct PgStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgStore<'a> {
    /// Create a new store over a connection pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl CheckoutStore for PgStore<'_> {
    async fn upsert_default_address(
        &self,
        user_id: UserId,
        fields: &AddressFields,
    ) -> Result<Address, RepositoryError> {
        AddressRepository::new(self.pool)
            .upsert_default(user_id, fields)
            .await
    }

    async fn create_order(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        OrderRepository::new(self.pool).create(order).await
    }

    async fn create_order_lines(
        &self,
        order_id: OrderId,
        lines: &[NewOrderLine],
    ) -> Result<(), RepositoryError> {
        OrderRepository::new(self.pool)
            .create_lines(order_id, lines)
            .await
    }
}
