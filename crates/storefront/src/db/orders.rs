//! Order and order-line repository.
//!
//! Orders are insert-only. The `order_number` column carries a UNIQUE
//! constraint; a violation is reported as `RepositoryError::Conflict` so
//! the checkout orchestrator can regenerate the number and retry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use futstore_core::{OrderId, OrderStatus, PaymentMethod, Size, UserId};

use super::RepositoryError;
use crate::models::{AddressFields, NewOrder, NewOrderLine, Order, OrderLine};

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order number is already
    /// taken, `RepositoryError::Database` for other database errors.
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let shipping_address = serde_json::to_value(&order.shipping_address).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize address snapshot: {e}"))
        })?;

        let row = sqlx::query(
            r"
            INSERT INTO orders
                (user_id, order_number, total, payment_method, shipping_address, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, order_number, total, payment_method,
                      shipping_address, status, created_at
            ",
        )
        .bind(order.user_id)
        .bind(&order.order_number)
        .bind(order.total)
        .bind(order.payment_method.to_string())
        .bind(shipping_address)
        .bind(order.status.to_string())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!(
                    "order number already exists: {}",
                    order.order_number
                ));
            }
            RepositoryError::Database(e)
        })?;

        map_order(&row)
    }

    /// Batch-insert the lines of an order.
    ///
    /// All lines land in one transaction: an order either gains all its
    /// lines or none of them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    pub async fn create_lines(
        &self,
        order_id: OrderId,
        lines: &[NewOrderLine],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for line in lines {
            sqlx::query(
                r"
                INSERT INTO order_lines
                    (order_id, product_id, product_name, product_image, size,
                     quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(&line.product_image)
            .bind(line.size.as_str())
            .bind(i32::try_from(line.quantity).unwrap_or(i32::MAX))
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Fetch an order with its lines by order number, scoped to a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the queries fail, or
    /// `RepositoryError::DataCorruption` if stored enums fail to parse.
    pub async fn get_by_number(
        &self,
        user_id: UserId,
        order_number: &str,
    ) -> Result<Option<(Order, Vec<OrderLine>)>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, order_number, total, payment_method,
                   shipping_address, status, created_at
            FROM orders
            WHERE order_number = $1 AND user_id = $2
            ",
        )
        .bind(order_number)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let order = map_order(&row)?;

        let line_rows = sqlx::query(
            r"
            SELECT id, order_id, product_id, product_name, product_image,
                   size, quantity, unit_price
            FROM order_lines
            WHERE order_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(order.id)
        .fetch_all(self.pool)
        .await?;

        let lines = line_rows
            .iter()
            .map(map_order_line)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some((order, lines)))
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if stored enums fail to parse.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, order_number, total, payment_method,
                   shipping_address, status, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(map_order).collect()
    }
}

/// Map an order row into the domain type.
fn map_order(row: &PgRow) -> Result<Order, RepositoryError> {
    let payment_method: String = row.try_get("payment_method")?;
    let payment_method = payment_method
        .parse::<PaymentMethod>()
        .map_err(RepositoryError::DataCorruption)?;

    let status: String = row.try_get("status")?;
    let status = status
        .parse::<OrderStatus>()
        .map_err(RepositoryError::DataCorruption)?;

    let shipping_address: serde_json::Value = row.try_get("shipping_address")?;
    let shipping_address: AddressFields =
        serde_json::from_value(shipping_address).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid address snapshot: {e}"))
        })?;

    Ok(Order {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        order_number: row.try_get("order_number")?,
        total: row.try_get::<Decimal, _>("total")?,
        payment_method,
        shipping_address,
        status,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

/// Map an order-line row into the domain type.
fn map_order_line(row: &PgRow) -> Result<OrderLine, RepositoryError> {
    let size: String = row.try_get("size")?;
    let size = size
        .parse::<Size>()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid size in database: {e}")))?;

    let quantity: i32 = row.try_get("quantity")?;
    let quantity = u32::try_from(quantity).map_err(|_| {
        RepositoryError::DataCorruption(format!("invalid order line quantity: {quantity}"))
    })?;

    Ok(OrderLine {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        product_id: row.try_get("product_id")?,
        product_name: row.try_get("product_name")?,
        product_image: row.try_get("product_image")?,
        size,
        quantity,
        unit_price: row.try_get::<Decimal, _>("unit_price")?,
    })
}
