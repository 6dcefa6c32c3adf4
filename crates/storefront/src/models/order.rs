//! Order domain types.
//!
//! Orders and order lines are created exactly once, at checkout completion,
//! and are read-only afterwards. Line fields are snapshots taken from the
//! cart - they are never re-derived from current product data.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use futstore_core::{OrderId, OrderLineId, OrderStatus, PaymentMethod, ProductId, Size, UserId};

use super::address::AddressFields;

/// A completed order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Internal database ID.
    pub id: OrderId,
    /// User who placed the order.
    pub user_id: UserId,
    /// Human-facing unique order token, e.g. `FS-MB3K2J7QX9ZK`.
    pub order_number: String,
    /// Grand total (subtotal + shipping) at checkout time.
    pub total: Decimal,
    /// Payment method selected at checkout.
    pub payment_method: PaymentMethod,
    /// Shipping address snapshot taken at checkout time.
    pub shipping_address: AddressFields,
    /// Order lifecycle status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// One line of a completed order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    /// Internal database ID.
    pub id: OrderLineId,
    /// Order this line belongs to.
    pub order_id: OrderId,
    /// Product the line was created from.
    pub product_id: ProductId,
    /// Product name snapshot.
    pub product_name: String,
    /// Product image URL snapshot.
    pub product_image: String,
    /// Jersey size.
    pub size: Size,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price snapshot.
    pub unit_price: Decimal,
}

/// Data for creating an order record.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub order_number: String,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub shipping_address: AddressFields,
    pub status: OrderStatus,
}

/// Data for creating one order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_image: String,
    pub size: Size,
    pub quantity: u32,
    pub unit_price: Decimal,
}
