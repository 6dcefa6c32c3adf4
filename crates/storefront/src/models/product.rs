//! Product catalog domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use futstore_core::{ProductId, Size};

/// A jersey in the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name, e.g. "Camisa Flamengo I 2024".
    pub name: String,
    /// Club or national team.
    pub team: String,
    /// Marketing description.
    pub description: String,
    /// Current price.
    pub price: Decimal,
    /// Pre-promotion price, when the product is discounted.
    pub original_price: Option<Decimal>,
    /// Primary product image URL.
    pub image: String,
    /// Catalog category, e.g. "Brasileiro", "Europeu", "Seleções".
    pub category: String,
    /// Sizes available for this jersey.
    pub sizes: Vec<Size>,
    /// Units in stock across all sizes.
    pub stock: i32,
    /// Whether the product is on promotion.
    pub is_promotion: bool,
    /// Average review rating (0.0-5.0).
    pub rating: Decimal,
    /// Number of reviews behind the rating.
    pub review_count: i32,
    /// When the product was added to the catalog.
    pub created_at: DateTime<Utc>,
}
