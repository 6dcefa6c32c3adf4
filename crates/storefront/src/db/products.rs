//! Product catalog repository.

use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use futstore_core::{ProductId, Size};

use super::RepositoryError;
use crate::models::Product;

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the whole catalog, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a row holds an invalid size token.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, team, description, price, original_price, image,
                   category, sizes, stock, is_promotion, rating, review_count,
                   created_at
            FROM products
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(|row| map_product(&row)).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the row holds an invalid size token.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, name, team, description, price, original_price, image,
                   category, sizes, stock, is_promotion, rating, review_count,
                   created_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| map_product(&r)).transpose()
    }
}

/// Map a product row into the domain type.
fn map_product(row: &PgRow) -> Result<Product, RepositoryError> {
    let size_tokens: Vec<String> = row.try_get("sizes")?;
    let sizes = size_tokens
        .iter()
        .map(|token| {
            token.parse::<Size>().map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid size in database: {e}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        team: row.try_get("team")?,
        description: row.try_get("description")?,
        price: row.try_get::<Decimal, _>("price")?,
        original_price: row.try_get("original_price")?,
        image: row.try_get("image")?,
        category: row.try_get("category")?,
        sizes,
        stock: row.try_get("stock")?,
        is_promotion: row.try_get("is_promotion")?,
        rating: row.try_get("rating")?,
        review_count: row.try_get("review_count")?,
        created_at: row.try_get("created_at")?,
    })
}
