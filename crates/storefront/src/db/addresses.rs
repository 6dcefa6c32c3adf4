//! Shipping address repository.
//!
//! A user has at most one default address (enforced by a partial unique
//! index); the default is the only address checkout ever consults.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use futstore_core::UserId;

use super::RepositoryError;
use crate::models::{Address, AddressFields};

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's default address, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_default(&self, user_id: UserId) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, cep, street, number, complement, neighborhood,
                   city, state, is_default
            FROM addresses
            WHERE user_id = $1 AND is_default
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| map_address(&r)).transpose()
    }

    /// Create or update the user's default address.
    ///
    /// Updates the existing default in place when one exists, otherwise
    /// inserts a new default row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the queries fail.
    pub async fn upsert_default(
        &self,
        user_id: UserId,
        fields: &AddressFields,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r"
            UPDATE addresses
            SET cep = $1, street = $2, number = $3, complement = $4,
                neighborhood = $5, city = $6, state = $7
            WHERE user_id = $8 AND is_default
            RETURNING id, user_id, cep, street, number, complement,
                      neighborhood, city, state, is_default
            ",
        )
        .bind(&fields.cep)
        .bind(&fields.street)
        .bind(&fields.number)
        .bind(fields.complement.as_deref())
        .bind(&fields.neighborhood)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let row = match updated {
            Some(row) => row,
            None => {
                sqlx::query(
                    r"
                    INSERT INTO addresses
                        (user_id, cep, street, number, complement, neighborhood,
                         city, state, is_default)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
                    RETURNING id, user_id, cep, street, number, complement,
                              neighborhood, city, state, is_default
                    ",
                )
                .bind(user_id)
                .bind(&fields.cep)
                .bind(&fields.street)
                .bind(&fields.number)
                .bind(fields.complement.as_deref())
                .bind(&fields.neighborhood)
                .bind(&fields.city)
                .bind(&fields.state)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;

        map_address(&row)
    }
}

/// Map an address row into the domain type.
fn map_address(row: &PgRow) -> Result<Address, RepositoryError> {
    Ok(Address {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        is_default: row.try_get("is_default")?,
        fields: AddressFields {
            cep: row.try_get("cep")?,
            street: row.try_get("street")?,
            number: row.try_get("number")?,
            complement: row.try_get("complement")?,
            neighborhood: row.try_get("neighborhood")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
        },
    })
}
