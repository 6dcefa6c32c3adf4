//! User and profile repository.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use futstore_core::UserId;

use super::RepositoryError;
use crate::models::{Profile, User};

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, email, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            Ok(User {
                id: UserId::new(r.try_get("id")?),
                email: r.try_get("email")?,
                created_at: r.try_get::<DateTime<Utc>, _>("created_at")?,
            })
        })
        .transpose()
    }

    /// Create a new user, together with an empty profile row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, email: &str) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r"
            INSERT INTO users (email)
            VALUES ($1)
            RETURNING id, email, created_at
            ",
        )
        .bind(email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let user = User {
            id: UserId::new(row.try_get("id")?),
            email: row.try_get("email")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        };

        sqlx::query("INSERT INTO profiles (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Get a user by email, creating them on first sight.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the queries fail.
    pub async fn find_or_create(&self, email: &str) -> Result<User, RepositoryError> {
        if let Some(user) = self.get_by_email(email).await? {
            return Ok(user);
        }
        match self.create(email).await {
            Ok(user) => Ok(user),
            // Lost a create race; the row exists now.
            Err(RepositoryError::Conflict(_)) => self
                .get_by_email(email)
                .await?
                .ok_or(RepositoryError::NotFound),
            Err(e) => Err(e),
        }
    }

    /// Get a user's profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no profile row.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_profile(&self, user_id: UserId) -> Result<Profile, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT full_name, cpf, phone
            FROM profiles
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(Profile {
            full_name: row.try_get("full_name")?,
            cpf: row.try_get("cpf")?,
            phone: row.try_get("phone")?,
        })
    }

    /// Update a user's profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no profile row.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        profile: &Profile,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE profiles
            SET full_name = $1, cpf = $2, phone = $3
            WHERE user_id = $4
            ",
        )
        .bind(profile.full_name.as_deref())
        .bind(profile.cpf.as_deref())
        .bind(profile.phone.as_deref())
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
