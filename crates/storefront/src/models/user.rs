//! User and profile domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use futstore_core::UserId;

/// A storefront user.
///
/// Only identity lives here; how the user proved who they are is an
/// upstream concern (see `routes::auth`).
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// A user's personal data, edited on the profile page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Profile {
    /// Full name.
    pub full_name: Option<String>,
    /// Brazilian taxpayer ID (CPF).
    pub cpf: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
}
