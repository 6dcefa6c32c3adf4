//! Session-related types.
//!
//! The session carries the logged-in identity and the cart itself. The
//! cart lives *only* here: it is created empty, mutated by the cart
//! routes, and cleared exactly once, on successful checkout.

use serde::{Deserialize, Serialize};

use futstore_core::UserId;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: String,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the session cart.
    pub const CART: &str = "cart";
}
