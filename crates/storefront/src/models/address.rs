//! Shipping address domain types.

use serde::{Deserialize, Serialize};

use futstore_core::{AddressId, UserId};

/// A stored shipping address.
///
/// Each user has at most one default address; checkout only ever consults
/// the default.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    /// Database ID of this address.
    pub id: AddressId,
    /// User who owns this address.
    pub user_id: UserId,
    /// Whether this is the user's default address.
    pub is_default: bool,
    /// The address fields themselves.
    #[serde(flatten)]
    pub fields: AddressFields,
}

/// The user-editable fields of a shipping address.
///
/// Also used as the immutable snapshot stored on an order: changing the
/// stored address later must not alter historical orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    /// Postal code (CEP).
    pub cep: String,
    /// Street name.
    pub street: String,
    /// Street number.
    pub number: String,
    /// Apartment, suite, etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    /// Neighborhood (bairro).
    pub neighborhood: String,
    /// City.
    pub city: String,
    /// State abbreviation, e.g. "SP".
    pub state: String,
}

impl AddressFields {
    /// Whether enough of the form is filled in to ship to.
    ///
    /// Mirrors the storefront form validation: street, number, city and
    /// state are mandatory; complement is not.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.street.trim().is_empty()
            && !self.number.trim().is_empty()
            && !self.city.trim().is_empty()
            && !self.state.trim().is_empty()
    }
}
