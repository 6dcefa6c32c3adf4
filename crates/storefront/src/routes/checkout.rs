//! Checkout route handler.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use futstore_core::{PaymentMethod, format_brl};

use crate::checkout::{self, CheckoutRequest};
use crate::db::addresses::AddressRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::AddressFields;
use crate::routes::cart::{load_cart, save_cart};
use crate::state::AppState;

/// Checkout payload.
#[derive(Debug, Deserialize)]
pub struct CheckoutBody {
    pub payment_method: PaymentMethod,
    /// Present when the user edited or entered the address on the
    /// checkout page; takes precedence over the stored default.
    pub address: Option<AddressFields>,
}

/// Checkout response: what the confirmation view is keyed by.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_number: String,
    pub total: Decimal,
    pub total_display: String,
}

/// Run the checkout sequence for the session cart.
///
/// On success the session cart is empty and the response carries the
/// order number. On failure the cart is untouched so the user can retry.
#[instrument(skip(state, session, body))]
pub async fn run(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Json(body): Json<CheckoutBody>,
) -> Result<Json<CheckoutResponse>> {
    let mut cart = load_cart(&session).await?;

    let stored_default = AddressRepository::new(state.pool())
        .get_default(user.id)
        .await?;

    let receipt = checkout::run(
        &state.store(),
        user.id,
        &mut cart,
        stored_default,
        CheckoutRequest {
            payment_method: body.payment_method,
            address_form: body.address,
        },
        &state.config().shipping,
        state.config().checkout_timeout,
    )
    .await?;

    // The orchestrator cleared the cart; persist that to the session.
    save_cart(&session, &cart).await?;

    Ok(Json(CheckoutResponse {
        order_number: receipt.order_number,
        total: receipt.total,
        total_display: format_brl(receipt.total),
    }))
}
