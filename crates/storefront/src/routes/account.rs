//! Account route handlers: profile, default address, order history.
//!
//! These routes require authentication.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::addresses::AddressRepository;
use crate::db::orders::OrderRepository;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Address, AddressFields, Order, Profile};
use crate::state::AppState;

/// Profile data with the account email.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub email: String,
    #[serde(flatten)]
    pub profile: Profile,
}

/// Profile update payload.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub cpf: Option<String>,
    pub phone: Option<String>,
}

/// Show the user's personal data.
#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ProfileView>> {
    let profile = UserRepository::new(state.pool()).get_profile(user.id).await?;
    Ok(Json(ProfileView {
        email: user.email,
        profile,
    }))
}

/// Update the user's personal data.
#[instrument(skip(state, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<ProfileUpdate>,
) -> Result<Json<ProfileView>> {
    let profile = Profile {
        full_name: form.full_name,
        cpf: form.cpf,
        phone: form.phone,
    };
    UserRepository::new(state.pool())
        .update_profile(user.id, &profile)
        .await?;

    Ok(Json(ProfileView {
        email: user.email,
        profile,
    }))
}

/// Show the user's default shipping address, if any.
#[instrument(skip(state))]
pub async fn address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Option<Address>>> {
    let address = AddressRepository::new(state.pool())
        .get_default(user.id)
        .await?;
    Ok(Json(address))
}

/// Create or update the user's default shipping address.
///
/// Same upsert checkout uses in its address-resolution stage.
#[instrument(skip(state, form))]
pub async fn update_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<AddressFields>,
) -> Result<Json<Address>> {
    if !form.is_complete() {
        return Err(AppError::Validation(
            "Preencha o endereço de entrega".to_owned(),
        ));
    }

    let address = AddressRepository::new(state.pool())
        .upsert_default(user.id, &form)
        .await?;
    Ok(Json(address))
}

/// List the user's orders, newest first.
#[instrument(skip(state))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(orders))
}
