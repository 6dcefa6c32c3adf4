//! Session identity routes.
//!
//! The storefront deliberately does not implement a credential ceremony
//! (passwords, OAuth, passkeys); that is an upstream concern. These
//! routes only establish and drop the session identity the rest of the
//! API keys on.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// Establish the session identity for an email, creating the user on
/// first sight.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginRequest>,
) -> Result<Json<CurrentUser>> {
    let email = form.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_owned()));
    }

    let user = UserRepository::new(state.pool())
        .find_or_create(&email)
        .await?;

    let current = CurrentUser {
        id: user.id,
        email: user.email,
    };
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    Ok(Json(current))
}

/// Drop the session identity.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Report the current identity, if any.
#[instrument(skip_all)]
pub async fn me(OptionalAuth(user): OptionalAuth) -> Json<Option<CurrentUser>> {
    Json(user)
}
