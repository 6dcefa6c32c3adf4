//! Order details route handler.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Order, OrderLine};
use crate::state::AppState;

/// An order together with its line snapshots.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

/// Show an order by its human-facing number.
///
/// Scoped to the logged-in user; somebody else's order number is
/// indistinguishable from a nonexistent one.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_number): Path<String>,
) -> Result<Json<OrderDetail>> {
    let (order, lines) = OrderRepository::new(state.pool())
        .get_by_number(user.id, &order_number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_number}")))?;

    Ok(Json(OrderDetail { order, lines }))
}
