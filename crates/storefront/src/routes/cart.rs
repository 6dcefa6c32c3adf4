//! Cart route handlers.
//!
//! The cart lives in the session; every handler loads it, applies one
//! merge-engine operation, and writes it back. Nothing here touches the
//! database except `add`, which snapshots name/image/price from the
//! product row at add time.

use axum::{
    Json,
    extract::State,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use futstore_core::{ProductId, Size, format_brl};

use crate::cart::pricing::{self, CartTotals};
use crate::cart::{Cart, CartLine};
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub totals: CartTotals,
    pub subtotal_display: String,
    pub shipping_display: String,
    pub total_display: String,
}

impl CartView {
    fn build(cart: &Cart, state: &AppState) -> Self {
        let totals = pricing::totals(cart, &state.config().shipping);
        Self {
            items: cart.lines().to_vec(),
            subtotal_display: format_brl(totals.subtotal),
            shipping_display: if totals.shipping.is_zero() {
                "Grátis".to_owned()
            } else {
                format_brl(totals.shipping)
            },
            total_display: format_brl(totals.total),
            totals,
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session, defaulting to an empty one.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await
        .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?
        .unwrap_or_default())
}

/// Write the cart back to the session.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session
        .insert(session_keys::CART, cart)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))
}

// =============================================================================
// Request Payloads
// =============================================================================

/// Add to cart payload.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    /// Absent when the user never picked a size.
    pub size: Option<Size>,
    pub quantity: Option<u32>,
}

/// Update quantity payload.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub product_id: ProductId,
    pub size: Size,
    pub quantity: u32,
}

/// Remove line payload.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
    pub size: Size,
}

/// Change size payload.
#[derive(Debug, Deserialize)]
pub struct UpdateSizeRequest {
    pub product_id: ProductId,
    pub old_size: Size,
    pub new_size: Size,
}

/// Cart count badge payload.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart with derived totals.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::build(&cart, &state)))
}

/// Add an item to the cart.
///
/// Snapshots the product's name, image and price into the new line; when
/// the (product, size) pair is already present only the quantity grows
/// and the original snapshot is kept.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let Some(size) = form.size else {
        return Err(AppError::Validation("Selecione um tamanho".to_owned()));
    };
    let quantity = form.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::Validation(
            "Quantity must be at least 1".to_owned(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .get(form.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    if !product.sizes.contains(&size) {
        return Err(AppError::Validation(format!(
            "Size {size} is not available for {}",
            product.name
        )));
    }

    let mut cart = load_cart(&session).await?;
    cart.add_item(CartLine {
        product_id: product.id,
        name: product.name,
        image: product.image,
        size,
        quantity,
        unit_price: product.price,
    });
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::build(&cart, &state)))
}

/// Set a line's quantity. Zero removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.update_quantity(form.product_id, form.size, form.quantity);
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::build(&cart, &state)))
}

/// Remove a line from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.remove_item(form.product_id, form.size);
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::build(&cart, &state)))
}

/// Move a line to another size, merging on collision.
#[instrument(skip(state, session))]
pub async fn resize(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<UpdateSizeRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.update_size(form.product_id, form.old_size, form.new_size);
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::build(&cart, &state)))
}

/// Get the cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCount {
        count: cart.total_items(),
    }))
}
