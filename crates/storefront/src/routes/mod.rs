//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Products
//! GET  /products               - Catalog listing
//! GET  /products/{id}          - Product detail
//!
//! # Cart (session-scoped)
//! GET  /cart                   - Cart view with totals
//! POST /cart/add               - Add a (product, size, quantity) line
//! POST /cart/update            - Set a line's quantity (0 removes)
//! POST /cart/remove            - Remove a line
//! POST /cart/size              - Move a line to another size
//! GET  /cart/count             - Item count badge
//!
//! # Checkout (requires auth)
//! POST /checkout               - Run checkout, returns the order number
//!
//! # Orders (requires auth)
//! GET  /orders/{order_number}  - Order details with line snapshots
//!
//! # Account (requires auth)
//! GET  /account/profile        - Personal data
//! PUT  /account/profile        - Update personal data
//! GET  /account/address        - Default shipping address
//! PUT  /account/address        - Create/update the default address
//! GET  /account/orders         - Order history, newest first
//!
//! # Auth (session identity; the credential ceremony lives upstream)
//! POST /auth/login             - Establish the session identity
//! POST /auth/logout            - Drop the session identity
//! GET  /auth/me                - Current identity, if any
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/size", post(cart::resize))
        .route("/count", get(cart::count))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(account::profile).put(account::update_profile),
        )
        .route(
            "/address",
            get(account::address).put(account::update_address),
        )
        .route("/orders", get(account::orders))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(checkout::run))
        // Order details
        .route("/orders/{order_number}", get(orders::show))
        // Account routes
        .nest("/account", account_routes())
        // Auth routes
        .nest("/auth", auth_routes())
}
