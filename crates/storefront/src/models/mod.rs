//! Domain types for the storefront.
//!
//! These are validated domain objects, separate from database row shapes.

pub mod address;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use address::{Address, AddressFields};
pub use order::{NewOrder, NewOrderLine, Order, OrderLine};
pub use product::Product;
pub use session::{CurrentUser, keys as session_keys};
pub use user::{Profile, User};
