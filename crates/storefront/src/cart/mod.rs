//! Session cart and line-item merge rules.
//!
//! A cart is an ordered collection of lines keyed by `(product, size)`.
//! The invariant maintained by every mutator is that at most one line
//! exists per identity key. Line order is the insertion order of the
//! first add for that key; it carries no meaning beyond display.
//!
//! The cart is stored in the tower-sessions session (see
//! [`crate::models::session_keys::CART`]) and never written to the
//! database.

pub mod pricing;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use futstore_core::{ProductId, Size};

/// One `(product, size)` entry in a cart.
///
/// `name`, `image` and `unit_price` are snapshots taken when the line was
/// first added; merging more quantity into an existing line keeps the
/// original snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Product name snapshot.
    pub name: String,
    /// Product image URL snapshot.
    pub image: String,
    /// Jersey size.
    pub size: Size,
    /// Units of this (product, size) in the cart. Always positive.
    pub quantity: u32,
    /// Unit price snapshot.
    pub unit_price: Decimal,
}

impl CartLine {
    /// The line's identity key.
    #[must_use]
    pub const fn key(&self) -> (ProductId, Size) {
        (self.product_id, self.size)
    }

    /// Price of the whole line (quantity x unit price).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// A session cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The cart's lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add a line to the cart.
    ///
    /// If a line with the same `(product, size)` key exists, its quantity
    /// is increased by the incoming quantity and the incoming snapshot
    /// fields are discarded in favor of the existing ones. Otherwise the
    /// line is appended.
    pub fn add_item(&mut self, line: CartLine) {
        if let Some(existing) = self.find_mut(line.product_id, line.size) {
            existing.quantity += line.quantity;
        } else {
            self.lines.push(line);
        }
    }

    /// Remove the line matching `(product_id, size)`, if present.
    ///
    /// Absence is a no-op, not an error.
    pub fn remove_item(&mut self, product_id: ProductId, size: Size) {
        self.lines.retain(|l| l.key() != (product_id, size));
    }

    /// Set the quantity of the line matching `(product_id, size)`.
    ///
    /// A quantity of zero behaves exactly like [`Self::remove_item`]. A
    /// non-matching key is a no-op.
    pub fn update_quantity(&mut self, product_id: ProductId, size: Size, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id, size);
            return;
        }
        if let Some(line) = self.find_mut(product_id, size) {
            line.quantity = quantity;
        }
    }

    /// Move the line at `(product_id, old_size)` to `new_size`.
    ///
    /// If a line already exists at the new size, the old line's quantity
    /// is merged into it and the old line is removed; this keeps the
    /// identity-key invariant when a user resizes into a duplicate.
    /// Otherwise the line is renamed in place, quantity preserved. An
    /// unknown old key is a no-op.
    pub fn update_size(&mut self, product_id: ProductId, old_size: Size, new_size: Size) {
        if old_size == new_size {
            return;
        }
        let Some(old_index) = self
            .lines
            .iter()
            .position(|l| l.key() == (product_id, old_size))
        else {
            return;
        };

        if self.find_mut(product_id, new_size).is_some() {
            let moved = self.lines.remove(old_index);
            if let Some(target) = self.find_mut(product_id, new_size) {
                target.quantity += moved.quantity;
            }
        } else if let Some(line) = self.lines.get_mut(old_index) {
            line.size = new_size;
        }
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Subtotal across all lines (excludes shipping).
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    fn find_mut(&mut self, product_id: ProductId, size: Size) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|l| l.key() == (product_id, size))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(product_id: i32, size: Size, quantity: u32, price_cents: i64) -> CartLine {
        CartLine {
            product_id: ProductId::new(product_id),
            name: format!("Camisa {product_id}"),
            image: format!("https://img.example/{product_id}.jpg"),
            size,
            quantity,
            unit_price: Decimal::new(price_cents, 2),
        }
    }

    #[test]
    fn test_add_new_line_appends() {
        let mut cart = Cart::new();
        cart.add_item(line(1, Size::M, 2, 19990));
        cart.add_item(line(2, Size::M, 1, 24990));
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_add_same_key_merges_quantity_only() {
        let mut cart = Cart::new();
        cart.add_item(line(1, Size::M, 2, 19990));

        // Incoming snapshot fields differ; the existing snapshot must win.
        let mut dup = line(1, Size::M, 3, 9999);
        dup.name = "Renamed".to_owned();
        cart.add_item(dup);

        assert_eq!(cart.lines().len(), 1);
        let merged = &cart.lines()[0];
        assert_eq!(merged.quantity, 5);
        assert_eq!(merged.name, "Camisa 1");
        assert_eq!(merged.unit_price, Decimal::new(19990, 2));
    }

    #[test]
    fn test_same_product_different_size_is_distinct() {
        let mut cart = Cart::new();
        cart.add_item(line(1, Size::M, 1, 19990));
        cart.add_item(line(1, Size::G, 1, 19990));
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(line(1, Size::M, 2, 19990));
        cart.remove_item(ProductId::new(1), Size::M);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(line(1, Size::M, 2, 19990));
        cart.remove_item(ProductId::new(1), Size::G);
        cart.remove_item(ProductId::new(9), Size::M);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = Cart::new();
        cart.add_item(line(1, Size::M, 2, 19990));
        cart.update_quantity(ProductId::new(1), Size::M, 7);
        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn test_update_quantity_zero_equals_remove() {
        let mut with_update = Cart::new();
        with_update.add_item(line(1, Size::M, 2, 19990));
        with_update.add_item(line(2, Size::G, 1, 24990));

        let mut with_remove = with_update.clone();

        with_update.update_quantity(ProductId::new(1), Size::M, 0);
        with_remove.remove_item(ProductId::new(1), Size::M);

        assert_eq!(with_update, with_remove);
    }

    #[test]
    fn test_update_quantity_unknown_key_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(line(1, Size::M, 2, 19990));
        let before = cart.clone();
        cart.update_quantity(ProductId::new(1), Size::GG, 5);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_update_size_renames_in_place() {
        let mut cart = Cart::new();
        cart.add_item(line(1, Size::M, 2, 19990));
        cart.add_item(line(2, Size::M, 1, 24990));

        cart.update_size(ProductId::new(1), Size::M, Size::GG);

        assert_eq!(cart.lines().len(), 2);
        // Position and quantity preserved, only the size changed.
        assert_eq!(cart.lines()[0].size, Size::GG);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_update_size_collision_merges() {
        let mut cart = Cart::new();
        cart.add_item(line(1, Size::M, 2, 19990));
        cart.add_item(line(1, Size::G, 1, 19990));

        cart.update_size(ProductId::new(1), Size::M, Size::G);

        assert_eq!(cart.lines().len(), 1);
        let merged = &cart.lines()[0];
        assert_eq!(merged.size, Size::G);
        assert_eq!(merged.quantity, 3);
    }

    #[test]
    fn test_update_size_unknown_old_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(line(1, Size::M, 2, 19990));
        let before = cart.clone();
        cart.update_size(ProductId::new(1), Size::P, Size::G);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_update_size_same_size_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(line(1, Size::M, 2, 19990));
        let before = cart.clone();
        cart.update_size(ProductId::new(1), Size::M, Size::M);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add_item(line(1, Size::M, 2, 19990));
        cart.add_item(line(2, Size::G, 3, 24990));

        assert_eq!(cart.total_items(), 5);
        // 2 x 199.90 + 3 x 249.90 = 399.80 + 749.70 = 1149.50, exact.
        assert_eq!(cart.total_price(), Decimal::new(114_950, 2));
    }

    #[test]
    fn test_totals_empty_cart() {
        let cart = Cart::new();
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(line(1, Size::M, 2, 19990));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_session_serde_roundtrip() {
        let mut cart = Cart::new();
        cart.add_item(line(1, Size::M, 2, 19990));
        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
