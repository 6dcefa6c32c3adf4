//! Pricing rules: subtotal, shipping fee, grand total.
//!
//! All values are exact decimals; the money path never touches binary
//! floating point, so repeated additions cannot drift at the cent level.

use rust_decimal::Decimal;
use serde::Serialize;

use super::Cart;

/// Shipping pricing constants.
///
/// Orders at or above the threshold ship free; everything below pays the
/// flat fee. Both values are configuration, not derived (see
/// [`crate::config::StoreConfig`] for the environment overrides).
#[derive(Debug, Clone)]
pub struct ShippingConfig {
    /// Subtotal at which shipping becomes free. Inclusive boundary.
    pub free_threshold: Decimal,
    /// Flat shipping fee below the threshold.
    pub flat_fee: Decimal,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            free_threshold: Decimal::new(300_00, 2),
            flat_fee: Decimal::new(29_90, 2),
        }
    }
}

/// Derived totals for a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    /// Sum of quantity x unit price over all lines.
    pub subtotal: Decimal,
    /// Shipping fee for this subtotal.
    pub shipping: Decimal,
    /// Subtotal + shipping.
    pub total: Decimal,
    /// Sum of quantities over all lines.
    pub item_count: u32,
}

/// Shipping fee for a subtotal: zero at or above the free-shipping
/// threshold, the flat fee below it.
#[must_use]
pub fn shipping_fee(subtotal: Decimal, config: &ShippingConfig) -> Decimal {
    if subtotal >= config.free_threshold {
        Decimal::ZERO
    } else {
        config.flat_fee
    }
}

/// Compute all derived totals for a cart.
#[must_use]
pub fn totals(cart: &Cart, config: &ShippingConfig) -> CartTotals {
    let subtotal = cart.total_price();
    let shipping = shipping_fee(subtotal, config);
    CartTotals {
        subtotal,
        shipping,
        total: subtotal + shipping,
        item_count: cart.total_items(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use futstore_core::{ProductId, Size};

    fn cfg() -> ShippingConfig {
        ShippingConfig::default()
    }

    #[test]
    fn test_shipping_fee_below_threshold() {
        assert_eq!(
            shipping_fee(Decimal::new(299_99, 2), &cfg()),
            Decimal::new(29_90, 2)
        );
    }

    #[test]
    fn test_shipping_fee_boundary_is_inclusive() {
        assert_eq!(shipping_fee(Decimal::new(300_00, 2), &cfg()), Decimal::ZERO);
    }

    #[test]
    fn test_shipping_fee_above_threshold() {
        assert_eq!(shipping_fee(Decimal::new(500_00, 2), &cfg()), Decimal::ZERO);
    }

    #[test]
    fn test_empty_cart_still_pays_flat_fee_on_paper() {
        // The orchestrator rejects empty carts before pricing matters;
        // the aggregator itself is total over all inputs.
        assert_eq!(shipping_fee(Decimal::ZERO, &cfg()), Decimal::new(29_90, 2));
    }

    #[test]
    fn test_totals_end_to_end() {
        // Two 199.90 jerseys: subtotal 399.80, free shipping, total 399.80.
        let mut cart = Cart::new();
        cart.add_item(CartLine {
            product_id: ProductId::new(1),
            name: "Camisa Flamengo I 2024".to_owned(),
            image: "https://img.example/1.jpg".to_owned(),
            size: Size::M,
            quantity: 2,
            unit_price: Decimal::new(199_90, 2),
        });

        let totals = totals(&cart, &cfg());
        assert_eq!(totals.subtotal, Decimal::new(399_80, 2));
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::new(399_80, 2));
        assert_eq!(totals.item_count, 2);
    }

    #[test]
    fn test_totals_with_shipping() {
        let mut cart = Cart::new();
        cart.add_item(CartLine {
            product_id: ProductId::new(2),
            name: "Camisa Corinthians I 2024".to_owned(),
            image: "https://img.example/2.jpg".to_owned(),
            size: Size::G,
            quantity: 1,
            unit_price: Decimal::new(249_90, 2),
        });

        let totals = totals(&cart, &cfg());
        assert_eq!(totals.subtotal, Decimal::new(249_90, 2));
        assert_eq!(totals.shipping, Decimal::new(29_90, 2));
        assert_eq!(totals.total, Decimal::new(279_80, 2));
    }

    #[test]
    fn test_sum_is_order_independent() {
        let a = CartLine {
            product_id: ProductId::new(1),
            name: "A".to_owned(),
            image: String::new(),
            size: Size::M,
            quantity: 3,
            unit_price: Decimal::new(33_33, 2),
        };
        let b = CartLine {
            product_id: ProductId::new(2),
            name: "B".to_owned(),
            image: String::new(),
            size: Size::G,
            quantity: 7,
            unit_price: Decimal::new(11_11, 2),
        };

        let mut ab = Cart::new();
        ab.add_item(a.clone());
        ab.add_item(b.clone());

        let mut ba = Cart::new();
        ba.add_item(b);
        ba.add_item(a);

        assert_eq!(ab.total_price(), ba.total_price());
    }
}
