//! Human-facing order number generation.
//!
//! An order number is `FS-` followed by the checkout wall-clock time in
//! base 36 and a random base-36 suffix. The suffix keeps two checkouts in
//! the same millisecond apart; actual uniqueness is owed to the UNIQUE
//! constraint on `orders.order_number` plus regenerate-and-retry in the
//! orchestrator.

use rand::Rng;

/// Prefix carried by every order number.
pub const PREFIX: &str = "FS-";

/// Length of the random suffix.
const SUFFIX_LEN: usize = 4;

/// Generate a fresh order number, e.g. `FS-MB3K2J7QX9ZK`.
#[must_use]
pub fn generate() -> String {
    let millis = chrono::Utc::now().timestamp_millis().unsigned_abs();
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| base36_digit(rng.random_range(0..36)))
        .collect();
    format!("{PREFIX}{}{suffix}", to_base36(millis))
}

/// Render an integer in uppercase base 36.
fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_owned();
    }
    let mut digits = Vec::new();
    while n > 0 {
        #[allow(clippy::cast_possible_truncation)] // n % 36 < 36
        digits.push(base36_digit((n % 36) as u32));
        n /= 36;
    }
    digits.iter().rev().collect()
}

/// The uppercase base-36 digit for `0 <= d < 36`.
fn base36_digit(d: u32) -> char {
    char::from_digit(d, 36).map_or('0', |c| c.to_ascii_uppercase())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_has_prefix() {
        assert!(generate().starts_with(PREFIX));
    }

    #[test]
    fn test_charset_is_base36_uppercase() {
        let number = generate();
        let body = number.strip_prefix(PREFIX).unwrap();
        assert!(!body.is_empty());
        assert!(body.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(36 * 36 + 1), "101");
    }

    #[test]
    fn test_consecutive_numbers_differ() {
        // Same millisecond is likely here; the random suffix must split them.
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
    }
}
