//! Jersey size tokens.
//!
//! Sizes form a closed set; cart line identity is keyed by
//! `(product, size)`, so a size is never free-form text.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown size token.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid size: {0}")]
pub struct SizeParseError(pub String);

/// A jersey size.
///
/// Brazilian sizing: P (pequeno), M (médio), G (grande), GG (extra grande).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    P,
    M,
    G,
    GG,
}

impl Size {
    /// All sizes, in ascending order.
    pub const ALL: [Self; 4] = [Self::P, Self::M, Self::G, Self::GG];

    /// The size token as stored in the database and shown to users.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::P => "P",
            Self::M => "M",
            Self::G => "G",
            Self::GG => "GG",
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Size {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P" => Ok(Self::P),
            "M" => Ok(Self::M),
            "G" => Ok(Self::G),
            "GG" => Ok(Self::GG),
            _ => Err(SizeParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_size_roundtrip() {
        for size in Size::ALL {
            assert_eq!(size.as_str().parse::<Size>().unwrap(), size);
        }
    }

    #[test]
    fn test_size_rejects_unknown_token() {
        assert!("XL".parse::<Size>().is_err());
        assert!("g".parse::<Size>().is_err());
        assert!("".parse::<Size>().is_err());
    }

    #[test]
    fn test_size_serde() {
        let json = serde_json::to_string(&Size::GG).unwrap();
        assert_eq!(json, "\"GG\"");
        let back: Size = serde_json::from_str("\"M\"").unwrap();
        assert_eq!(back, Size::M);
    }
}
