use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// Numeric Digikala product identifier (the digits of `dkp-<id>`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductId(NonZeroU64);

impl ProductId {
    /// Returns `None` for zero, which Digikala never issues
    pub fn new(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(Self)
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_rejected() {
        assert!(ProductId::new(0).is_none());
    }

    #[test]
    fn test_display_is_plain_digits() {
        let id = ProductId::new(7068663).unwrap();
        assert_eq!(id.to_string(), "7068663");
        assert_eq!(id.get(), 7068663);
    }

    #[test]
    fn test_serializes_as_number() {
        let id = ProductId::new(42).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let back: ProductId = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ProductId>("0").is_err());
    }
}
