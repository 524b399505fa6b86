//! Per-item quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A non-negative item quantity.
///
/// Quantities never go below zero: every constructor and arithmetic helper
/// clamps instead of failing. Invalid user input is normalised, not rejected.
///
/// ```
/// use shop2_core::Quantity;
///
/// assert_eq!(Quantity::from_signed(-4), Quantity::ZERO);
/// assert_eq!(Quantity::parse_input("7"), Quantity::new(7));
/// assert_eq!(Quantity::parse_input("seven"), Quantity::ZERO);
/// assert_eq!(Quantity::ZERO.decremented(), Quantity::ZERO);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// No items.
    pub const ZERO: Self = Self(0);

    /// Create a quantity from an unsigned count.
    #[must_use]
    pub const fn new(count: u32) -> Self {
        Self(count)
    }

    /// Create a quantity from a signed value, clamping negatives to zero and
    /// saturating at `u32::MAX`.
    #[must_use]
    pub fn from_signed(value: i64) -> Self {
        if value <= 0 {
            return Self::ZERO;
        }
        Self(u32::try_from(value).unwrap_or(u32::MAX))
    }

    /// Coerce raw text from a quantity input box.
    ///
    /// Reads an optional sign followed by the leading run of digits, ignoring
    /// surrounding whitespace and any trailing garbage (`"3abc"` is 3).
    /// Anything without a leading number is zero.
    #[must_use]
    pub fn parse_input(raw: &str) -> Self {
        let raw = raw.trim();
        let (negative, digits) = match raw.as_bytes().first() {
            Some(b'-') => (true, raw.get(1..).unwrap_or_default()),
            Some(b'+') => (false, raw.get(1..).unwrap_or_default()),
            _ => (false, raw),
        };

        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        let Some(leading) = digits.get(..end).filter(|d| !d.is_empty()) else {
            return Self::ZERO;
        };

        if negative {
            return Self::ZERO;
        }

        // A digit run too long for u64 is still a very large positive number.
        let count = leading.parse::<u64>().unwrap_or(u64::MAX);
        Self(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Returns the raw count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this quantity is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// One more item (saturating).
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One fewer item, floored at zero.
    #[must_use]
    pub const fn decremented(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Quantity {
    fn from(count: u32) -> Self {
        Self(count)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}
