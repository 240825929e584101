//! Whole-rupee amounts and Indian-convention formatting.
//!
//! Prices are computed in whole rupees. Paise (minor units) only appear at
//! the moment a checkout request is built.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount in whole Indian rupees
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Rupees(u64);

impl Rupees {
    /// Zero rupees
    pub const ZERO: Self = Self(0);

    /// Creates an amount from whole rupees
    #[must_use]
    pub const fn new(rupees: u64) -> Self {
        Self(rupees)
    }

    /// Returns the amount in whole rupees
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Converts to paise, the minor unit checkout providers expect
    ///
    /// Returns `None` if the conversion overflows.
    #[must_use]
    pub const fn to_paise(self) -> Option<u64> {
        self.0.checked_mul(100)
    }

    /// Adds two amounts, saturating at the numeric bound
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Multiplies by a ticket count, saturating at the numeric bound
    #[must_use]
    pub const fn saturating_mul(self, count: u32) -> Self {
        Self(self.0.saturating_mul(count as u64))
    }

    /// "Free" for zero, otherwise the formatted amount
    #[must_use]
    pub fn price_label(self) -> String {
        if self.is_zero() {
            "Free".to_string()
        } else {
            self.to_string()
        }
    }
}

impl std::iter::Sum for Rupees {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl fmt::Display for Rupees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}", group_indian(self.0))
    }
}

/// Formats a number with Indian digit grouping (lakh / crore).
///
/// The last three digits form one group, everything before it is grouped in
/// pairs: `1500000` becomes `15,00,000`.
#[must_use]
pub fn group_indian(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = rest;
    }
    groups.push(head);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}
