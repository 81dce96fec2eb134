use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Money amount represented as **integer minor units** (paise).
///
/// Use this type for **all** monetary values (expense amounts, budgets,
/// goals) to avoid floating-point drift. The value is signed so that derived
/// figures such as the adjusted budget can legitimately go negative, but user
/// input never carries a sign.
///
/// # Examples
///
/// ```rust
/// use engine::AmountMinor;
///
/// let amount = AmountMinor::new(12_34);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "₹12.34");
/// ```
///
/// Parsing from form input (accepts `.` or `,` as decimal separator; rejects
/// signs and more than 2 decimals):
///
/// ```rust
/// use engine::AmountMinor;
///
/// assert_eq!("10".parse::<AmountMinor>().unwrap().minor(), 1000);
/// assert_eq!("10,5".parse::<AmountMinor>().unwrap().minor(), 1050);
/// assert!("12.345".parse::<AmountMinor>().is_err());
/// assert!("-1".parse::<AmountMinor>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct AmountMinor(i64);

impl AmountMinor {
    pub const ZERO: AmountMinor = AmountMinor(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Saturating subtraction floored at zero.
    #[must_use]
    pub fn saturating_remaining(self, spent: AmountMinor) -> AmountMinor {
        AmountMinor((self.0 - spent.0).max(0))
    }
}

impl fmt::Display for AmountMinor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let rupees = abs / 100;
        let paise = abs % 100;
        write!(f, "{sign}₹{rupees}.{paise:02}")
    }
}

impl From<i64> for AmountMinor {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<AmountMinor> for i64 {
    fn from(value: AmountMinor) -> Self {
        value.0
    }
}

impl Add for AmountMinor {
    type Output = AmountMinor;

    fn add(self, rhs: AmountMinor) -> Self::Output {
        AmountMinor(self.0 + rhs.0)
    }
}

impl AddAssign for AmountMinor {
    fn add_assign(&mut self, rhs: AmountMinor) {
        self.0 += rhs.0;
    }
}

impl Sub for AmountMinor {
    type Output = AmountMinor;

    fn sub(self, rhs: AmountMinor) -> Self::Output {
        AmountMinor(self.0 - rhs.0)
    }
}

impl SubAssign for AmountMinor {
    fn sub_assign(&mut self, rhs: AmountMinor) {
        self.0 -= rhs.0;
    }
}

impl Sum for AmountMinor {
    fn sum<I: Iterator<Item = AmountMinor>>(iter: I) -> Self {
        iter.fold(AmountMinor::ZERO, Add::add)
    }
}

impl FromStr for AmountMinor {
    type Err = StoreError;

    /// Parses a decimal form input into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects signs (expense amounts are non-negative)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || StoreError::Validation("empty amount".to_string());
        let invalid = || StoreError::Validation("invalid amount".to_string());
        let overflow = || StoreError::Validation("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }
        if trimmed.starts_with('-') || trimmed.starts_with('+') {
            return Err(StoreError::Validation(
                "amount must not carry a sign".to_string(),
            ));
        }

        let normalized = trimmed.replace(',', ".");
        let mut parts = normalized.split('.');
        let rupees_str = parts.next().ok_or_else(invalid)?;
        let paise_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if rupees_str.is_empty() || !rupees_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let rupees: i64 = rupees_str.parse().map_err(|_| invalid())?;

        let paise: i64 = match paise_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => {
                        return Err(StoreError::Validation("too many decimals".to_string()));
                    }
                }
            }
        };

        rupees
            .checked_mul(100)
            .and_then(|v| v.checked_add(paise))
            .map(AmountMinor)
            .ok_or_else(overflow)
    }
}
