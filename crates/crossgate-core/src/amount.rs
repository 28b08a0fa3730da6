//! Blockchain amounts in smallest units.
//!
//! [`Amount`] is an unsigned 256-bit integer counting the indivisible unit of
//! an asset (wei, lamports, satoshis, `uatom`). Converting to and from the
//! human decimal form always takes an explicit decimal count; there is no
//! implicit scale.
//!
//! ```
//! use crossgate_core::Amount;
//!
//! let amount = Amount::parse_decimal("1.5", 18).unwrap();
//! assert_eq!(amount.to_string(), "1500000000000000000");
//! assert_eq!(amount.format_decimal(18), "1.5");
//! ```

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{U256, U512};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AmountError;

/// Wei per gwei.
pub const WEI_PER_GWEI: u64 = 1_000_000_000;

/// Decimal digits of `U256::MAX`.
const MAX_DIGITS: usize = 78;

/// A non-negative quantity of an asset in its smallest unit.
///
/// Values are immutable; arithmetic returns new values and never wraps.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Returns the zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Wraps a raw 256-bit integer.
    #[must_use]
    pub const fn from_u256(value: U256) -> Self {
        Self(value)
    }

    /// Creates an amount from a `u64`.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self(U256::from(value))
    }

    /// Creates an amount from a `u128`.
    #[must_use]
    pub fn from_u128(value: u128) -> Self {
        Self(U256::from(value))
    }

    /// Creates an amount from big-endian bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] if the bytes encode a value wider than 256 bits.
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self, AmountError> {
        U256::try_from_be_slice(bytes)
            .map(Self)
            .ok_or_else(|| AmountError::overflow(format!("{} bytes exceed 256 bits", bytes.len())))
    }

    /// Converts a gwei quantity to wei.
    #[must_use]
    pub fn gwei_to_wei(gwei: u64) -> Self {
        Self(U256::from(gwei) * U256::from(WEI_PER_GWEI))
    }

    /// Parses a human decimal string such as `"12.5"` into smallest units.
    ///
    /// Leading and trailing whitespace is ignored. Fractional digits beyond
    /// `decimals` are accepted only when they are zeros.
    ///
    /// # Errors
    ///
    /// - [`AmountError::InvalidFormat`] for signs, exponents, empty input or non-digits
    /// - [`AmountError::TooPrecise`] when non-zero digits fall below the smallest unit
    /// - [`AmountError::Overflow`] when the scaled value exceeds 256 bits
    pub fn parse_decimal(input: &str, decimals: u32) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(AmountError::invalid_format(input));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(AmountError::invalid_format(input));
        }

        let significant = fraction.trim_end_matches('0');
        let scale = usize::try_from(decimals)
            .map_err(|_| AmountError::overflow(format!("{decimals} decimals")))?;
        if significant.len() > scale {
            return Err(AmountError::TooPrecise {
                input: input.to_string(),
                decimals,
            });
        }

        let whole = whole.trim_start_matches('0');
        let leading = significant.len() - significant.trim_start_matches('0').len();
        if whole.is_empty() && leading == significant.len() {
            return Ok(Self::ZERO);
        }

        // Digits of the scaled value, checked before anything is allocated.
        let width = if whole.is_empty() {
            scale - leading
        } else {
            whole.len().saturating_add(scale)
        };
        if width > MAX_DIGITS {
            return Err(AmountError::overflow(format!(
                "'{input}' at {decimals} decimals"
            )));
        }

        let mut digits = String::with_capacity(width);
        digits.push_str(whole);
        digits.push_str(significant);
        digits.extend(std::iter::repeat('0').take(scale - significant.len()));

        let digits = digits.trim_start_matches('0');
        U256::from_str_radix(digits, 10)
            .map(Self)
            .map_err(|_| AmountError::overflow(format!("'{input}' at {decimals} decimals")))
    }

    /// Formats the amount as a human decimal string.
    ///
    /// Trailing fractional zeros are dropped, so `1500` at 3 decimals is `"1.5"`
    /// and `1000` at 3 decimals is `"1"`.
    #[must_use]
    pub fn format_decimal(&self, decimals: u32) -> String {
        let digits = self.0.to_string();
        let Ok(scale) = usize::try_from(decimals) else {
            return "0".to_string();
        };
        if scale == 0 {
            return digits;
        }

        let padded = if digits.len() <= scale {
            let mut padded = "0".repeat(scale - digits.len() + 1);
            padded.push_str(&digits);
            padded
        } else {
            digits
        };

        let (whole, fraction) = padded.split_at(padded.len() - scale);
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{fraction}")
        }
    }

    /// Returns the underlying integer.
    #[must_use]
    pub const fn as_u256(&self) -> &U256 {
        &self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the amount as 32 big-endian bytes.
    #[must_use]
    pub fn to_be_bytes32(&self) -> [u8; 32] {
        self.0.to_be_bytes::<32>()
    }

    /// Narrows to `u64`, or `None` if the value does not fit.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        u64::try_from(self.0).ok()
    }

    /// Narrows to `u128`, or `None` if the value does not fit.
    #[must_use]
    pub fn to_u128(&self) -> Option<u128> {
        u128::try_from(self.0).ok()
    }

    /// Adds two amounts, or `None` on overflow.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtracts `other`, or `None` if it is larger than `self`.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Multiplies two amounts, or `None` on overflow.
    #[must_use]
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        self.0.checked_mul(other.0).map(Self)
    }

    /// Subtracts `other`, stopping at zero.
    #[must_use]
    pub fn saturating_sub(&self, other: &Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Adds two amounts.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] if the sum exceeds 256 bits.
    pub fn try_add(&self, other: &Self) -> Result<Self, AmountError> {
        self.checked_add(other)
            .ok_or_else(|| AmountError::overflow(format!("{self} + {other}")))
    }

    /// Computes `floor(self * numerator / denominator)` without intermediate overflow.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] if the denominator is zero or the
    /// quotient exceeds 256 bits.
    pub fn mul_div_floor(&self, numerator: &U512, denominator: &U512) -> Result<Self, AmountError> {
        if denominator.is_zero() {
            return Err(AmountError::overflow("division by zero"));
        }
        let wide = U512::from_be_slice(&self.to_be_bytes32());
        let product = wide
            .checked_mul(*numerator)
            .ok_or_else(|| AmountError::overflow(format!("{self} exceeds 512-bit product")))?;
        let quotient = product / *denominator;

        let bytes = quotient.to_be_bytes::<64>();
        let (high, low) = bytes.split_at(32);
        if high.iter().any(|b| *b != 0) {
            return Err(AmountError::overflow(format!("scaled {self} exceeds 256 bits")));
        }
        Self::from_be_slice(low)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses an integer count of smallest units.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s, 0)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<Amount> for U256 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl de::Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or integer string")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
                Ok(Amount::from_u64(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
                u64::try_from(value)
                    .map(Amount::from_u64)
                    .map_err(|_| E::custom("amount cannot be negative"))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
