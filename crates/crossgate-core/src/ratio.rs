//! Exact decimal ratios.
//!
//! Configuration carries rates as floats (`transfer_tax = 0.05`). Multiplying
//! an integer amount by a float and truncating can round the wrong way, so a
//! float is first turned into its shortest round-trip decimal rendering and
//! kept as `mantissa / 10^scale`. All multiplication is then integer-only.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U512;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::AmountError;

/// Beyond this scale a `u128` mantissa over a 256-bit amount always floors to zero.
const MAX_EFFECTIVE_SCALE: u32 = 150;

/// An exact non-negative decimal `mantissa / 10^scale`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RatioRepr", into = "String")]
pub struct DecimalRatio {
    mantissa: u128,
    scale: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RatioRepr {
    Float(f64),
    Text(String),
}

impl TryFrom<RatioRepr> for DecimalRatio {
    type Error = AmountError;

    fn try_from(repr: RatioRepr) -> Result<Self, Self::Error> {
        match repr {
            RatioRepr::Float(value) => Self::from_f64(value),
            RatioRepr::Text(text) => text.parse(),
        }
    }
}

impl From<DecimalRatio> for String {
    fn from(ratio: DecimalRatio) -> Self {
        ratio.to_string()
    }
}

impl DecimalRatio {
    /// The ratio zero.
    pub const ZERO: Self = Self {
        mantissa: 0,
        scale: 0,
    };

    /// The ratio one.
    pub const ONE: Self = Self {
        mantissa: 1,
        scale: 0,
    };

    /// Creates `mantissa / 10^scale`, normalised so trailing zeros are removed.
    #[must_use]
    pub const fn new(mantissa: u128, scale: u32) -> Self {
        let mut mantissa = mantissa;
        let mut scale = scale;
        while scale > 0 && mantissa % 10 == 0 {
            mantissa /= 10;
            scale -= 1;
        }
        if mantissa == 0 {
            scale = 0;
        }
        Self { mantissa, scale }
    }

    /// Converts a float through its shortest decimal rendering.
    ///
    /// `0.05` becomes exactly `5 / 100` and `1e-9` exactly `1 / 10^9`.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::InvalidFormat`] for negative, NaN or infinite
    /// values and [`AmountError::Overflow`] when the digits exceed 128 bits.
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        if value == 0.0 {
            return Ok(Self::ZERO);
        }
        if !value.is_finite() || value.is_sign_negative() {
            return Err(AmountError::invalid_format(value.to_string()));
        }
        format!("{value}").parse()
    }

    /// Returns the mantissa.
    #[must_use]
    pub const fn mantissa(&self) -> u128 {
        self.mantissa
    }

    /// Returns the power of ten dividing the mantissa.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Returns `true` for the zero ratio.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    /// Returns `true` when the ratio is strictly below one.
    #[must_use]
    pub fn is_below_one(&self) -> bool {
        let Some(denominator) = 10u128.checked_pow(self.scale) else {
            return true;
        };
        self.mantissa < denominator
    }

    /// Computes `floor(amount * self)` exactly.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] if the product exceeds 256 bits.
    pub fn mul_floor(&self, amount: &Amount) -> Result<Amount, AmountError> {
        if self.is_zero() || amount.is_zero() || self.scale > MAX_EFFECTIVE_SCALE {
            return Ok(Amount::ZERO);
        }
        let numerator = U512::from(self.mantissa);
        let denominator = U512::from(10u64)
            .checked_pow(U512::from(self.scale))
            .ok_or_else(|| AmountError::overflow(format!("10^{}", self.scale)))?;
        amount.mul_div_floor(&numerator, &denominator)
    }

    /// Lossy float view, for display and logging only.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(self.mantissa as f64)
    }
}

impl FromStr for DecimalRatio {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        if (whole.is_empty() && fraction.is_empty())
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(AmountError::invalid_format(s));
        }

        let fraction = fraction.trim_end_matches('0');
        let digits = format!("{whole}{fraction}");
        let digits = digits.trim_start_matches('0');
        let mantissa = if digits.is_empty() {
            0
        } else {
            digits
                .parse::<u128>()
                .map_err(|_| AmountError::overflow(format!("ratio '{s}' exceeds 128 bits")))?
        };
        let scale = u32::try_from(fraction.len())
            .map_err(|_| AmountError::overflow(format!("ratio '{s}' scale")))?;

        Ok(Self::new(mantissa, scale))
    }
}

impl fmt::Display for DecimalRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Amount::from_u128(self.mantissa).format_decimal(self.scale))
    }
}

impl fmt::Debug for DecimalRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecimalRatio({self})")
    }
}

// ============================================================================
// TaxRate
// ============================================================================

/// A transfer tax rate in `[0, 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DecimalRatio", into = "DecimalRatio")]
pub struct TaxRate(DecimalRatio);

impl TaxRate {
    /// The zero rate.
    pub const ZERO: Self = Self(DecimalRatio::ZERO);

    /// Validates a ratio as a tax rate.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::InvalidFormat`] if the ratio is one or greater.
    pub fn new(ratio: DecimalRatio) -> Result<Self, AmountError> {
        if ratio.is_below_one() {
            Ok(Self(ratio))
        } else {
            Err(AmountError::invalid_format(format!(
                "tax rate {ratio} must be below 1"
            )))
        }
    }

    /// Converts a float rate.
    ///
    /// # Errors
    ///
    /// Fails for values outside `[0, 1)` or that are not finite.
    pub fn from_f64(rate: f64) -> Result<Self, AmountError> {
        Self::new(DecimalRatio::from_f64(rate)?)
    }

    /// Returns the underlying ratio.
    #[must_use]
    pub const fn ratio(&self) -> &DecimalRatio {
        &self.0
    }

    /// Returns `true` for the zero rate.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl TryFrom<DecimalRatio> for TaxRate {
    type Error = AmountError;

    fn try_from(ratio: DecimalRatio) -> Result<Self, Self::Error> {
        Self::new(ratio)
    }
}

impl From<TaxRate> for DecimalRatio {
    fn from(rate: TaxRate) -> Self {
        rate.0
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
