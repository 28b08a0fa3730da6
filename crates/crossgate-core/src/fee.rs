//! Fee lists and transfer taxes.
//!
//! A transaction's fee is a list of `(denomination, amount)` line items. Gas
//! and transfer tax may be paid in different denominations, so the list is
//! kept unique per denomination and sorted by denomination string; the byte
//! layout of the fee, and therefore the signing digest, is reproducible for
//! identical inputs.
//!
//! ```
//! use crossgate_core::fee::{apply_transfer_tax, FeeEntry};
//! use crossgate_core::{Amount, TaxRate};
//!
//! let fees = vec![FeeEntry::new("uusd", Amount::from_u64(0))];
//! let rate = TaxRate::from_f64(0.05).unwrap();
//! let fees = apply_transfer_tax(fees, "axpla", &Amount::from_u64(100), &rate).unwrap();
//!
//! let denoms: Vec<_> = fees.iter().map(|f| f.denom.as_str()).collect();
//! assert_eq!(denoms, ["axpla", "uusd"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::AmountError;
use crate::ratio::TaxRate;

/// One fee line item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeEntry {
    /// Denomination the fee is paid in.
    pub denom: String,
    /// Amount in that denomination's smallest unit.
    pub amount: Amount,
}

impl FeeEntry {
    /// Creates a fee entry.
    #[must_use]
    pub fn new(denom: impl Into<String>, amount: Amount) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

/// Returns `floor(amount * rate)`.
///
/// # Errors
///
/// Never fails for rates below one; the `Result` carries the 256-bit overflow
/// guard of the underlying arithmetic.
pub fn tax_on(amount: &Amount, rate: &TaxRate) -> Result<Amount, AmountError> {
    rate.ratio().mul_floor(amount)
}

/// Adds `amount` of `denom` to a fee list.
///
/// An existing entry for `denom` is increased in place; otherwise a new entry
/// is appended. The returned list is sorted by denomination.
///
/// # Errors
///
/// Returns [`AmountError::Overflow`] if the merged amount exceeds 256 bits.
pub fn merge_fee(
    mut existing: Vec<FeeEntry>,
    denom: &str,
    amount: Amount,
) -> Result<Vec<FeeEntry>, AmountError> {
    if let Some(entry) = existing.iter_mut().find(|entry| entry.denom == denom) {
        entry.amount = entry.amount.try_add(&amount)?;
    } else {
        existing.push(FeeEntry::new(denom, amount));
    }
    existing.sort_by(|a, b| a.denom.cmp(&b.denom));
    Ok(existing)
}

/// Adds the transfer tax owed on `amount` to a fee list.
///
/// The tax is paid in the transferred denomination. A tax that floors to zero
/// leaves the list untouched.
///
/// # Errors
///
/// Propagates overflow from [`tax_on`] and [`merge_fee`].
pub fn apply_transfer_tax(
    fees: Vec<FeeEntry>,
    denom: &str,
    amount: &Amount,
    rate: &TaxRate,
) -> Result<Vec<FeeEntry>, AmountError> {
    let tax = tax_on(amount, rate)?;
    if tax.is_zero() {
        return Ok(fees);
    }
    tracing::debug!(denom, %tax, %rate, "adding transfer tax to fee");
    merge_fee(fees, denom, tax)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use proptest::prelude::*;

    fn rate(value: f64) -> TaxRate {
        TaxRate::from_f64(value).unwrap()
    }

    // ------------------------------------------------------------------------
    // tax_on
    // ------------------------------------------------------------------------

    #[test]
    fn test_tax_on_floors() {
        let amount = Amount::from_u64(100);
        assert_eq!(tax_on(&amount, &rate(0.05)).unwrap(), Amount::from_u64(5));
        assert_eq!(tax_on(&amount, &rate(0.005)).unwrap(), Amount::ZERO);
        assert_eq!(tax_on(&amount, &rate(0.0)).unwrap(), Amount::ZERO);
        assert_eq!(tax_on(&amount, &rate(1e-9)).unwrap(), Amount::ZERO);
    }

    // ------------------------------------------------------------------------
    // merge_fee
    // ------------------------------------------------------------------------

    #[test]
    fn test_merge_same_denom_sums() {
        let fees = vec![FeeEntry::new("axpla", Amount::from_u64(10))];
        let fees = merge_fee(fees, "axpla", Amount::from_u64(5)).unwrap();
        assert_eq!(fees, vec![FeeEntry::new("axpla", Amount::from_u64(15))]);
    }

    #[test]
    fn test_merge_new_denom_sorts() {
        let fees = vec![FeeEntry::new("uusd", Amount::from_u64(1))];
        let fees = merge_fee(fees, "axpla", Amount::from_u64(5)).unwrap();
        assert_eq!(fees.len(), 2);
        assert_eq!(fees[0].denom, "axpla");
        assert_eq!(fees[1].denom, "uusd");
    }

    #[test]
    fn test_merge_into_empty() {
        let fees = merge_fee(Vec::new(), "uatom", Amount::from_u64(3)).unwrap();
        assert_eq!(fees, vec![FeeEntry::new("uatom", Amount::from_u64(3))]);
    }

    // ------------------------------------------------------------------------
    // apply_transfer_tax
    // ------------------------------------------------------------------------

    #[test]
    fn test_tax_with_gas_in_same_denom_yields_one_entry() {
        let fees = vec![FeeEntry::new("axpla", Amount::ZERO)];
        let fees = apply_transfer_tax(fees, "axpla", &Amount::from_u64(100), &rate(0.05)).unwrap();
        assert_eq!(fees, vec![FeeEntry::new("axpla", Amount::from_u64(5))]);
    }

    #[test]
    fn test_tax_with_alternate_gas_denom_yields_two_sorted_entries() {
        let fees = vec![FeeEntry::new("uusd", Amount::ZERO)];
        let fees = apply_transfer_tax(fees, "axpla", &Amount::from_u64(100), &rate(0.05)).unwrap();
        let denoms: Vec<_> = fees.iter().map(|f| f.denom.as_str()).collect();
        assert_eq!(denoms, ["axpla", "uusd"]);
        assert_eq!(fees[0].amount, Amount::from_u64(5));
    }

    #[test]
    fn test_zero_tax_is_not_merged() {
        let fees = vec![FeeEntry::new("uusd", Amount::from_u64(7))];
        let fees = apply_transfer_tax(fees, "axpla", &Amount::from_u64(100), &rate(1e-9)).unwrap();
        assert_eq!(fees, vec![FeeEntry::new("uusd", Amount::from_u64(7))]);
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    proptest! {
        #[test]
        fn prop_tax_never_exceeds_amount(amount in any::<u64>(), rate_millis in 0u32..1000) {
            let rate = TaxRate::new(crate::DecimalRatio::new(u128::from(rate_millis), 3)).unwrap();
            let amount = Amount::from_u64(amount);
            let tax = tax_on(&amount, &rate).unwrap();
            prop_assert!(tax <= amount);

            let exact = u128::from(amount.to_u64().unwrap()) * u128::from(rate_millis) / 1000;
            prop_assert_eq!(tax, Amount::from_u128(exact));
        }

        #[test]
        fn prop_merge_keeps_denoms_unique_and_sorted(
            items in proptest::collection::vec(("[a-d]", 0u64..1000), 0..12)
        ) {
            let mut fees = Vec::new();
            for (denom, amount) in &items {
                fees = merge_fee(fees, denom, Amount::from_u64(*amount)).unwrap();
            }
            for pair in fees.windows(2) {
                prop_assert!(pair[0].denom < pair[1].denom);
            }
            let total: u64 = items.iter().map(|(_, a)| a).sum();
            let merged: u64 = fees.iter().map(|f| f.amount.to_u64().unwrap()).sum();
            prop_assert_eq!(total, merged);
        }
    }
}
