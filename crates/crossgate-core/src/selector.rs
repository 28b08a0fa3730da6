//! Multi-source balance splitting.
//!
//! When no single account or output can cover a transfer, the amount is
//! split across several sources. The caller's ordering is authoritative: the
//! selector never sorts by balance, because account priority may encode
//! privacy or account-closing intent the selector cannot see.
//!
//! # Algorithm
//!
//! Sources are walked in order with a running total. A source whose full
//! balance still fits under the requested amount is consumed entirely; the
//! first source that would overshoot contributes exactly the remainder and
//! ends the walk. If the sources together hold less than the requested
//! amount, nothing is returned.
//!
//! ```
//! use crossgate_core::selector::{select, SourceAccount};
//! use crossgate_core::Amount;
//!
//! let sources = vec![
//!     SourceAccount::new("a", Amount::from_u64(100)),
//!     SourceAccount::new("b", Amount::from_u64(100)),
//! ];
//! let picked = select(&sources, &Amount::from_u64(150)).unwrap();
//! assert_eq!(picked.len(), 2);
//! assert_eq!(picked[1].amount, Amount::from_u64(50));
//! ```

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::SelectError;

/// A candidate source with its known balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAccount<A> {
    /// Opaque account reference (token account, outpoint, ...).
    pub account: A,
    /// Balance in smallest units.
    pub balance: Amount,
}

impl<A> SourceAccount<A> {
    /// Creates a source account.
    #[must_use]
    pub const fn new(account: A, balance: Amount) -> Self {
        Self { account, balance }
    }
}

/// A portion of the transfer drawn from one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAmount<A> {
    /// The source account.
    pub account: A,
    /// Amount drawn from it.
    pub amount: Amount,
}

/// Splits `amount` across `sources` in the given order.
///
/// Zero-balance sources contribute nothing and produce no entry.
///
/// # Errors
///
/// - [`SelectError::InvalidAmount`] if `amount` is zero
/// - [`SelectError::Insufficient`] if all balances together are below `amount`
pub fn select<A: Clone>(
    sources: &[SourceAccount<A>],
    amount: &Amount,
) -> Result<Vec<SourceAmount<A>>, SelectError> {
    if amount.is_zero() {
        return Err(SelectError::InvalidAmount);
    }

    let available = sources
        .iter()
        .try_fold(Amount::ZERO, |sum, source| sum.checked_add(&source.balance));
    // A sum past 256 bits is necessarily enough.
    if let Some(available) = available {
        if available < *amount {
            return Err(SelectError::Insufficient {
                requested: *amount,
                available,
                shortfall: amount.saturating_sub(&available),
            });
        }
    }

    let mut selected = Vec::new();
    let mut running = Amount::ZERO;
    for source in sources {
        if source.balance.is_zero() {
            continue;
        }
        let remainder = amount.saturating_sub(&running);
        if source.balance <= remainder {
            selected.push(SourceAmount {
                account: source.account.clone(),
                amount: source.balance,
            });
            // balance <= remainder, so the sum stays within `amount`.
            running = running.checked_add(&source.balance).unwrap_or(*amount);
        } else {
            selected.push(SourceAmount {
                account: source.account.clone(),
                amount: remainder,
            });
            running = *amount;
        }
        if running == *amount {
            break;
        }
    }

    Ok(selected)
}
