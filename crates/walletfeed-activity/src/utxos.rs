//! Listing of spendable outputs.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use walletfeed_primitives::{AmountArithmetic, UtxoItem};

/// Order of listed outputs, largest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UtxoSort {
    #[default]
    Amount,
    Id,
}

/// Sorts `items` in descending order of `sort`, dropping locked outputs unless
/// `contain_locked` is set.
pub fn list_available_utxos<A>(
    mut items: Vec<UtxoItem>,
    sort: UtxoSort,
    contain_locked: bool,
    arith: &A,
) -> Result<Vec<UtxoItem>>
where
    A: AmountArithmetic + ?Sized,
{
    if !contain_locked {
        items.retain(|item| !item.locked);
    }

    match sort {
        UtxoSort::Amount => {
            for item in &items {
                arith.is_negative(&item.amount)?;
            }
            // Amounts are validated above.
            items.sort_by(|a, b| {
                arith
                    .compare(&b.amount, &a.amount)
                    .unwrap_or(Ordering::Equal)
            });
        }
        UtxoSort::Id => items.sort_by(|a, b| b.id.cmp(&a.id)),
    }

    Ok(items)
}
