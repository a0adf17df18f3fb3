//! Grouping of raw ledger records by block height.

use crate::error::Result;
use indexmap::IndexMap;
use indexmap::map::Entry;
use walletfeed_primitives::{AmountArithmetic, RawLedgerRecord};

/// All records of one block height folded into one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightGroup {
    pub height: u64,
    /// Exact sum of the amounts of every record at this height.
    pub amount: String,
    /// Last non-empty txid seen at this height.
    pub txid: Option<String>,
    /// Index of the first record at this height.
    pub index: u64,
    /// Timestamp of the first record at this height.
    pub timestamp: u64,
    /// Release date of the first record at this height.
    pub release_date: Option<serde_json::Value>,
}

impl HeightGroup {
    fn new(record: &RawLedgerRecord) -> Self {
        Self {
            height: record.height,
            amount: record.amount.clone(),
            txid: record.txid().map(ToString::to_string),
            index: record.index,
            timestamp: record.timestamp,
            release_date: record.release_date.clone(),
        }
    }
}

/// Folds `records` into one [`HeightGroup`] per distinct height.
///
/// Heights keep their first-encounter order. When several records at a height carry a
/// txid, the later one wins; an empty txid never overwrites one already set.
pub fn group_by_height<A>(records: &[RawLedgerRecord], arith: &A) -> Result<Vec<HeightGroup>>
where
    A: AmountArithmetic + ?Sized,
{
    let mut groups: IndexMap<u64, HeightGroup> = IndexMap::with_capacity(records.len());

    for record in records {
        match groups.entry(record.height) {
            Entry::Occupied(mut entry) => {
                let group = entry.get_mut();
                group.amount = arith.add(&group.amount, &record.amount)?;
                if let Some(txid) = record.txid() {
                    group.txid = Some(txid.to_string());
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(HeightGroup::new(record));
            }
        }
    }

    Ok(groups.into_values().collect())
}
