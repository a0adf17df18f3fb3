//! Enrichment of height groups with locally known transaction metadata.

use crate::error::Result;
use crate::height::HeightGroup;
use std::collections::HashMap;
use walletfeed_primitives::{
    AccountId, AmountArithmetic, Direction, LocalTxMetadata, MergedActivity, RawLedgerRecord,
    StoreError, UtxoDetail,
};

/// Local transaction metadata of an account, indexed by txid.
#[derive(Debug, Clone, Default)]
pub struct LocalHistory {
    by_txid: HashMap<String, LocalTxMetadata>,
}

impl LocalHistory {
    /// Indexes `entries` by txid. The first entry recorded for a txid is kept.
    pub fn new(entries: Vec<LocalTxMetadata>) -> Self {
        let mut by_txid = HashMap::with_capacity(entries.len());
        for entry in entries {
            by_txid.entry(entry.txid.clone()).or_insert(entry);
        }
        Self { by_txid }
    }

    /// Builds the local history from the outcome of a store read.
    ///
    /// A failed read yields an empty history so that merging proceeds without local
    /// metadata.
    pub fn from_store_result(
        account_id: AccountId,
        result: std::result::Result<Vec<LocalTxMetadata>, StoreError>,
    ) -> Self {
        match result {
            Ok(entries) => Self::new(entries),
            Err(err) => {
                tracing::warn!(
                    account_id,
                    ?err,
                    "Failed to read local history, merging without local metadata"
                );
                Self::default()
            }
        }
    }

    pub fn get(&self, txid: &str) -> Option<&LocalTxMetadata> {
        self.by_txid.get(txid)
    }

    pub fn len(&self) -> usize {
        self.by_txid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_txid.is_empty()
    }
}

/// Turns [`HeightGroup`]s of one fetched batch into [`MergedActivity`]s.
pub struct HistoryMerger<'a, A: ?Sized> {
    arith: &'a A,
    local: &'a LocalHistory,
    utxos_by_height: HashMap<u64, Vec<UtxoDetail>>,
}

impl<'a, A> HistoryMerger<'a, A>
where
    A: AmountArithmetic + ?Sized,
{
    /// Creates a merger for the batch `records`, the same batch the groups were built from.
    pub fn new(records: &[RawLedgerRecord], local: &'a LocalHistory, arith: &'a A) -> Self {
        let mut utxos_by_height: HashMap<u64, Vec<UtxoDetail>> = HashMap::new();
        for record in records {
            utxos_by_height
                .entry(record.height)
                .or_default()
                .push(UtxoDetail {
                    id: record.index,
                    amount: record.amount.clone(),
                });
        }

        Self {
            arith,
            local,
            utxos_by_height,
        }
    }

    /// Merges one height group.
    ///
    /// Each height of the batch is expected to be merged once; the per-output details
    /// of the height are handed over to the returned activity.
    pub fn merge(&mut self, group: HeightGroup) -> Result<MergedActivity> {
        let HeightGroup {
            height,
            amount,
            txid,
            index,
            timestamp,
            release_date,
        } = group;

        let magnitude = self.arith.positive_fixed(&amount)?;
        let direction = Direction::from_negative(self.arith.is_negative(&amount)?);

        let local = self.local;
        let metadata = txid.as_deref().and_then(|txid| local.get(txid));
        if txid.is_some() && metadata.is_none() {
            tracing::trace!(height, ?txid, "No local metadata for transaction");
        }

        Ok(MergedActivity {
            fee: metadata.map(|m| m.fee.clone()),
            priority_fee: metadata.map(|m| m.priority_fee.clone()),
            from: metadata.map(|m| m.address.clone()),
            outputs: metadata.map(|m| m.outputs.clone()),
            batch_output: metadata.and_then(|m| m.batch_output.clone()),
            txid,
            message: direction.message(&magnitude),
            change_amount: direction.change_amount(&magnitude),
            timestamp,
            height,
            index,
            release_date,
            utxos: self.utxos_by_height.remove(&height).unwrap_or_default(),
        })
    }
}
