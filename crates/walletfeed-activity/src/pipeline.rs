//! Fetch, group, merge, filter and sort.

use crate::error::{Error, Result};
use crate::height::group_by_height;
use crate::merger::{HistoryMerger, LocalHistory};
use crate::utxos::{UtxoSort, list_available_utxos};
use serde::{Deserialize, Serialize};
use walletfeed_primitives::{
    AccountId, AmountArithmetic, HistoryType, LocalHistoryStore, MergedActivity, RawLedgerRecord,
    RemoteLedgerFeed, UtxoItem,
};

/// Parameters of an activity history query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    /// Remote source selector, handed to the feed untouched.
    pub server_url: String,
    pub account_id: AccountId,
    #[serde(default)]
    pub history_type: HistoryType,
}

/// The activity history pipeline.
///
/// Every invocation works on its own intermediate values and returns a fresh result,
/// concurrent invocations do not observe each other.
pub struct ActivityPipeline<Feed, Store, Arith> {
    feed: Feed,
    store: Store,
    arith: Arith,
}

impl<Feed, Store, Arith> ActivityPipeline<Feed, Store, Arith>
where
    Feed: RemoteLedgerFeed,
    Store: LocalHistoryStore,
    Arith: AmountArithmetic,
{
    /// Creates a new instance of [`ActivityPipeline`].
    pub fn new(feed: Feed, store: Store, arith: Arith) -> Self {
        Self { feed, store, arith }
    }

    /// Returns the amount arithmetic in use.
    pub fn arithmetic(&self) -> &Arith {
        &self.arith
    }

    /// Fetches the ledger records of `query.server_url` and runs the pipeline over them.
    ///
    /// A fetch failure is returned as is, no partial result is produced.
    pub async fn query(&self, query: &ActivityQuery) -> Result<Vec<MergedActivity>> {
        let records = self.feed.fetch(&query.server_url).await?;

        tracing::debug!(
            server_url = %query.server_url,
            records = records.len(),
            "Fetched ledger records"
        );

        self.run(&records, query.account_id, query.history_type).await
    }

    /// Runs the pipeline over an already fetched batch.
    pub async fn run(
        &self,
        records: &[RawLedgerRecord],
        account_id: AccountId,
        history_type: HistoryType,
    ) -> Result<Vec<MergedActivity>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        validate_records(records, &self.arith)?;

        let local = LocalHistory::from_store_result(account_id, self.store.get(account_id).await);

        build_activity(records, &local, history_type, &self.arith)
    }

    /// Fetches the spendable outputs of `server_url`, sorted and filtered.
    pub async fn available_utxos(
        &self,
        server_url: &str,
        sort: UtxoSort,
        contain_locked: bool,
    ) -> Result<Vec<UtxoItem>> {
        let items = self.feed.fetch_available_utxos(server_url).await?;
        list_available_utxos(items, sort, contain_locked, &self.arith)
    }
}

/// Rejects records whose amount is not a decimal number.
pub fn validate_records<A>(records: &[RawLedgerRecord], arith: &A) -> Result<()>
where
    A: AmountArithmetic + ?Sized,
{
    for record in records {
        if let Err(err) = arith.is_negative(&record.amount) {
            return Err(Error::MalformedRecord {
                height: record.height,
                index: record.index,
                reason: err.to_string(),
            });
        }
    }
    Ok(())
}

/// Groups, merges, filters and sorts a validated batch.
///
/// The output holds at most one activity per distinct height, most recent first. Entries
/// with equal timestamps keep their grouping order.
pub fn build_activity<A>(
    records: &[RawLedgerRecord],
    local: &LocalHistory,
    history_type: HistoryType,
    arith: &A,
) -> Result<Vec<MergedActivity>>
where
    A: AmountArithmetic + ?Sized,
{
    let groups = group_by_height(records, arith)?;
    let total_groups = groups.len();

    let mut merger = HistoryMerger::new(records, local, arith);
    let mut activity = Vec::with_capacity(total_groups);

    for group in groups {
        let merged = merger.merge(group)?;
        if history_type.matches(merged.direction()) {
            activity.push(merged);
        }
    }

    activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    tracing::debug!(
        records = records.len(),
        heights = total_groups,
        kept = activity.len(),
        %history_type,
        "Built activity history"
    );

    Ok(activity)
}
