//! Activity history RPC methods.

use crate::error::Error;
use crate::snapshot::{HistorySnapshots, SnapshotKey, SnapshotView};
use jsonrpsee::proc_macros::rpc;
use std::sync::Arc;
use walletfeed_activity::{
    ActivityPipeline, ActivityQuery, CalendarPeriod, PeriodKind, TimestampUnit, UtxoSort,
    aggregate_daily,
};
use walletfeed_primitives::{
    AccountId, AmountArithmetic, DailyBucket, HistoryType, LocalHistoryStore, MergedActivity,
    RemoteLedgerFeed, UtxoItem,
};

/// Activity API.
#[rpc(client, server)]
pub trait ActivityApi {
    /// Get the merged activity history, most recent first.
    ///
    /// The result also becomes the cached history of its account and history type, unless
    /// a later request for the same pair completed first.
    #[method(name = "activity_getHistory")]
    async fn get_history(&self, query: ActivityQuery) -> Result<Vec<MergedActivity>, Error>;

    /// Get send/receive totals per calendar period.
    #[method(name = "activity_getDailyTotals")]
    async fn get_daily_totals(
        &self,
        query: ActivityQuery,
        period: Option<PeriodKind>,
        timestamp_unit: Option<TimestampUnit>,
    ) -> Result<Vec<DailyBucket>, Error>;

    /// Get the spendable outputs of the wallet.
    #[method(name = "activity_getAvailableUtxos")]
    async fn get_available_utxos(
        &self,
        server_url: String,
        sort: Option<UtxoSort>,
        contain_locked: Option<bool>,
    ) -> Result<Vec<UtxoItem>, Error>;

    /// Get the last stored activity history of an account and history type without
    /// refetching.
    #[method(name = "activity_cachedHistory")]
    fn cached_history(
        &self,
        account_id: AccountId,
        history_type: Option<HistoryType>,
    ) -> Result<SnapshotView, Error>;
}

/// Activity RPC implementation.
pub struct Activity<Feed, Store, Arith> {
    pipeline: Arc<ActivityPipeline<Feed, Store, Arith>>,
    snapshots: Arc<HistorySnapshots>,
}

impl<Feed, Store, Arith> Activity<Feed, Store, Arith>
where
    Feed: RemoteLedgerFeed,
    Store: LocalHistoryStore,
    Arith: AmountArithmetic,
{
    /// Create a new Activity RPC.
    pub fn new(
        pipeline: Arc<ActivityPipeline<Feed, Store, Arith>>,
        snapshots: Arc<HistorySnapshots>,
    ) -> Self {
        Self {
            pipeline,
            snapshots,
        }
    }
}

#[async_trait::async_trait]
impl<Feed, Store, Arith> ActivityApiServer for Activity<Feed, Store, Arith>
where
    Feed: RemoteLedgerFeed + 'static,
    Store: LocalHistoryStore + 'static,
    Arith: AmountArithmetic + 'static,
{
    async fn get_history(&self, query: ActivityQuery) -> Result<Vec<MergedActivity>, Error> {
        let snapshot = self.snapshots.get_or_create(SnapshotKey {
            account_id: query.account_id,
            history_type: query.history_type,
        });
        let activity = snapshot.refresh(self.pipeline.query(&query)).await?;
        Ok(activity)
    }

    async fn get_daily_totals(
        &self,
        query: ActivityQuery,
        period: Option<PeriodKind>,
        timestamp_unit: Option<TimestampUnit>,
    ) -> Result<Vec<DailyBucket>, Error> {
        let activity = self.pipeline.query(&query).await?;
        let policy = CalendarPeriod::new(
            period.unwrap_or_default(),
            timestamp_unit.unwrap_or_default(),
        );
        Ok(aggregate_daily(
            &activity,
            &policy,
            self.pipeline.arithmetic(),
        )?)
    }

    async fn get_available_utxos(
        &self,
        server_url: String,
        sort: Option<UtxoSort>,
        contain_locked: Option<bool>,
    ) -> Result<Vec<UtxoItem>, Error> {
        Ok(self
            .pipeline
            .available_utxos(
                &server_url,
                sort.unwrap_or_default(),
                contain_locked.unwrap_or(false),
            )
            .await?)
    }

    fn cached_history(
        &self,
        account_id: AccountId,
        history_type: Option<HistoryType>,
    ) -> Result<SnapshotView, Error> {
        Ok(self.snapshots.view(SnapshotKey {
            account_id,
            history_type: history_type.unwrap_or_default(),
        }))
    }
}
