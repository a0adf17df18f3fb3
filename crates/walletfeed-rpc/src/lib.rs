//! JSON-RPC surface of the wallet activity feed.

mod activity;
mod error;
mod snapshot;

pub use activity::{Activity, ActivityApiClient, ActivityApiServer};
pub use error::{Error, Result, base};
pub use snapshot::{
    HistorySnapshot, HistorySnapshots, RefreshTicket, SnapshotKey, SnapshotView,
};

use std::sync::Arc;
use walletfeed_activity::ActivityPipeline;
use walletfeed_primitives::{AmountArithmetic, LocalHistoryStore, RemoteLedgerFeed};

/// Walletfeed RPC.
pub struct WalletfeedRpc<Feed, Store, Arith> {
    /// Activity RPC.
    pub activity: Activity<Feed, Store, Arith>,
}

impl<Feed, Store, Arith> WalletfeedRpc<Feed, Store, Arith>
where
    Feed: RemoteLedgerFeed + 'static,
    Store: LocalHistoryStore + 'static,
    Arith: AmountArithmetic + 'static,
{
    /// Creates a new instance of [`WalletfeedRpc`].
    pub fn new(
        pipeline: Arc<ActivityPipeline<Feed, Store, Arith>>,
        snapshots: Arc<HistorySnapshots>,
    ) -> Self {
        Self {
            activity: Activity::new(pipeline, snapshots),
        }
    }

    /// Merges the Walletfeed RPC components into a given RPC method registry.
    pub fn merge_into(
        self,
        module: &mut jsonrpsee::Methods,
    ) -> std::result::Result<(), jsonrpsee::server::RegisterMethodError> {
        let Self { activity } = self;

        module.merge(activity.into_rpc())?;

        Ok(())
    }
}
