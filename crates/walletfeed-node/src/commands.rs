pub mod daily;
pub mod history;
pub mod local_tx;
pub mod serve;
pub mod utxos;

use crate::cli::params::CommonParams;
use crate::error::Result;
use crate::rpc_client::HttpLedgerFeed;
use std::sync::Arc;
use walletfeed_activity::{ActivityPipeline, ActivityQuery};
use walletfeed_amount::ExactArithmetic;
use walletfeed_primitives::{HistoryType, LocalHistoryStore};
use walletfeed_store::{InMemHistoryStore, SqliteHistoryStore};

pub type Pipeline = ActivityPipeline<HttpLedgerFeed, Arc<dyn LocalHistoryStore>, ExactArithmetic>;

/// Opens the local history configured by `--db-path`, an empty one if unset.
async fn local_history_store(common_params: &CommonParams) -> Result<Arc<dyn LocalHistoryStore>> {
    let store: Arc<dyn LocalHistoryStore> = match &common_params.db_path {
        Some(path) => Arc::new(SqliteHistoryStore::open(path).await?),
        None => Arc::new(InMemHistoryStore::new()),
    };
    Ok(store)
}

pub async fn new_pipeline(common_params: &CommonParams) -> Result<Pipeline> {
    Ok(ActivityPipeline::new(
        HttpLedgerFeed::new(),
        local_history_store(common_params).await?,
        ExactArithmetic,
    ))
}

fn activity_query(common_params: &CommonParams, history_type: HistoryType) -> ActivityQuery {
    ActivityQuery {
        server_url: common_params.server_url.clone(),
        account_id: common_params.account_id,
        history_type,
    }
}
