use crate::cli::params::CommonParams;
use crate::error::{Error, Result};
use std::path::Path;
use walletfeed_primitives::{AccountId, LocalTxMetadata};
use walletfeed_store::SqliteHistoryStore;

/// Local transaction history.
#[derive(Debug, Clone, clap::Subcommand)]
pub enum LocalTx {
    /// Record a transaction initiated by this wallet.
    ///
    /// Recording a txid again replaces its metadata.
    Record {
        /// Transaction metadata as JSON, e.g.
        /// `{"txid":"..","fee":"0.01","priorityFee":"0","address":"..","outputs":[]}`.
        metadata: String,
    },

    /// Forget a recorded transaction.
    Forget {
        /// Id of the transaction.
        txid: String,
    },

    /// Print the recorded transactions.
    List,
}

impl LocalTx {
    pub async fn execute(self, common_params: &CommonParams) -> Result<()> {
        let Some(db_path) = &common_params.db_path else {
            return Err(Error::Other(
                "--db-path is required to manage local transactions".to_string(),
            ));
        };

        let store = SqliteHistoryStore::open(db_path).await?;
        apply(self, &store, common_params.account_id, db_path).await
    }
}

async fn apply(
    cmd: LocalTx,
    store: &SqliteHistoryStore,
    account_id: AccountId,
    db_path: &Path,
) -> Result<()> {
    match cmd {
        LocalTx::Record { metadata } => {
            let metadata: LocalTxMetadata = serde_json::from_str(&metadata)?;
            store.record(account_id, &metadata).await?;
            tracing::info!(account_id, txid = %metadata.txid, "Recorded local transaction");
        }
        LocalTx::Forget { txid } => {
            if store.forget(account_id, &txid).await? {
                tracing::info!(account_id, %txid, "Forgot local transaction");
            } else {
                tracing::warn!(account_id, %txid, db = %db_path.display(), "Unknown local transaction");
            }
        }
        LocalTx::List => {
            let entries = store.entries(account_id).await?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    Ok(())
}
