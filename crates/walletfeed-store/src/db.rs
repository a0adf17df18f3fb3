//! SQLite persistence of the local history.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use walletfeed_primitives::{
    AccountId, LocalHistoryStore, LocalTxMetadata, OutputDescriptor, StoreError,
};

/// Local history store error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid JSON column {column} for txid {txid}: {source}")]
    InvalidColumn {
        column: &'static str,
        txid: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

type HistoryRow = (String, String, String, String, String, Option<String>);

/// SQLite database holding the transactions initiated by each local account.
#[derive(Clone)]
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    /// Opens or creates the database file at the given path.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .pragma("synchronous", "NORMAL");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;

        tracing::debug!(path = %path.display(), "Opened local history database");

        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS local_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                txid TEXT NOT NULL,
                fee TEXT NOT NULL,
                priority_fee TEXT NOT NULL,
                address TEXT NOT NULL,
                outputs TEXT NOT NULL,
                batch_output TEXT,
                UNIQUE (account_id, txid)
            );
            CREATE INDEX IF NOT EXISTS idx_local_history_account ON local_history(account_id, id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Records a transaction initiated by `account_id`.
    ///
    /// Recording a txid again updates the entry in place, keeping its position.
    pub async fn record(&self, account_id: AccountId, metadata: &LocalTxMetadata) -> Result<()> {
        let outputs = serde_json::to_string(&metadata.outputs).map_err(|source| {
            Error::InvalidColumn {
                column: "outputs",
                txid: metadata.txid.clone(),
                source,
            }
        })?;
        let batch_output = metadata
            .batch_output
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|source| Error::InvalidColumn {
                column: "batch_output",
                txid: metadata.txid.clone(),
                source,
            })?;

        sqlx::query(
            r#"
            INSERT INTO local_history
                (account_id, txid, fee, priority_fee, address, outputs, batch_output)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (account_id, txid) DO UPDATE SET
                fee = excluded.fee,
                priority_fee = excluded.priority_fee,
                address = excluded.address,
                outputs = excluded.outputs,
                batch_output = excluded.batch_output
            "#,
        )
        .bind(account_id as i64)
        .bind(&metadata.txid)
        .bind(&metadata.fee)
        .bind(&metadata.priority_fee)
        .bind(&metadata.address)
        .bind(outputs)
        .bind(batch_output)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes a transaction, returns whether it was present.
    pub async fn forget(&self, account_id: AccountId, txid: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM local_history WHERE account_id = ? AND txid = ?")
            .bind(account_id as i64)
            .bind(txid)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns the transactions of `account_id` in the order they were first recorded.
    pub async fn entries(&self, account_id: AccountId) -> Result<Vec<LocalTxMetadata>> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT txid, fee, priority_fee, address, outputs, batch_output
            FROM local_history
            WHERE account_id = ?
            ORDER BY id
            "#,
        )
        .bind(account_id as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::parse_row).collect()
    }

    fn parse_row(row: HistoryRow) -> Result<LocalTxMetadata> {
        let (txid, fee, priority_fee, address, outputs, batch_output) = row;

        let outputs: Vec<OutputDescriptor> =
            serde_json::from_str(&outputs).map_err(|source| Error::InvalidColumn {
                column: "outputs",
                txid: txid.clone(),
                source,
            })?;
        let batch_output = batch_output
            .as_deref()
            .map(serde_json::from_str::<serde_json::Value>)
            .transpose()
            .map_err(|source| Error::InvalidColumn {
                column: "batch_output",
                txid: txid.clone(),
                source,
            })?;

        Ok(LocalTxMetadata {
            txid,
            fee,
            priority_fee,
            address,
            outputs,
            batch_output,
        })
    }
}

#[async_trait::async_trait]
impl LocalHistoryStore for SqliteHistoryStore {
    async fn get(
        &self,
        account_id: AccountId,
    ) -> std::result::Result<Vec<LocalTxMetadata>, StoreError> {
        self.entries(account_id).await.map_err(StoreError::new)
    }
}
