use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use walletfeed_amount::DecimalAmount;
use walletfeed_primitives::{FeedError, RawLedgerRecord, RemoteLedgerFeed, UtxoItem};

const HISTORY_PATH: &str = "rpc/wallet/history";
const AVAILABLE_UTXOS_PATH: &str = "rpc/wallet/available_utxos";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    HttpRequestError(#[from] reqwest::Error),
    #[error("Unexpected response from {url}: expected a JSON array")]
    NotAnArray { url: String },
}

impl From<ApiError> for FeedError {
    fn from(err: ApiError) -> Self {
        FeedError::Transport(Box::new(err))
    }
}

/// Client for the wallet endpoints of the remote ledger service.
pub struct HttpLedgerFeed {
    client: Client,
}

impl HttpLedgerFeed {
    /// Create a new instance of [`HttpLedgerFeed`].
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    async fn get_array(&self, server_url: &str, path: &str) -> Result<Vec<Value>, ApiError> {
        let url = format!("{}/{path}", server_url.trim_end_matches('/'));

        let value: Value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match value {
            Value::Array(items) => {
                tracing::debug!(%url, items = items.len(), "Fetched wallet endpoint");
                Ok(items)
            }
            _ => Err(ApiError::NotAnArray { url }),
        }
    }
}

#[async_trait::async_trait]
impl RemoteLedgerFeed for HttpLedgerFeed {
    async fn fetch(&self, source: &str) -> Result<Vec<RawLedgerRecord>, FeedError> {
        let items = self.get_array(source, HISTORY_PATH).await?;
        decode_records(items)
    }

    async fn fetch_available_utxos(&self, source: &str) -> Result<Vec<UtxoItem>, FeedError> {
        let items = self.get_array(source, AVAILABLE_UTXOS_PATH).await?;
        decode_utxos(items)
    }
}

fn malformed(position: usize, reason: impl ToString) -> FeedError {
    FeedError::MalformedRecord {
        position,
        reason: reason.to_string(),
    }
}

fn check_amount(position: usize, amount: &str) -> Result<(), FeedError> {
    amount
        .parse::<DecimalAmount>()
        .map(|_| ())
        .map_err(|err| malformed(position, err))
}

/// Decodes every element of a history response, rejecting the batch at the first
/// malformed element.
pub fn decode_records(items: Vec<Value>) -> Result<Vec<RawLedgerRecord>, FeedError> {
    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            let record: RawLedgerRecord =
                serde_json::from_value(item).map_err(|err| malformed(position, err))?;
            check_amount(position, &record.amount)?;
            Ok(record)
        })
        .collect()
}

/// Decodes every element of an available UTXO response.
pub fn decode_utxos(items: Vec<Value>) -> Result<Vec<UtxoItem>, FeedError> {
    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            let utxo: UtxoItem =
                serde_json::from_value(item).map_err(|err| malformed(position, err))?;
            check_amount(position, &utxo.amount)?;
            Ok(utxo)
        })
        .collect()
}
