//! Primitives for the wallet activity feed.
//!
//! Holds the data model exchanged between the remote ledger, the local history
//! store and the activity pipeline, together with the capability traits the
//! pipeline consumes.

mod error;
mod types;

pub use error::{AmountError, BoxError, FeedError, StoreError};
pub use types::{
    AccountId, DailyBucket, Direction, HistoryType, LocalTxMetadata, MergedActivity,
    OutputDescriptor, RawLedgerRecord, UtxoDetail, UtxoItem,
};

use std::cmp::Ordering;
use std::sync::Arc;

/// Exact arithmetic over string-encoded decimal amounts.
pub trait AmountArithmetic: Send + Sync {
    /// Returns the exact sum of `a` and `b`.
    fn add(&self, a: &str, b: &str) -> Result<String, AmountError>;

    /// Returns the absolute value of `amount` in fixed notation.
    fn positive_fixed(&self, amount: &str) -> Result<String, AmountError>;

    /// Whether the decimal value of `amount` is below zero.
    fn is_negative(&self, amount: &str) -> Result<bool, AmountError>;

    /// Compares two amounts by decimal value.
    fn compare(&self, a: &str, b: &str) -> Result<Ordering, AmountError>;
}

/// Read access to the metadata of locally initiated transactions.
#[async_trait::async_trait]
pub trait LocalHistoryStore: Send + Sync {
    /// Returns every locally recorded transaction of the account.
    async fn get(&self, account_id: AccountId) -> Result<Vec<LocalTxMetadata>, StoreError>;
}

/// Source of raw per-output ledger records.
///
/// `source` selects the remote endpoint and is opaque to the pipeline.
#[async_trait::async_trait]
pub trait RemoteLedgerFeed: Send + Sync {
    /// Fetches the raw activity records of the wallet.
    async fn fetch(&self, source: &str) -> Result<Vec<RawLedgerRecord>, FeedError>;

    /// Fetches the spendable outputs of the wallet.
    async fn fetch_available_utxos(&self, source: &str) -> Result<Vec<UtxoItem>, FeedError>;
}

#[async_trait::async_trait]
impl<T: LocalHistoryStore + ?Sized> LocalHistoryStore for Arc<T> {
    async fn get(&self, account_id: AccountId) -> Result<Vec<LocalTxMetadata>, StoreError> {
        (**self).get(account_id).await
    }
}

#[async_trait::async_trait]
impl<T: RemoteLedgerFeed + ?Sized> RemoteLedgerFeed for Arc<T> {
    async fn fetch(&self, source: &str) -> Result<Vec<RawLedgerRecord>, FeedError> {
        (**self).fetch(source).await
    }

    async fn fetch_available_utxos(&self, source: &str) -> Result<Vec<UtxoItem>, FeedError> {
        (**self).fetch_available_utxos(source).await
    }
}

impl<T: AmountArithmetic + ?Sized> AmountArithmetic for Arc<T> {
    fn add(&self, a: &str, b: &str) -> Result<String, AmountError> {
        (**self).add(a, b)
    }

    fn positive_fixed(&self, amount: &str) -> Result<String, AmountError> {
        (**self).positive_fixed(amount)
    }

    fn is_negative(&self, amount: &str) -> Result<bool, AmountError> {
        (**self).is_negative(amount)
    }

    fn compare(&self, a: &str, b: &str) -> Result<Ordering, AmountError> {
        (**self).compare(a, b)
    }
}
