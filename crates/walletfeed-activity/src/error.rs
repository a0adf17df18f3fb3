use walletfeed_primitives::{AmountError, FeedError};

/// Activity pipeline error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to fetch ledger records: {0}")]
    Fetch(#[from] FeedError),

    #[error("Malformed record at height {height}, index {index}: {reason}")]
    MalformedRecord {
        height: u64,
        index: u64,
        reason: String,
    },

    #[error(transparent)]
    Amount(#[from] AmountError),
}

pub type Result<T> = std::result::Result<T, Error>;
