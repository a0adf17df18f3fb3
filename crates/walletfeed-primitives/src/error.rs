//! Errors raised at the boundaries of the activity pipeline.

/// Boxed error of an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Decimal amount error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Invalid decimal amount: {0:?}")]
    InvalidAmount(String),
}

/// Remote ledger feed error.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// A fetched record does not carry the required fields.
    #[error("Malformed record at position {position}: {reason}")]
    MalformedRecord { position: usize, reason: String },
    #[error("Transport error: {0}")]
    Transport(BoxError),
}

/// Local history store error.
#[derive(Debug, thiserror::Error)]
#[error("Local history store error: {0}")]
pub struct StoreError(pub BoxError);

impl StoreError {
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self(err.into())
    }
}
