/// Walletfeed node error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Activity(#[from] walletfeed_activity::Error),

    #[error(transparent)]
    Store(#[from] walletfeed_store::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    RegisterMethod(#[from] jsonrpsee::server::RegisterMethodError),

    #[error("Invalid log pattern: {0}")]
    InvalidLogPattern(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
