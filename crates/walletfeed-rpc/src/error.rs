use jsonrpsee::types::ErrorObjectOwned;
use jsonrpsee::types::error::ErrorObject;

/// Activity RPC Result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Activity RPC errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Activity(#[from] walletfeed_activity::Error),
    /// Other error type.
    #[error("{0}")]
    Other(String),
}

/// Base error code for RPC modules.
pub mod base {
    pub const ACTIVITY: i32 = 20000;
}

const BASE_ERROR: i32 = base::ACTIVITY;

impl From<Error> for ErrorObjectOwned {
    fn from(e: Error) -> ErrorObjectOwned {
        use walletfeed_activity::Error as ActivityError;

        let code = match &e {
            Error::Other(_) => BASE_ERROR + 1,
            Error::Activity(ActivityError::Fetch(_)) => BASE_ERROR + 2,
            Error::Activity(ActivityError::MalformedRecord { .. }) => BASE_ERROR + 3,
            Error::Activity(ActivityError::Amount(_)) => BASE_ERROR + 4,
        };

        ErrorObject::owned(code, e.to_string(), None::<()>)
    }
}
