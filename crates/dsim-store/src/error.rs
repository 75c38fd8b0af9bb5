use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store {store:?} has no method {method:?}")]
    UnknownMethod { store: String, method: String },

    #[error("store {store:?} method {method:?} got malformed arguments: {reason}")]
    MalformedArgs {
        store: String,
        method: String,
        reason: String,
    },

    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
