use thiserror::Error;

/// Failure of an on-chain read. The resolver never retries these; they are
/// propagated unchanged to the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rpc transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed call result: {0}")]
    Decode(String),
}
