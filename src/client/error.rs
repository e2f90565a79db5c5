use thiserror::Error;

/// Failure of a view's own data fetch.
///
/// Recovered locally by the owning view (inline error panel); other
/// views are unaffected and nothing here is fatal to the engine.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("gateway returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, ClientError::Status { status: 403, .. })
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
