use thiserror::Error;

/// A request against the todo API that did not succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Connection refused, timeout, or any failure before a status arrived.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered 404: the id does not exist (or no longer does).
    #[error("resource not found")]
    NotFound,

    /// Any other non-2xx status, with the response body as text.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx response whose body did not parse as the expected JSON.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool { matches!(self, ApiError::NotFound) }
}
