//! Error taxonomy for request construction, dispatch, and body reading.

#[derive(Debug, thiserror::Error)]
pub enum HttpCallError {
    /// Malformed proxy URL, target URL, header, or transport build failure.
    /// Raised before anything is sent on the wire.
    #[error("construction error: {0}")]
    Construction(String),

    /// Dial failed or timed out before a connection was established.
    #[error("connect error: {0}")]
    Connect(String),

    /// Connection was established but the read-write deadline elapsed or the
    /// connection was reset during the exchange.
    #[error("transfer error: {0}")]
    Transfer(String),

    /// The response body stream errored, was exhausted, or was already
    /// consumed by an earlier read.
    #[error("read error: {0}")]
    Read(String),

    /// Transport errors that are neither connect nor timeout shaped.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type HttpCallResult<T> = Result<T, HttpCallError>;

impl HttpCallError {
    /// Map a transport error onto the taxonomy above.
    pub(crate) fn classify(err: reqwest::Error) -> Self {
        if err.is_connect() {
            HttpCallError::Connect(err.to_string())
        } else if err.is_timeout() {
            HttpCallError::Transfer(err.to_string())
        } else if err.is_builder() {
            HttpCallError::Construction(err.to_string())
        } else {
            HttpCallError::Http(err)
        }
    }

    /// True for errors raised before dispatch.
    pub fn is_construction(&self) -> bool {
        matches!(self, HttpCallError::Construction(_))
    }
}
