//! Result of one execution: response head, body handle, error, timing.

use crate::error::{HttpCallError, HttpCallResult};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use std::time::Duration;

/// Outcome of a single execution.
///
/// On success the response head (status, headers, cookies) is captured
/// eagerly so the accessors keep working after the body has been drained;
/// the body itself stays unread until [`RequestOutcome::body_bytes`] is
/// called. On failure only the error is set.
#[derive(Debug)]
pub struct RequestOutcome {
    response: Option<Response>,
    status: Option<StatusCode>,
    headers: Option<HeaderMap>,
    cookies: Vec<(String, String)>,
    elapsed: Option<Duration>,
    error: Option<HttpCallError>,
}

impl RequestOutcome {
    pub(crate) fn success(response: Response, elapsed: Duration) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let cookies = response
            .cookies()
            .map(|c| (c.name().to_string(), c.value().to_string()))
            .collect();
        Self {
            response: Some(response),
            status: Some(status),
            headers: Some(headers),
            cookies,
            elapsed: Some(elapsed),
            error: None,
        }
    }

    pub(crate) fn failure(error: HttpCallError) -> Self {
        Self {
            response: None,
            status: None,
            headers: None,
            cookies: Vec::new(),
            elapsed: None,
            error: Some(error),
        }
    }

    /// True when a response was obtained, regardless of its status code.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&HttpCallError> {
        self.error.as_ref()
    }

    /// Drain the response body. Consumes the stored body handle: a second
    /// call, or a call after a failed execution, returns a read error. The
    /// response head accessors remain usable afterwards.
    pub async fn body_bytes(&mut self) -> HttpCallResult<Vec<u8>> {
        let response = self.response.take().ok_or_else(|| {
            HttpCallError::Read(
                "response body already consumed or no response available".to_string(),
            )
        })?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpCallError::Read(format!("failed to read response body: {e}")))?;
        Ok(bytes.to_vec())
    }

    /// True while the body is still available to read.
    pub fn body_available(&self) -> bool {
        self.response.is_some()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status.map(|s| s.as_u16())
    }

    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.as_ref()?.get(CONTENT_TYPE)?.to_str().ok()
    }

    /// Cookies the server set on this response.
    pub fn cookies(&self) -> &[(String, String)] {
        &self.cookies
    }

    /// Dispatch start to response-head received. `None` when the call failed
    /// before a response was obtained.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_outcome_has_no_response_state() {
        let mut outcome =
            RequestOutcome::failure(HttpCallError::Connect("refused".to_string()));

        assert!(!outcome.is_success());
        assert!(outcome.error().is_some());
        assert!(outcome.status_code().is_none());
        assert!(outcome.headers().is_none());
        assert!(outcome.elapsed().is_none());
        assert!(!outcome.body_available());

        match outcome.body_bytes().await {
            Err(HttpCallError::Read(_)) => {}
            other => panic!("expected read error, got {other:?}"),
        }
    }
}
