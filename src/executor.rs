//! The request executor: assembles requests from the stored configuration,
//! dispatches them, and records the outcome.

use crate::config::{Method, RequestConfig, TimeoutConfig, TlsVerify};
use crate::error::{HttpCallError, HttpCallResult};
use crate::outcome::RequestOutcome;
use crate::timeout::TimeoutPolicy;
use crate::transport::TransportCache;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE, COOKIE, REFERER};
use reqwest::Response;
use std::collections::HashMap;
use std::time::{Duration, Instant};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Configurable HTTP request helper.
///
/// Accumulates request settings, executes requests one at a time, and keeps
/// the last outcome for the accessor methods. `execute` takes `&mut self`,
/// so the configuration cannot be mutated while a call is in flight on the
/// same executor; tasks needing independent settings use their own instance.
///
/// ```no_run
/// # async fn run() -> Result<(), httpcall::HttpCallError> {
/// use httpcall::RequestExecutor;
///
/// let mut executor = RequestExecutor::new();
/// executor.set_referer("https://example.com/");
/// executor.set_timeout(10, 30);
///
/// executor.get("https://example.com/api").await;
/// let status = executor.status_code();
/// let body = executor.body_bytes().await?;
/// # let _ = (status, body);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct RequestExecutor {
    config: RequestConfig,
    transports: TransportCache,
    outcome: Option<RequestOutcome>,
}

impl RequestExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RequestConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Set the `Referer` header. An empty string clears it.
    pub fn set_referer(&mut self, referer: impl Into<String>) {
        let referer = referer.into();
        self.config.referer = if referer.is_empty() { None } else { Some(referer) };
    }

    /// Replace the configured headers wholesale.
    pub fn set_headers(&mut self, headers: HashMap<String, String>) {
        self.config.headers = headers;
    }

    /// Add or replace a single header.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.config.headers.insert(name.into(), value.into());
    }

    /// Replace the configured cookies wholesale.
    pub fn set_cookies(&mut self, cookies: HashMap<String, String>) {
        self.config.cookies = cookies;
    }

    /// Add or replace a single cookie; last write per name wins.
    pub fn cookie(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.config.cookies.insert(name.into(), value.into());
    }

    /// Route all outbound connections through the given proxy.
    pub fn set_proxy(&mut self, proxy_url: impl Into<String>) {
        self.config.proxy_url = Some(proxy_url.into());
    }

    /// Set timeouts in whole seconds. Unset timeouts default to 60/60 at
    /// call time.
    pub fn set_timeout(&mut self, connect_secs: u64, read_write_secs: u64) {
        self.config.timeout = Some(TimeoutConfig::from_secs(connect_secs, read_write_secs));
    }

    /// Opt into (or back out of) skipping TLS certificate verification.
    pub fn set_tls_verify(&mut self, mode: TlsVerify) {
        self.config.tls_verify = mode;
    }

    /// Attach the form body to GET requests too. GET ignores form
    /// parameters unless this is set.
    pub fn allow_body_on_get(&mut self, allow: bool) {
        self.config.body_on_get = allow;
    }

    pub async fn get(&mut self, url: &str) -> &RequestOutcome {
        self.execute(Method::Get, url, HashMap::new()).await
    }

    pub async fn post(&mut self, url: &str, params: HashMap<String, String>) -> &RequestOutcome {
        self.execute(Method::Post, url, params).await
    }

    pub async fn put(&mut self, url: &str, params: HashMap<String, String>) -> &RequestOutcome {
        self.execute(Method::Put, url, params).await
    }

    pub async fn delete(&mut self, url: &str, params: HashMap<String, String>) -> &RequestOutcome {
        self.execute(Method::Delete, url, params).await
    }

    /// Execute one request against the current configuration snapshot and
    /// store the outcome.
    pub async fn execute(
        &mut self,
        method: Method,
        target: &str,
        form_params: HashMap<String, String>,
    ) -> &RequestOutcome {
        self.execute_with_deadline(method, target, form_params, None).await
    }

    /// Like [`RequestExecutor::execute`], bounded by an explicit overall
    /// deadline. When the deadline elapses before the response head arrives,
    /// the outcome carries a transfer error.
    pub async fn execute_with_deadline(
        &mut self,
        method: Method,
        target: &str,
        form_params: HashMap<String, String>,
        deadline: Option<Duration>,
    ) -> &RequestOutcome {
        let outcome = match self.dispatch(method, target, &form_params, deadline).await {
            Ok((response, elapsed)) => {
                tracing::debug!(
                    method = %method,
                    url = target,
                    status = response.status().as_u16(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "request completed"
                );
                RequestOutcome::success(response, elapsed)
            }
            Err(error) => {
                tracing::debug!(method = %method, url = target, error = %error, "request failed");
                RequestOutcome::failure(error)
            }
        };
        self.outcome.insert(outcome)
    }

    async fn dispatch(
        &self,
        method: Method,
        target: &str,
        form_params: &HashMap<String, String>,
        deadline: Option<Duration>,
    ) -> HttpCallResult<(Response, Duration)> {
        let policy = TimeoutPolicy::resolve(self.config.timeout);
        let client = self.transports.get_client(&self.config)?;

        let url = reqwest::Url::parse(target).map_err(|e| {
            HttpCallError::Construction(format!("invalid target URL {target}: {e}"))
        })?;

        let started = Instant::now();

        let mut builder = client
            .request(method.to_reqwest(), url)
            .timeout(policy.request_timeout());

        if method.allows_body() || self.config.body_on_get {
            builder = builder
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(encode_form(form_params));
        }

        if let Some(referer) = self.config.referer.as_deref().filter(|r| !r.is_empty()) {
            let value = HeaderValue::from_str(referer).map_err(|e| {
                HttpCallError::Construction(format!("invalid referer {referer}: {e}"))
            })?;
            builder = builder.header(REFERER, value);
        }

        // Appended, not set: transport-default headers are left in place.
        for (name, value) in &self.config.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                HttpCallError::Construction(format!("invalid header name {name}: {e}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                HttpCallError::Construction(format!("invalid value for header {name}: {e}"))
            })?;
            builder = builder.header(header_name, header_value);
        }

        // One Cookie header entry per configured cookie.
        for (name, value) in &self.config.cookies {
            let cookie = HeaderValue::from_str(&format!("{name}={value}")).map_err(|e| {
                HttpCallError::Construction(format!("invalid cookie {name}: {e}"))
            })?;
            builder = builder.header(COOKIE, cookie);
        }

        let request = builder.build().map_err(HttpCallError::classify)?;

        tracing::debug!(method = %method, url = target, "dispatching request");
        let result = policy.dispatch(deadline, client.execute(request)).await;
        let elapsed = started.elapsed();

        Ok((result?, elapsed))
    }

    /// The outcome of the last execution, if any.
    pub fn last_outcome(&self) -> Option<&RequestOutcome> {
        self.outcome.as_ref()
    }

    /// The error of the last execution, if it failed.
    pub fn last_error(&self) -> Option<&HttpCallError> {
        self.outcome.as_ref()?.error()
    }

    /// Drain the last response body. Fails with a read error if no request
    /// has been executed, the last execution failed, or the body was already
    /// consumed.
    pub async fn body_bytes(&mut self) -> HttpCallResult<Vec<u8>> {
        match self.outcome.as_mut() {
            Some(outcome) => outcome.body_bytes().await,
            None => Err(HttpCallError::Read("no request has been executed".to_string())),
        }
    }

    pub fn response_headers(&self) -> Option<&reqwest::header::HeaderMap> {
        self.outcome.as_ref()?.headers()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.outcome.as_ref()?.content_type()
    }

    pub fn response_cookies(&self) -> &[(String, String)] {
        self.outcome.as_ref().map(|o| o.cookies()).unwrap_or(&[])
    }

    pub fn status_code(&self) -> Option<u16> {
        self.outcome.as_ref()?.status_code()
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.outcome.as_ref()?.elapsed()
    }
}

/// Encode form parameters as `application/x-www-form-urlencoded`.
fn encode_form(params: &HashMap<String, String>) -> String {
    let mut encoded = String::new();
    for (key, value) in params {
        if !encoded.is_empty() {
            encoded.push('&');
        }
        encoded.push_str(&urlencoding::encode(key));
        encoded.push('=');
        encoded.push_str(&urlencoding::encode(value));
    }
    encoded
}
