use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// HTTP methods supported by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// GET conventionally carries no body; the other methods do.
    pub fn allows_body(&self) -> bool {
        !matches!(self, Method::Get)
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timeout configuration for one transport.
///
/// `connect` bounds connection establishment; `read_write` bounds the rest of
/// the exchange once a connection exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub connect: Duration,
    pub read_write: Duration,
}

impl TimeoutConfig {
    pub const DEFAULT_SECS: u64 = 60;

    /// Build from whole seconds, the unit used at the configuration boundary.
    pub fn from_secs(connect_secs: u64, read_write_secs: u64) -> Self {
        Self {
            connect: Duration::from_secs(connect_secs),
            read_write: Duration::from_secs(read_write_secs),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from_secs(Self::DEFAULT_SECS, Self::DEFAULT_SECS)
    }
}

/// TLS server-certificate verification mode.
///
/// Defaults to `Verify`; skipping verification is an explicit opt-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsVerify {
    #[default]
    Verify,
    InsecureSkipVerify,
}

/// Mutable request configuration, read as a snapshot by each execution.
///
/// A single config may be reused across sequential executions; each run
/// produces an independent outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Emitted as a `Referer` header when non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,

    /// Appended to the outgoing request without overwriting transport
    /// defaults.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Each entry becomes one `Cookie` header entry; last write per name
    /// wins inside the map.
    #[serde(default)]
    pub cookies: HashMap<String, String>,

    /// When set, all outbound connections route through this proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,

    /// `None` means "use the 60s/60s default at call time" — absence is
    /// explicit, there is no zero-duration sentinel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutConfig>,

    #[serde(default)]
    pub tls_verify: TlsVerify,

    /// Attach the form body to GET requests too. Off by default; GET
    /// normally ignores form parameters.
    #[serde(default)]
    pub body_on_get: bool,
}
