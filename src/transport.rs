//! Transport construction and caching keyed on timeout, proxy, and TLS policy.

use crate::config::{RequestConfig, TimeoutConfig, TlsVerify};
use crate::error::{HttpCallError, HttpCallResult};
use crate::timeout::TimeoutPolicy;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// The slice of a request config that determines transport behavior.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TransportKey {
    timeout: TimeoutConfig,
    proxy_url: Option<String>,
    tls_verify: TlsVerify,
}

impl TransportKey {
    fn from_config(config: &RequestConfig) -> Self {
        Self {
            timeout: config.timeout.unwrap_or_default(),
            proxy_url: config.proxy_url.clone(),
            tls_verify: config.tls_verify,
        }
    }

    fn build_client(&self) -> HttpCallResult<Client> {
        let policy = TimeoutPolicy::new(self.timeout);
        policy.validate()?;

        let mut builder = policy.apply_to_client_builder(Client::builder());

        if let Some(proxy_url) = &self.proxy_url {
            url::Url::parse(proxy_url).map_err(|e| {
                HttpCallError::Construction(format!("invalid proxy URL {proxy_url}: {e}"))
            })?;
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                HttpCallError::Construction(format!("invalid proxy URL {proxy_url}: {e}"))
            })?;
            builder = builder.proxy(proxy);
        }

        if matches!(self.tls_verify, TlsVerify::InsecureSkipVerify) {
            tracing::warn!("TLS certificate verification disabled for outbound requests");
            builder = builder.danger_accept_invalid_certs(true);
        }

        tracing::debug!(
            connect_ms = self.timeout.connect.as_millis() as u64,
            read_write_ms = self.timeout.read_write.as_millis() as u64,
            proxy = self.proxy_url.as_deref().unwrap_or("none"),
            "building transport"
        );

        builder
            .build()
            .map_err(|e| HttpCallError::Construction(format!("failed to build transport: {e}")))
    }
}

/// Cache of transports, one per distinct (timeout, proxy, TLS) policy.
///
/// Calls with identical policy share a pooled client; the read-write deadline
/// stays per-request, so per-call timeout semantics remain independent.
#[derive(Debug, Clone, Default)]
pub struct TransportCache {
    cache: Arc<RwLock<HashMap<TransportKey, Arc<Client>>>>,
}

impl TransportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or build the transport for the given configuration.
    pub fn get_client(&self, config: &RequestConfig) -> HttpCallResult<Arc<Client>> {
        let key = TransportKey::from_config(config);

        {
            let cache = self.cache.read().unwrap();
            if let Some(client) = cache.get(&key) {
                return Ok(client.clone());
            }
        }

        let mut cache = self.cache.write().unwrap();

        // Another task may have built it while we waited for the write lock.
        if let Some(client) = cache.get(&key) {
            return Ok(client.clone());
        }

        let client = Arc::new(key.build_client()?);
        cache.insert(key, client.clone());

        Ok(client)
    }

    pub fn len(&self) -> usize {
        self.cache.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.write().unwrap().clear();
    }
}
