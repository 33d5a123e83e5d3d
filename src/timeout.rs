//! Timeout resolution and classified dispatch.

use crate::config::TimeoutConfig;
use crate::error::{HttpCallError, HttpCallResult};
use reqwest::ClientBuilder;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Resolved timeout policy for one execution.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutPolicy {
    config: TimeoutConfig,
}

impl TimeoutPolicy {
    pub fn new(config: TimeoutConfig) -> Self {
        Self { config }
    }

    /// Resolve the effective policy: an unset config means 60s/60s.
    pub fn resolve(config: Option<TimeoutConfig>) -> Self {
        Self::new(config.unwrap_or_default())
    }

    /// Apply the connect timeout to the transport builder. The read-write
    /// timeout is per-request, never set on the shared client.
    pub fn apply_to_client_builder(&self, builder: ClientBuilder) -> ClientBuilder {
        builder.connect_timeout(self.config.connect)
    }

    /// Deadline for the exchange once a connection exists.
    pub fn request_timeout(&self) -> Duration {
        self.config.read_write
    }

    pub fn config(&self) -> &TimeoutConfig {
        &self.config
    }

    /// Reject configurations that would disable I/O entirely.
    pub fn validate(&self) -> HttpCallResult<()> {
        if self.config.connect.is_zero() {
            return Err(HttpCallError::Construction(
                "connect timeout must be greater than zero".to_string(),
            ));
        }
        if self.config.read_write.is_zero() {
            return Err(HttpCallError::Construction(
                "read-write timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Await a dispatch, optionally bounded by an explicit caller deadline,
    /// and classify any failure into the crate error taxonomy.
    pub async fn dispatch<F, T>(
        &self,
        deadline: Option<Duration>,
        operation: F,
    ) -> HttpCallResult<T>
    where
        F: Future<Output = Result<T, reqwest::Error>>,
    {
        match deadline {
            Some(limit) => match timeout(limit, operation).await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(err)) => Err(HttpCallError::classify(err)),
                Err(_) => Err(HttpCallError::Transfer(format!(
                    "caller deadline of {}ms exceeded",
                    limit.as_millis()
                ))),
            },
            None => operation.await.map_err(HttpCallError::classify),
        }
    }
}
