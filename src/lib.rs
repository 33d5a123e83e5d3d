//! Configurable HTTP request helper.
//!
//! A [`RequestExecutor`] accumulates request settings (referer, headers,
//! cookies, proxy, timeouts, TLS verification mode), executes requests with
//! a transport built from that policy, and records each outcome with its
//! elapsed time. Timeouts default to 60 seconds for both connection
//! establishment and the rest of the exchange; TLS verification is on unless
//! explicitly skipped.

pub mod config;
pub mod error;
pub mod executor;
pub mod outcome;
pub mod timeout;
pub mod transport;

pub use config::{Method, RequestConfig, TimeoutConfig, TlsVerify};
pub use error::{HttpCallError, HttpCallResult};
pub use executor::RequestExecutor;
pub use outcome::RequestOutcome;
pub use transport::TransportCache;
