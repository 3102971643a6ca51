//! Transport-level plumbing shared by all source adapters.
//!
//! One blocking HTTP client with a fixed request timeout, and the structured
//! error taxonomy for data operations. "No data available" is never an error
//! here — adapters represent it as an empty record set so callers can branch
//! without exception handling.

use std::time::Duration;
use thiserror::Error;

/// Bound on every upstream request. A hung provider fails the call with
/// `DataError::Timeout` instead of stalling the process.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Structured error types for data operations.
///
/// Transport failures are always surfaced; nothing downgrades them to an
/// empty result. Retry policy, if any, belongs to the caller.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status} from {provider}")]
    HttpStatus { provider: &'static str, status: u16 },

    #[error("malformed response from {provider}: {detail}")]
    MalformedResponse {
        provider: &'static str,
        detail: String,
    },

    #[error("cache error: {0}")]
    Cache(String),
}

/// Build the shared blocking client with the bounded timeout applied.
pub fn build_client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("assetcast/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("failed to build HTTP client")
}

/// Classify a reqwest failure into the transport taxonomy.
pub(crate) fn classify_request_error(err: reqwest::Error) -> DataError {
    if err.is_timeout() {
        DataError::Timeout(err.to_string())
    } else {
        DataError::NetworkUnreachable(err.to_string())
    }
}

/// Map a non-success status to a distinct failure. Error bodies are never
/// parsed as data.
pub(crate) fn check_status(
    provider: &'static str,
    resp: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, DataError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(DataError::HttpStatus {
            provider,
            status: status.as_u16(),
        });
    }
    Ok(resp)
}
