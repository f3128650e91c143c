use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by the DeDust data source.
///
/// Every variant is transient from the monitor's point of view: network
/// failures, timeouts, non-success statuses and malformed bodies all get
/// the same log-backoff-retry treatment.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request failed or timed out before a response arrived.
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The API answered with a non-success status.
    #[error("bad status code {status} from {url}")]
    Status { url: String, status: StatusCode },
    /// The body did not match the expected wire format.
    #[error("failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
