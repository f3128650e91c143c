use thiserror::Error;
use tontracker_data::FetchError;

/// Failures the monitoring loop absorbs and retries.
///
/// Nothing here is fatal: the loop logs, backs off, and polls again.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The expected pool was missing from a fetched pool set. Treated as
    /// transient source-side inconsistency, not a permanent condition.
    #[error("pool {0} not found in fetched pool set")]
    PoolNotFound(String),
    /// The pool has no trade history to seed the cursor from yet.
    #[error("pool {0} returned no trades")]
    NoTrades(String),
}
