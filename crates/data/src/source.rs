use crate::error::FetchError;
use async_trait::async_trait;
use tontracker_domain::{Pool, Trade};

/// Read access to a DEX data source.
///
/// The monitoring loop consumes this trait instead of the concrete client
/// so tests can substitute scripted responses.
#[async_trait]
pub trait PoolDataSource: Send + Sync {
    /// Fetches every available pool snapshot.
    async fn fetch_pools(&self) -> Result<Vec<Pool>, FetchError>;

    /// Fetches up to `page_size` trades of `pool_address`, ordered
    /// ascending by logical time.
    ///
    /// `after_lt` restricts the page to trades strictly newer than the
    /// cursor; `None` returns the most recent trades. May return fewer
    /// trades than requested.
    async fn fetch_trades(
        &self,
        pool_address: &str,
        page_size: Option<u32>,
        after_lt: Option<u128>,
    ) -> Result<Vec<Trade>, FetchError>;
}
