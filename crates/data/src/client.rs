//! HTTP client for the DeDust v2 REST API.

use crate::endpoints;
use crate::error::FetchError;
use crate::source::PoolDataSource;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tontracker_domain::{Pool, Trade};
use tracing::{debug, trace};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(100);

/// REST client for DeDust.
#[derive(Debug, Clone)]
pub struct DedustClient {
    http: reqwest::Client,
    base_url: String,
}

impl DedustClient {
    /// Creates a client against the production API with the default
    /// timeout.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: endpoints::BASE_URL.to_string(),
        })
    }

    /// Points the client at a different base URL (mirrors, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }
        let body = response.text().await.map_err(|source| FetchError::Http {
            url: url.clone(),
            source,
        })?;
        trace!(url = %url, body = %body, "response received");
        serde_json::from_str(&body).map_err(|source| FetchError::Decode { url, source })
    }
}

#[async_trait]
impl PoolDataSource for DedustClient {
    async fn fetch_pools(&self) -> Result<Vec<Pool>, FetchError> {
        let pools: Vec<Pool> = self.get_json(endpoints::POOLS, &[]).await?;
        debug!(count = pools.len(), "pools fetched");
        Ok(pools)
    }

    async fn fetch_trades(
        &self,
        pool_address: &str,
        page_size: Option<u32>,
        after_lt: Option<u128>,
    ) -> Result<Vec<Trade>, FetchError> {
        let path = format!("{}/{}/{}", endpoints::POOLS, pool_address, endpoints::TRADES);
        let mut query = Vec::new();
        if let Some(size) = page_size {
            query.push(("page_size", size.to_string()));
        }
        if let Some(lt) = after_lt {
            query.push(("after_lt", lt.to_string()));
        }
        let trades: Vec<Trade> = self.get_json(&path, &query).await?;
        debug!(count = trades.len(), pool = %pool_address, "trades fetched");
        Ok(trades)
    }
}
