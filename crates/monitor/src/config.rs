use std::time::Duration;

/// Configuration for the trade-monitoring loop.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Address of the monitored pool.
    pub pool_address: String,
    /// Address of the pool used to express the settled quote in a
    /// secondary currency (TON/jUSDT in production).
    pub quote_pool_address: String,
    /// Decimals assumed for the monitored pool's right asset when quoting;
    /// `None` uses the declared metadata.
    pub token_decimals: Option<u32>,
    /// Maximum trades fetched per poll.
    pub trade_batch_size: u32,
    /// Pause between polls.
    pub poll_interval: Duration,
    /// Pause after a transient fetch failure.
    pub fetch_backoff: Duration,
    /// One-off pause between a successful bootstrap and the first poll.
    pub warmup_delay: Duration,
    /// Pause between seeing new trades and refetching reserves.
    pub reserve_lag_delay: Duration,
    /// Pause between settlement retries.
    pub settle_delay: Duration,
    /// Settlement retries after the initial quote.
    pub settle_retries: u32,
}

impl MonitorConfig {
    /// Config for a pool pair with the production timings.
    pub fn new(
        pool_address: impl Into<String>,
        quote_pool_address: impl Into<String>,
    ) -> Self {
        Self {
            pool_address: pool_address.into(),
            quote_pool_address: quote_pool_address.into(),
            token_decimals: None,
            trade_batch_size: 5,
            poll_interval: Duration::from_secs(10),
            fetch_backoff: Duration::from_secs(10),
            warmup_delay: Duration::from_secs(4),
            reserve_lag_delay: Duration::from_millis(250),
            settle_delay: Duration::from_millis(120),
            settle_retries: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_timings() {
        let config = MonitorConfig::new("pool", "quote");
        assert_eq!(config.trade_batch_size, 5);
        assert_eq!(config.settle_retries, 4);
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.warmup_delay, Duration::from_secs(4));
    }
}
