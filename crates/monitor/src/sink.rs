use async_trait::async_trait;
use tontracker_domain::Trade;

/// Everything a sink needs to render one notification cycle.
#[derive(Debug, Clone)]
pub struct TradeUpdate {
    /// Trades discovered in this poll cycle, ascending by logical time.
    pub trades: Vec<Trade>,
    /// Settled price of one right token in left tokens.
    pub quote: f64,
    /// The settled quote converted through the secondary-currency pool.
    pub secondary_quote: f64,
    /// Fractional change against the previously reported quote
    /// (`new / old − 1`).
    pub price_change: f64,
}

impl TradeUpdate {
    /// Whether the price moved up (or held) since the last report.
    pub fn is_up(&self) -> bool {
        self.price_change >= 0.0
    }
}

/// Delivery target for trade notifications.
///
/// Called at most once per poll cycle that found new trades, with the full
/// batch for that cycle. Failures are logged by the monitor and never
/// stop the loop.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, update: &TradeUpdate) -> anyhow::Result<()>;
}
