//! Cursor-based trade monitoring loop.
//!
//! The loop cycles through four phases: bootstrap seeds the cursor from
//! the newest trade, poll fetches trades strictly past the cursor, settle
//! waits for the post-trade quote to diverge from the previously reported
//! price, and emit hands the batch to the notification sink. Transient
//! fetch failures never stop the loop; they log, back off, and retry.

use crate::clock::{Clock, SystemClock};
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::sink::{NotificationSink, TradeUpdate};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tontracker_data::PoolDataSource;
use tontracker_domain::{Pool, PoolKind};
use tracing::{error, info, warn};

/// Handle for stopping a running monitor from another task.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    running: Arc<AtomicBool>,
}

impl MonitorHandle {
    /// Requests a stop; takes effect at the next wakeup.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// The trade-monitoring loop.
///
/// The cursor and the last reported price are the only mutable state and
/// are owned exclusively by this task; no locking is needed.
pub struct TradeMonitor {
    source: Arc<dyn PoolDataSource>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    config: MonitorConfig,
    running: Arc<AtomicBool>,
    /// Highest logical time already reported.
    cursor: u128,
    /// Quote of the previous emission; settlement compares against it.
    last_price: f64,
}

impl TradeMonitor {
    /// Creates a monitor with the system clock.
    pub fn new(
        source: Arc<dyn PoolDataSource>,
        sink: Arc<dyn NotificationSink>,
        config: MonitorConfig,
    ) -> Self {
        Self::with_clock(source, sink, Arc::new(SystemClock), config)
    }

    /// Creates a monitor with a custom clock.
    pub fn with_clock(
        source: Arc<dyn PoolDataSource>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            source,
            sink,
            clock,
            config,
            running: Arc::new(AtomicBool::new(false)),
            cursor: 0,
            last_price: 0.0,
        }
    }

    /// Returns a handle that can stop the loop from another task.
    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Highest logical time already reported.
    pub fn cursor(&self) -> u128 {
        self.cursor
    }

    /// Quote of the previous emission.
    pub fn last_price(&self) -> f64 {
        self.last_price
    }

    /// Runs the loop until [`MonitorHandle::stop`] is called.
    pub async fn run(&mut self) {
        self.running.store(true, Ordering::SeqCst);
        info!(pool = %self.config.pool_address, "starting trade monitor");
        self.bootstrap().await;
        self.clock.sleep(self.config.warmup_delay).await;
        while self.running.load(Ordering::SeqCst) {
            let pause = self.cycle().await;
            self.clock.sleep(pause).await;
        }
        info!(pool = %self.config.pool_address, "trade monitor stopped");
    }

    /// Seeds the cursor and reference price from the newest trade.
    ///
    /// Never gives up: failures log and retry immediately, with no pause.
    async fn bootstrap(&mut self) {
        while self.running.load(Ordering::SeqCst) {
            match self.seed().await {
                Ok(()) => {
                    info!(
                        cursor = self.cursor,
                        price = self.last_price,
                        "monitor seeded"
                    );
                    return;
                }
                Err(e) => error!(error = %e, "unable to fetch first trade, retrying"),
            }
        }
    }

    async fn seed(&mut self) -> Result<(), MonitorError> {
        let trades = self
            .source
            .fetch_trades(&self.config.pool_address, Some(1), None)
            .await?;
        let pools = self.source.fetch_pools().await?;
        let pool = find_pool(&pools, &self.config.pool_address)?;
        let newest = trades
            .first()
            .ok_or_else(|| MonitorError::NoTrades(self.config.pool_address.clone()))?;
        if pool.kind == PoolKind::Unknown {
            warn!(pool = %pool.address, "pool reports an unknown type, pricing as volatile");
        }
        self.cursor = newest.lt;
        self.last_price = self.quote(pool);
        Ok(())
    }

    /// One poll cycle. Returns how long to pause before the next one.
    async fn cycle(&mut self) -> Duration {
        let trades = match self
            .source
            .fetch_trades(
                &self.config.pool_address,
                Some(self.config.trade_batch_size),
                Some(self.cursor),
            )
            .await
        {
            Ok(trades) => trades,
            Err(e) => {
                error!(error = %e, backoff = ?self.config.fetch_backoff, "unable to fetch trades");
                return self.config.fetch_backoff;
            }
        };
        if trades.is_empty() {
            return self.config.poll_interval;
        }
        // Reserve updates lag trade visibility; give the source a moment
        // before reading reserves.
        self.clock.sleep(self.config.reserve_lag_delay).await;
        let (pool, quote_pool) = match self.fetch_pool_pair().await {
            Ok(pair) => pair,
            Err(e) => {
                error!(error = %e, backoff = ?self.config.fetch_backoff, "unable to fetch pools");
                return self.config.fetch_backoff;
            }
        };

        let settled = self.settle(&pool).await;
        let secondary = match quote_pool.quote_left_to_right(settled) {
            Ok(amount) => amount,
            Err(_) => {
                warn!(
                    quote = settled,
                    "settled quote is not positive, skipping secondary conversion"
                );
                0.0
            }
        };
        let price_change = settled / self.last_price - 1.0;
        let cursor = trades.last().map(|t| t.lt).unwrap_or(self.cursor);

        let update = TradeUpdate {
            trades,
            quote: settled,
            secondary_quote: secondary,
            price_change,
        };
        info!(
            count = update.trades.len(),
            quote = settled,
            change = price_change,
            "emitting trade notification"
        );
        if let Err(e) = self.sink.publish(&update).await {
            error!(error = %e, "failed to publish notification");
        }
        self.last_price = settled;
        self.cursor = cursor;
        self.config.poll_interval
    }

    /// Fetches the current pool set and resolves the monitored and
    /// secondary pools from it.
    async fn fetch_pool_pair(&self) -> Result<(Pool, Pool), MonitorError> {
        let pools = self.source.fetch_pools().await?;
        let pool = find_pool(&pools, &self.config.pool_address)?.clone();
        let quote_pool = find_pool(&pools, &self.config.quote_pool_address)?.clone();
        Ok((pool, quote_pool))
    }

    /// Re-quotes until the price moves away from the previous emission or
    /// the retry budget runs out; the last quote is accepted either way.
    ///
    /// A fetch failure retries the same step without consuming a retry
    /// slot.
    async fn settle(&self, pool: &Pool) -> f64 {
        let mut price = self.quote(pool);
        let mut retries = 0;
        while self.running.load(Ordering::SeqCst)
            && price == self.last_price
            && retries < self.config.settle_retries
        {
            self.clock.sleep(self.config.settle_delay).await;
            let pools = match self.source.fetch_pools().await {
                Ok(pools) => pools,
                Err(e) => {
                    error!(error = %e, "unable to fetch pools during settlement, retrying");
                    continue;
                }
            };
            let current = match find_pool(&pools, &self.config.pool_address) {
                Ok(pool) => pool,
                Err(e) => {
                    error!(error = %e, "during settlement, retrying");
                    continue;
                }
            };
            price = self.quote(current);
            retries += 1;
        }
        price
    }

    fn quote(&self, pool: &Pool) -> f64 {
        pool.price_per_right_with(None, self.config.token_decimals)
    }
}

fn find_pool<'a>(pools: &'a [Pool], address: &str) -> Result<&'a Pool, MonitorError> {
    pools
        .iter()
        .find(|p| p.address == address)
        .ok_or_else(|| MonitorError::PoolNotFound(address.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use tontracker_data::FetchError;
    use tontracker_domain::{Asset, AssetKind, AssetMetadata, PoolStats, Trade, TradeAsset};

    const POOL: &str = "pool-a";
    const QUOTE_POOL: &str = "pool-usd";

    fn asset(decimals: u32) -> Asset {
        Asset {
            kind: AssetKind::Jetton,
            address: "0:aa00".to_string(),
            metadata: Some(AssetMetadata {
                name: String::new(),
                symbol: String::new(),
                image: String::new(),
                decimals,
            }),
        }
    }

    fn pool(address: &str, left_reserve: u128, right_reserve: u128) -> Pool {
        Pool {
            address: address.to_string(),
            lt: 0,
            total_supply: 0,
            kind: PoolKind::Volatile,
            assets: [asset(0), asset(0)],
            reserves: [left_reserve, right_reserve],
            trade_fee: 0.25,
            last_price: None,
            stats: PoolStats::default(),
        }
    }

    fn trade(lt: u128) -> Trade {
        Trade {
            sender: "EQsender".to_string(),
            asset_in: TradeAsset {
                kind: AssetKind::Native,
                address: String::new(),
            },
            asset_out: TradeAsset {
                kind: AssetKind::Jetton,
                address: "0:aa00".to_string(),
            },
            amount_in: 1_000_000_000,
            amount_out: 500_000,
            lt,
            created_at: Utc::now(),
        }
    }

    fn transient_error() -> FetchError {
        FetchError::Status {
            url: "http://test/pools".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        }
    }

    /// Source returning scripted responses, falling back to a fixed pool
    /// set and an empty trade page once the scripts run dry.
    struct ScriptedSource {
        trade_pages: Mutex<VecDeque<Result<Vec<Trade>, FetchError>>>,
        pool_sets: Mutex<VecDeque<Result<Vec<Pool>, FetchError>>>,
        fallback_pools: Vec<Pool>,
        pool_calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(fallback_pools: Vec<Pool>) -> Self {
            Self {
                trade_pages: Mutex::new(VecDeque::new()),
                pool_sets: Mutex::new(VecDeque::new()),
                fallback_pools,
                pool_calls: AtomicUsize::new(0),
            }
        }

        fn push_trades(&self, page: Result<Vec<Trade>, FetchError>) {
            self.trade_pages.lock().unwrap().push_back(page);
        }

        fn push_pools(&self, set: Result<Vec<Pool>, FetchError>) {
            self.pool_sets.lock().unwrap().push_back(set);
        }

        fn pool_calls(&self) -> usize {
            self.pool_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PoolDataSource for ScriptedSource {
        async fn fetch_pools(&self) -> Result<Vec<Pool>, FetchError> {
            self.pool_calls.fetch_add(1, Ordering::SeqCst);
            match self.pool_sets.lock().unwrap().pop_front() {
                Some(set) => set,
                None => Ok(self.fallback_pools.clone()),
            }
        }

        async fn fetch_trades(
            &self,
            _pool_address: &str,
            _page_size: Option<u32>,
            _after_lt: Option<u128>,
        ) -> Result<Vec<Trade>, FetchError> {
            match self.trade_pages.lock().unwrap().pop_front() {
                Some(page) => page,
                None => Ok(Vec::new()),
            }
        }
    }

    /// Clock that records every requested delay and returns immediately.
    #[derive(Default)]
    struct RecordingClock {
        sleeps: Mutex<Vec<Duration>>,
    }

    impl RecordingClock {
        fn sleeps(&self) -> Vec<Duration> {
            self.sleeps.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Clock for RecordingClock {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        updates: Mutex<Vec<TradeUpdate>>,
    }

    impl RecordingSink {
        fn updates(&self) -> Vec<TradeUpdate> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn publish(&self, update: &TradeUpdate) -> anyhow::Result<()> {
            self.updates.lock().unwrap().push(update.clone());
            Ok(())
        }
    }

    struct Harness {
        source: Arc<ScriptedSource>,
        sink: Arc<RecordingSink>,
        clock: Arc<RecordingClock>,
        monitor: TradeMonitor,
    }

    fn harness(fallback_pools: Vec<Pool>) -> Harness {
        let source = Arc::new(ScriptedSource::new(fallback_pools));
        let sink = Arc::new(RecordingSink::default());
        let clock = Arc::new(RecordingClock::default());
        let monitor = TradeMonitor::with_clock(
            Arc::clone(&source) as Arc<dyn PoolDataSource>,
            Arc::clone(&sink) as Arc<dyn NotificationSink>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            MonitorConfig::new(POOL, QUOTE_POOL),
        );
        Harness {
            source,
            sink,
            clock,
            monitor,
        }
    }

    fn default_pools() -> Vec<Pool> {
        vec![pool(POOL, 1000, 2000), pool(QUOTE_POOL, 1000, 2000)]
    }

    #[tokio::test]
    async fn bootstrap_retries_immediately_and_seeds_cursor() {
        let mut h = harness(default_pools());
        h.source.push_trades(Err(transient_error()));
        h.source.push_trades(Err(transient_error()));
        h.source.push_trades(Ok(vec![trade(42)]));

        h.monitor.running.store(true, Ordering::SeqCst);
        h.monitor.bootstrap().await;

        assert_eq!(h.monitor.cursor(), 42);
        assert!(h.monitor.last_price() > 0.0);
        // No backoff is applied between bootstrap attempts.
        assert!(h.clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn poll_without_new_trades_waits_poll_interval() {
        let mut h = harness(default_pools());
        h.monitor.running.store(true, Ordering::SeqCst);
        h.monitor.cursor = 42;

        let pause = h.monitor.cycle().await;

        assert_eq!(pause, h.monitor.config.poll_interval);
        assert_eq!(h.monitor.cursor(), 42);
        assert!(h.sink.updates().is_empty());
    }

    #[tokio::test]
    async fn transient_trade_fetch_error_backs_off_without_moving_cursor() {
        let mut h = harness(default_pools());
        h.monitor.running.store(true, Ordering::SeqCst);
        h.monitor.cursor = 42;
        h.source.push_trades(Err(transient_error()));

        let pause = h.monitor.cycle().await;

        assert_eq!(pause, h.monitor.config.fetch_backoff);
        assert_eq!(h.monitor.cursor(), 42);
        assert!(h.sink.updates().is_empty());
    }

    #[tokio::test]
    async fn missing_pool_backs_off_without_moving_cursor() {
        let mut h = harness(default_pools());
        h.monitor.running.store(true, Ordering::SeqCst);
        h.monitor.cursor = 42;
        h.source.push_trades(Ok(vec![trade(43)]));
        // The fetched pool set momentarily omits the monitored pool.
        h.source.push_pools(Ok(vec![pool(QUOTE_POOL, 1000, 2000)]));

        let pause = h.monitor.cycle().await;

        assert_eq!(pause, h.monitor.config.fetch_backoff);
        assert_eq!(h.monitor.cursor(), 42);
        assert!(h.sink.updates().is_empty());
    }

    #[tokio::test]
    async fn new_trades_emit_once_and_advance_cursor() {
        let mut h = harness(default_pools());
        h.monitor.running.store(true, Ordering::SeqCst);
        h.monitor.cursor = 42;
        h.monitor.last_price = 0.25; // differs from the pool's quote
        h.source.push_trades(Ok(vec![trade(43), trade(44), trade(45)]));

        let pause = h.monitor.cycle().await;

        assert_eq!(pause, h.monitor.config.poll_interval);
        assert_eq!(h.monitor.cursor(), 45);

        let updates = h.sink.updates();
        assert_eq!(updates.len(), 1);
        let update = &updates[0];
        assert_eq!(update.trades.len(), 3);
        let expected = pool(POOL, 1000, 2000).price_per_right();
        assert_eq!(update.quote, expected);
        assert!((update.price_change - (expected / 0.25 - 1.0)).abs() < 1e-12);
        assert_eq!(h.monitor.last_price(), expected);
        // Price moved away from last_price immediately: a single pool
        // fetch, no settlement retries.
        assert_eq!(h.source.pool_calls(), 1);
    }

    #[tokio::test]
    async fn cursor_is_monotonic_across_cycles() {
        let mut h = harness(default_pools());
        h.monitor.running.store(true, Ordering::SeqCst);
        h.monitor.cursor = 10;
        h.monitor.last_price = 0.25;
        h.source.push_trades(Ok(vec![trade(11)]));
        h.source.push_trades(Ok(vec![]));
        h.source.push_trades(Ok(vec![trade(12), trade(15)]));

        let mut cursors = vec![h.monitor.cursor()];
        for _ in 0..3 {
            h.monitor.cycle().await;
            cursors.push(h.monitor.cursor());
        }

        assert_eq!(cursors, vec![10, 11, 11, 15]);
    }

    #[tokio::test]
    async fn settle_stops_after_retry_budget_and_emits_zero_change() {
        let mut h = harness(default_pools());
        h.monitor.running.store(true, Ordering::SeqCst);
        h.monitor.cursor = 42;
        // The pool quote never moves away from the last reported price.
        h.monitor.last_price = pool(POOL, 1000, 2000).price_per_right();
        h.source.push_trades(Ok(vec![trade(43)]));

        h.monitor.cycle().await;

        // One fetch for the pool pair plus four settlement retries: five
        // quote evaluations in total.
        assert_eq!(h.source.pool_calls(), 1 + 4);
        let updates = h.sink.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].price_change, 0.0);
        // reserve lag pause plus one pause per settlement retry
        let sleeps = h.clock.sleeps();
        assert_eq!(sleeps.len(), 1 + 4);
        assert_eq!(sleeps[0], h.monitor.config.reserve_lag_delay);
        assert!(sleeps[1..].iter().all(|d| *d == h.monitor.config.settle_delay));
    }

    #[tokio::test]
    async fn settle_fetch_failures_do_not_consume_retry_slots() {
        let mut h = harness(default_pools());
        h.monitor.running.store(true, Ordering::SeqCst);
        h.monitor.cursor = 42;
        h.monitor.last_price = pool(POOL, 1000, 2000).price_per_right();
        h.source.push_trades(Ok(vec![trade(43)]));
        // Pair fetch succeeds, then two settlement fetches fail before the
        // reserves finally move.
        h.source.push_pools(Ok(default_pools()));
        h.source.push_pools(Err(transient_error()));
        h.source.push_pools(Err(transient_error()));
        h.source.push_pools(Ok(vec![
            pool(POOL, 1010, 1981),
            pool(QUOTE_POOL, 1000, 2000),
        ]));

        h.monitor.cycle().await;

        let updates = h.sink.updates();
        assert_eq!(updates.len(), 1);
        let moved = pool(POOL, 1010, 1981).price_per_right();
        assert_eq!(updates[0].quote, moved);
        assert_ne!(updates[0].price_change, 0.0);
        // pair + 2 failed + 1 successful settlement fetch
        assert_eq!(h.source.pool_calls(), 4);
    }

    /// Clock that stops the monitor through its handle once enough sleeps
    /// have been requested, so `run` terminates deterministically.
    struct StoppingClock {
        sleeps: Mutex<Vec<Duration>>,
        handle: Mutex<Option<MonitorHandle>>,
        stop_after: usize,
    }

    #[async_trait]
    impl Clock for StoppingClock {
        async fn sleep(&self, duration: Duration) {
            let count = {
                let mut sleeps = self.sleeps.lock().unwrap();
                sleeps.push(duration);
                sleeps.len()
            };
            if count >= self.stop_after
                && let Some(handle) = self.handle.lock().unwrap().as_ref()
            {
                handle.stop();
            }
        }
    }

    #[tokio::test]
    async fn run_bootstraps_observes_warmup_and_stops_on_handle() {
        let source = Arc::new(ScriptedSource::new(default_pools()));
        let sink = Arc::new(RecordingSink::default());
        let clock = Arc::new(StoppingClock {
            sleeps: Mutex::new(Vec::new()),
            handle: Mutex::new(None),
            stop_after: 2,
        });
        source.push_trades(Ok(vec![trade(42)]));

        let mut monitor = TradeMonitor::with_clock(
            Arc::clone(&source) as Arc<dyn PoolDataSource>,
            Arc::clone(&sink) as Arc<dyn NotificationSink>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            MonitorConfig::new(POOL, QUOTE_POOL),
        );
        *clock.handle.lock().unwrap() = Some(monitor.handle());

        monitor.run().await;

        assert_eq!(monitor.cursor(), 42);
        let sleeps = clock.sleeps.lock().unwrap().clone();
        // Warmup pause after bootstrap, then one idle poll pause.
        assert_eq!(sleeps[0], monitor.config.warmup_delay);
        assert_eq!(sleeps[1], monitor.config.poll_interval);
    }
}
