//! Trade-monitoring loop for DeDust pools.
//!
//! One long-lived task polls a pool for trades past a logical-time cursor,
//! waits for the post-trade quote to settle, and hands each new batch to a
//! notification sink.

pub mod clock;
pub mod config;
pub mod error;
pub mod monitor;
pub mod sink;

pub use clock::{Clock, SystemClock};
pub use config::MonitorConfig;
pub use error::MonitorError;
pub use monitor::{MonitorHandle, TradeMonitor};
pub use sink::{NotificationSink, TradeUpdate};
