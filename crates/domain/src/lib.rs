//! Domain model for DeDust liquidity pools.
//!
//! Immutable snapshots of pools and trades as returned by the DeDust v2
//! API, together with the AMM invariant math that turns raw reserves into
//! human-facing swap quotes. Everything here is pure: no I/O, no state.

pub mod asset;
pub mod enums;
pub mod error;
pub mod math;
pub mod pool;
pub mod serde_util;
pub mod trade;

pub use asset::{Asset, AssetMetadata, DEFAULT_DECIMALS};
pub use enums::{AssetKind, PoolKind};
pub use error::QuoteError;
pub use pool::{Pool, PoolStats};
pub use trade::{Trade, TradeAsset};
