use crate::enums::AssetKind;
use crate::serde_util;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Asset reference inside a trade record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeAsset {
    #[serde(rename = "type")]
    pub kind: AssetKind,
    #[serde(default)]
    pub address: String,
}

/// One executed swap, as returned by the trades endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub sender: String,
    pub asset_in: TradeAsset,
    pub asset_out: TradeAsset,
    #[serde(with = "serde_util::u128_string")]
    pub amount_in: u128,
    #[serde(with = "serde_util::u128_string")]
    pub amount_out: u128,
    /// Source-assigned logical time: a strictly increasing sequence number
    /// used as a pagination cursor, not a wall-clock timestamp.
    #[serde(with = "serde_util::u128_string")]
    pub lt: u128,
    pub created_at: DateTime<Utc>,
}
