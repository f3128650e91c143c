use serde::{Deserialize, Serialize};

/// Kind of asset held by one side of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// The chain's native coin (Toncoin). Carries no contract address.
    Native,
    /// Any token following the jetton standard.
    Jetton,
    /// Wire value this version does not recognize.
    #[serde(other)]
    Unknown,
}

/// Invariant curve a pool trades on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    /// Constant product pool (`x · y = k`).
    Volatile,
    /// Stable swap pool (`x³·y + y³·x = k`).
    Stable,
    /// Wire value this version does not recognize. Priced through the
    /// volatile formulas.
    #[serde(other)]
    Unknown,
}
