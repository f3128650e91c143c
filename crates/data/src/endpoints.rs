//! DeDust REST endpoint constants.

pub(crate) const BASE_URL: &str = "https://api.dedust.io/v2";

pub(crate) const POOLS: &str = "pools";
pub(crate) const TRADES: &str = "trades";
