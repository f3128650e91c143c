use crate::asset::Asset;
use crate::enums::PoolKind;
use crate::error::QuoteError;
use crate::math;
use crate::serde_util;
use serde::{Deserialize, Serialize};

/// Aggregate pool stats for the last 24 hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    #[serde(default, with = "serde_util::u128_pair_opt")]
    pub fees: Option<[u128; 2]>,
    #[serde(default, with = "serde_util::u128_pair_opt")]
    pub volume: Option<[u128; 2]>,
}

impl PoolStats {
    pub fn left_fees(&self) -> u128 {
        self.fees.map(|f| f[0]).unwrap_or(0)
    }

    pub fn right_fees(&self) -> u128 {
        self.fees.map(|f| f[1]).unwrap_or(0)
    }

    pub fn left_volume(&self) -> u128 {
        self.volume.map(|v| v[0]).unwrap_or(0)
    }

    pub fn right_volume(&self) -> u128 {
        self.volume.map(|v| v[1]).unwrap_or(0)
    }
}

/// One pool snapshot as returned by the DeDust API.
///
/// Snapshots are immutable; every fetch produces a fresh value. The two
/// assets and reserves keep the source's left/right ordering, which fixes
/// the economic meaning of every quote direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub address: String,
    #[serde(with = "serde_util::u128_string")]
    pub lt: u128,
    #[serde(with = "serde_util::u128_string")]
    pub total_supply: u128,
    #[serde(rename = "type")]
    pub kind: PoolKind,
    pub assets: [Asset; 2],
    #[serde(with = "serde_util::u128_pair")]
    pub reserves: [u128; 2],
    /// Trade fee as a percentage in `[0, 100]`, as published by the source.
    #[serde(with = "serde_util::f64_flexible")]
    pub trade_fee: f64,
    /// Price of the last trade. Its direction depends on that trade, so
    /// fixed-direction consumers should use [`Pool::price_per_left`] or
    /// [`Pool::price_per_right`] instead.
    #[serde(default, with = "serde_util::f64_flexible_opt")]
    pub last_price: Option<f64>,
    #[serde(default)]
    pub stats: PoolStats,
}

impl Pool {
    pub fn left(&self) -> &Asset {
        &self.assets[0]
    }

    pub fn right(&self) -> &Asset {
        &self.assets[1]
    }

    pub fn left_reserve(&self) -> u128 {
        self.reserves[0]
    }

    pub fn right_reserve(&self) -> u128 {
        self.reserves[1]
    }

    /// Trade fee normalized to a fraction in `[0, 1]`.
    ///
    /// Informational only: the quote operations never apply it.
    pub fn trade_fee_fraction(&self) -> f64 {
        self.trade_fee / 100.0
    }

    /// Right tokens received per one left token, fee-free.
    pub fn price_per_left(&self) -> f64 {
        self.quote_left(1.0)
    }

    /// Left tokens received per one right token, fee-free.
    pub fn price_per_right(&self) -> f64 {
        self.quote_right(1.0, None, None)
    }

    /// Same as [`Pool::price_per_right`], normalizing against the given
    /// decimals instead of the declared metadata.
    pub fn price_per_right_with(
        &self,
        left_decimals: Option<u32>,
        right_decimals: Option<u32>,
    ) -> f64 {
        self.quote_right(1.0, left_decimals, right_decimals)
    }

    /// Amount of right assets received for swapping `left_amount` into the
    /// pool, fee-free.
    pub fn quote_left_to_right(&self, left_amount: f64) -> Result<f64, QuoteError> {
        if left_amount <= 0.0 {
            return Err(QuoteError::NonPositiveAmount(left_amount));
        }
        Ok(self.quote_left(left_amount))
    }

    /// Amount of left assets received for swapping `right_amount` into the
    /// pool, fee-free.
    ///
    /// The decimal overrides let a caller quote against assumed decimals
    /// different from the declared metadata, for cross-pool comparisons on
    /// a common decimal basis.
    pub fn quote_right_to_left(
        &self,
        right_amount: f64,
        left_decimals: Option<u32>,
        right_decimals: Option<u32>,
    ) -> Result<f64, QuoteError> {
        if right_amount <= 0.0 {
            return Err(QuoteError::NonPositiveAmount(right_amount));
        }
        Ok(self.quote_right(right_amount, left_decimals, right_decimals))
    }

    fn quote_left(&self, left_amount: f64) -> f64 {
        if self.reserves[0] == 0 || self.reserves[1] == 0 {
            return 0.0;
        }
        let (left, right) = self.normalized_reserves(None, None);
        match self.kind {
            PoolKind::Stable => math::stable::quote(left, right, left_amount),
            PoolKind::Volatile | PoolKind::Unknown => {
                math::volatile::quote(left, right, left_amount)
            }
        }
    }

    fn quote_right(
        &self,
        right_amount: f64,
        left_decimals: Option<u32>,
        right_decimals: Option<u32>,
    ) -> f64 {
        if self.reserves[0] == 0 || self.reserves[1] == 0 {
            return 0.0;
        }
        let (left, right) = self.normalized_reserves(left_decimals, right_decimals);
        match self.kind {
            PoolKind::Stable => math::stable::quote(right, left, right_amount),
            PoolKind::Volatile | PoolKind::Unknown => {
                math::volatile::quote(right, left, right_amount)
            }
        }
    }

    /// Reserves scaled down by `10^decimals` of each side.
    fn normalized_reserves(
        &self,
        left_decimals: Option<u32>,
        right_decimals: Option<u32>,
    ) -> (f64, f64) {
        let left_scale = 10f64.powi(left_decimals.unwrap_or_else(|| self.left().decimals()) as i32);
        let right_scale =
            10f64.powi(right_decimals.unwrap_or_else(|| self.right().decimals()) as i32);
        (
            self.reserves[0] as f64 / left_scale,
            self.reserves[1] as f64 / right_scale,
        )
    }
}
