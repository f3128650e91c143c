//! AMM invariant formulas.
//!
//! Both modules work on reserves already normalized by `10^decimals` and
//! quote fee-free: the pool's trade fee is never applied here.

pub mod stable;
pub mod volatile;
