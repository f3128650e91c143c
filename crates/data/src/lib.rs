//! DeDust REST API access.
//!
//! [`DedustClient`] talks to the production API; the monitor consumes it
//! through the [`PoolDataSource`] trait so tests can script responses.

pub mod client;
mod endpoints;
pub mod error;
pub mod source;

pub use client::DedustClient;
pub use error::FetchError;
pub use source::PoolDataSource;
