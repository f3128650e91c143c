use thiserror::Error;

/// Errors produced by the pricing operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    /// Swap amounts must be strictly positive.
    #[error("swap amount must be greater than zero, got {0}")]
    NonPositiveAmount(f64),
}
