//! Input-validation errors raised at the analysis boundary.

use thiserror::Error;

/// Errors from series generation and signal evaluation.
///
/// Every variant is an input problem: the computations themselves have no
/// failure modes once their inputs are valid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("invalid price {0}: must be positive and finite")]
    InvalidPrice(f64),

    #[error("invalid capital {0}: must be positive and finite")]
    InvalidCapital(f64),

    #[error("series has {bars} bars, at least {required} are required")]
    InsufficientHistory { bars: usize, required: usize },

    #[error("moving average is undefined at the latest bar")]
    UndefinedAverage,

    #[error("invalid generator config: {0}")]
    InvalidGenerator(String),

    #[error("unknown coin '{0}'")]
    UnknownCoin(String),

    #[error("invalid listing {symbol}: {reason}")]
    InvalidListing { symbol: String, reason: String },

    #[error("unknown risk profile '{0}' (expected Conservative, Moderate, Aggressive or Institutional)")]
    UnknownRiskProfile(String),
}
