//! TrapMeme core — synthetic price series, heuristic indicators and the
//! strategy decision table.
//!
//! - Domain types (price bars, series with SMA overlay, risk profile)
//! - Seeded Gaussian noise and a BLAKE3 seed hierarchy
//! - Floored random-walk series generator
//! - SMA, volatility and RSI-proxy indicators
//! - Ordered threshold rules that pick a strategy label
//! - Fixed-ratio risk, sizing and trade-level arithmetic
//! - Mock quote board for the listed pairs

pub mod analysis;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod market;
pub mod rng;
pub mod signal;
pub mod synthetic;

pub use analysis::{analyze, evaluate, AnalysisRequest, AnalysisResult};
pub use error::AnalysisError;
pub use synthetic::{generate_series, GeneratorConfig};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything the scanner hands across threads is
    /// Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceBar>();
        require_sync::<domain::PriceBar>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::RiskProfile>();
        require_sync::<domain::RiskProfile>();

        require_send::<AnalysisRequest>();
        require_sync::<AnalysisRequest>();
        require_send::<AnalysisResult>();
        require_sync::<AnalysisResult>();
        require_send::<AnalysisError>();
        require_sync::<AnalysisError>();
        require_send::<GeneratorConfig>();
        require_sync::<GeneratorConfig>();

        require_send::<market::MarketBoard>();
        require_sync::<market::MarketBoard>();
        require_send::<rng::SeedHierarchy>();
        require_sync::<rng::SeedHierarchy>();
        require_send::<rng::BoxMuller<rand::rngs::StdRng>>();
    }

    /// The decision table only sees scalars, never the request: the risk
    /// profile cannot leak into strategy selection.
    #[test]
    fn decision_table_takes_only_scalars() {
        fn _check(inputs: &signal::SignalInputs) -> signal::StrategyDecision {
            signal::select_strategy(inputs)
        }
    }
}
