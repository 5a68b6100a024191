//! Indicators over synthetic bars.
//!
//! `Sma` implements the `Indicator` trait and produces the chart overlay.
//! The evaluator's scalars (volatility, RSI proxy) are plain functions over
//! closes since only their latest value is ever read.

pub mod rsi_proxy;
pub mod sma;
pub mod volatility;

pub use rsi_proxy::{rsi_proxy, RSI_PROXY_MAX, RSI_PROXY_MIN};
pub use sma::Sma;
pub use volatility::{pct_change, sample_std_dev, volatility_pct};

use crate::domain::PriceBar;

/// Trait for bar-series indicators.
///
/// Output has the same length as the input; the first `lookback()` values
/// are `f64::NAN`. No value at bar t may depend on bars after t.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;
}

/// Create hourly bars from close prices for testing.
///
/// open = prev_close (or close for the first bar), wicks ±1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                timestamp: base + chrono::Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
