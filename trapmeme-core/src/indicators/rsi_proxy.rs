//! RSI proxy.
//!
//! Not Wilder's RSI: a gap oscillator that maps the close/SMA distance onto
//! the RSI scale, `clamp(50 + (close - sma) / sma × 1000, 20, 80)`.
//! Each 0.1% of gap moves the reading one point.

pub const RSI_PROXY_MIN: f64 = 20.0;
pub const RSI_PROXY_MAX: f64 = 80.0;

const GAP_SCALE: f64 = 1000.0;

/// Caller guarantees `sma` is finite and non-zero.
pub fn rsi_proxy(close: f64, sma: f64) -> f64 {
    (50.0 + (close - sma) / sma * GAP_SCALE).clamp(RSI_PROXY_MIN, RSI_PROXY_MAX)
}
