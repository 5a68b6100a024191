//! PriceBar — one synthetic hourly candle.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// OHLC bar produced by the synthetic generator.
///
/// `close` is the random-walk value, `open` the walk value before the step.
/// `high`/`low` are independent wick draws around `close`, so the close
/// always sits inside the wicks while the open may not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    /// Returns true if any OHLC field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Full OHLC sanity check: both open and close lie within `[low, high]`.
    ///
    /// Generated bars always satisfy the close envelope but can fail this
    /// check when the step moved the close further than the wick draws.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }

    /// `low <= close <= high`.
    pub fn close_within_wicks(&self) -> bool {
        self.low <= self.close && self.close <= self.high
    }
}
