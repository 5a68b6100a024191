//! PriceSeries — generated bars plus the SMA overlay.

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;
use crate::indicators::{Indicator, Sma};

/// Window of the moving-average overlay.
pub const SMA_WINDOW: usize = 20;

/// Time-ordered synthetic series for one symbol, oldest bar first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    /// Price the walk was anchored to.
    pub anchor_price: f64,
    pub bars: Vec<PriceBar>,
    /// Trailing SMA(20) of closes; `None` while the window is still filling.
    pub sma: Vec<Option<f64>>,
}

impl PriceSeries {
    /// Build a series and compute its overlay.
    pub fn new(symbol: impl Into<String>, anchor_price: f64, bars: Vec<PriceBar>) -> Self {
        let sma = Sma::new(SMA_WINDOW)
            .compute(&bars)
            .into_iter()
            .map(|v| (!v.is_nan()).then_some(v))
            .collect();
        Self {
            symbol: symbol.into(),
            anchor_price,
            bars,
            sma,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Overlay value at the latest bar, if the window has filled.
    pub fn latest_sma(&self) -> Option<f64> {
        self.sma.last().copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn overlay_matches_bar_count() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let series = PriceSeries::new("TEST", 100.0, make_bars(&closes));
        assert_eq!(series.sma.len(), 25);
        assert!(series.sma[..19].iter().all(Option::is_none));
        assert!(series.sma[19..].iter().all(Option::is_some));
        // mean(105..=124) = 114.5
        assert_eq!(series.latest_sma(), Some(114.5));
        assert_eq!(series.latest_close(), Some(124.0));
    }

    #[test]
    fn short_series_has_no_latest_sma() {
        let series = PriceSeries::new("TEST", 100.0, make_bars(&[100.0; 10]));
        assert_eq!(series.latest_sma(), None);
        assert_eq!(series.latest_close(), Some(100.0));
    }

    #[test]
    fn empty_series() {
        let series = PriceSeries::new("TEST", 100.0, Vec::new());
        assert!(series.is_empty());
        assert_eq!(series.latest_close(), None);
        assert_eq!(series.latest_sma(), None);
    }
}
