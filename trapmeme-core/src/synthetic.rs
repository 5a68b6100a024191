//! Synthetic series generator.
//!
//! A floored Gaussian random walk anchored to the current price:
//!
//! ```text
//! price_0 = p
//! price_t = max(price_{t-1} + N(0, step × p), floor × p)
//! ```
//!
//! Each step becomes one bar: open is the pre-step price, close the
//! post-step price. Wicks are drawn after the walk, all highs first and then
//! all lows, each `close ± |N(0, wick × p)|`. The floor is soft: it stops the
//! walk sinking below `floor × p` but nothing caps it from above.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{PriceBar, PriceSeries};
use crate::error::AnalysisError;
use crate::rng::GaussianNoise;

/// Generator parameters. `Default` is the dashboard's fixed shape:
/// 100 hourly bars, 0.2% step noise, 1% wick noise, 80% floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub bars: usize,
    pub interval_minutes: i64,
    /// Step standard deviation as a fraction of the anchor price.
    pub step_volatility: f64,
    /// Wick standard deviation as a fraction of the anchor price.
    pub wick_volatility: f64,
    /// Walk floor as a fraction of the anchor price.
    pub floor_ratio: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            bars: 100,
            interval_minutes: 60,
            step_volatility: 0.002,
            wick_volatility: 0.01,
            floor_ratio: 0.8,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.bars == 0 {
            return Err(AnalysisError::InvalidGenerator("bars must be >= 1".into()));
        }
        if self.interval_minutes <= 0 {
            return Err(AnalysisError::InvalidGenerator(format!(
                "interval_minutes must be positive, got {}",
                self.interval_minutes
            )));
        }
        for (name, value) in [
            ("step_volatility", self.step_volatility),
            ("wick_volatility", self.wick_volatility),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::InvalidGenerator(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.floor_ratio) {
            return Err(AnalysisError::InvalidGenerator(format!(
                "floor_ratio must be within [0, 1], got {}",
                self.floor_ratio
            )));
        }
        self.span().map(|_| ())
    }

    /// Bar spacing. Fails when `interval_minutes` is out of `Duration` range.
    pub fn interval(&self) -> Result<Duration, AnalysisError> {
        Duration::try_minutes(self.interval_minutes).ok_or_else(|| {
            AnalysisError::InvalidGenerator(format!(
                "interval_minutes {} is out of range",
                self.interval_minutes
            ))
        })
    }

    /// Time from the first bar to the last.
    pub fn span(&self) -> Result<Duration, AnalysisError> {
        let steps = i32::try_from(self.bars.saturating_sub(1)).map_err(|_| {
            AnalysisError::InvalidGenerator(format!("bars {} is out of range", self.bars))
        })?;
        self.interval()?.checked_mul(steps).ok_or_else(|| {
            AnalysisError::InvalidGenerator(format!(
                "{} bars of {} minutes overflow the time range",
                self.bars, self.interval_minutes
            ))
        })
    }
}

/// Reject non-positive or non-finite prices.
pub fn validate_price(price: f64) -> Result<(), AnalysisError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidPrice(price))
    }
}

/// Evenly spaced stamps ending at `end`, oldest first.
fn timestamps(
    end: NaiveDateTime,
    config: &GeneratorConfig,
) -> Result<Vec<NaiveDateTime>, AnalysisError> {
    let out_of_range = || {
        AnalysisError::InvalidGenerator(format!(
            "{} bars of {} minutes ending {end} fall outside the calendar",
            config.bars, config.interval_minutes
        ))
    };
    let interval = config.interval()?;
    let first = end
        .checked_sub_signed(config.span()?)
        .ok_or_else(out_of_range)?;
    let mut stamps = Vec::with_capacity(config.bars);
    let mut t = first;
    for i in 0..config.bars {
        if i > 0 {
            t = t.checked_add_signed(interval).ok_or_else(out_of_range)?;
        }
        stamps.push(t);
    }
    Ok(stamps)
}

/// Generate a synthetic series whose last bar is stamped `end`.
///
/// Fails before drawing any noise if the price or the config is invalid.
pub fn generate_series<N>(
    symbol: &str,
    current_price: f64,
    end: NaiveDateTime,
    config: &GeneratorConfig,
    noise: &mut N,
) -> Result<PriceSeries, AnalysisError>
where
    N: GaussianNoise + ?Sized,
{
    validate_price(current_price)?;
    config.validate()?;
    let stamps = timestamps(end, config)?;

    let n = config.bars;
    let step_sd = current_price * config.step_volatility;
    let wick_sd = current_price * config.wick_volatility;
    let floor = current_price * config.floor_ratio;

    let mut opens = Vec::with_capacity(n);
    let mut closes = Vec::with_capacity(n);
    let mut price = current_price;
    for _ in 0..n {
        opens.push(price);
        price = (price + noise.next_normal(0.0, step_sd)).max(floor);
        closes.push(price);
    }

    let highs: Vec<f64> = closes
        .iter()
        .map(|c| c + noise.next_normal(0.0, wick_sd).abs())
        .collect();
    let lows: Vec<f64> = closes
        .iter()
        .map(|c| c - noise.next_normal(0.0, wick_sd).abs())
        .collect();

    let bars: Vec<PriceBar> = stamps
        .into_iter()
        .enumerate()
        .map(|(i, timestamp)| PriceBar {
            timestamp,
            open: opens[i],
            high: highs[i],
            low: lows[i],
            close: closes[i],
        })
        .collect();

    tracing::debug!(
        symbol,
        current_price,
        bars = n,
        last_close = price,
        loose_opens = bars.iter().filter(|b| !b.is_sane()).count(),
        "generated synthetic series"
    );

    Ok(PriceSeries::new(symbol, current_price, bars))
}
