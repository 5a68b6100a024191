//! Mock market board.
//!
//! Six USDT pairs quoted as a base price plus random jitter. Large-cap pairs
//! jitter by whole dollars, sub-dollar and single-digit pairs by a uniform
//! fraction. The 24h change shown next to each quote is pure decoration,
//! uniform in [-3%, 3%).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// How a pair's price wanders around its base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Jitter {
    /// Whole-unit offset in `[low, high)`.
    Integer { low: i64, high: i64 },
    /// Continuous offset in `[low, high)`.
    Uniform { low: f64, high: f64 },
}

impl Jitter {
    /// Both bounds finite with `low < high`.
    fn validate(&self) -> Result<(), String> {
        let ok = match *self {
            Self::Integer { low, high } => low < high,
            Self::Uniform { low, high } => low.is_finite() && high.is_finite() && low < high,
        };
        if ok {
            Ok(())
        } else {
            Err(format!("jitter range {self:?} is empty or not finite"))
        }
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match *self {
            Self::Integer { low, high } => rng.gen_range(low..high) as f64,
            Self::Uniform { low, high } => rng.gen_range(low..high),
        }
    }
}

/// One listed pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub symbol: String,
    pub base_price: f64,
    pub jitter: Jitter,
}

/// A quote as displayed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    /// Decorative 24h change in percent.
    pub change_pct: f64,
}

/// The set of quotable pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketBoard {
    listings: Vec<Listing>,
}

impl Default for MarketBoard {
    fn default() -> Self {
        let listing = |symbol: &str, base_price: f64, jitter: Jitter| Listing {
            symbol: symbol.to_string(),
            base_price,
            jitter,
        };
        Self {
            listings: vec![
                listing("BTC/USDT", 43_250.0, Jitter::Integer { low: -100, high: 100 }),
                listing("ETH/USDT", 2_550.0, Jitter::Integer { low: -20, high: 20 }),
                listing("SOL/USDT", 105.0, Jitter::Integer { low: -5, high: 5 }),
                listing("ADA/USDT", 0.52, Jitter::Uniform { low: -0.02, high: 0.02 }),
                listing("XRP/USDT", 0.62, Jitter::Uniform { low: -0.02, high: 0.02 }),
                listing("DOT/USDT", 7.2, Jitter::Uniform { low: -0.2, high: 0.2 }),
            ],
        }
    }
}

impl MarketBoard {
    /// Build a board, rejecting listings that could not be quoted.
    pub fn new(listings: Vec<Listing>) -> Result<Self, AnalysisError> {
        for listing in &listings {
            let invalid = |reason: String| AnalysisError::InvalidListing {
                symbol: listing.symbol.clone(),
                reason,
            };
            if listing.symbol.trim().is_empty() {
                return Err(invalid("symbol must not be empty".into()));
            }
            if !listing.base_price.is_finite() {
                return Err(invalid(format!(
                    "base price {} is not finite",
                    listing.base_price
                )));
            }
            listing.jitter.validate().map_err(invalid)?;
        }
        Ok(Self { listings })
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.listings.iter().map(|l| l.symbol.as_str())
    }

    /// Case-insensitive lookup.
    pub fn listing(&self, symbol: &str) -> Option<&Listing> {
        self.listings
            .iter()
            .find(|l| l.symbol.eq_ignore_ascii_case(symbol.trim()))
    }

    /// Mock live price for one pair.
    pub fn price<R: Rng>(&self, symbol: &str, rng: &mut R) -> Result<f64, AnalysisError> {
        let listing = self
            .listing(symbol)
            .ok_or_else(|| AnalysisError::UnknownCoin(symbol.to_string()))?;
        Ok(listing.base_price + listing.jitter.sample(rng))
    }

    /// Quote every pair, in listing order.
    pub fn snapshot<R: Rng>(&self, rng: &mut R) -> Vec<Quote> {
        self.listings
            .iter()
            .map(|l| {
                let price = l.base_price + l.jitter.sample(rng);
                Quote {
                    symbol: l.symbol.clone(),
                    price,
                    change_pct: rng.gen_range(-3.0..3.0),
                }
            })
            .collect()
    }
}
