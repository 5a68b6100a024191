//! Strategy decision table.
//!
//! Four ordered threshold rules over the latest close, its SMA(20), the RSI
//! proxy and volatility. The first matching rule picks a canned strategy
//! label with its leverage and confidence:
//!
//! | # | condition                          | label                        | leverage                     | conf |
//! |---|------------------------------------|------------------------------|------------------------------|------|
//! | 1 | rsi < 35 and close > sma           | QUANTUM MOMENTUM EXPLOSION   | min(50, 10 + (35 - rsi) × 2) | 0.89 |
//! | 2 | rsi > 65 and close < sma           | NEURAL MEAN REVERSION        | 8                            | 0.83 |
//! | 3 | volatility > 8                     | VOLATILITY HARVESTING ALGO   | 12                           | 0.86 |
//! | 4 | otherwise                          | AI STATISTICAL ARBITRAGE     | 15                           | 0.81 |
//!
//! When rsi is the proxy of the same close/sma pair, rules 1 and 2 cannot
//! fire (close above the average always reads above 50). `select_strategy`
//! takes the scalars separately so each rule stays reachable.

use std::fmt;

use serde::{Deserialize, Serialize};

const MOMENTUM_RSI_CEILING: f64 = 35.0;
const REVERSION_RSI_FLOOR: f64 = 65.0;
const HARVEST_VOLATILITY: f64 = 8.0;
const MOMENTUM_MAX_LEVERAGE: f64 = 50.0;

/// Canned strategy labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyLabel {
    #[serde(rename = "QUANTUM MOMENTUM EXPLOSION")]
    QuantumMomentumExplosion,
    #[serde(rename = "NEURAL MEAN REVERSION")]
    NeuralMeanReversion,
    #[serde(rename = "VOLATILITY HARVESTING ALGO")]
    VolatilityHarvestingAlgo,
    #[serde(rename = "AI STATISTICAL ARBITRAGE")]
    AiStatisticalArbitrage,
}

impl StrategyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuantumMomentumExplosion => "QUANTUM MOMENTUM EXPLOSION",
            Self::NeuralMeanReversion => "NEURAL MEAN REVERSION",
            Self::VolatilityHarvestingAlgo => "VOLATILITY HARVESTING ALGO",
            Self::AiStatisticalArbitrage => "AI STATISTICAL ARBITRAGE",
        }
    }

    /// Fixed confidence attached to each label.
    pub fn confidence(&self) -> f64 {
        match self {
            Self::QuantumMomentumExplosion => 0.89,
            Self::NeuralMeanReversion => 0.83,
            Self::VolatilityHarvestingAlgo => 0.86,
            Self::AiStatisticalArbitrage => 0.81,
        }
    }

    /// Card color the dashboard renders the label in.
    pub fn theme(&self) -> ThemeColor {
        match self {
            Self::QuantumMomentumExplosion | Self::VolatilityHarvestingAlgo => ThemeColor::Yellow,
            Self::NeuralMeanReversion | Self::AiStatisticalArbitrage => ThemeColor::Red,
        }
    }
}

impl fmt::Display for StrategyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    Yellow,
    Red,
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yellow => f.write_str("yellow"),
            Self::Red => f.write_str("red"),
        }
    }
}

/// Scalars the decision table reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalInputs {
    pub close: f64,
    pub sma: f64,
    pub rsi: f64,
    pub volatility: f64,
}

/// Outcome of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyDecision {
    pub label: StrategyLabel,
    pub leverage: f64,
    pub confidence: f64,
}

impl StrategyDecision {
    fn new(label: StrategyLabel, leverage: f64) -> Self {
        Self {
            label,
            leverage,
            confidence: label.confidence(),
        }
    }
}

/// Apply the ordered rules; the first match wins.
pub fn select_strategy(inputs: &SignalInputs) -> StrategyDecision {
    let SignalInputs {
        close,
        sma,
        rsi,
        volatility,
    } = *inputs;

    if rsi < MOMENTUM_RSI_CEILING && close > sma {
        let leverage =
            MOMENTUM_MAX_LEVERAGE.min(10.0 + (MOMENTUM_RSI_CEILING - rsi) * 2.0);
        StrategyDecision::new(StrategyLabel::QuantumMomentumExplosion, leverage)
    } else if rsi > REVERSION_RSI_FLOOR && close < sma {
        StrategyDecision::new(StrategyLabel::NeuralMeanReversion, 8.0)
    } else if volatility > HARVEST_VOLATILITY {
        StrategyDecision::new(StrategyLabel::VolatilityHarvestingAlgo, 12.0)
    } else {
        StrategyDecision::new(StrategyLabel::AiStatisticalArbitrage, 15.0)
    }
}
