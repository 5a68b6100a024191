//! Signal evaluator — request in, flat result bundle out.
//!
//! `evaluate` reads only the latest close and SMA(20) plus the close-to-close
//! volatility of the series, runs the decision table, then applies fixed
//! ratios for risk, sizing and trade levels. `analyze` validates a request,
//! generates its series and evaluates it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{PriceSeries, RiskProfile, SMA_WINDOW};
use crate::error::AnalysisError;
use crate::indicators::{rsi_proxy, volatility_pct};
use crate::rng::GaussianNoise;
use crate::signal::{select_strategy, SignalInputs, StrategyLabel, ThemeColor};
use crate::synthetic::{generate_series, validate_price, GeneratorConfig};

/// 1-day value-at-risk as a fraction of the latest close.
pub const VAR_1D_RATIO: f64 = 0.021;
/// Expected shortfall as a fraction of the latest close.
pub const EXPECTED_SHORTFALL_RATIO: f64 = 0.038;
/// Position size as a fraction of capital.
pub const POSITION_RATIO: f64 = 0.15;
/// Maximum risk as a fraction of the position.
pub const MAX_RISK_RATIO: f64 = 0.08;
pub const ENTRY_BAND: (f64, f64) = (0.995, 1.005);
pub const STOP_LOSS_RATIO: f64 = 0.985;
pub const TAKE_PROFIT_RATIO: f64 = 1.035;

/// What the trader asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Pair label, e.g. "BTC/USDT". Only used to tag the output.
    pub coin: String,
    pub current_price: f64,
    pub capital: f64,
    pub risk_profile: RiskProfile,
}

impl AnalysisRequest {
    pub fn new(
        coin: impl Into<String>,
        current_price: f64,
        capital: f64,
        risk_profile: RiskProfile,
    ) -> Self {
        Self {
            coin: coin.into(),
            current_price,
            capital,
            risk_profile,
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        validate_price(self.current_price)?;
        validate_capital(self.capital)
    }

    /// BLAKE3 hex digest of the canonical JSON form of the request.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::json!({
            "capital": self.capital,
            "coin": &self.coin,
            "current_price": self.current_price,
            "risk_profile": self.risk_profile.as_str(),
        });
        blake3::hash(canonical.to_string().as_bytes())
            .to_hex()
            .to_string()
    }
}

fn validate_capital(capital: f64) -> Result<(), AnalysisError> {
    if capital.is_finite() && capital > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidCapital(capital))
    }
}

/// Flat analysis output; serializes as a single-level key/value object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub coin: String,
    /// Echoed from the request; does not influence any figure below.
    pub risk_profile: RiskProfile,
    pub strategy: StrategyLabel,
    pub leverage: f64,
    pub confidence: f64,
    pub rsi: f64,
    pub volatility: f64,
    pub latest_close: f64,
    pub sma_20: f64,
    pub var_1d: f64,
    pub expected_shortfall: f64,
    pub position_size: f64,
    pub max_risk: f64,
    pub entry_min: f64,
    pub entry_max: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub theme_color: ThemeColor,
}

/// Derive the decision-table scalars from a series.
pub fn signal_inputs(series: &PriceSeries) -> Result<SignalInputs, AnalysisError> {
    if series.len() < SMA_WINDOW {
        return Err(AnalysisError::InsufficientHistory {
            bars: series.len(),
            required: SMA_WINDOW,
        });
    }
    let sma = series
        .latest_sma()
        .filter(|s| s.is_finite() && *s != 0.0)
        .ok_or(AnalysisError::UndefinedAverage)?;
    let close = series
        .latest_close()
        .filter(|c| c.is_finite())
        .ok_or(AnalysisError::UndefinedAverage)?;
    let volatility = volatility_pct(&series.closes()).ok_or(AnalysisError::InsufficientHistory {
        bars: series.len(),
        required: SMA_WINDOW,
    })?;

    Ok(SignalInputs {
        close,
        sma,
        rsi: rsi_proxy(close, sma),
        volatility,
    })
}

/// Evaluate a generated series for a given capital.
pub fn evaluate(
    coin: &str,
    series: &PriceSeries,
    capital: f64,
    risk_profile: RiskProfile,
) -> Result<AnalysisResult, AnalysisError> {
    validate_capital(capital)?;
    let inputs = signal_inputs(series)?;
    let decision = select_strategy(&inputs);
    let close = inputs.close;
    let position_size = capital * POSITION_RATIO;

    tracing::debug!(
        coin,
        rsi = inputs.rsi,
        volatility = inputs.volatility,
        strategy = decision.label.as_str(),
        "evaluated signal"
    );

    Ok(AnalysisResult {
        coin: coin.to_string(),
        risk_profile,
        strategy: decision.label,
        leverage: decision.leverage,
        confidence: decision.confidence,
        rsi: inputs.rsi,
        volatility: inputs.volatility,
        latest_close: close,
        sma_20: inputs.sma,
        var_1d: close * VAR_1D_RATIO,
        expected_shortfall: close * EXPECTED_SHORTFALL_RATIO,
        position_size,
        max_risk: position_size * MAX_RISK_RATIO,
        entry_min: close * ENTRY_BAND.0,
        entry_max: close * ENTRY_BAND.1,
        stop_loss: close * STOP_LOSS_RATIO,
        take_profit: close * TAKE_PROFIT_RATIO,
        theme_color: decision.label.theme(),
    })
}

/// Validate, generate, evaluate. Returns the series alongside the result
/// so callers can chart or export it.
pub fn analyze<N>(
    request: &AnalysisRequest,
    config: &GeneratorConfig,
    end: NaiveDateTime,
    noise: &mut N,
) -> Result<(PriceSeries, AnalysisResult), AnalysisError>
where
    N: GaussianNoise + ?Sized,
{
    request.validate()?;
    let series = generate_series(&request.coin, request.current_price, end, config, noise)?;
    let result = evaluate(&request.coin, &series, request.capital, request.risk_profile)?;
    Ok((series, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;
    use crate::rng::BoxMuller;
    use chrono::NaiveDate;

    fn end() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn series_from(closes: &[f64]) -> PriceSeries {
        PriceSeries::new("TEST", closes[0], make_bars(closes))
    }

    #[test]
    fn sizing_from_capital() {
        let series = series_from(&[100.0; 30]);
        let r = evaluate("TEST", &series, 10_000.0, RiskProfile::Moderate).unwrap();
        assert_eq!(r.position_size, 1500.0);
        assert!((r.max_risk - 120.0).abs() < 1e-9);
    }

    #[test]
    fn fixed_ratio_levels() {
        let series = series_from(&[100.0; 30]);
        let r = evaluate("TEST", &series, 1_000.0, RiskProfile::Conservative).unwrap();
        assert_eq!(r.latest_close, 100.0);
        assert_eq!(r.var_1d, 100.0 * 0.021);
        assert_eq!(r.expected_shortfall, 100.0 * 0.038);
        assert_eq!(r.entry_min, 100.0 * 0.995);
        assert_eq!(r.entry_max, 100.0 * 1.005);
        assert_eq!(r.stop_loss, 100.0 * 0.985);
        assert_eq!(r.take_profit, 100.0 * 1.035);
    }

    #[test]
    fn flat_series_falls_to_default_rule() {
        let series = series_from(&[100.0; 30]);
        let r = evaluate("TEST", &series, 1_000.0, RiskProfile::Aggressive).unwrap();
        assert_eq!(r.rsi, 50.0);
        assert_eq!(r.volatility, 0.0);
        assert_eq!(r.strategy, StrategyLabel::AiStatisticalArbitrage);
        assert_eq!(r.leverage, 15.0);
        assert_eq!(r.confidence, 0.81);
        assert_eq!(r.theme_color, ThemeColor::Red);
    }

    #[test]
    fn wild_series_picks_volatility_harvesting() {
        // ±20% swings around 100
        let closes: Vec<f64> = (0..40)
            .map(|i| if i % 2 == 0 { 100.0 } else { 120.0 })
            .collect();
        let r = evaluate("TEST", &series_from(&closes), 1_000.0, RiskProfile::Moderate).unwrap();
        assert!(r.volatility > 8.0);
        assert_eq!(r.strategy, StrategyLabel::VolatilityHarvestingAlgo);
        assert_eq!(r.leverage, 12.0);
    }

    #[test]
    fn short_series_is_rejected() {
        let series = series_from(&[100.0; 19]);
        let err = evaluate("TEST", &series, 1_000.0, RiskProfile::Moderate).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InsufficientHistory {
                bars: 19,
                required: 20
            }
        );
    }

    #[test]
    fn nan_average_is_rejected() {
        let mut closes = vec![100.0; 25];
        closes[24] = f64::NAN;
        let err = evaluate("TEST", &series_from(&closes), 1_000.0, RiskProfile::Moderate)
            .unwrap_err();
        assert_eq!(err, AnalysisError::UndefinedAverage);
    }

    #[test]
    fn bad_capital_is_rejected() {
        let series = series_from(&[100.0; 30]);
        for capital in [0.0, -5.0, f64::NAN] {
            assert!(matches!(
                evaluate("TEST", &series, capital, RiskProfile::Moderate),
                Err(AnalysisError::InvalidCapital(_))
            ));
        }
    }

    #[test]
    fn risk_profile_does_not_change_figures() {
        let request = |risk| AnalysisRequest::new("ETH/USDT", 2_550.0, 10_000.0, risk);
        let config = GeneratorConfig::default();
        let mut baseline = None;
        for risk in RiskProfile::ALL {
            let (_, mut r) =
                analyze(&request(risk), &config, end(), &mut BoxMuller::seeded(9)).unwrap();
            assert_eq!(r.risk_profile, risk);
            r.risk_profile = RiskProfile::Conservative;
            match &baseline {
                None => baseline = Some(r),
                Some(b) => assert_eq!(&r, b),
            }
        }
    }

    #[test]
    fn analyze_rejects_zero_price_before_generating() {
        let request = AnalysisRequest::new("BTC/USDT", 0.0, 10_000.0, RiskProfile::Moderate);
        let err = analyze(
            &request,
            &GeneratorConfig::default(),
            end(),
            &mut BoxMuller::seeded(1),
        )
        .unwrap_err();
        assert_eq!(err, AnalysisError::InvalidPrice(0.0));
    }

    #[test]
    fn result_serializes_flat() {
        let series = series_from(&[100.0; 30]);
        let r = evaluate("TEST", &series, 1_000.0, RiskProfile::Moderate).unwrap();
        let value = serde_json::to_value(&r).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.values().all(|v| !v.is_object() && !v.is_array()));
        assert_eq!(obj["strategy"], "AI STATISTICAL ARBITRAGE");
        assert_eq!(obj["theme_color"], "red");
        assert_eq!(obj["risk_profile"], "Moderate");
    }

    #[test]
    fn fingerprint_tracks_inputs() {
        let a = AnalysisRequest::new("BTC/USDT", 43_250.0, 10_000.0, RiskProfile::Moderate);
        let mut b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.capital = 20_000.0;
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }
}
