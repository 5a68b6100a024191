//! Market scanner — one analysis per listed pair.
//!
//! Pairs are quoted and analysed in parallel. Each pair's randomness comes
//! from its own `SeedHierarchy` branch, so the scan is identical for any
//! thread count and any evaluation order. Entries are ranked by confidence
//! (highest first), ties broken by symbol.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use trapmeme_core::domain::RiskProfile;
use trapmeme_core::market::MarketBoard;
use trapmeme_core::signal::{StrategyLabel, ThemeColor};
use trapmeme_core::AnalysisRequest;

use crate::runner::{quote_price, run_analysis, AnalysisReport, RunError, RunOptions};

/// One ranked row of a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanEntry {
    pub symbol: String,
    pub price: f64,
    pub strategy: StrategyLabel,
    pub leverage: f64,
    pub confidence: f64,
    pub rsi: f64,
    pub volatility: f64,
    pub theme_color: ThemeColor,
}

impl From<&AnalysisReport> for ScanEntry {
    fn from(report: &AnalysisReport) -> Self {
        let r = &report.result;
        Self {
            symbol: r.coin.clone(),
            price: report.request.current_price,
            strategy: r.strategy,
            leverage: r.leverage,
            confidence: r.confidence,
            rsi: r.rsi,
            volatility: r.volatility,
            theme_color: r.theme_color,
        }
    }
}

/// Analyse every pair on the board with the same capital and risk profile.
///
/// Returns the full reports, ranked. Fails on the first pair that fails.
pub fn scan_reports(
    board: &MarketBoard,
    capital: f64,
    risk_profile: RiskProfile,
    opts: &RunOptions,
) -> Result<Vec<AnalysisReport>, RunError> {
    let mut reports = board
        .listings()
        .par_iter()
        .map(|listing| {
            let price = quote_price(board, &listing.symbol, opts.seed)?;
            let request =
                AnalysisRequest::new(listing.symbol.clone(), price, capital, risk_profile);
            run_analysis(&request, opts)
        })
        .collect::<Result<Vec<_>, RunError>>()?;

    reports.sort_by(|a, b| {
        b.result
            .confidence
            .total_cmp(&a.result.confidence)
            .then_with(|| a.result.coin.cmp(&b.result.coin))
    });

    tracing::info!(pairs = reports.len(), seed = opts.seed, "market scan complete");
    Ok(reports)
}

/// Ranked summary rows for a scan.
pub fn scan_market(
    board: &MarketBoard,
    capital: f64,
    risk_profile: RiskProfile,
    opts: &RunOptions,
) -> Result<Vec<ScanEntry>, RunError> {
    Ok(scan_reports(board, capital, risk_profile, opts)?
        .iter()
        .map(ScanEntry::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use trapmeme_core::market::{Jitter, Listing};

    fn opts(seed: u64) -> RunOptions {
        RunOptions::new(
            seed,
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn scans_every_pair_once() {
        let board = MarketBoard::default();
        let entries = scan_market(&board, 10_000.0, RiskProfile::Moderate, &opts(1)).unwrap();
        assert_eq!(entries.len(), 6);
        let mut symbols: Vec<&str> = entries.iter().map(|e| e.symbol.as_str()).collect();
        symbols.sort();
        symbols.dedup();
        assert_eq!(symbols.len(), 6);
    }

    #[test]
    fn ranked_by_confidence_then_symbol() {
        let entries =
            scan_market(&MarketBoard::default(), 10_000.0, RiskProfile::Moderate, &opts(4))
                .unwrap();
        for pair in entries.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.confidence > b.confidence
                    || (a.confidence == b.confidence && a.symbol < b.symbol),
                "{a:?} before {b:?}"
            );
        }
    }

    #[test]
    fn scan_matches_single_analysis() {
        let board = MarketBoard::default();
        let reports = scan_reports(&board, 5_000.0, RiskProfile::Aggressive, &opts(9)).unwrap();
        for report in &reports {
            let price = quote_price(&board, &report.result.coin, 9).unwrap();
            let request = AnalysisRequest::new(
                report.result.coin.clone(),
                price,
                5_000.0,
                RiskProfile::Aggressive,
            );
            assert_eq!(&run_analysis(&request, &opts(9)).unwrap(), report);
        }
    }

    #[test]
    fn thread_count_does_not_change_scan() {
        let board = MarketBoard::default();
        let single = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap()
            .install(|| scan_market(&board, 10_000.0, RiskProfile::Moderate, &opts(77)))
            .unwrap();
        let many = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap()
            .install(|| scan_market(&board, 10_000.0, RiskProfile::Moderate, &opts(77)))
            .unwrap();
        assert_eq!(single, many);
    }

    #[test]
    fn failing_pair_fails_the_scan() {
        let board = MarketBoard::new(vec![Listing {
            symbol: "ZERO/USDT".into(),
            base_price: 0.0,
            jitter: Jitter::Integer { low: 0, high: 1 },
        }])
        .unwrap();
        let err = scan_market(&board, 10_000.0, RiskProfile::Moderate, &opts(1)).unwrap_err();
        assert!(matches!(err, RunError::Analysis(_)));
    }
}
