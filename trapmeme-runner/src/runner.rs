//! Analysis runner — wires quotes, seeds, generation and evaluation.
//!
//! Two entry points:
//! - `run_analysis()`: takes a fully specified request. Used by the scanner.
//! - `run_session()`: starts from the TOML session config, quoting the board
//!   when no price is given. Used by the CLI.
//!
//! Seeds: the master seed is split per coin with `SeedHierarchy`. Iteration
//! 0 drives the series noise, iteration 1 the mock quote, so a coin analysed
//! alone and the same coin inside a scan produce identical reports.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use trapmeme_core::domain::PriceSeries;
use trapmeme_core::market::MarketBoard;
use trapmeme_core::rng::SeedHierarchy;
use trapmeme_core::{analyze, AnalysisError, AnalysisRequest, AnalysisResult, GeneratorConfig};

use crate::config::{AppConfig, ConfigError};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

const NOISE_ITERATION: u64 = 0;
const QUOTE_ITERATION: u64 = 1;

/// Everything that pins a run down besides the request itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub seed: u64,
    /// Timestamp of the last generated bar.
    pub end: NaiveDateTime,
    pub generator: GeneratorConfig,
}

impl RunOptions {
    pub fn new(seed: u64, end: NaiveDateTime) -> Self {
        Self {
            seed,
            end,
            generator: GeneratorConfig::default(),
        }
    }

    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    pub fn seeds(&self) -> SeedHierarchy {
        SeedHierarchy::new(self.seed)
    }
}

/// Complete result of a single analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// BLAKE3 digest of the request.
    pub fingerprint: String,
    pub seed: u64,
    pub generated_at: NaiveDateTime,
    /// Generator shape the series was drawn with.
    #[serde(default)]
    pub generator: GeneratorConfig,
    pub request: AnalysisRequest,
    pub series: PriceSeries,
    pub result: AnalysisResult,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl AnalysisReport {
    /// BLAKE3 hex digest identifying this run: the request fingerprint plus
    /// everything else that shapes the series (seed, generator, end time).
    pub fn run_id(&self) -> String {
        let canonical = serde_json::json!({
            "fingerprint": &self.fingerprint,
            "seed": self.seed,
            "generated_at": self.generated_at.to_string(),
            "generator": &self.generator,
        });
        blake3::hash(canonical.to_string().as_bytes())
            .to_hex()
            .to_string()
    }
}

/// Mock live price for a coin under a master seed.
///
/// The quote branch is keyed by the board's own spelling of the pair, so
/// `btc/usdt` and `BTC/USDT` quote the same price.
pub fn quote_price(board: &MarketBoard, coin: &str, seed: u64) -> Result<f64, AnalysisError> {
    let symbol = board
        .listing(coin)
        .map(|l| l.symbol.as_str())
        .ok_or_else(|| AnalysisError::UnknownCoin(coin.to_string()))?;
    let mut rng = SeedHierarchy::new(seed).rng_for(symbol, QUOTE_ITERATION);
    board.price(symbol, &mut rng)
}

/// Run one analysis for a fully specified request.
pub fn run_analysis(
    request: &AnalysisRequest,
    opts: &RunOptions,
) -> Result<AnalysisReport, RunError> {
    let mut noise = opts.seeds().noise_for(&request.coin, NOISE_ITERATION);
    let (series, result) = analyze(request, &opts.generator, opts.end, &mut noise)?;

    tracing::info!(
        coin = %request.coin,
        price = request.current_price,
        seed = opts.seed,
        strategy = %result.strategy,
        leverage = result.leverage,
        confidence = result.confidence,
        "analysis complete"
    );

    Ok(AnalysisReport {
        schema_version: SCHEMA_VERSION,
        fingerprint: request.fingerprint(),
        seed: opts.seed,
        generated_at: opts.end,
        generator: opts.generator.clone(),
        request: request.clone(),
        series,
        result,
    })
}

/// Run the configured session. `price` overrides the board quote, which is
/// how coins missing from the board can still be analysed. The config's
/// `[generator]` section replaces `opts.generator`.
pub fn run_session(
    config: &AppConfig,
    board: &MarketBoard,
    price: Option<f64>,
    opts: &RunOptions,
) -> Result<AnalysisReport, RunError> {
    config.validate()?;
    let session = &config.session;
    // Listed pairs use the board's spelling; unlisted labels pass through.
    let coin = board
        .listing(&session.coin)
        .map(|l| l.symbol.clone())
        .unwrap_or_else(|| session.coin.trim().to_string());
    let current_price = match price {
        Some(p) => p,
        None => quote_price(board, &coin, opts.seed)?,
    };
    tracing::debug!(coin = %coin, current_price, "session price resolved");

    let request = AnalysisRequest::new(
        coin,
        current_price,
        session.capital,
        session.risk_profile,
    );
    let opts = opts.clone().with_generator(config.generator.clone());
    run_analysis(&request, &opts)
}
