//! Reporting and export — JSON, CSV, and Markdown artifact generation.
//!
//! - **JSON**: full report round-trip with schema versioning
//! - **CSV**: the bar series with its SMA overlay (chart-ready), scan tables
//! - **Markdown**: the analysis cards as a human-readable report
//!
//! Unknown (newer) schema versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use trapmeme_core::domain::PriceSeries;

use crate::runner::{AnalysisReport, SCHEMA_VERSION};
use crate::scanner::ScanEntry;

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `AnalysisReport` to pretty JSON.
pub fn export_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize AnalysisReport to JSON")
}

/// Deserialize an `AnalysisReport`, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<AnalysisReport> {
    let report: AnalysisReport =
        serde_json::from_str(json).context("failed to deserialize AnalysisReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export bars with the SMA overlay.
///
/// Columns: timestamp, open, high, low, close, sma_20. The SMA cell is empty
/// while the window is filling.
pub fn export_series_csv(series: &PriceSeries) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "open", "high", "low", "close", "sma_20"])?;
    for (bar, sma) in series.bars.iter().zip(&series.sma) {
        wtr.write_record([
            &bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            &format!("{:.6}", bar.open),
            &format!("{:.6}", bar.high),
            &format!("{:.6}", bar.low),
            &format!("{:.6}", bar.close),
            &sma.map(|v| format!("{v:.6}")).unwrap_or_default(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export ranked scan rows.
pub fn export_scan_csv(entries: &[ScanEntry]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "rank",
        "symbol",
        "price",
        "strategy",
        "leverage",
        "confidence",
        "rsi",
        "volatility",
        "theme_color",
    ])?;
    for (i, e) in entries.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            e.symbol.clone(),
            format!("{:.6}", e.price),
            e.strategy.to_string(),
            format!("{:.2}", e.leverage),
            format!("{:.2}", e.confidence),
            format!("{:.2}", e.rsi),
            format!("{:.4}", e.volatility),
            e.theme_color.to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set for one analysis.
///
/// Creates `{symbol}_{run_id[..12]}/` under `output_dir` (the `/` in pair
/// names becomes `-`). The run id covers seed, generator and end time, so
/// distinct runs of the same request land in distinct directories. Contains:
/// - `analysis.json` — the full `AnalysisReport`
/// - `series.csv` — bars + SMA overlay
/// - `report.md` — Markdown summary
pub fn save_artifacts(report: &AnalysisReport, output_dir: &Path) -> Result<PathBuf> {
    let run_id = report.run_id();
    let short = &run_id[..12];
    let dirname = format!("{}_{}", report.result.coin.replace('/', "-"), short);
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("analysis.json"), export_json(report)?)?;
    std::fs::write(run_dir.join("series.csv"), export_series_csv(&report.series)?)?;
    std::fs::write(run_dir.join("report.md"), generate_report(report))?;

    tracing::info!(dir = %run_dir.display(), "artifacts saved");
    Ok(run_dir)
}

/// Load an `AnalysisReport` from an artifact directory's analysis.json.
pub fn load_artifacts(dir: &Path) -> Result<AnalysisReport> {
    let path = dir.join("analysis.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Markdown rendering of the analysis cards.
pub fn generate_report(report: &AnalysisReport) -> String {
    let r = &report.result;
    let mut md = String::with_capacity(1024);

    md.push_str(&format!("# {} Analysis\n\n", r.coin));

    md.push_str("## Strategy\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Strategy | {} |\n", r.strategy));
    md.push_str(&format!("| Confidence | {:.1}% |\n", r.confidence * 100.0));
    md.push_str(&format!("| Leverage | {}x |\n", r.leverage));
    md.push_str(&format!("| RSI | {:.1} |\n", r.rsi));
    md.push_str(&format!("| Volatility | {:.2}% |\n", r.volatility));
    md.push_str(&format!("| Theme | {} |\n", r.theme_color));
    md.push('\n');

    md.push_str("## Risk\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| VaR (1d) | ${:.4} |\n", r.var_1d));
    md.push_str(&format!("| Expected Shortfall | ${:.4} |\n", r.expected_shortfall));
    md.push_str(&format!("| Position Size | ${:.2} |\n", r.position_size));
    md.push_str(&format!("| Max Risk | ${:.2} |\n", r.max_risk));
    md.push('\n');

    md.push_str("## Levels\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Entry | ${:.4} – ${:.4} |\n", r.entry_min, r.entry_max));
    md.push_str(&format!("| Stop Loss | ${:.4} |\n", r.stop_loss));
    md.push_str(&format!("| Take Profit | ${:.4} |\n", r.take_profit));
    md.push('\n');

    md.push_str("## Run\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Price | ${:.4} |\n", report.request.current_price));
    md.push_str(&format!("| Capital | ${:.2} |\n", report.request.capital));
    md.push_str(&format!("| Risk Profile | {} |\n", r.risk_profile));
    md.push_str(&format!("| Bars | {} |\n", report.series.len()));
    md.push_str(&format!("| Seed | {} |\n", report.seed));
    md.push_str(&format!("| Generated | {} |\n", report.generated_at));
    md.push_str(&format!("| Fingerprint | `{}` |\n", report.fingerprint));
    md.push_str(&format!("| Run | `{}` |\n", report.run_id()));

    md
}
