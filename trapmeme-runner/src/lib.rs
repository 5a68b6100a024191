//! TrapMeme runner — analysis orchestration, market scan, config, export.
//!
//! This crate builds on `trapmeme-core` to provide:
//! - TOML session/generator/output configuration
//! - Single-analysis runner with per-coin seed derivation
//! - Parallel market scanner over the quote board
//! - JSON, CSV and Markdown artifacts

pub mod config;
pub mod export;
pub mod runner;
pub mod scanner;

pub use config::{AppConfig, ConfigError, OutputConfig, SessionConfig};
pub use export::{
    export_json, export_scan_csv, export_series_csv, generate_report, import_json,
    load_artifacts, save_artifacts,
};
pub use runner::{quote_price, run_analysis, run_session, AnalysisReport, RunError, RunOptions};
pub use scanner::{scan_market, scan_reports, ScanEntry};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<AppConfig>();
        assert_sync::<AppConfig>();
        assert_send::<RunOptions>();
        assert_sync::<RunOptions>();
    }

    #[test]
    fn report_types_are_send_sync() {
        assert_send::<AnalysisReport>();
        assert_sync::<AnalysisReport>();
        assert_send::<ScanEntry>();
        assert_sync::<ScanEntry>();
    }

    #[test]
    fn run_error_is_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }
}
