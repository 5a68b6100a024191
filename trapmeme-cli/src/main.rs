//! TrapMeme CLI — analyze, series, quotes and scan commands.
//!
//! Commands:
//! - `analyze` — run the signal analysis for one pair and print the cards
//! - `series` — print or save the synthetic series as CSV
//! - `quotes` — show the mock market board
//! - `scan` — analyse every listed pair and rank by confidence

mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Timelike};
use clap::{Args, Parser, Subcommand};
use trapmeme_core::domain::RiskProfile;
use trapmeme_core::market::MarketBoard;
use trapmeme_runner::{
    export_json, export_scan_csv, export_series_csv, run_session, save_artifacts, scan_market,
    AnalysisReport, AppConfig, RunOptions, ScanEntry,
};

#[derive(Parser)]
#[command(
    name = "trapmeme",
    about = "TrapMeme — synthetic crypto signal lab"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Session overrides shared by `analyze` and `series`.
#[derive(Args)]
struct SessionArgs {
    /// Pair to analyse (e.g., BTC/USDT). Defaults to the config's coin.
    #[arg(long)]
    coin: Option<String>,

    /// Current price. Defaults to a mock board quote.
    #[arg(long)]
    price: Option<f64>,

    /// Master seed. Defaults to the config's seed, or a random one.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signal analysis for one pair.
    Analyze {
        #[command(flatten)]
        session: SessionArgs,

        /// Trading capital in USDT.
        #[arg(long)]
        capital: Option<f64>,

        /// Risk profile: Conservative, Moderate, Aggressive, Institutional.
        #[arg(long)]
        risk: Option<String>,

        /// Print the full report as JSON instead of the cards.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Save analysis.json, series.csv and report.md.
        #[arg(long, default_value_t = false)]
        save: bool,

        /// Artifact directory (implies --save). Defaults to the config's output dir.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print or save the synthetic series (bars + SMA 20) as CSV.
    Series {
        #[command(flatten)]
        session: SessionArgs,

        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the mock market board.
    Quotes {
        /// Seed for the quote jitter.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Analyse every listed pair and rank by confidence.
    Scan {
        /// Trading capital in USDT.
        #[arg(long)]
        capital: Option<f64>,

        /// Risk profile: Conservative, Moderate, Aggressive, Institutional.
        #[arg(long)]
        risk: Option<String>,

        /// Master seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Also write the ranking to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    let board = MarketBoard::default();

    match cli.command {
        Commands::Analyze {
            session,
            capital,
            risk,
            json,
            save,
            output_dir,
        } => {
            let config = apply_overrides(config, session.coin, capital, risk.as_deref())?;
            let opts = run_options(&config, session.seed);
            let report = run_session(&config, &board, session.price, &opts)?;

            if json {
                println!("{}", export_json(&report)?);
            } else {
                print_cards(&report);
            }
            if save || output_dir.is_some() {
                let dir = output_dir.unwrap_or_else(|| config.output.dir.clone());
                let run_dir = save_artifacts(&report, &dir)?;
                println!("Artifacts saved to: {}", run_dir.display());
            }
            Ok(())
        }
        Commands::Series { session, out } => {
            let config = apply_overrides(config, session.coin, None, None)?;
            let opts = run_options(&config, session.seed);
            let report = run_session(&config, &board, session.price, &opts)?;
            let csv = export_series_csv(&report.series)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, csv)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!(
                        "{} bars for {} written to {}",
                        report.series.len(),
                        report.result.coin,
                        path.display()
                    );
                }
                None => print!("{csv}"),
            }
            Ok(())
        }
        Commands::Quotes { seed } => {
            let seed = resolve_seed(seed.or(config.session.seed));
            let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(seed);
            print_quotes(&board, &mut rng);
            Ok(())
        }
        Commands::Scan {
            capital,
            risk,
            seed,
            csv,
        } => {
            let config = apply_overrides(config, None, capital, risk.as_deref())?;
            let opts = run_options(&config, seed);
            let entries = scan_market(
                &board,
                config.session.capital,
                config.session.risk_profile,
                &opts,
            )?;
            print_scan(&entries, opts.seed);
            if let Some(path) = csv {
                std::fs::write(&path, export_scan_csv(&entries)?)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Ranking saved to: {}", path.display());
            }
            Ok(())
        }
    }
}

fn apply_overrides(
    mut config: AppConfig,
    coin: Option<String>,
    capital: Option<f64>,
    risk: Option<&str>,
) -> Result<AppConfig> {
    if let Some(coin) = coin {
        config.session.coin = coin;
    }
    if let Some(capital) = capital {
        config.session.capital = capital;
    }
    if let Some(risk) = risk {
        config.session.risk_profile = risk.parse::<RiskProfile>()?;
    }
    config.validate()?;
    Ok(config)
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let seed = rand::random::<u64>();
        tracing::info!(seed, "no seed given, drew a random one");
        seed
    })
}

fn run_options(config: &AppConfig, seed: Option<u64>) -> RunOptions {
    let seed = resolve_seed(seed.or(config.session.seed));
    RunOptions::new(seed, now()).with_generator(config.generator.clone())
}

/// Local wall-clock time, whole seconds.
fn now() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

fn print_cards(report: &AnalysisReport) {
    let r = &report.result;
    println!();
    println!("=== AI Analysis: {} ===", r.coin);
    println!("Live Price:     ${:.4}", report.request.current_price);
    println!("Capital:        ${:.2}", report.request.capital);
    println!("Risk Profile:   {}", r.risk_profile);
    println!();
    println!("--- Strategy ({}) ---", r.theme_color);
    println!("AI Strategy:    {}", r.strategy);
    println!("Confidence:     {:.1}%", r.confidence * 100.0);
    println!("Leverage:       {}x", r.leverage);
    println!("RSI:            {:.1}", r.rsi);
    println!("Volatility:     {:.2}%", r.volatility);
    println!();
    println!("--- Risk ---");
    println!("VaR (1d):       ${:.4}", r.var_1d);
    println!("Exp. Shortfall: ${:.4}", r.expected_shortfall);
    println!("Position Size:  ${:.2}", r.position_size);
    println!("Max Risk:       ${:.2}", r.max_risk);
    println!();
    println!("--- Levels ---");
    println!("Entry:          ${:.4} - ${:.4}", r.entry_min, r.entry_max);
    println!("Stop Loss:      ${:.4}", r.stop_loss);
    println!("Take Profit:    ${:.4}", r.take_profit);
    println!();
    println!("Seed {} | {} bars to {}", report.seed, report.series.len(), report.generated_at);
    println!();
}

fn print_quotes(board: &MarketBoard, rng: &mut rand::rngs::StdRng) {
    println!("{:<10} {:>14} {:>8}", "Pair", "Price", "24h");
    println!("{}", "-".repeat(34));
    for q in board.snapshot(rng) {
        println!("{:<10} {:>14} {:>+7.2}%", q.symbol, format_price(q.price), q.change_pct);
    }
}

fn print_scan(entries: &[ScanEntry], seed: u64) {
    println!();
    println!("=== Market Scan (seed {seed}) ===");
    println!(
        "{:<4} {:<10} {:>14} {:<28} {:>6} {:>6} {:>6} {:>7}",
        "#", "Pair", "Price", "Strategy", "Lev", "Conf", "RSI", "Vol%"
    );
    println!("{}", "-".repeat(88));
    for (i, e) in entries.iter().enumerate() {
        println!(
            "{:<4} {:<10} {:>14} {:<28} {:>5}x {:>5.1}% {:>6.1} {:>7.3}",
            i + 1,
            e.symbol,
            format_price(e.price),
            e.strategy.as_str(),
            e.leverage,
            e.confidence * 100.0,
            e.rsi,
            e.volatility
        );
    }
    println!();
}

/// `$43,250.00` style, with extra decimals for sub-dollar pairs.
fn format_price(price: f64) -> String {
    let decimals = if price < 1.0 { 4 } else { 2 };
    let fixed = format!("{price:.decimals$}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((&fixed, ""));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if frac_part.is_empty() {
        format!("${grouped}")
    } else {
        format!("${grouped}.{frac_part}")
    }
}
