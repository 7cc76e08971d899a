//! Command-line parsing for the dividend yield bander.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the normalizer/bander code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{BandConfig, Period, SourceKind};

pub mod picker;

/// Upper bound for `--warmup-days` (100 years).
const MAX_WARMUP_DAYS: i64 = 36_500;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "yb", version, about = "Dividend yield percentile bands")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Band one ticker by its historical yield deciles and print the summary.
    Bands(BandsArgs),
    /// Band many tickers and rank them by current yield percentile.
    Scan(ScanArgs),
    /// Print the annualized dividend records for one ticker.
    Dividends(DividendsArgs),
    /// Print the summary of a previously exported series JSON.
    Show(ShowArgs),
}

/// Where history comes from, shared by every fetching command.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// History provider.
    #[arg(long, value_enum, default_value_t = SourceKind::Yahoo)]
    pub source: SourceKind,

    /// CSV path for `--source csv`; `{ticker}` is replaced by the ticker.
    #[arg(long, value_name = "PATH")]
    pub csv_path: Option<String>,

    /// Seed for `--source sample` (combined with the ticker).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Algorithm knobs, shared by every banding command.
#[derive(Debug, Args, Clone)]
pub struct TuningArgs {
    /// Lookback: `<n>d`, `<n>mo`, `<n>y`, `ytd` or `max`.
    #[arg(short = 'p', long, default_value = "10y", value_parser = parse_period)]
    pub period: Period,

    /// Dividend records this close to the first payment are discarded.
    #[arg(long, default_value_t = 365, value_parser = clap::value_parser!(i64).range(0..=MAX_WARMUP_DAYS))]
    pub warmup_days: i64,

    /// Trading days an annualized dividend is carried forward before it is treated as 0.
    #[arg(long, default_value_t = 300)]
    pub ffill_limit: usize,
}

impl TuningArgs {
    pub fn band_config(&self) -> BandConfig {
        BandConfig {
            warmup_days: self.warmup_days,
            ffill_limit: self.ffill_limit,
            ..BandConfig::default()
        }
    }
}

#[derive(Debug, Parser, Clone)]
pub struct BandsArgs {
    /// Ticker symbol (e.g. KO, O, VZ).
    pub ticker: String,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,

    /// Export the banded rows to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,

    /// Export the full series (quantiles, rows, summary) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct ScanArgs {
    /// Tickers to scan.
    pub tickers: Vec<String>,

    /// CSV with a `ticker` or `symbol` column (e.g. an ETF holdings export).
    #[arg(long, value_name = "FILE")]
    pub tickers_file: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,

    /// Only print the first N rows.
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Debug, Parser, Clone)]
pub struct DividendsArgs {
    pub ticker: String,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,

    /// Export the records to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// Series JSON produced by `yb bands --export-json`; prompts when omitted.
    pub series: Option<PathBuf>,
}

fn parse_period(raw: &str) -> Result<Period, String> {
    raw.parse()
}
