//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds the history source
//! - runs the normalize/band pipeline
//! - prints reports and writes optional exports

use chrono::Local;
use clap::Parser;

use crate::cli::{BandsArgs, Command, DividendsArgs, ScanArgs, ShowArgs, SourceArgs};
use crate::data::{HistorySource, SampleHistory, YahooClient};
use crate::domain::SourceKind;
use crate::error::AppError;
use crate::io::ingest::{CsvHistory, load_ticker_list, normalize_ticker};

pub mod pipeline;
pub mod scan;

/// Entry point for the `yb` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Bands(args) => handle_bands(args),
        Command::Scan(args) => handle_scan(args),
        Command::Dividends(args) => handle_dividends(args),
        Command::Show(args) => handle_show(args),
    }
}

fn handle_bands(args: BandsArgs) -> Result<(), AppError> {
    let source = build_source(&args.source)?;
    let ticker = normalize_ticker(&args.ticker);
    let config = args.tuning.band_config();
    let run = pipeline::run_bands(source.as_ref(), &ticker, args.tuning.period, &config)?;

    println!("{}", crate::report::format_summary(&run.series, &run.records));

    if let Some(path) = &args.export_csv {
        crate::io::export::write_series_csv(path, &run.series)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::series::write_series_json(path, &run.series)?;
    }
    Ok(())
}

fn handle_scan(args: ScanArgs) -> Result<(), AppError> {
    let mut tickers: Vec<String> = args.tickers.iter().map(|t| normalize_ticker(t)).collect();
    if let Some(path) = &args.tickers_file {
        tickers.extend(load_ticker_list(path)?);
    }
    tickers.retain(|t| !t.is_empty());
    let mut seen = std::collections::HashSet::new();
    tickers.retain(|t| seen.insert(t.clone()));
    if tickers.is_empty() {
        return Err(AppError::new(2, "No tickers given. Pass symbols or --tickers-file <csv>."));
    }

    let source = build_source(&args.source)?;
    let config = args.tuning.band_config();
    log::info!("scanning {} tickers over {}", tickers.len(), args.tuning.period);
    let mut entries = scan::scan_tickers(source.as_ref(), &tickers, args.tuning.period, &config);
    if let Some(top) = args.top {
        entries.truncate(top);
    }

    println!("{}", crate::report::format_scan(&entries));
    Ok(())
}

fn handle_dividends(args: DividendsArgs) -> Result<(), AppError> {
    let source = build_source(&args.source)?;
    let ticker = normalize_ticker(&args.ticker);
    let config = args.tuning.band_config();
    let history = source.fetch_history(&ticker, args.tuning.period.with_warmup())?;
    let records = crate::dividend::normalize_dividends(&history, &config)?;

    println!("{}", crate::report::format_dividends(&ticker, &records));

    if let Some(path) = &args.export_csv {
        crate::io::export::write_dividends_csv(path, &records)?;
    }
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let path = match args.series {
        Some(path) => crate::cli::picker::validate_series_path(&path)?,
        None => crate::cli::picker::prompt_for_series_path()?,
    };
    let series = crate::io::series::read_series_json(&path)?;
    println!("{}", crate::report::format_summary(&series, &[]));
    Ok(())
}

/// Build the history provider selected on the command line.
pub fn build_source(args: &SourceArgs) -> Result<Box<dyn HistorySource>, AppError> {
    match args.source {
        SourceKind::Yahoo => Ok(Box::new(YahooClient::from_env()?)),
        SourceKind::Csv => {
            let path_template = args
                .csv_path
                .clone()
                .ok_or_else(|| AppError::new(2, "--source csv requires --csv-path <PATH>."))?;
            Ok(Box::new(CsvHistory {
                path_template,
                today: Local::now().date_naive(),
            }))
        }
        SourceKind::Sample => Ok(Box::new(SampleHistory {
            seed: args.seed,
            ..SampleHistory::default()
        })),
    }
}
