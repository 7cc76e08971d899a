//! CSV ingest: local price/dividend histories and ticker lists.
//!
//! History files need `date` and `close` columns; `dividend` (or `dividends`)
//! is optional and defaults to 0. Column names are matched case-insensitively,
//! so yfinance-style exports (`Date,Open,High,Low,Close,Volume,Dividends,...`)
//! load unchanged.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear error up front)
//! - **Row-level validation** (skip bad rows, but log what happened)
//! - **Deterministic behavior** (same file, same history)

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;

use crate::data::{HistorySource, clean_history};
use crate::domain::{Period, PricePoint};
use crate::error::{AppError, BandError};

/// Date formats accepted in the `date` column (time/zone suffixes are cut first).
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Histories read from CSV files, one file per ticker.
///
/// `path_template` may contain `{ticker}`, which is replaced by the upper-cased
/// ticker; without the placeholder the same file serves every ticker.
#[derive(Debug, Clone)]
pub struct CsvHistory {
    pub path_template: String,
    /// Reference date for trimming to the requested period (usually today).
    pub today: NaiveDate,
}

impl CsvHistory {
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        PathBuf::from(self.path_template.replace("{ticker}", &ticker.to_ascii_uppercase()))
    }
}

impl HistorySource for CsvHistory {
    fn fetch_history(&self, ticker: &str, period: Period) -> Result<Vec<PricePoint>, BandError> {
        let path = self.path_for(ticker);
        let rows = load_history_csv(&path)?;
        let start = rows
            .last()
            .map(|p| p.date.min(self.today))
            .and_then(|anchor| period.start_date(anchor));
        Ok(match start {
            Some(start) => rows.into_iter().filter(|p| p.date >= start).collect(),
            None => rows,
        })
    }
}

/// Load a `date,close[,dividend]` CSV into a cleaned, date-sorted history.
pub fn load_history_csv(path: &Path) -> Result<Vec<PricePoint>, BandError> {
    let file = File::open(path)
        .map_err(|e| BandError::DataUnavailable(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| BandError::DataUnavailable(format!("Failed to read CSV header: {e}")))?
        .clone();
    let columns = column_index(&headers);
    let date_col = find_column(&columns, &["date", "datetime", "timestamp"])
        .ok_or_else(|| BandError::DataUnavailable(format!("CSV '{}' has no date column.", path.display())))?;
    let close_col = find_column(&columns, &["close", "price"])
        .ok_or_else(|| BandError::DataUnavailable(format!("CSV '{}' has no close column.", path.display())))?;
    let dividend_col = find_column(&columns, &["dividend", "dividends"]);

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (i, record) in reader.records().enumerate() {
        let line = i + 2;
        let record = record
            .map_err(|e| BandError::DataUnavailable(format!("CSV read error at line {line}: {e}")))?;

        let date = record.get(date_col).and_then(parse_date);
        let close = record.get(close_col).and_then(parse_number);
        let dividend = dividend_col
            .and_then(|c| record.get(c))
            .and_then(parse_number)
            .unwrap_or(0.0);

        match (date, close) {
            (Some(date), Some(close)) => rows.push(PricePoint::new(date, close, dividend)),
            _ => {
                skipped += 1;
                log::debug!("{}: skipping unparseable line {line}", path.display());
            }
        }
    }
    if skipped > 0 {
        log::warn!("{}: skipped {skipped} unparseable rows", path.display());
    }

    let rows = clean_history(rows);
    if rows.is_empty() {
        return Err(BandError::DataUnavailable(format!(
            "CSV '{}' contains no usable rows.",
            path.display()
        )));
    }
    log::info!("{}: loaded {} daily rows", path.display(), rows.len());
    Ok(rows)
}

/// Read tickers from the first recognised column of a CSV
/// (`ticker`, `symbol` or `holding ticker`), stripping `$` prefixes.
pub fn load_ticker_list(path: &Path) -> Result<Vec<String>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open ticker list '{}': {e}", path.display())))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read ticker list header: {e}")))?
        .clone();
    let columns = column_index(&headers);
    let col = find_column(&columns, &["ticker", "symbol", "holding ticker"]).ok_or_else(|| {
        AppError::new(2, format!("Ticker list '{}' needs a ticker/symbol column.", path.display()))
    })?;

    let mut tickers = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::new(2, format!("Ticker list read error: {e}")))?;
        if let Some(t) = record.get(col).map(normalize_ticker).filter(|t| !t.is_empty()) {
            if !tickers.contains(&t) {
                tickers.push(t);
            }
        }
    }
    Ok(tickers)
}

/// `$ko` -> `KO`.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().trim_start_matches('$').to_ascii_uppercase()
}

fn column_index(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect()
}

fn find_column(columns: &HashMap<String, usize>, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|n| columns.get(*n).copied())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.split(['T', ' ']).next().unwrap_or(raw);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_start_matches('$').replace(',', "");
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
