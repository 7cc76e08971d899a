//! Export the banded series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or by an external
//! chart renderer: one row per trading day, boundaries `b0` (highest implied
//! price) through `b10` (lowest).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{AnnualizedDividendRecord, BandedSeries, DECILE_POINTS};
use crate::error::AppError;

/// Write one CSV row per banded trading day.
pub fn write_series_csv(path: &Path, series: &BandedSeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    let bounds: Vec<String> = (0..DECILE_POINTS).map(|i| format!("b{i}")).collect();
    writeln!(
        out,
        "date,close,trailing_yearly_dividend,dividend_yield,drawdown,{}",
        bounds.join(",")
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in &series.rows {
        let bounds: Vec<String> = r.band_boundaries.iter().map(|b| format!("{b:.6}")).collect();
        writeln!(
            out,
            "{},{:.6},{:.6},{:.8},{:.8},{}",
            r.date,
            r.close,
            r.trailing_yearly_dividend,
            r.dividend_yield,
            r.drawdown_from_peak,
            bounds.join(",")
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    log::info!("wrote {} rows to {}", series.rows.len(), path.display());
    Ok(())
}

/// Write the annualized dividend records to CSV.
pub fn write_dividends_csv(path: &Path, records: &[AnnualizedDividendRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(
        out,
        "date,annual_payment_count,raw_dividend,smoothed_raw_dividend,trailing_yearly_dividend,growth_since_start"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in records {
        writeln!(
            out,
            "{},{},{:.6},{:.6},{:.6},{:.6}",
            r.date,
            r.annual_payment_count(),
            r.raw_dividend,
            r.smoothed_raw_dividend,
            r.trailing_yearly_dividend,
            r.growth_since_start
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
