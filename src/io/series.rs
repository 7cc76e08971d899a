//! Read/write banded-series JSON files.
//!
//! Series JSON is the hand-off format for an external chart renderer:
//! - ticker, period and the yield deciles of the window
//! - every banded trading day (close, yield, drawdown, implied-price boundaries)
//! - the summary of the most recent day
//!
//! The schema is defined by `domain::BandedSeries`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::domain::BandedSeries;
use crate::error::AppError;

/// Write a series JSON file.
pub fn write_series_json(path: &Path, series: &BandedSeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create series JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), series)
        .map_err(|e| AppError::new(2, format!("Failed to write series JSON: {e}")))?;

    Ok(())
}

/// Read a series JSON file.
pub fn read_series_json(path: &Path) -> Result<BandedSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open series JSON '{}': {e}", path.display())))?;
    let series: BandedSeries =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid series JSON: {e}")))?;
    if series.rows.is_empty() {
        return Err(AppError::new(2, "Series JSON contains no rows."));
    }
    Ok(series)
}
