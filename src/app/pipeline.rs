//! Shared "banding pipeline" logic used by every CLI command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch history -> normalize dividends -> band by yield deciles
//!
//! The commands can then focus on presentation (printing vs exports).

use crate::bands::compute_bands;
use crate::data::HistorySource;
use crate::dividend::normalize_dividends;
use crate::domain::{AnnualizedDividendRecord, BandConfig, BandedSeries, Period, PricePoint};
use crate::error::BandError;

/// All computed outputs of a single banding run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub history: Vec<PricePoint>,
    pub records: Vec<AnnualizedDividendRecord>,
    pub series: BandedSeries,
}

/// Compute the banded series for one ticker and period.
///
/// Year periods are fetched with one extra year so that the warm-up window
/// dropped by the normalizer does not shorten the visible span.
pub fn compute_banded_series<S: HistorySource + ?Sized>(
    source: &S,
    ticker: &str,
    period: Period,
    config: &BandConfig,
) -> Result<BandedSeries, BandError> {
    run_bands(source, ticker, period, config).map(|run| run.series)
}

/// Execute the full pipeline and keep the intermediate outputs.
pub fn run_bands<S: HistorySource + ?Sized>(
    source: &S,
    ticker: &str,
    period: Period,
    config: &BandConfig,
) -> Result<RunOutput, BandError> {
    // 1) Fetch history (with the warm-up year).
    let history = source.fetch_history(ticker, period.with_warmup())?;
    log::debug!("{ticker}: {} rows fetched for {period}", history.len());

    // 2) Annualize dividends.
    let records = normalize_dividends(&history, config)?;

    // 3) Band by yield deciles.
    let series = compute_bands(ticker, &period.to_string(), &history, &records, config)?;

    Ok(RunOutput {
        history,
        records,
        series,
    })
}
