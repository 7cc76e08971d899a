//! Yield percentile banding.
//!
//! Given the daily history and the annualized dividend records, compute for
//! every trading day since the first known dividend:
//!
//! - trailing dividend yield (`trailing / close`)
//! - drawdown from the running price peak
//! - implied price at each historical yield decile (`trailing / quantile`)
//!
//! A degenerate yield distribution (all yields equal) is not an error: the
//! boundaries simply coincide and the bands have zero width.

use crate::domain::{
    AnnualizedDividendRecord, BAND_COUNT, BandConfig, BandSummary, BandedRow, BandedSeries, DECILE_POINTS,
    PricePoint,
};
use crate::error::BandError;
use crate::math::{decile_probs, percentile_rank, quantiles, running_drawdown};

use super::align::align_dividends;

/// Band the price history by trailing dividend yield deciles.
pub fn compute_bands(
    ticker: &str,
    period: &str,
    history: &[PricePoint],
    records: &[AnnualizedDividendRecord],
    config: &BandConfig,
) -> Result<BandedSeries, BandError> {
    let trailing = align_dividends(history, records, config.ffill_limit);

    let start = trailing
        .iter()
        .position(|&v| v > 0.0)
        .ok_or(BandError::InsufficientData)?;
    let history = &history[start..];
    let trailing = &trailing[start..];
    if history.len() < 2 {
        return Err(BandError::InsufficientData);
    }

    let closes: Vec<f64> = history.iter().map(|p| p.close).collect();
    let yields: Vec<f64> = trailing
        .iter()
        .zip(&closes)
        .map(|(&t, &c)| (t / c).max(0.0))
        .collect();
    let drawdowns = running_drawdown(&closes);
    let quantiles = quantiles(&yields, &decile_probs()).ok_or(BandError::InsufficientData)?;

    let rows: Vec<BandedRow> = history
        .iter()
        .enumerate()
        .map(|(i, p)| BandedRow {
            date: p.date,
            close: p.close,
            trailing_yearly_dividend: trailing[i],
            dividend_yield: yields[i],
            drawdown_from_peak: drawdowns[i],
            band_boundaries: band_boundaries(trailing[i], &quantiles),
        })
        .collect();

    let summary = summarize(&rows, &yields, &quantiles)?;

    log::debug!(
        "{ticker}: banded {} rows from {} (yield deciles {:.4}..{:.4})",
        rows.len(),
        rows[0].date,
        quantiles[0],
        quantiles[DECILE_POINTS - 1]
    );

    Ok(BandedSeries {
        ticker: ticker.to_string(),
        period: period.to_string(),
        quantiles,
        rows,
        summary,
    })
}

/// Implied prices at each yield quantile, highest price first.
///
/// A zero quantile has no finite implied price: it maps to `+inf` while a
/// dividend is known and to 0 when the trailing dividend itself is 0.
pub fn band_boundaries(trailing: f64, quantiles: &[f64; DECILE_POINTS]) -> [f64; DECILE_POINTS] {
    quantiles.map(|q| {
        if q > 0.0 {
            trailing / q
        } else if trailing > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    })
}

/// Index of the band containing `dividend_yield` (0 = lowest-yield band).
pub fn band_index(dividend_yield: f64, quantiles: &[f64; DECILE_POINTS]) -> usize {
    (0..BAND_COUNT)
        .find(|&i| dividend_yield <= quantiles[i + 1])
        .unwrap_or(BAND_COUNT - 1)
}

fn summarize(
    rows: &[BandedRow],
    yields: &[f64],
    quantiles: &[f64; DECILE_POINTS],
) -> Result<BandSummary, BandError> {
    let last = rows.last().ok_or(BandError::InsufficientData)?;
    let percentile_rank =
        percentile_rank(yields, last.dividend_yield).ok_or(BandError::InsufficientData)?;

    Ok(BandSummary {
        date: last.date,
        close: last.close,
        trailing_yearly_dividend: last.trailing_yearly_dividend,
        current_yield: last.dividend_yield,
        percentile_rank,
        top_fraction: 1.0 - percentile_rank,
        drawdown: last.drawdown_from_peak,
        current_band: band_index(last.dividend_yield, quantiles),
    })
}
