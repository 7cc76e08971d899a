//! Price/dividend history providers.
//!
//! The banding core never fetches anything itself: it receives a cleaned,
//! date-sorted `PricePoint` series from one of these adapters.
//!
//! - `yahoo`: Yahoo Finance chart API (network)
//! - `sample`: deterministic synthetic histories (offline)
//! - CSV files are handled by `io::ingest`

use crate::domain::{Period, PricePoint};
use crate::error::BandError;

pub mod sample;
pub mod yahoo;

pub use sample::SampleHistory;
pub use yahoo::YahooClient;

/// Something that can deliver a daily price/dividend history for a ticker.
///
/// Implementations return rows sorted by date with unique dates and positive
/// closes; any failure is reported as [`BandError::DataUnavailable`].
pub trait HistorySource: Sync {
    fn fetch_history(&self, ticker: &str, period: Period) -> Result<Vec<PricePoint>, BandError>;
}

/// Sort by date, drop rows without a usable close, de-duplicate dates.
///
/// On a repeated date the last close wins and the larger dividend is kept, so a
/// restated row never erases a payment. Negative or non-finite dividends are
/// treated as "no dividend".
pub fn clean_history(mut rows: Vec<PricePoint>) -> Vec<PricePoint> {
    let before = rows.len();
    rows.retain(|p| p.close.is_finite() && p.close > 0.0);
    let dropped = before - rows.len();
    if dropped > 0 {
        log::warn!("dropped {dropped} rows without a positive close");
    }

    rows.sort_by_key(|p| p.date);

    let mut out: Vec<PricePoint> = Vec::with_capacity(rows.len());
    for p in rows {
        let dividend = if p.dividend.is_finite() && p.dividend > 0.0 { p.dividend } else { 0.0 };
        let p = PricePoint::new(p.date, p.close, dividend);
        match out.last_mut() {
            Some(last) if last.date == p.date => {
                *last = PricePoint::new(p.date, p.close, last.dividend.max(p.dividend));
            }
            _ => out.push(p),
        }
    }
    out
}
