//! Multi-ticker scan: band every ticker in a list and rank by current yield percentile.
//!
//! Each ticker is an independent, pure computation, so the list is evaluated
//! in parallel. A failing ticker is reported in its row and never aborts the
//! scan.

use chrono::Duration;
use rayon::prelude::*;

use crate::app::pipeline::run_bands;
use crate::data::HistorySource;
use crate::domain::{BandConfig, BandSummary, PaymentCadence, Period, PricePoint};
use crate::error::BandError;

/// Outcome of one ticker in a scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanStatus {
    Banded {
        summary: BandSummary,
        cadence: PaymentCadence,
        growth_since_start: f64,
    },
    /// Has dividend history, but nothing was paid in the trailing year.
    NoRecentDividend,
    Failed(BandError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanEntry {
    pub ticker: String,
    pub status: ScanStatus,
}

/// Band every ticker and sort: banded rows by `top_fraction` ascending
/// (yield closest to its historical high first), then skipped, then failed.
pub fn scan_tickers<S: HistorySource + ?Sized>(
    source: &S,
    tickers: &[String],
    period: Period,
    config: &BandConfig,
) -> Vec<ScanEntry> {
    let mut entries: Vec<ScanEntry> = tickers
        .par_iter()
        .map(|ticker| ScanEntry {
            ticker: ticker.clone(),
            status: scan_one(source, ticker, period, config),
        })
        .collect();

    entries.sort_by(|a, b| {
        sort_key(&a.status)
            .partial_cmp(&sort_key(&b.status))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
    entries
}

fn scan_one<S: HistorySource + ?Sized>(
    source: &S,
    ticker: &str,
    period: Period,
    config: &BandConfig,
) -> ScanStatus {
    let run = match run_bands(source, ticker, period, config) {
        Ok(run) => run,
        Err(err) => {
            log::warn!("{ticker}: {err}");
            return ScanStatus::Failed(err);
        }
    };

    if !paid_within_last_year(&run.history) {
        log::info!("{ticker}: no dividend in the trailing year, skipping");
        return ScanStatus::NoRecentDividend;
    }

    let (cadence, growth_since_start) = run
        .records
        .last()
        .map(|r| (r.cadence, r.growth_since_start))
        .unwrap_or((PaymentCadence::None, 0.0));

    ScanStatus::Banded {
        summary: run.series.summary,
        cadence,
        growth_since_start,
    }
}

/// Whether any dividend was paid within 365 days of the last trading day.
pub fn paid_within_last_year(history: &[PricePoint]) -> bool {
    let Some(last) = history.last() else {
        return false;
    };
    let cutoff = last.date - Duration::days(365);
    history
        .iter()
        .rev()
        .take_while(|p| p.date > cutoff)
        .any(|p| p.is_dividend_event)
}

fn sort_key(status: &ScanStatus) -> (u8, f64) {
    match status {
        ScanStatus::Banded { summary, .. } => (0, summary.top_fraction),
        ScanStatus::NoRecentDividend => (1, 0.0),
        ScanStatus::Failed(_) => (2, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleHistory;
    use chrono::NaiveDate;

    /// Pays quarterly for tickers starting with 'Q', never pays for 'N',
    /// stops paying two years before the end for 'S', unknown otherwise.
    struct Universe;

    impl HistorySource for Universe {
        fn fetch_history(&self, ticker: &str, period: Period) -> Result<Vec<PricePoint>, BandError> {
            let end = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
            let cadence = match ticker.chars().next() {
                Some('Q') | Some('S') => PaymentCadence::Quarterly,
                Some('N') => PaymentCadence::None,
                _ => return Err(BandError::DataUnavailable(format!("{ticker}: unknown"))),
            };
            let mut rows = SampleHistory {
                cadence,
                end,
                ..SampleHistory::default()
            }
            .generate(ticker, period)?;
            if ticker.starts_with('S') {
                let stop = end - Duration::days(450);
                for p in rows.iter_mut().filter(|p| p.date > stop) {
                    *p = PricePoint::new(p.date, p.close, 0.0);
                }
            }
            Ok(rows)
        }
    }

    #[test]
    fn scan_orders_banded_then_skipped_then_failed() {
        let tickers: Vec<String> = ["XX", "NOPAY", "QA", "STOP", "QB"].iter().map(|s| s.to_string()).collect();
        let entries = scan_tickers(&Universe, &tickers, Period::Years(5), &BandConfig::default());

        assert_eq!(entries.len(), 5);
        assert!(matches!(entries[0].status, ScanStatus::Banded { .. }));
        assert!(matches!(entries[1].status, ScanStatus::Banded { .. }));
        assert_eq!(entries[2].ticker, "STOP");
        assert_eq!(entries[2].status, ScanStatus::NoRecentDividend);
        let failed: Vec<&str> = entries[3..].iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(failed, vec!["NOPAY", "XX"]);
        assert_eq!(entries[3].status, ScanStatus::Failed(BandError::InsufficientHistory));

        let tops: Vec<f64> = entries[..2]
            .iter()
            .map(|e| match &e.status {
                ScanStatus::Banded { summary, cadence, .. } => {
                    assert_eq!(*cadence, PaymentCadence::Quarterly);
                    summary.top_fraction
                }
                _ => unreachable!(),
            })
            .collect();
        assert!(tops[0] <= tops[1]);
    }

    #[test]
    fn recent_dividend_check_uses_trailing_year() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        let history = vec![
            PricePoint::new(d(2022, 1, 3), 10.0, 0.5),
            PricePoint::new(d(2023, 1, 3), 10.0, 0.0),
            PricePoint::new(d(2023, 6, 1), 10.0, 0.0),
        ];
        assert!(!paid_within_last_year(&history));
        let mut recent = history.clone();
        recent[1] = PricePoint::new(d(2023, 1, 3), 10.0, 0.5);
        assert!(paid_within_last_year(&recent));
        assert!(!paid_within_last_year(&[]));
    }
}
