//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the normalizer and the bander
//! - exported to JSON/CSV for an external renderer
//! - rebuilt from scratch on every request (nothing here is persisted)

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of quantile thresholds (0%, 10%, ..., 100%).
pub const DECILE_POINTS: usize = 11;

/// Number of filled bands between adjacent thresholds.
pub const BAND_COUNT: usize = DECILE_POINTS - 1;

/// One trading day of provider data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    /// Unadjusted close (always > 0 once it leaves a data adapter).
    pub close: f64,
    /// Cash dividend going ex on this date, 0 when none.
    pub dividend: f64,
    pub is_dividend_event: bool,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64, dividend: f64) -> Self {
        Self {
            date,
            close,
            dividend,
            is_dividend_event: dividend > 0.0,
        }
    }
}

/// A dividend payment after month de-duplication.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Canonical corporate payment frequency.
///
/// Observed per-year payment counts are snapped onto this set, so an
/// `annual_payment_count` outside {0, 1, 2, 4, 12} cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentCadence {
    None,
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl PaymentCadence {
    /// Snap an observed count of payments in a calendar year onto a cadence.
    ///
    /// Buckets: 0 -> 0, 1 -> 1, 2 -> 2, 3..=8 -> 4, 9 and above -> 12.
    pub fn from_observed_count(count: usize) -> Self {
        match count {
            0 => PaymentCadence::None,
            1 => PaymentCadence::Annual,
            2 => PaymentCadence::SemiAnnual,
            3..=8 => PaymentCadence::Quarterly,
            _ => PaymentCadence::Monthly,
        }
    }

    pub fn payments_per_year(self) -> u32 {
        match self {
            PaymentCadence::None => 0,
            PaymentCadence::Annual => 1,
            PaymentCadence::SemiAnnual => 2,
            PaymentCadence::Quarterly => 4,
            PaymentCadence::Monthly => 12,
        }
    }

    /// Rare payers are annualized from the actual calendar-year sum.
    pub fn is_irregular(self) -> bool {
        self.payments_per_year() <= 3
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PaymentCadence::None => "none",
            PaymentCadence::Annual => "annual",
            PaymentCadence::SemiAnnual => "semi-annual",
            PaymentCadence::Quarterly => "quarterly",
            PaymentCadence::Monthly => "monthly",
        }
    }
}

/// Annualized dividend estimate at one dividend event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualizedDividendRecord {
    pub date: NaiveDate,
    pub cadence: PaymentCadence,
    pub raw_dividend: f64,
    pub smoothed_raw_dividend: f64,
    pub trailing_yearly_dividend: f64,
    /// Relative to the first record kept after the warm-up trim.
    pub growth_since_start: f64,
}

impl AnnualizedDividendRecord {
    pub fn annual_payment_count(&self) -> u32 {
        self.cadence.payments_per_year()
    }
}

/// One trading day of the banded output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandedRow {
    pub date: NaiveDate,
    pub close: f64,
    pub trailing_yearly_dividend: f64,
    pub dividend_yield: f64,
    pub drawdown_from_peak: f64,
    /// Implied prices at each yield decile, highest price (0% yield quantile) first.
    #[serde(with = "unbounded_prices")]
    pub band_boundaries: [f64; DECILE_POINTS],
}

/// Point-in-time statistics for the most recent row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSummary {
    pub date: NaiveDate,
    pub close: f64,
    pub trailing_yearly_dividend: f64,
    pub current_yield: f64,
    /// Average-rank percentile of the current yield within the window, in (0, 1].
    pub percentile_rank: f64,
    /// `1 - percentile_rank`: share of history with a higher yield.
    pub top_fraction: f64,
    pub drawdown: f64,
    /// Index of the band (0..BAND_COUNT) the current close falls into.
    pub current_band: usize,
}

/// Full output of a banding run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandedSeries {
    pub ticker: String,
    pub period: String,
    /// Yield deciles over the retained window (0%, 10%, ..., 100%).
    pub quantiles: [f64; DECILE_POINTS],
    pub rows: Vec<BandedRow>,
    pub summary: BandSummary,
}

/// Algorithm constants, overridable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandConfig {
    /// Records within this many days of the first dividend are discarded.
    pub warmup_days: i64,
    /// Maximum number of trading days an annualized figure is carried forward.
    pub ffill_limit: usize,
    /// Width of the centered median used to smooth per-payment amounts.
    pub smoothing_window: usize,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            warmup_days: 365,
            ffill_limit: 300,
            smoothing_window: 5,
        }
    }
}

/// Where price/dividend history comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Yahoo Finance chart API.
    Yahoo,
    /// Local `date,close,dividend` CSV files.
    Csv,
    /// Deterministic synthetic history (offline).
    Sample,
}

/// JSON has no infinity: unbounded boundaries travel as `null`.
mod unbounded_prices {
    use super::*;
    use serde::de::Error;

    pub fn serialize<S: Serializer>(values: &[f64; DECILE_POINTS], s: S) -> Result<S::Ok, S::Error> {
        let finite: Vec<Option<f64>> = values.iter().map(|v| v.is_finite().then_some(*v)).collect();
        finite.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[f64; DECILE_POINTS], D::Error> {
        let raw: Vec<Option<f64>> = Vec::deserialize(d)?;
        if raw.len() != DECILE_POINTS {
            return Err(D::Error::invalid_length(raw.len(), &"11 band boundaries"));
        }
        let mut out = [f64::INFINITY; DECILE_POINTS];
        for (slot, v) in out.iter_mut().zip(raw) {
            *slot = v.unwrap_or(f64::INFINITY);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_counts_snap_to_canonical_cadence() {
        let expected = [
            (0, 0),
            (1, 1),
            (2, 2),
            (3, 4),
            (4, 4),
            (5, 4),
            (8, 4),
            (9, 12),
            (11, 12),
            (12, 12),
        ];
        for (count, payments) in expected {
            assert_eq!(
                PaymentCadence::from_observed_count(count).payments_per_year(),
                payments,
                "count={count}"
            );
        }
    }

    #[test]
    fn irregular_cutoff_is_below_quarterly() {
        assert!(PaymentCadence::SemiAnnual.is_irregular());
        assert!(PaymentCadence::Annual.is_irregular());
        assert!(!PaymentCadence::Quarterly.is_irregular());
        assert!(!PaymentCadence::Monthly.is_irregular());
    }

    #[test]
    fn unbounded_boundaries_survive_json() {
        let mut band_boundaries = [1.0; DECILE_POINTS];
        band_boundaries[0] = f64::INFINITY;
        let row = BandedRow {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            close: 10.0,
            trailing_yearly_dividend: 0.4,
            dividend_yield: 0.04,
            drawdown_from_peak: -0.1,
            band_boundaries,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("[null,1.0"));
        let back: BandedRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn price_point_flags_dividend_days() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(PricePoint::new(d, 10.0, 0.25).is_dividend_event);
        assert!(!PricePoint::new(d, 10.0, 0.0).is_dividend_event);
    }
}
