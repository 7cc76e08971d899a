//! Dividend normalization: sparse payment events to a trailing yearly dividend.
//!
//! Pipeline:
//!
//! 1. keep days with a positive dividend, at most one per calendar month
//! 2. count payments per calendar year, borrow the neighbouring year's count
//!    for the (partial) first and last years, snap counts onto a cadence
//! 3. smooth per-payment amounts with a centered median
//! 4. annualize: calendar-year sum for rare payers, smoothed × cadence otherwise
//! 5. drop the warm-up year after the first payment
//!
//! Two approximations are kept on purpose. The annualization switches rule
//! between 2 and 4 payments per year, so a payer drifting across that boundary
//! shows a step. The edge-year override assumes the cadence does not change at
//! either end of the window.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration};

use crate::domain::{AnnualizedDividendRecord, BandConfig, DividendEvent, PaymentCadence, PricePoint};
use crate::error::BandError;
use crate::math::centered_median;

/// Dividend payments, de-duplicated to the first payment of each calendar month.
///
/// Providers often report the same distribution on consecutive days; later
/// payments in a month are treated as restatements and dropped.
pub fn dividend_events(history: &[PricePoint]) -> Vec<DividendEvent> {
    let mut events: Vec<DividendEvent> = Vec::new();
    for p in history.iter().filter(|p| p.dividend > 0.0) {
        let same_month = events
            .last()
            .is_some_and(|e| e.date.year() == p.date.year() && e.date.month() == p.date.month());
        if same_month {
            continue;
        }
        events.push(DividendEvent {
            date: p.date,
            amount: p.dividend,
        });
    }
    events
}

/// Payment cadence per calendar year of the event series.
///
/// Years without any event do not appear. The first year takes the second
/// year's count and then the last year takes the second-to-last year's count
/// (in that order), since both edges are usually cut by the data window.
pub fn yearly_cadence(events: &[DividendEvent]) -> BTreeMap<i32, PaymentCadence> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for e in events {
        *counts.entry(e.date.year()).or_default() += 1;
    }

    let mut by_year: Vec<(i32, usize)> = counts.into_iter().collect();
    let n = by_year.len();
    if n >= 2 {
        by_year[0].1 = by_year[1].1;
        by_year[n - 1].1 = by_year[n - 2].1;
    }

    by_year
        .into_iter()
        .map(|(year, count)| (year, PaymentCadence::from_observed_count(count)))
        .collect()
}

/// Build the annualized dividend series from a daily history.
///
/// Fails with [`BandError::InsufficientHistory`] when there are no dividends
/// at all or when every record falls inside the warm-up window.
pub fn normalize_dividends(
    history: &[PricePoint],
    config: &BandConfig,
) -> Result<Vec<AnnualizedDividendRecord>, BandError> {
    let events = dividend_events(history);
    let Some(first) = events.first() else {
        return Err(BandError::InsufficientHistory);
    };
    // Negative warm-ups clamp to 0 so the first payment is always dropped; a
    // warm-up past the calendar range leaves nothing to keep.
    let warmup_end = Duration::try_days(config.warmup_days.max(0))
        .and_then(|warmup| first.date.checked_add_signed(warmup))
        .ok_or(BandError::InsufficientHistory)?;

    let cadence = yearly_cadence(&events);
    let amounts: Vec<f64> = events.iter().map(|e| e.amount).collect();
    let smoothed = centered_median(&amounts, config.smoothing_window);

    let mut year_sums: BTreeMap<i32, f64> = BTreeMap::new();
    for e in &events {
        *year_sums.entry(e.date.year()).or_default() += e.amount;
    }

    let mut records: Vec<AnnualizedDividendRecord> = events
        .iter()
        .zip(smoothed)
        .filter(|(e, _)| e.date > warmup_end)
        .map(|(e, smoothed_raw_dividend)| {
            let year = e.date.year();
            let cadence = cadence.get(&year).copied().unwrap_or(PaymentCadence::None);
            let trailing_yearly_dividend = if cadence.is_irregular() {
                year_sums.get(&year).copied().unwrap_or(0.0)
            } else {
                smoothed_raw_dividend * f64::from(cadence.payments_per_year())
            };
            AnnualizedDividendRecord {
                date: e.date,
                cadence,
                raw_dividend: e.amount,
                smoothed_raw_dividend,
                trailing_yearly_dividend: trailing_yearly_dividend.max(0.0),
                growth_since_start: 0.0,
            }
        })
        .collect();

    let Some(base) = records.first().map(|r| r.trailing_yearly_dividend) else {
        return Err(BandError::InsufficientHistory);
    };
    for r in &mut records {
        r.growth_since_start = if base > 0.0 {
            r.trailing_yearly_dividend / base - 1.0
        } else {
            0.0
        };
    }

    log::debug!(
        "normalized {} dividend events into {} annualized records ({} warm-up)",
        events.len(),
        records.len(),
        events.len() - records.len()
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// One row per listed (date, dividend) pair; close fixed at 100.
    fn history(rows: &[(NaiveDate, f64)]) -> Vec<PricePoint> {
        rows.iter().map(|&(d, div)| PricePoint::new(d, 100.0, div)).collect()
    }

    /// Payments on the 15th of every month in `months` for each year in `years`.
    fn payments(years: std::ops::RangeInclusive<i32>, months: &[u32], amount: f64) -> Vec<(NaiveDate, f64)> {
        let mut rows = Vec::new();
        for y in years {
            for &m in months {
                rows.push((date(y, m, 15), amount));
            }
        }
        rows
    }

    const ALL_MONTHS: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

    #[test]
    fn keeps_first_payment_of_each_month() {
        let h = history(&[
            (date(2020, 3, 2), 0.0),
            (date(2020, 3, 3), 0.5),
            (date(2020, 3, 4), 0.5),
            (date(2020, 3, 30), 0.7),
            (date(2020, 4, 1), 0.6),
        ]);
        let events = dividend_events(&h);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].date, date(2020, 3, 3));
        assert_eq!(events[0].amount, 0.5);
        assert_eq!(events[1].date, date(2020, 4, 1));
    }

    #[test]
    fn edge_years_borrow_neighbouring_counts() {
        // 2018: one stray payment, 2019-2020: quarterly, 2021: one payment so far.
        let mut rows = vec![(date(2018, 12, 10), 1.0)];
        rows.extend(payments(2019..=2020, &[3, 6, 9, 12], 1.0));
        rows.push((date(2021, 3, 10), 1.0));
        let cadence = yearly_cadence(&dividend_events(&history(&rows)));

        assert_eq!(cadence[&2018], PaymentCadence::Quarterly);
        assert_eq!(cadence[&2019], PaymentCadence::Quarterly);
        assert_eq!(cadence[&2021], PaymentCadence::Quarterly);
    }

    #[test]
    fn two_year_series_takes_second_year_count_for_both() {
        let mut rows = payments(2020..=2020, &[1, 4, 7, 10], 1.0);
        rows.extend(payments(2021..=2021, &[6, 12], 1.0));
        let cadence = yearly_cadence(&dividend_events(&history(&rows)));
        assert_eq!(cadence[&2020], PaymentCadence::SemiAnnual);
        assert_eq!(cadence[&2021], PaymentCadence::SemiAnnual);
    }

    #[test]
    fn monthly_payer_annualizes_to_twelve() {
        let h = history(&payments(2018..=2020, &ALL_MONTHS, 1.0));
        let records = normalize_dividends(&h, &BandConfig::default()).unwrap();

        assert!(!records.is_empty());
        for r in &records {
            assert_eq!(r.annual_payment_count(), 12);
            assert!((r.trailing_yearly_dividend - 12.0).abs() < 1e-12);
            assert!(r.growth_since_start.abs() < 1e-12);
        }
    }

    #[test]
    fn warmup_year_is_discarded() {
        let h = history(&payments(2018..=2020, &[3, 6, 9, 12], 0.25));
        let records = normalize_dividends(&h, &BandConfig::default()).unwrap();
        // First payment 2018-03-15; records must be later than 2019-03-15.
        assert_eq!(records[0].date, date(2019, 6, 15));
        assert!(records.iter().all(|r| r.date > date(2019, 3, 15)));
    }

    #[test]
    fn annual_payer_missing_final_payment_keeps_prior_cadence() {
        // Pays every June 2015-2020; the 2021 window ends before June so 2021 pays $0.
        let mut rows = payments(2015..=2020, &[6], 2.0);
        rows.push((date(2021, 3, 1), 0.0));
        let h = history(&rows);

        let cadence = yearly_cadence(&dividend_events(&h));
        assert_eq!(cadence.keys().last(), Some(&2020));
        assert_eq!(cadence[&2020], PaymentCadence::Annual);

        let records = normalize_dividends(&h, &BandConfig::default()).unwrap();
        let last = records.last().unwrap();
        assert_eq!(last.annual_payment_count(), 1);
        assert_eq!(last.trailing_yearly_dividend, 2.0);
    }

    #[test]
    fn irregular_payers_use_calendar_year_sum() {
        // Semi-annual with uneven amounts: the yearly figure is the actual sum.
        let rows = vec![
            (date(2018, 5, 1), 0.4),
            (date(2018, 11, 1), 0.6),
            (date(2019, 5, 1), 0.5),
            (date(2019, 11, 1), 0.9),
            (date(2020, 5, 1), 0.7),
            (date(2020, 11, 1), 0.7),
        ];
        let records = normalize_dividends(&history(&rows), &BandConfig::default()).unwrap();
        let y2019: Vec<_> = records.iter().filter(|r| r.date.year() == 2019).collect();
        assert_eq!(y2019.len(), 1); // 2019-05-01 is inside the warm-up window
        assert!((y2019[0].trailing_yearly_dividend - 1.4).abs() < 1e-12);
        let last = records.last().unwrap();
        assert!((last.trailing_yearly_dividend - 1.4).abs() < 1e-12);
        assert!(last.growth_since_start.abs() < 1e-12);
    }

    #[test]
    fn annualization_steps_between_semiannual_and_quarterly() {
        // Same per-payment amount, 2 vs 4 observed payments: the rule switches
        // from a calendar sum (2 × 1.0) to smoothed × 4, not a gradual change.
        let semi = history(&payments(2018..=2020, &[6, 12], 1.0));
        let quarterly = history(&payments(2018..=2020, &[3, 6, 9, 12], 1.0));
        let semi = normalize_dividends(&semi, &BandConfig::default()).unwrap();
        let quarterly = normalize_dividends(&quarterly, &BandConfig::default()).unwrap();
        assert_eq!(semi.last().unwrap().trailing_yearly_dividend, 2.0);
        assert_eq!(quarterly.last().unwrap().trailing_yearly_dividend, 4.0);
    }

    #[test]
    fn three_payments_annualize_as_quarterly() {
        let rows = payments(2018..=2020, &[4, 8, 12], 1.0);
        let records = normalize_dividends(&history(&rows), &BandConfig::default()).unwrap();
        assert!(records.iter().all(|r| r.cadence == PaymentCadence::Quarterly));
        assert!(records.iter().all(|r| r.trailing_yearly_dividend == 4.0));
    }

    #[test]
    fn special_dividend_does_not_spike_quarterly_estimate() {
        let mut rows = payments(2018..=2021, &[3, 6, 9, 12], 0.5);
        // Special payment in 2020-09 replaces the regular one.
        for row in rows.iter_mut() {
            if row.0 == date(2020, 9, 15) {
                row.1 = 5.0;
            }
        }
        let records = normalize_dividends(&history(&rows), &BandConfig::default()).unwrap();
        let sept = records.iter().find(|r| r.date == date(2020, 9, 15)).unwrap();
        assert_eq!(sept.raw_dividend, 5.0);
        assert_eq!(sept.smoothed_raw_dividend, 0.5);
        assert_eq!(sept.trailing_yearly_dividend, 2.0);
    }

    #[test]
    fn growth_is_relative_to_first_kept_record() {
        let mut rows = payments(2018..=2018, &[3, 6, 9, 12], 1.0);
        rows.extend(payments(2019..=2021, &[3, 6, 9, 12], 1.5));
        let records = normalize_dividends(&history(&rows), &BandConfig::default()).unwrap();
        let first = records[0];
        let last = records.last().unwrap();
        assert_eq!(first.growth_since_start, 0.0);
        let expected = last.trailing_yearly_dividend / first.trailing_yearly_dividend - 1.0;
        assert!((last.growth_since_start - expected).abs() < 1e-12);
    }

    #[test]
    fn no_dividends_is_insufficient_history() {
        let h = history(&[(date(2020, 1, 2), 0.0), (date(2021, 1, 4), 0.0)]);
        assert_eq!(
            normalize_dividends(&h, &BandConfig::default()),
            Err(BandError::InsufficientHistory)
        );
    }

    #[test]
    fn dividends_only_inside_warmup_is_insufficient_history() {
        let h = history(&payments(2020..=2020, &[3, 6, 9, 12], 0.25));
        assert_eq!(
            normalize_dividends(&h, &BandConfig::default()),
            Err(BandError::InsufficientHistory)
        );
    }

    #[test]
    fn oversized_warmup_is_insufficient_history() {
        let h = history(&payments(2018..=2020, &[3, 6, 9, 12], 0.25));
        let config = BandConfig {
            warmup_days: 999_999_999,
            ..BandConfig::default()
        };
        assert_eq!(normalize_dividends(&h, &config), Err(BandError::InsufficientHistory));
        let config = BandConfig {
            warmup_days: i64::MAX,
            ..BandConfig::default()
        };
        assert_eq!(normalize_dividends(&h, &config), Err(BandError::InsufficientHistory));
    }

    #[test]
    fn negative_warmup_still_drops_first_payment() {
        let h = history(&payments(2018..=2020, &[3, 6, 9, 12], 0.25));
        let config = BandConfig {
            warmup_days: -10_000,
            ..BandConfig::default()
        };
        let records = normalize_dividends(&h, &config).unwrap();
        assert_eq!(records.len(), 11);
        assert_eq!(records[0].date, date(2018, 6, 15));
    }
}
