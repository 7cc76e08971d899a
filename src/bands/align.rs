//! Alignment of annualized dividend records onto the trading calendar.

use crate::domain::{AnnualizedDividendRecord, PricePoint};

/// Trailing yearly dividend for every row of `history`.
///
/// Both inputs must be sorted by date. This is a single sorted merge:
///
/// - a record dated on a trading day sets the value for that day
/// - the value is carried forward for at most `ffill_limit` further rows
/// - rows before the first record, or past the carry limit, get 0
///
/// Records whose date is not a trading day in `history` are skipped.
pub fn align_dividends(
    history: &[PricePoint],
    records: &[AnnualizedDividendRecord],
    ffill_limit: usize,
) -> Vec<f64> {
    let mut out = Vec::with_capacity(history.len());
    let mut next = 0;
    let mut current: Option<f64> = None;
    let mut stale = 0usize;

    for p in history {
        while next < records.len() && records[next].date < p.date {
            next += 1;
        }

        if next < records.len() && records[next].date == p.date {
            let value = records[next].trailing_yearly_dividend;
            current = Some(value);
            stale = 0;
            next += 1;
            out.push(value);
            continue;
        }

        stale = stale.saturating_add(1);
        let value = match current {
            Some(v) if stale <= ffill_limit => v,
            _ => 0.0,
        };
        out.push(value);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaymentCadence;
    use chrono::{Duration, NaiveDate};

    fn day(i: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(i)
    }

    fn record(date: NaiveDate, trailing: f64) -> AnnualizedDividendRecord {
        AnnualizedDividendRecord {
            date,
            cadence: PaymentCadence::Quarterly,
            raw_dividend: trailing / 4.0,
            smoothed_raw_dividend: trailing / 4.0,
            trailing_yearly_dividend: trailing,
            growth_since_start: 0.0,
        }
    }

    fn history(n: i64) -> Vec<PricePoint> {
        (0..n).map(|i| PricePoint::new(day(i), 50.0, 0.0)).collect()
    }

    #[test]
    fn fills_forward_between_records() {
        let h = history(6);
        let r = [record(day(1), 2.0), record(day(4), 3.0)];
        assert_eq!(align_dividends(&h, &r, 300), vec![0.0, 2.0, 2.0, 2.0, 3.0, 3.0]);
    }

    #[test]
    fn carry_stops_after_limit() {
        let h = history(7);
        let r = [record(day(0), 1.5)];
        // Three filled rows, then zero.
        assert_eq!(align_dividends(&h, &r, 3), vec![1.5, 1.5, 1.5, 1.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn default_limit_fills_exactly_three_hundred_rows() {
        let h = history(400);
        let r = [record(day(0), 1.0)];
        let aligned = align_dividends(&h, &r, 300);
        assert_eq!(aligned[300], 1.0);
        assert_eq!(aligned[301], 0.0);
        assert!(aligned[301..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn new_record_resets_staleness() {
        let h = history(8);
        let r = [record(day(0), 1.0), record(day(3), 2.0)];
        assert_eq!(
            align_dividends(&h, &r, 2),
            vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 0.0, 0.0]
        );
    }

    #[test]
    fn records_off_calendar_are_skipped() {
        // Trading days 0, 2, 4 only; the record on day 1 has no matching row.
        let h: Vec<PricePoint> = [0, 2, 4]
            .iter()
            .map(|&i| PricePoint::new(day(i), 10.0, 0.0))
            .collect();
        let r = [record(day(1), 9.0), record(day(2), 4.0)];
        assert_eq!(align_dividends(&h, &r, 300), vec![0.0, 4.0, 4.0]);
    }
}
