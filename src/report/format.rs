//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the normalizer/bander stay free of presentation concerns
//! - output changes are localized (important for future snapshot tests)

use crate::app::scan::{ScanEntry, ScanStatus};
use crate::bands::{band_labels, format_percentile};
use crate::domain::{AnnualizedDividendRecord, BandedSeries, DECILE_POINTS};

/// One-line headline: "KO 10y Yield Percentile. Current Yield: 3.05% (Top 23%)".
pub fn format_headline(series: &BandedSeries) -> String {
    format!(
        "{} {} Yield Percentile. Current Yield: {} (Top {:.0}%)",
        series.ticker,
        series.period,
        pct(series.summary.current_yield),
        series.summary.top_fraction * 100.0
    )
}

/// Format the full run summary (window, current statistics, decile table).
pub fn format_summary(series: &BandedSeries, records: &[AnnualizedDividendRecord]) -> String {
    let s = &series.summary;
    let mut out = String::new();

    out.push_str(&format!("=== yb - {} ({}) ===\n", series.ticker, series.period));
    if let (Some(first), Some(last)) = (series.rows.first(), series.rows.last()) {
        out.push_str(&format!(
            "Window: {} .. {} ({} trading days)\n",
            first.date,
            last.date,
            series.rows.len()
        ));
    }
    out.push_str(&format!("{}\n\n", format_headline(series)));

    out.push_str(&format!("As-of: {} | close={:.2}\n", s.date, s.close));
    out.push_str(&format!("Trailing yearly dividend: {:.4}\n", s.trailing_yearly_dividend));
    if let Some(r) = records.last() {
        out.push_str(&format!(
            "Cadence: {} ({}x/yr) | growth since start: {}\n",
            r.cadence.display_name(),
            r.annual_payment_count(),
            pct(r.growth_since_start)
        ));
    }
    let rank = (s.percentile_rank * 100.0).round().clamp(0.0, 100.0) as u32;
    out.push_str(&format!(
        "Yield: {} | {} percentile | top {:.0}%\n",
        pct(s.current_yield),
        format_percentile(rank),
        s.top_fraction * 100.0
    ));
    out.push_str(&format!("Drawdown from peak: {}\n", pct(s.drawdown)));
    let labels = band_labels();
    out.push_str(&format!("Current band: {}\n", labels[s.current_band.min(labels.len() - 1)]));

    out.push_str("\nYield deciles (implied price at current dividend):\n");
    out.push_str(&format!("{:>6} {:>9} {:>12}\n", "q", "yield", "price"));
    let last = series.rows.last();
    for i in 0..DECILE_POINTS {
        let price = last
            .map(|r| r.band_boundaries[i])
            .filter(|p| p.is_finite())
            .map(|p| format!("{p:.2}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:>5}% {:>9} {:>12}\n",
            i * 10,
            pct(series.quantiles[i]),
            price
        ));
    }

    out
}

/// Format the annualized dividend records as a table.
pub fn format_dividends(ticker: &str, records: &[AnnualizedDividendRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Annualized dividends for {ticker} ({} records):\n", records.len()));
    out.push_str(&format!(
        "{:<10} {:>5} {:>10} {:>10} {:>10} {:>9}\n",
        "date", "n/yr", "raw", "smoothed", "trailing", "growth"
    ));
    for r in records {
        out.push_str(&format!(
            "{:<10} {:>5} {:>10.4} {:>10.4} {:>10.4} {:>9}\n",
            r.date.to_string(),
            r.annual_payment_count(),
            r.raw_dividend,
            r.smoothed_raw_dividend,
            r.trailing_yearly_dividend,
            pct(r.growth_since_start)
        ));
    }
    out
}

/// Format scan results, best-ranked yield first.
pub fn format_scan(entries: &[ScanEntry]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<8} {:>8} {:>8} {:>9} {:>12} {:>9}\n",
        "ticker", "yield", "top", "drawdown", "cadence", "growth"
    ));
    for e in entries {
        match &e.status {
            ScanStatus::Banded {
                summary,
                cadence,
                growth_since_start,
            } => out.push_str(&format!(
                "{:<8} {:>8} {:>7.0}% {:>9} {:>12} {:>9}\n",
                e.ticker,
                pct(summary.current_yield),
                summary.top_fraction * 100.0,
                pct(summary.drawdown),
                cadence.display_name(),
                pct(*growth_since_start)
            )),
            ScanStatus::NoRecentDividend => {
                out.push_str(&format!("{:<8} skipped: no dividend in the trailing year\n", e.ticker))
            }
            ScanStatus::Failed(err) => out.push_str(&format!("{:<8} failed: {err}\n", e.ticker)),
        }
    }
    out
}

fn pct(v: f64) -> String {
    format!("{:.2}%", v * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BandSummary, BandedRow, PaymentCadence};
    use crate::error::BandError;
    use chrono::NaiveDate;

    fn series() -> BandedSeries {
        let date = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
        let quantiles = [0.02, 0.022, 0.024, 0.026, 0.028, 0.03, 0.032, 0.034, 0.036, 0.038, 0.04];
        let row = BandedRow {
            date,
            close: 60.0,
            trailing_yearly_dividend: 1.8,
            dividend_yield: 0.03,
            drawdown_from_peak: -0.125,
            band_boundaries: quantiles.map(|q| 1.8 / q),
        };
        BandedSeries {
            ticker: "KO".to_string(),
            period: "10y".to_string(),
            quantiles,
            rows: vec![row],
            summary: BandSummary {
                date,
                close: 60.0,
                trailing_yearly_dividend: 1.8,
                current_yield: 0.0305,
                percentile_rank: 0.77,
                top_fraction: 0.23,
                drawdown: -0.125,
                current_band: 5,
            },
        }
    }

    #[test]
    fn headline_shows_yield_and_top_fraction() {
        assert_eq!(
            format_headline(&series()),
            "KO 10y Yield Percentile. Current Yield: 3.05% (Top 23%)"
        );
    }

    #[test]
    fn summary_includes_ordinal_rank_and_decile_prices() {
        let text = format_summary(&series(), &[]);
        assert!(text.contains("77th percentile"), "{text}");
        assert!(text.contains("Drawdown from peak: -12.50%"));
        assert!(text.contains("Current band: Top 50%"));
        assert!(text.contains("90.00")); // 1.8 / 0.02
        assert!(text.contains("45.00")); // 1.8 / 0.04
    }

    #[test]
    fn scan_table_reports_failures_inline() {
        let entries = vec![
            ScanEntry {
                ticker: "KO".to_string(),
                status: ScanStatus::Banded {
                    summary: series().summary,
                    cadence: PaymentCadence::Quarterly,
                    growth_since_start: 0.4,
                },
            },
            ScanEntry {
                ticker: "TSLA".to_string(),
                status: ScanStatus::Failed(BandError::InsufficientHistory),
            },
        ];
        let text = format_scan(&entries);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("KO"));
        assert!(lines[1].contains("quarterly"));
        assert!(lines[2].starts_with("TSLA     failed: insufficient history"));
    }
}
