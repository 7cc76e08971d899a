//! Synthetic price/dividend histories for offline runs.
//!
//! Histories are deterministic per (ticker, seed, period, end date), so the same
//! command always produces the same bands. Prices follow a geometric random walk
//! on weekdays; dividends follow a fixed cadence with yearly growth, and a few
//! provider artefacts are injected on purpose:
//!
//! - the same payment repeated on the next trading day
//! - an occasional special dividend on top of the regular one

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::{HistorySource, clean_history};
use crate::domain::{PaymentCadence, Period, PricePoint};
use crate::error::BandError;

/// Lookback used for `max`.
const MAX_SAMPLE_YEARS: u32 = 20;

#[derive(Debug, Clone)]
pub struct SampleHistory {
    pub cadence: PaymentCadence,
    pub seed: u64,
    pub end: NaiveDate,
    pub start_price: f64,
    /// Initial annual dividend as a fraction of the start price.
    pub initial_yield: f64,
    /// Yearly dividend growth rate.
    pub dividend_growth: f64,
    /// Annualized price volatility.
    pub volatility: f64,
    /// Annualized price drift.
    pub drift: f64,
    /// Probability that a payment is reported again on the next trading day.
    pub duplicate_prob: f64,
    /// Probability that a payment month also carries a special dividend.
    pub special_prob: f64,
}

impl Default for SampleHistory {
    fn default() -> Self {
        Self {
            cadence: PaymentCadence::Quarterly,
            seed: 42,
            end: Local::now().date_naive(),
            start_price: 50.0,
            initial_yield: 0.03,
            dividend_growth: 0.05,
            volatility: 0.2,
            drift: 0.06,
            duplicate_prob: 0.05,
            special_prob: 0.02,
        }
    }
}

impl SampleHistory {
    /// Generate a history covering `period` up to `self.end`.
    pub fn generate(&self, ticker: &str, period: Period) -> Result<Vec<PricePoint>, BandError> {
        if !(self.start_price.is_finite() && self.start_price > 0.0) {
            return Err(BandError::DataUnavailable("Sample start price must be > 0.".to_string()));
        }
        let start = period
            .start_date(self.end)
            .or_else(|| Period::Years(MAX_SAMPLE_YEARS).start_date(self.end))
            .ok_or_else(|| BandError::DataUnavailable(format!("Invalid sample period {period}.")))?;

        let mut rng = StdRng::seed_from_u64(self.seed_for(ticker, start));
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| BandError::DataUnavailable(format!("Noise distribution error: {e}")))?;

        let dt = 1.0 / 252.0;
        let sigma = self.volatility.max(0.0);
        let mu = self.drift - 0.5 * sigma * sigma;
        let months = payment_months(self.cadence);
        let payments = f64::from(self.cadence.payments_per_year().max(1));

        let mut rows = Vec::new();
        let mut price = self.start_price;
        // The start month is already under way: the first payment falls on the
        // first trading day of the next payment month.
        let mut last_month = (start.year(), start.month());
        let mut repeat_next: Option<f64> = None;
        let mut day = start;

        while day <= self.end {
            if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                day += Duration::days(1);
                continue;
            }

            let z = normal.sample(&mut rng);
            price *= (mu * dt + sigma * dt.sqrt() * z).exp();

            let mut dividend = repeat_next.take().unwrap_or(0.0);
            let month = (day.year(), day.month());
            if last_month != month {
                last_month = month;
                if months.contains(&day.month()) {
                    let years = f64::from(day.year() - start.year());
                    let regular = self.start_price * self.initial_yield / payments
                        * (1.0 + self.dividend_growth).powf(years);
                    dividend = regular;
                    if rng.r#gen::<f64>() < self.special_prob {
                        dividend += regular * rng.gen_range(1.0..4.0);
                    }
                    if rng.r#gen::<f64>() < self.duplicate_prob {
                        repeat_next = Some(dividend);
                    }
                }
            }

            rows.push(PricePoint::new(day, price, dividend));
            day += Duration::days(1);
        }

        log::debug!("{ticker}: generated {} synthetic rows from {start}", rows.len());
        Ok(clean_history(rows))
    }

    fn seed_for(&self, ticker: &str, start: NaiveDate) -> u64 {
        let mut hasher = DefaultHasher::new();
        ticker.to_ascii_uppercase().hash(&mut hasher);
        self.seed.hash(&mut hasher);
        start.hash(&mut hasher);
        self.end.hash(&mut hasher);
        self.cadence.hash(&mut hasher);
        hasher.finish()
    }
}

impl HistorySource for SampleHistory {
    fn fetch_history(&self, ticker: &str, period: Period) -> Result<Vec<PricePoint>, BandError> {
        self.generate(ticker, period)
    }
}

fn payment_months(cadence: PaymentCadence) -> &'static [u32] {
    match cadence {
        PaymentCadence::None => &[],
        PaymentCadence::Annual => &[6],
        PaymentCadence::SemiAnnual => &[6, 12],
        PaymentCadence::Quarterly => &[3, 6, 9, 12],
        PaymentCadence::Monthly => &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
    }
}
