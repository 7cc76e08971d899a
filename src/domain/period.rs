//! Lookback periods (`10y`, `6mo`, `ytd`, `max`, ...).
//!
//! Periods use the same spelling as common market-data providers so tickers and
//! periods can be passed straight through from a request.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};

/// A requested history window, counted back from "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Days(u32),
    Months(u32),
    Years(u32),
    YearToDate,
    Max,
}

impl Period {
    /// The window actually fetched so the visible span survives the warm-up trim.
    ///
    /// Year periods gain one extra year; other periods are left as requested.
    pub fn with_warmup(self) -> Self {
        match self {
            Period::Years(n) => Period::Years(n.saturating_add(1)),
            other => other,
        }
    }

    /// First calendar date covered by the window, `None` for `max`.
    pub fn start_date(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::Days(n) => today.checked_sub_signed(chrono::Duration::days(i64::from(n))),
            Period::Months(n) => today.checked_sub_months(Months::new(n)),
            Period::Years(n) => today.checked_sub_months(Months::new(n.saturating_mul(12))),
            Period::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            Period::Max => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Days(n) => write!(f, "{n}d"),
            Period::Months(n) => write!(f, "{n}mo"),
            Period::Years(n) => write!(f, "{n}y"),
            Period::YearToDate => write!(f, "ytd"),
            Period::Max => write!(f, "max"),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase();
        match raw.as_str() {
            "ytd" => return Ok(Period::YearToDate),
            "max" => return Ok(Period::Max),
            _ => {}
        }

        let split = raw
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| format!("Invalid period '{s}': missing unit (use d, mo or y)."))?;
        let (count, unit) = raw.split_at(split);
        let count: u32 = count
            .parse()
            .map_err(|_| format!("Invalid period '{s}': expected a leading count like 10y."))?;
        if count == 0 {
            return Err(format!("Invalid period '{s}': count must be > 0."));
        }

        match unit {
            "d" => Ok(Period::Days(count)),
            "mo" => Ok(Period::Months(count)),
            "y" => Ok(Period::Years(count)),
            _ => Err(format!("Invalid period '{s}': unknown unit '{unit}' (use d, mo or y).")),
        }
    }
}
