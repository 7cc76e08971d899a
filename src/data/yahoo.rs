//! Yahoo Finance chart API integration (daily closes + dividend events).

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::{HistorySource, clean_history};
use crate::domain::{Period, PricePoint};
use crate::error::{AppError, BandError};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    /// Build a client, honouring `YB_YAHOO_BASE_URL` / `YB_USER_AGENT` from the environment (.env).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("YB_YAHOO_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let user_agent = std::env::var("YB_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, ticker: &str, period: Period) -> Result<ChartResponse, BandError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        let mut req = self
            .client
            .get(&url)
            .query(&[("interval", "1d"), ("events", "div")]);

        let now = Local::now();
        match period.start_date(now.date_naive()) {
            Some(start) => {
                let period1 = start.and_time(NaiveTime::default()).and_utc().timestamp();
                req = req.query(&[
                    ("period1", period1.to_string()),
                    ("period2", now.timestamp().to_string()),
                ]);
            }
            None => {
                req = req.query(&[("range", period.to_string())]);
            }
        }

        log::info!("fetching {ticker} ({period}) from {url}");
        let resp = req
            .send()
            .map_err(|e| BandError::DataUnavailable(format!("Yahoo request for {ticker} failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| BandError::DataUnavailable(format!("Failed to read Yahoo response for {ticker}: {e}")))?;

        // Unknown symbols come back as 404 with a JSON error body; prefer its description.
        match serde_json::from_str::<ChartResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(BandError::DataUnavailable(format!(
                "Yahoo request for {ticker} failed with status {status}."
            ))),
            Err(e) => Err(BandError::DataUnavailable(format!(
                "Failed to parse Yahoo response for {ticker}: {e}"
            ))),
        }
    }
}

impl HistorySource for YahooClient {
    fn fetch_history(&self, ticker: &str, period: Period) -> Result<Vec<PricePoint>, BandError> {
        let body = self.request(ticker, period)?;
        let rows = parse_chart(ticker, body)?;
        log::info!("{ticker}: received {} daily rows", rows.len());
        Ok(rows)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    events: Option<ChartEvents>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartEvents {
    #[serde(default)]
    dividends: HashMap<String, DividendEntry>,
}

#[derive(Debug, Deserialize)]
struct DividendEntry {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Exchange-local calendar date for a Unix timestamp.
fn local_date(ts: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts + gmtoffset, 0).map(|dt| dt.date_naive())
}

fn parse_chart(ticker: &str, body: ChartResponse) -> Result<Vec<PricePoint>, BandError> {
    if let Some(err) = body.chart.error {
        let code = err.code.unwrap_or_else(|| "error".to_string());
        let description = err.description.unwrap_or_default();
        return Err(BandError::DataUnavailable(format!("{ticker}: {code} {description}").trim().to_string()));
    }

    let result = body
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
        .ok_or_else(|| BandError::DataUnavailable(format!("{ticker}: no chart data returned.")))?;

    let offset = result.meta.gmtoffset;
    if let Some(currency) = &result.meta.currency {
        log::debug!("{ticker}: prices quoted in {currency}");
    }

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let mut dividends: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for entry in result.events.map(|e| e.dividends).unwrap_or_default().into_values() {
        if let Some(date) = local_date(entry.date, offset) {
            *dividends.entry(date).or_default() += entry.amount;
        }
    }

    let mut rows = Vec::with_capacity(result.timestamp.len());
    for (&ts, close) in result.timestamp.iter().zip(closes.iter()) {
        let (Some(date), Some(close)) = (local_date(ts, offset), *close) else {
            continue;
        };
        rows.push(PricePoint::new(date, close, 0.0));
    }
    let mut rows = clean_history(rows);
    if rows.is_empty() {
        return Err(BandError::DataUnavailable(format!("{ticker}: no priced trading days returned.")));
    }

    // Payments dated on a non-trading day go to the next trading day.
    let mut idx = 0;
    for (date, amount) in dividends {
        while idx < rows.len() && rows[idx].date < date {
            idx += 1;
        }
        match rows.get_mut(idx) {
            Some(row) => *row = PricePoint::new(row.date, row.close, row.dividend + amount),
            None => log::debug!("{ticker}: dividend on {date} falls after the last trading day"),
        }
    }

    Ok(rows)
}
