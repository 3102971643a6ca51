//! Tiingo bar-price adapter (equities and crypto).
//!
//! Both endpoints report full OHLCV bars with RFC 3339 dates, stored here as
//! naive UTC. The equity endpoint returns a bare bar array; the crypto
//! endpoint wraps bars in `[{ "ticker": …, "priceData": [...] }]`. Volume is
//! optional on some resample frequencies and defaults to 0.

use super::super::provider::{check_status, classify_request_error, DataError};
use crate::domain::{Frequency, PriceRecord};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

pub const PROVIDER: &str = "tiingo";

#[derive(Debug, Deserialize)]
pub struct TiingoBar {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoSeries {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub price_data: Option<Vec<TiingoBar>>,
}

/// Fetch historical equity bars.
pub fn fetch_stock_bars(
    client: &reqwest::blocking::Client,
    base_url: &str,
    api_key: &str,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    frequency: Frequency,
) -> Result<Vec<TiingoBar>, DataError> {
    let url = format!("{base_url}/tiingo/daily/{symbol}/prices");
    let resp = client
        .get(&url)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Token {api_key}"))
        .query(&[
            ("startDate", start.to_string()),
            ("endDate", end.to_string()),
            ("resampleFreq", frequency.to_string()),
        ])
        .send()
        .map_err(classify_request_error)?;
    let resp = check_status(PROVIDER, resp)?;
    resp.json().map_err(|e| DataError::MalformedResponse {
        provider: PROVIDER,
        detail: e.to_string(),
    })
}

/// Fetch historical crypto bars.
pub fn fetch_crypto_bars(
    client: &reqwest::blocking::Client,
    base_url: &str,
    api_key: &str,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    frequency: Frequency,
) -> Result<Vec<CryptoSeries>, DataError> {
    let url = format!("{base_url}/tiingo/crypto/prices");
    let resp = client
        .get(&url)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Token {api_key}"))
        .query(&[
            ("tickers", symbol.to_string()),
            ("startDate", start.to_string()),
            ("endDate", end.to_string()),
            ("resampleFreq", frequency.to_string()),
        ])
        .send()
        .map_err(classify_request_error)?;
    let resp = check_status(PROVIDER, resp)?;
    resp.json().map_err(|e| DataError::MalformedResponse {
        provider: PROVIDER,
        detail: e.to_string(),
    })
}

/// Normalize an equity bar array for one asset.
///
/// An empty array (unknown symbol, out-of-range dates) yields `Ok(empty)`.
pub fn normalize(bars: &[TiingoBar], asset: &str) -> Result<Vec<PriceRecord>, DataError> {
    Ok(bars
        .iter()
        .map(|bar| PriceRecord {
            date: bar.date.naive_utc(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume.unwrap_or(0.0),
            asset: asset.to_string(),
        })
        .collect())
}

/// Normalize a crypto response for one asset.
///
/// An empty response array or a first element without `priceData` yields
/// `Ok(empty)` — the symbol legitimately has no history.
pub fn normalize_crypto(
    series: &[CryptoSeries],
    asset: &str,
) -> Result<Vec<PriceRecord>, DataError> {
    let Some(bars) = series.first().and_then(|s| s.price_data.as_deref()) else {
        return Ok(Vec::new());
    };
    normalize(bars, asset)
}
