//! Alpha Vantage FX daily adapter.
//!
//! The FX_DAILY endpoint reports full OHLC per civil date under the
//! `"Time Series FX (Daily)"` key, with numeric fields encoded as strings
//! (`"1. open"` … `"4. close"`). Forex has no volume; it is fixed at 0.
//! Dates carry no time component and are stored at midnight.
//!
//! The payload keys an unordered JSON object by date; rows are emitted
//! ascending by date, the canonical series order.

use super::super::provider::{check_status, classify_request_error, DataError};
use crate::domain::PriceRecord;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;

pub const PROVIDER: &str = "alphavantage";

#[derive(Debug, Deserialize)]
pub struct FxDailyResponse {
    #[serde(rename = "Time Series FX (Daily)", default)]
    pub time_series: Option<BTreeMap<NaiveDate, FxDailyBar>>,
}

#[derive(Debug, Deserialize)]
pub struct FxDailyBar {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
}

/// Fetch the daily exchange-rate history for a currency pair.
pub fn fetch_fx_daily(
    client: &reqwest::blocking::Client,
    base_url: &str,
    api_key: &str,
    from_symbol: &str,
    to_symbol: &str,
) -> Result<FxDailyResponse, DataError> {
    let url = format!(
        "{base_url}?function=FX_DAILY&from_symbol={from_symbol}&to_symbol={to_symbol}&apikey={api_key}"
    );
    let resp = client.get(&url).send().map_err(classify_request_error)?;
    let resp = check_status(PROVIDER, resp)?;
    resp.json().map_err(|e| DataError::MalformedResponse {
        provider: PROVIDER,
        detail: e.to_string(),
    })
}

/// Normalize an FX daily payload for one asset.
///
/// A payload without the time-series key (rate-limit notices, error notes)
/// yields `Ok(empty)`. A price field that fails to parse as a number is a
/// malformed payload, not missing data.
pub fn normalize(payload: &FxDailyResponse, asset: &str) -> Result<Vec<PriceRecord>, DataError> {
    let Some(series) = payload.time_series.as_ref().filter(|s| !s.is_empty()) else {
        return Ok(Vec::new());
    };

    let mut records = Vec::with_capacity(series.len());
    for (date, bar) in series {
        records.push(PriceRecord {
            date: date.and_hms_opt(0, 0, 0).unwrap(),
            open: parse_price(&bar.open, "open")?,
            high: parse_price(&bar.high, "high")?,
            low: parse_price(&bar.low, "low")?,
            close: parse_price(&bar.close, "close")?,
            volume: 0.0,
            asset: asset.to_string(),
        });
    }
    Ok(records)
}

fn parse_price(raw: &str, field: &str) -> Result<f64, DataError> {
    raw.parse().map_err(|_| DataError::MalformedResponse {
        provider: PROVIDER,
        detail: format!("non-numeric {field} value: '{raw}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::is_ascending;

    fn payload(json: serde_json::Value) -> FxDailyResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn fx_days_normalize_ascending_with_zero_volume() {
        // Alpha Vantage reports newest-first; the object carries no order.
        let resp = payload(serde_json::json!({
            "Time Series FX (Daily)": {
                "2024-01-03": {"1. open": "1.10", "2. high": "1.12", "3. low": "1.09", "4. close": "1.11"},
                "2024-01-02": {"1. open": "1.08", "2. high": "1.11", "3. low": "1.07", "4. close": "1.10"}
            }
        }));

        let records = normalize(&resp, "USD").unwrap();

        assert_eq!(records.len(), 2);
        assert!(is_ascending(&records));
        assert_eq!(records[0].date.date().to_string(), "2024-01-02");
        assert_eq!(records[0].open, 1.08);
        assert_eq!(records[1].close, 1.11);
        assert!(records.iter().all(|r| r.volume == 0.0 && r.asset == "USD"));
    }

    #[test]
    fn missing_time_series_key_is_empty_not_error() {
        // The shape of a rate-limit notice.
        let resp = payload(serde_json::json!({
            "Note": "Thank you for using Alpha Vantage!"
        }));
        assert!(normalize(&resp, "USD").unwrap().is_empty());
    }

    #[test]
    fn non_numeric_price_is_malformed() {
        let resp = payload(serde_json::json!({
            "Time Series FX (Daily)": {
                "2024-01-02": {"1. open": "oops", "2. high": "1.1", "3. low": "1.0", "4. close": "1.05"}
            }
        }));
        let err = normalize(&resp, "USD").unwrap_err();
        assert!(matches!(err, DataError::MalformedResponse { .. }));
        assert!(err.to_string().contains("open"));
    }
}
