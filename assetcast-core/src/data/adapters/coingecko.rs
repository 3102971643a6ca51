//! CoinGecko market-chart adapter.
//!
//! The market-chart endpoint reports one `[timestamp_ms, price]` pair per
//! period — a single price point, no intraday range, no volume. Derivation
//! rules for the missing columns:
//! - `close` is the reported price;
//! - `open` is the previous period's close, shifted down one row — the first
//!   row has no previous close and keeps `open` = NaN (a known gap, not a
//!   fabricated value);
//! - `high`/`low` fall back to `close` (documented simplification: no
//!   intraday range is available);
//! - `volume` is 0.
//!
//! Timestamps are UTC milliseconds since the epoch.

use super::super::provider::{check_status, classify_request_error, DataError};
use crate::domain::PriceRecord;
use serde::Deserialize;

pub const PROVIDER: &str = "coingecko";

/// Market-chart response. Only the `prices` series is consumed; the
/// market-cap and volume series this endpoint also carries are per-period
/// totals in quote currency, not trade volume, and are ignored.
#[derive(Debug, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Option<Vec<(i64, f64)>>,
}

/// Fetch the full market-chart history for a coin.
pub fn fetch_market_chart(
    client: &reqwest::blocking::Client,
    base_url: &str,
    coin_id: &str,
) -> Result<MarketChart, DataError> {
    let url = format!("{base_url}/coins/{coin_id}/market_chart?vs_currency=usd&days=max");
    let resp = client.get(&url).send().map_err(classify_request_error)?;
    let resp = check_status(PROVIDER, resp)?;
    resp.json().map_err(|e| DataError::MalformedResponse {
        provider: PROVIDER,
        detail: e.to_string(),
    })
}

/// Normalize a market-chart payload for one asset.
///
/// A payload without a usable `prices` key yields `Ok(empty)`.
pub fn normalize(payload: &MarketChart, asset: &str) -> Result<Vec<PriceRecord>, DataError> {
    let Some(prices) = payload.prices.as_deref().filter(|p| !p.is_empty()) else {
        return Ok(Vec::new());
    };

    let mut records = Vec::with_capacity(prices.len());
    let mut prev_close = f64::NAN;
    for &(ts_ms, close) in prices {
        let date = chrono::DateTime::from_timestamp_millis(ts_ms)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| DataError::MalformedResponse {
                provider: PROVIDER,
                detail: format!("timestamp out of range: {ts_ms}"),
            })?;
        records.push(PriceRecord {
            date,
            open: prev_close,
            high: close,
            low: close,
            close,
            volume: 0.0,
            asset: asset.to_string(),
        });
        prev_close = close;
    }
    Ok(records)
}
