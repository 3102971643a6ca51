//! Fetcher facade — one entry point per upstream provider.
//!
//! Every method returns a canonical record set, possibly empty. "No data"
//! is never an error; transport failures (timeout, bad status, malformed
//! body) always are. Date-range requests go through the disk cache; the
//! full-history endpoints have no natural date-range key and bypass it.

use super::adapters::{alphavantage, coingecko, tiingo};
use super::cache::{CacheKey, CsvCache};
use super::config::ApiConfig;
use super::provider::{self, DataError};
use crate::domain::{Frequency, PriceRecord};
use chrono::NaiveDate;
use std::path::PathBuf;

/// The data fetcher facade.
///
/// Source adapters remain the single source of truth for price data; the
/// cache is pure memoization over them.
pub struct DataFetcher {
    client: reqwest::blocking::Client,
    cache: CsvCache,
    config: ApiConfig,
}

impl DataFetcher {
    pub fn new(config: ApiConfig, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: provider::build_client(),
            cache: CsvCache::new(cache_dir),
            config,
        }
    }

    pub fn cache(&self) -> &CsvCache {
        &self.cache
    }

    /// Full crypto price history from CoinGecko (e.g. `coin_id` "bitcoin").
    ///
    /// "Latest full history" has no date-range key, so this path bypasses
    /// the cache.
    pub fn fetch_crypto_history(&self, coin_id: &str) -> Result<Vec<PriceRecord>, DataError> {
        let payload =
            coingecko::fetch_market_chart(&self.client, &self.config.coingecko_base, coin_id)?;
        coingecko::normalize(&payload, coin_id)
    }

    /// Full daily exchange-rate history for a currency pair from Alpha
    /// Vantage. Bypasses the cache for the same reason as crypto history.
    pub fn fetch_fx_daily(
        &self,
        from_symbol: &str,
        to_symbol: &str,
    ) -> Result<Vec<PriceRecord>, DataError> {
        let payload = alphavantage::fetch_fx_daily(
            &self.client,
            &self.config.alphavantage_base,
            &self.config.alphavantage_key,
            from_symbol,
            to_symbol,
        )?;
        alphavantage::normalize(&payload, from_symbol)
    }

    /// Equity bars from Tiingo for a symbol and date range, cached.
    pub fn fetch_stock_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        frequency: Frequency,
    ) -> Result<Vec<PriceRecord>, DataError> {
        let key = CacheKey::new(symbol, start, end, frequency);
        if let Some(cached) = self.cache.get(&key)? {
            return Ok(cached);
        }

        let bars = tiingo::fetch_stock_bars(
            &self.client,
            &self.config.tiingo_base,
            &self.config.tiingo_key,
            symbol,
            start,
            end,
            frequency,
        )?;
        let records = tiingo::normalize(&bars, symbol)?;
        self.store(&key, &records)?;
        Ok(records)
    }

    /// Crypto bars from Tiingo for a symbol and date range, cached.
    pub fn fetch_crypto_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        frequency: Frequency,
    ) -> Result<Vec<PriceRecord>, DataError> {
        let key = CacheKey::new(symbol, start, end, frequency);
        if let Some(cached) = self.cache.get(&key)? {
            return Ok(cached);
        }

        let series = tiingo::fetch_crypto_bars(
            &self.client,
            &self.config.tiingo_base,
            &self.config.tiingo_key,
            symbol,
            start,
            end,
            frequency,
        )?;
        let records = tiingo::normalize_crypto(&series, symbol)?;
        self.store(&key, &records)?;
        Ok(records)
    }

    // Empty normalized results are returned but not cached: a header-only
    // artifact would make "no data" indistinguishable from "never fetched".
    fn store(&self, key: &CacheKey, records: &[PriceRecord]) -> Result<(), DataError> {
        if records.is_empty() {
            return Ok(());
        }
        self.cache.put(key, records)
    }
}
