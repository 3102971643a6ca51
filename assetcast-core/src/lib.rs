//! Assetcast Core — canonical price schema, source adapters, disk cache, model registry.
//!
//! This crate contains the data and model plumbing:
//! - Canonical price records (one OHLCV row shape for every upstream source)
//! - Source adapters (CoinGecko market charts, Alpha Vantage FX, Tiingo bars)
//! - Append-only CSV disk cache keyed by (symbol, start, end, frequency)
//! - Fetcher facade that applies the cache transparently
//! - Polymorphic forecasting contract (train / inference / forecast / persist)
//! - Closed-set model registry with deterministic seeding

pub mod data;
pub mod domain;
pub mod models;
pub mod rng;
