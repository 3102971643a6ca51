//! Data ingestion: source adapters, disk cache, fetcher facade.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod provider;

pub use cache::{CacheEntryStatus, CacheKey, CsvCache};
pub use config::{ApiConfig, ConfigError};
pub use fetch::DataFetcher;
pub use provider::{DataError, REQUEST_TIMEOUT};
