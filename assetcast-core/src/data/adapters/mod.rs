//! Per-provider source adapters.
//!
//! Each adapter pairs a `fetch_*` function (the bounded-timeout network call,
//! with non-success statuses raised as `DataError::HttpStatus`) with a pure
//! `normalize` transform from the provider payload to canonical records.
//!
//! Shared contract:
//! - a missing top-level data key is *not* fatal — it yields `Ok(empty)`,
//!   so callers can tell "no history" apart from "request failed";
//! - output row order follows the input's time order (sources keyed by an
//!   unordered JSON object are emitted ascending by date);
//! - `volume` defaults to `0.0` where the source reports none.

pub mod alphavantage;
pub mod coingecko;
pub mod tiingo;
