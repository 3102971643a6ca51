//! PriceRecord — the canonical row every source adapter must produce.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The canonical column set, in canonical order.
///
/// Every adapter output and every cache artifact exposes exactly these seven
/// columns. The cache validates file headers against this constant before
/// trusting an artifact.
pub const CANONICAL_COLUMNS: [&str; 7] =
    ["date", "open", "high", "low", "close", "volume", "asset"];

/// One normalized trading period for a single asset.
///
/// Field order matches `CANONICAL_COLUMNS`. Timezone policy is fixed per
/// source (adapters document theirs); all timestamps are naive UTC.
///
/// `open` may be NaN on the first row of sources that report a single price
/// per period — the previous close does not exist, and the gap is kept
/// rather than fabricated. `volume` is `0.0` when a source reports none,
/// never missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub asset: String,
}

impl PriceRecord {
    /// True when every price field is finite (the first-row NaN `open` of
    /// single-price sources makes a record non-complete, not invalid).
    pub fn is_complete(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }
}

/// Extract the close column.
pub fn closes(records: &[PriceRecord]) -> Vec<f64> {
    records.iter().map(|r| r.close).collect()
}

/// Extract the date column.
pub fn dates(records: &[PriceRecord]) -> Vec<NaiveDateTime> {
    records.iter().map(|r| r.date).collect()
}

/// True when records are in ascending date order (the canonical series order).
pub fn is_ascending(records: &[PriceRecord]) -> bool {
    records.windows(2).all(|w| w[0].date <= w[1].date)
}
