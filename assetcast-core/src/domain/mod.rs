//! Domain types: canonical price records, resample frequencies, predictions.

pub mod frequency;
pub mod prediction;
pub mod record;

pub use frequency::{Frequency, FrequencyParseError};
pub use prediction::Prediction;
pub use record::{PriceRecord, CANONICAL_COLUMNS};
