//! Prediction — the two-column output series every model produces.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One model prediction for one target date.
///
/// Prediction series are emitted in ascending date order, one row per
/// requested date or forecast step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub date: NaiveDateTime,
    pub prediction: f64,
}
