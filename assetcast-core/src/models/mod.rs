//! Forecasting models: the polymorphic contract, persistence, and registry.

pub mod arima;
pub mod naive;
pub mod registry;
pub mod scaler;
pub mod store;

pub use arima::{ArimaConfig, ArimaModel};
pub use naive::NaiveDriftModel;
pub use registry::{ModelRegistry, RegistryError, VALID_MODELS};
pub use scaler::Scaler;
pub use store::ModelStore;

use crate::domain::{Prediction, PriceRecord};
use chrono::{Duration, NaiveDateTime};
use thiserror::Error;

/// Errors raised by model operations.
///
/// The canonical record type makes the `date` and `close` columns
/// structurally present, so the schema-violation class reduces to the cases
/// a type cannot rule out: empty input, non-finite values, too little
/// history, and calls against untrained or unfitted state.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("training series is empty")]
    EmptySeries,

    #[error("training series has a non-finite close at row {row}")]
    NonFiniteClose { row: usize },

    #[error("training series too short: got {got} rows, need at least {need}")]
    SeriesTooShort { need: usize, got: usize },

    #[error("model has not been trained")]
    Untrained,

    #[error("scaler has not been fitted")]
    ScalerUnfitted,

    #[error("model fit failed: {0}")]
    FitFailed(String),

    #[error("failed to persist model state: {0}")]
    Persist(String),

    #[error("failed to restore model state: {0}")]
    Restore(String),

    #[error("stored state belongs to model '{found}', expected '{expected}'")]
    ModelClassMismatch { expected: String, found: String },
}

/// The polymorphic contract every forecasting variant implements.
///
/// All operations consume the canonical record schema — no variant may
/// require a different column shape. When a variant carries a scaler,
/// `train` fits it jointly with the model, and `inference`/`forecast` apply
/// the forward transform on input and the inverse transform on output; both
/// halves are mandatory.
pub trait Forecaster {
    /// The registry identifier of this variant (e.g. "arima").
    fn name(&self) -> &'static str;

    /// Fit internal state from a canonical series and persist it.
    fn train(&mut self, series: &[PriceRecord]) -> Result<(), ModelError>;

    /// One prediction per requested date, ascending. Target dates need not
    /// be future dates. Dates inside the model's warmup window have no
    /// defined one-step prediction and yield NaN — a kept gap, like the
    /// first `open` of single-price sources.
    fn inference(&self, dates: &[NaiveDateTime]) -> Result<Vec<Prediction>, ModelError>;

    /// `steps` sequential predictions beyond the end of the trained series,
    /// dated by the series' inferred period.
    fn forecast(&self, steps: usize) -> Result<Vec<Prediction>, ModelError>;

    /// Persist fitted state. Called by `train`; also callable directly.
    fn save(&self) -> Result<(), ModelError>;

    /// Restore previously persisted state.
    fn restore(&mut self) -> Result<(), ModelError>;
}

/// Shared training-input validation: non-empty, finite closes.
pub(crate) fn validate_training_series(series: &[PriceRecord]) -> Result<(), ModelError> {
    if series.is_empty() {
        return Err(ModelError::EmptySeries);
    }
    for (row, record) in series.iter().enumerate() {
        if !record.close.is_finite() {
            return Err(ModelError::NonFiniteClose { row });
        }
    }
    Ok(())
}

/// Infer the period of a trained series as the median gap between
/// consecutive timestamps. Falls back to one day when the series is too
/// short to carry a gap.
pub(crate) fn infer_period(dates: &[NaiveDateTime]) -> Duration {
    if dates.len() < 2 {
        return Duration::days(1);
    }
    let mut gaps: Vec<Duration> = dates.windows(2).map(|w| w[1] - w[0]).collect();
    gaps.sort();
    gaps[gaps.len() / 2]
}
