//! Scalers — forward/inverse transforms paired with a model's raw algorithm.
//!
//! A closed set of variants rather than an open trait: scaler state has to
//! be persisted alongside model state, and a tagged enum round-trips through
//! serde without any machinery.
//!
//! The scaler operates on the single close column, so the fitted "shape" is
//! a scalar pair and a shape mismatch between fit and transform cannot be
//! expressed. The remaining misuse is applying an unfitted scaler, which is
//! `ModelError::ScalerUnfitted`.

use super::ModelError;
use serde::{Deserialize, Serialize};

/// Closed scaler set.
///
/// `MinMax` maps the fitted value range onto [0, 1]. `Constant` multiplies
/// by a fixed factor — a synthetic scaler for diagnostics and tests, where a
/// known factor makes the forward/inverse pairing observable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    MinMax {
        #[serde(default)]
        state: Option<MinMaxState>,
    },
    Constant {
        factor: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxState {
    pub min: f64,
    pub max: f64,
}

impl Scaler {
    pub fn min_max() -> Self {
        Scaler::MinMax { state: None }
    }

    pub fn constant(factor: f64) -> Self {
        Scaler::Constant { factor }
    }

    /// Fit scaling parameters from the training values. Non-finite values
    /// are ignored (the first-row NaN open never reaches here, but closes
    /// are validated upstream anyway).
    pub fn fit(&mut self, values: &[f64]) -> Result<(), ModelError> {
        match self {
            Scaler::MinMax { state } => {
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                for &v in values.iter().filter(|v| v.is_finite()) {
                    min = min.min(v);
                    max = max.max(v);
                }
                if !min.is_finite() || !max.is_finite() {
                    return Err(ModelError::FitFailed(
                        "no finite values to fit scaler on".into(),
                    ));
                }
                *state = Some(MinMaxState { min, max });
                Ok(())
            }
            Scaler::Constant { .. } => Ok(()),
        }
    }

    /// Forward transform into model units.
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, ModelError> {
        match self {
            Scaler::MinMax { state } => {
                let s = state.ok_or(ModelError::ScalerUnfitted)?;
                let range = effective_range(s);
                Ok(values.iter().map(|v| (v - s.min) / range).collect())
            }
            Scaler::Constant { factor } => Ok(values.iter().map(|v| v * factor).collect()),
        }
    }

    /// Inverse transform back into original units.
    pub fn inverse_transform(&self, values: &[f64]) -> Result<Vec<f64>, ModelError> {
        match self {
            Scaler::MinMax { state } => {
                let s = state.ok_or(ModelError::ScalerUnfitted)?;
                let range = effective_range(s);
                Ok(values.iter().map(|v| v * range + s.min).collect())
            }
            Scaler::Constant { factor } => Ok(values.iter().map(|v| v / factor).collect()),
        }
    }
}

// Degenerate ranges (constant series) divide by 1 instead of 0.
fn effective_range(s: MinMaxState) -> f64 {
    let range = s.max - s.min;
    if range.abs() < 1e-10 {
        1.0
    } else {
        range
    }
}
