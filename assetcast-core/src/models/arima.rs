//! AR(p) reference model over a d-times differenced, scaled close series.
//!
//! The public identifier stays "arima"; moving-average terms are model
//! internals the system does not commit to. Fitting is ordinary least
//! squares on the lagged differenced series, forecasting is the AR
//! recursion followed by re-integration and the scaler's inverse transform.

use super::scaler::Scaler;
use super::store::ModelStore;
use super::{infer_period, validate_training_series, Forecaster, ModelError};
use crate::domain::{record, Prediction, PriceRecord};
use chrono::NaiveDateTime;
use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaConfig {
    /// Autoregressive order. Must be at least 1.
    pub p: usize,
    /// Differencing order.
    pub d: usize,
}

impl Default for ArimaConfig {
    fn default() -> Self {
        Self { p: 2, d: 1 }
    }
}

impl ArimaConfig {
    /// Rows required before a fit is attempted.
    fn min_rows(&self) -> usize {
        self.p + self.d + 10
    }
}

/// Fitted state, persisted as the model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArimaState {
    pub config: ArimaConfig,
    pub ar_coeffs: Vec<f64>,
    pub constant: f64,
    pub scaler: Scaler,
    pub scaled_closes: Vec<f64>,
    pub dates: Vec<NaiveDateTime>,
}

pub struct ArimaModel {
    config: ArimaConfig,
    /// Seeded random starting coefficients, drawn at construction. Fitting
    /// replaces them; they are the reproducible pre-training state.
    initial_coeffs: Vec<f64>,
    scaler: Scaler,
    state: Option<ArimaState>,
    store: ModelStore,
}

impl ArimaModel {
    pub const NAME: &'static str = "arima";

    pub fn new(config: ArimaConfig, mut rng: StdRng, store: ModelStore) -> Self {
        let initial_coeffs = (0..config.p).map(|_| rng.gen_range(-0.1..0.1)).collect();
        Self {
            config,
            initial_coeffs,
            scaler: Scaler::min_max(),
            state: None,
            store,
        }
    }

    /// Replace the default min-max scaler. Only meaningful before training.
    pub fn with_scaler(mut self, scaler: Scaler) -> Self {
        self.scaler = scaler;
        self
    }

    /// Pre-training coefficient initialization (seeded, reproducible).
    pub fn initial_coefficients(&self) -> &[f64] {
        &self.initial_coeffs
    }

    pub fn fitted_state(&self) -> Option<&ArimaState> {
        self.state.as_ref()
    }

    fn trained(&self) -> Result<&ArimaState, ModelError> {
        self.state.as_ref().ok_or(ModelError::Untrained)
    }
}

impl Forecaster for ArimaModel {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn train(&mut self, series: &[PriceRecord]) -> Result<(), ModelError> {
        validate_training_series(series)?;
        let need = self.config.min_rows();
        if series.len() < need {
            return Err(ModelError::SeriesTooShort {
                need,
                got: series.len(),
            });
        }

        let closes = record::closes(series);
        self.scaler.fit(&closes)?;
        let scaled = self.scaler.transform(&closes)?;

        let diffed = difference(&scaled, self.config.d);
        let (ar_coeffs, constant) = fit_ar(&diffed, self.config.p)?;

        self.state = Some(ArimaState {
            config: self.config,
            ar_coeffs,
            constant,
            scaler: self.scaler.clone(),
            scaled_closes: scaled,
            dates: record::dates(series),
        });
        self.save()
    }

    fn inference(&self, dates: &[NaiveDateTime]) -> Result<Vec<Prediction>, ModelError> {
        let state = self.trained()?;
        if dates.is_empty() {
            return Ok(Vec::new());
        }

        let mut targets = dates.to_vec();
        targets.sort();

        let in_sample = state.scaler.inverse_transform(&in_sample_predictions(state))?;
        let last = *state.dates.last().expect("fitted state is non-empty");
        let period = infer_period(&state.dates);

        let horizon = targets
            .iter()
            .filter(|d| **d > last)
            .map(|d| steps_after(last, *d, period))
            .max()
            .unwrap_or(0);
        let future = if horizon > 0 {
            state
                .scaler
                .inverse_transform(&forecast_scaled(state, horizon))?
        } else {
            Vec::new()
        };

        let predictions = targets
            .into_iter()
            .map(|date| {
                let prediction = if date > last {
                    future[steps_after(last, date, period) - 1]
                } else {
                    // First trained period at or after the target date.
                    let idx = state.dates.partition_point(|d| *d < date);
                    in_sample[idx.min(in_sample.len() - 1)]
                };
                Prediction { date, prediction }
            })
            .collect();
        Ok(predictions)
    }

    fn forecast(&self, steps: usize) -> Result<Vec<Prediction>, ModelError> {
        let state = self.trained()?;
        if steps == 0 {
            return Ok(Vec::new());
        }

        let values = state
            .scaler
            .inverse_transform(&forecast_scaled(state, steps))?;
        let last = *state.dates.last().expect("fitted state is non-empty");
        let period = infer_period(&state.dates);

        Ok(values
            .into_iter()
            .enumerate()
            .map(|(k, prediction)| Prediction {
                date: last + period * (k as i32 + 1),
                prediction,
            })
            .collect())
    }

    fn save(&self) -> Result<(), ModelError> {
        self.store.save(Self::NAME, self.trained()?)
    }

    fn restore(&mut self) -> Result<(), ModelError> {
        let state: ArimaState = self.store.load(Self::NAME)?;
        self.config = state.config;
        self.scaler = state.scaler.clone();
        self.state = Some(state);
        Ok(())
    }
}

/// Difference a series `d` times.
fn difference(data: &[f64], d: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..d {
        if result.len() < 2 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Last value of each differencing level 0..d — the anchors the forecast
/// re-integrates against.
fn level_anchors(data: &[f64], d: usize) -> Vec<f64> {
    let mut anchors = Vec::with_capacity(d);
    let mut level = data.to_vec();
    for _ in 0..d {
        anchors.push(*level.last().expect("levels stay non-empty"));
        level = level.windows(2).map(|w| w[1] - w[0]).collect();
    }
    anchors
}

/// OLS fit of an AR(p) with intercept: β = (X'X)⁻¹ X'y over lagged rows.
fn fit_ar(data: &[f64], p: usize) -> Result<(Vec<f64>, f64), ModelError> {
    if p == 0 {
        return Err(ModelError::FitFailed("AR order must be at least 1".into()));
    }
    let n = data.len();
    if n < p + 2 {
        return Err(ModelError::SeriesTooShort { need: p + 2, got: n });
    }

    let rows = n - p;
    let mut x_data = Vec::with_capacity(rows * (p + 1));
    for t in p..n {
        x_data.push(1.0);
        for i in 1..=p {
            x_data.push(data[t - i]);
        }
    }
    let x = DMatrix::from_row_slice(rows, p + 1, &x_data);
    let y = DVector::from_iterator(rows, data[p..].iter().copied());

    let xtx = x.transpose() * &x;
    let xty = x.transpose() * &y;
    let beta = xtx
        .try_inverse()
        .map(|inv| inv * xty)
        .ok_or_else(|| ModelError::FitFailed("normal equations are singular".into()))?;

    let constant = beta[0];
    let ar_coeffs = beta.iter().skip(1).copied().collect();
    Ok((ar_coeffs, constant))
}

/// Forecast `steps` values in scaled units via the AR recursion plus
/// re-integration through the differencing levels.
fn forecast_scaled(state: &ArimaState, steps: usize) -> Vec<f64> {
    let d = state.config.d;
    let mut extended = difference(&state.scaled_closes, d);

    let mut diff_forecasts = Vec::with_capacity(steps);
    for _ in 0..steps {
        let mut next = state.constant;
        for (i, phi) in state.ar_coeffs.iter().enumerate() {
            if extended.len() > i {
                next += phi * extended[extended.len() - 1 - i];
            }
        }
        extended.push(next);
        diff_forecasts.push(next);
    }

    // Integrate back up: each level's forecast is a running sum anchored at
    // that level's last observed value.
    let anchors = level_anchors(&state.scaled_closes, d);
    let mut values = diff_forecasts;
    for &anchor in anchors.iter().rev() {
        let mut running = anchor;
        for v in values.iter_mut() {
            running += *v;
            *v = running;
        }
    }
    values
}

/// One-step-ahead in-sample predictions in scaled units, aligned with the
/// trained series. Warmup rows (the first p + d) have no defined prediction
/// and carry NaN.
fn in_sample_predictions(state: &ArimaState) -> Vec<f64> {
    let d = state.config.d;
    let p = state.ar_coeffs.len();
    let n = state.scaled_closes.len();

    // levels[j][k] is the j-times differenced value at original index k + j.
    let mut levels: Vec<Vec<f64>> = Vec::with_capacity(d + 1);
    levels.push(state.scaled_closes.clone());
    for j in 1..=d {
        let prev = &levels[j - 1];
        levels.push(prev.windows(2).map(|w| w[1] - w[0]).collect());
    }

    (0..n)
        .map(|t| {
            if t < p + d {
                return f64::NAN;
            }
            // Predicted value at the deepest level, from actual lags.
            let td = t - d;
            let mut pred = state.constant;
            for (i, phi) in state.ar_coeffs.iter().enumerate() {
                pred += phi * levels[d][td - 1 - i];
            }
            // Reconstruct upward using actual previous-level values.
            for j in (0..d).rev() {
                pred += levels[j][t - j - 1];
            }
            pred
        })
        .collect()
}

/// Whole periods from `last` to `date`, rounded up, at least 1.
fn steps_after(last: NaiveDateTime, date: NaiveDateTime, period: chrono::Duration) -> usize {
    let period_secs = period.num_seconds().max(1) as f64;
    let gap_secs = (date - last).num_seconds() as f64;
    (gap_secs / period_secs).ceil().max(1.0) as usize
}
