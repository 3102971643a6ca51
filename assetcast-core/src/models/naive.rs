//! Drift baseline: forecasts continue the series' mean per-period change.
//!
//! Useful as a sanity floor for the heavier models and as the second
//! registry variant exercising the shared contract. Carries no scaler.

use super::store::ModelStore;
use super::{infer_period, validate_training_series, Forecaster, ModelError};
use crate::domain::{record, Prediction, PriceRecord};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveState {
    pub closes: Vec<f64>,
    pub dates: Vec<NaiveDateTime>,
    pub drift: f64,
}

pub struct NaiveDriftModel {
    state: Option<NaiveState>,
    store: ModelStore,
}

impl NaiveDriftModel {
    pub const NAME: &'static str = "naive";

    pub fn new(store: ModelStore) -> Self {
        Self { state: None, store }
    }

    fn trained(&self) -> Result<&NaiveState, ModelError> {
        self.state.as_ref().ok_or(ModelError::Untrained)
    }
}

impl Forecaster for NaiveDriftModel {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn train(&mut self, series: &[PriceRecord]) -> Result<(), ModelError> {
        validate_training_series(series)?;
        if series.len() < 2 {
            return Err(ModelError::SeriesTooShort {
                need: 2,
                got: series.len(),
            });
        }

        let closes = record::closes(series);
        let n = closes.len();
        let drift = (closes[n - 1] - closes[0]) / (n - 1) as f64;

        self.state = Some(NaiveState {
            closes,
            dates: record::dates(series),
            drift,
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

        let last = *state.dates.last().expect("trained state is non-empty");
        let last_close = *state.closes.last().expect("trained state is non-empty");
        let period = infer_period(&state.dates);

        let predictions = targets
            .into_iter()
            .map(|date| {
                let prediction = if date > last {
                    let period_secs = period.num_seconds().max(1) as f64;
                    let gap_secs = (date - last).num_seconds() as f64;
                    let k = (gap_secs / period_secs).ceil().max(1.0);
                    last_close + k * state.drift
                } else {
                    // One-step prediction at an in-sample date: previous close
                    // plus drift. The first row has no previous close.
                    let idx = state.dates.partition_point(|d| *d < date);
                    let idx = idx.min(state.closes.len() - 1);
                    if idx == 0 {
                        f64::NAN
                    } else {
                        state.closes[idx - 1] + state.drift
                    }
                };
                Prediction { date, prediction }
            })
            .collect();
        Ok(predictions)
    }

    fn forecast(&self, steps: usize) -> Result<Vec<Prediction>, ModelError> {
        let state = self.trained()?;
        let last = *state.dates.last().expect("trained state is non-empty");
        let last_close = *state.closes.last().expect("trained state is non-empty");
        let period = infer_period(&state.dates);

        Ok((1..=steps)
            .map(|k| Prediction {
                date: last + period * k as i32,
                prediction: last_close + k as f64 * state.drift,
            })
            .collect())
    }

    fn save(&self) -> Result<(), ModelError> {
        self.store.save(Self::NAME, self.trained()?)
    }

    fn restore(&mut self) -> Result<(), ModelError> {
        self.state = Some(self.store.load(Self::NAME)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_store() -> (ModelStore, PathBuf) {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir =
            std::env::temp_dir().join(format!("assetcast_naive_{}_{id}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        (ModelStore::new(&dir), dir)
    }

    fn linear_series(n: usize) -> Vec<PriceRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| {
                let close = 100.0 + 2.0 * i as f64;
                PriceRecord {
                    date: start + chrono::Duration::days(i as i64),
                    open: close - 1.0,
                    high: close + 1.0,
                    low: close - 2.0,
                    close,
                    volume: 0.0,
                    asset: "test".into(),
                }
            })
            .collect()
    }

    #[test]
    fn forecast_extends_the_drift() {
        let (store, dir) = temp_store();
        let mut model = NaiveDriftModel::new(store);
        let series = linear_series(10);
        model.train(&series).unwrap();

        let forecast = model.forecast(3).unwrap();
        assert_eq!(forecast.len(), 3);
        // Last close 118, drift 2 per day.
        assert_eq!(forecast[0].prediction, 120.0);
        assert_eq!(forecast[2].prediction, 124.0);
        assert_eq!(
            forecast[0].date,
            series.last().unwrap().date + chrono::Duration::days(1)
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn inference_first_row_has_no_prediction() {
        let (store, dir) = temp_store();
        let mut model = NaiveDriftModel::new(store);
        let series = linear_series(10);
        model.train(&series).unwrap();

        let predictions = model
            .inference(&[series[0].date, series[5].date])
            .unwrap();
        assert!(predictions[0].prediction.is_nan());
        // Previous close 108 plus drift 2.
        assert_eq!(predictions[1].prediction, 110.0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn single_row_series_is_too_short() {
        let (store, dir) = temp_store();
        let mut model = NaiveDriftModel::new(store);
        assert!(matches!(
            model.train(&linear_series(1)),
            Err(ModelError::SeriesTooShort { need: 2, got: 1 })
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn restore_reproduces_forecasts() {
        let (store, dir) = temp_store();
        let mut model = NaiveDriftModel::new(store.clone());
        model.train(&linear_series(10)).unwrap();
        let expected = model.forecast(4).unwrap();

        let mut restored = NaiveDriftModel::new(store);
        restored.restore().unwrap();
        assert_eq!(restored.forecast(4).unwrap(), expected);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
