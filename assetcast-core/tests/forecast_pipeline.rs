//! End-to-end pipeline: cached canonical data through the registry into
//! trained models, forecasts, and restored artifacts.

use assetcast_core::data::{CacheKey, CsvCache};
use assetcast_core::domain::{Frequency, PriceRecord};
use assetcast_core::models::{Forecaster, ModelRegistry, RegistryError, VALID_MODELS};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn temp_dir(tag: &str) -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "assetcast_pipeline_{tag}_{}_{id}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Daily closes with an autocorrelated drift, deterministic.
fn synthetic_series(symbol: &str, n: usize) -> Vec<PriceRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut diff = 0.0_f64;
    let mut close = 250.0_f64;
    (0..n)
        .map(|i| {
            let noise = ((i * 6151) % 1000) as f64 / 4000.0 - 0.125;
            diff = 0.5 * diff + noise;
            close += diff;
            PriceRecord {
                date: start + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 0.8,
                low: close - 0.9,
                close,
                volume: 5000.0,
                asset: symbol.to_string(),
            }
        })
        .collect()
}

#[test]
fn cached_series_trains_and_forecasts_every_model() {
    let cache_dir = temp_dir("cache");
    let models_dir = temp_dir("models");

    let series = synthetic_series("SPY", 150);
    let cache = CsvCache::new(&cache_dir);
    let key = CacheKey::new(
        "SPY",
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 5, 29).unwrap(),
        Frequency::Daily,
    );
    cache.put(&key, &series).unwrap();

    // Train from the cached copy, not the in-memory series.
    let loaded = cache.get(&key).unwrap().unwrap();
    assert_eq!(loaded.len(), series.len());

    let registry = ModelRegistry::new(42, &models_dir);
    let last_close = loaded.last().unwrap().close;
    let last_date = loaded.last().unwrap().date;

    for name in VALID_MODELS {
        let mut model = registry.create(name).unwrap();
        model.train(&loaded).unwrap();

        let forecast = model.forecast(7).unwrap();
        assert_eq!(forecast.len(), 7, "model {name}");
        for p in &forecast {
            assert!(p.prediction.is_finite(), "model {name}");
            assert!((p.prediction - last_close).abs() < 30.0, "model {name}");
            assert!(p.date > last_date, "model {name}");
        }
        // Forecast dates advance by the series' daily period.
        assert_eq!(forecast[0].date, last_date + chrono::Duration::days(1));
    }

    let _ = std::fs::remove_dir_all(&cache_dir);
    let _ = std::fs::remove_dir_all(&models_dir);
}

#[test]
fn training_persists_and_open_restores_identical_forecasts() {
    let models_dir = temp_dir("restore");
    let series = synthetic_series("BTC", 150);

    let registry = ModelRegistry::new(42, &models_dir);
    let mut model = registry.create("arima").unwrap();
    model.train(&series).unwrap();
    let expected = model.forecast(5).unwrap();
    assert!(registry.has_artifact("arima"));

    // A fresh registry over the same directory restores the same state.
    let reopened = ModelRegistry::new(99, &models_dir);
    let restored = reopened.open("arima").unwrap();
    assert_eq!(restored.forecast(5).unwrap(), expected);

    let _ = std::fs::remove_dir_all(&models_dir);
}

#[test]
fn inference_accepts_past_and_future_dates_together() {
    let models_dir = temp_dir("inference");
    let series = synthetic_series("EURUSD", 150);

    let registry = ModelRegistry::new(42, &models_dir);
    let mut model = registry.create("arima").unwrap();
    model.train(&series).unwrap();

    let past = series[100].date;
    let future = series.last().unwrap().date + chrono::Duration::days(3);
    let predictions = model.inference(&[future, past]).unwrap();

    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0].date, past);
    assert_eq!(predictions[1].date, future);
    assert!((predictions[0].prediction - series[100].close).abs() < 10.0);
    assert!(predictions[1].prediction.is_finite());

    let _ = std::fs::remove_dir_all(&models_dir);
}

#[test]
fn unknown_model_identifier_is_rejected_up_front() {
    let models_dir = temp_dir("unknown");
    let registry = ModelRegistry::new(42, &models_dir);
    match registry.create("lstm") {
        Err(RegistryError::UnknownModel { name, valid }) => {
            assert_eq!(name, "lstm");
            for known in VALID_MODELS {
                assert!(valid.contains(known));
            }
        }
        Ok(_) => panic!("expected UnknownModel"),
        Err(other) => panic!("expected UnknownModel, got {other}"),
    }
    let _ = std::fs::remove_dir_all(&models_dir);
}

#[test]
fn same_master_seed_reproduces_training_outcomes() {
    let dir_a = temp_dir("seed_a");
    let dir_b = temp_dir("seed_b");
    let series = synthetic_series("ETH", 150);

    let mut model_a = ModelRegistry::new(7, &dir_a).create("arima").unwrap();
    let mut model_b = ModelRegistry::new(7, &dir_b).create("arima").unwrap();
    model_a.train(&series).unwrap();
    model_b.train(&series).unwrap();

    assert_eq!(
        model_a.forecast(5).unwrap(),
        model_b.forecast(5).unwrap()
    );

    let _ = std::fs::remove_dir_all(&dir_a);
    let _ = std::fs::remove_dir_all(&dir_b);
}
