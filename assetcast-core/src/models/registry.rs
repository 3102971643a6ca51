//! Closed-set model registry.
//!
//! Construction dispatches over a fixed identifier set — there is no
//! runtime plugin discovery, and an unknown identifier is an error that
//! names the valid set. Every constructed model gets a deterministic RNG
//! derived from the registry's master seed and the model identifier, so
//! pre-training state is reproducible across runs and unaffected by how
//! many models were built before it.

use super::arima::{ArimaConfig, ArimaModel};
use super::naive::NaiveDriftModel;
use super::store::ModelStore;
use super::{Forecaster, ModelError};
use crate::rng::SeedHierarchy;
use std::path::PathBuf;
use thiserror::Error;

/// Identifiers the registry can construct.
pub const VALID_MODELS: &[&str] = &[ArimaModel::NAME, NaiveDriftModel::NAME];

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("model not found: '{name}' (valid models: {valid})")]
    UnknownModel { name: String, valid: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub struct ModelRegistry {
    seeds: SeedHierarchy,
    store: ModelStore,
}

impl ModelRegistry {
    pub fn new(master_seed: u64, models_dir: impl Into<PathBuf>) -> Self {
        Self {
            seeds: SeedHierarchy::new(master_seed),
            store: ModelStore::new(models_dir),
        }
    }

    pub fn master_seed(&self) -> u64 {
        self.seeds.master_seed()
    }

    /// Construct a fresh (untrained) model for the identifier.
    pub fn create(&self, identifier: &str) -> Result<Box<dyn Forecaster>, RegistryError> {
        match identifier {
            ArimaModel::NAME => Ok(Box::new(ArimaModel::new(
                ArimaConfig::default(),
                self.seeds.rng_for(ArimaModel::NAME),
                self.store.clone(),
            ))),
            NaiveDriftModel::NAME => Ok(Box::new(NaiveDriftModel::new(self.store.clone()))),
            other => Err(RegistryError::UnknownModel {
                name: other.to_string(),
                valid: VALID_MODELS.join(", "),
            }),
        }
    }

    /// Construct a model and restore its persisted state.
    pub fn open(&self, identifier: &str) -> Result<Box<dyn Forecaster>, RegistryError> {
        let mut model = self.create(identifier)?;
        model.restore()?;
        Ok(model)
    }

    /// True when a persisted artifact exists for the identifier.
    pub fn has_artifact(&self, identifier: &str) -> bool {
        self.store.exists(identifier)
    }
}
