//! Persistent model state: one JSON artifact per model under the models dir.
//!
//! Layout: `{models_dir}/{model_name}/model.json`
//!
//! State is written atomically (write to .tmp, rename into place) and
//! wrapped in an envelope tagged with the owning model identifier. Restore
//! rejects state belonging to a different variant — a structurally
//! inconsistent artifact is an error, never silently accepted.

use super::ModelError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    model: String,
    state: T,
}

/// Key→artifact store for fitted model state.
#[derive(Debug, Clone)]
pub struct ModelStore {
    models_dir: PathBuf,
}

impl ModelStore {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    fn artifact_path(&self, model_name: &str) -> PathBuf {
        self.models_dir.join(model_name).join("model.json")
    }

    /// True when a persisted artifact exists for the model.
    pub fn exists(&self, model_name: &str) -> bool {
        self.artifact_path(model_name).exists()
    }

    /// Persist state for a model, atomically.
    pub fn save<T: Serialize>(&self, model_name: &str, state: &T) -> Result<(), ModelError> {
        let path = self.artifact_path(model_name);
        let dir = path.parent().expect("artifact path has a parent");
        fs::create_dir_all(dir).map_err(|e| ModelError::Persist(format!("create dir: {e}")))?;

        let envelope = Envelope {
            model: model_name.to_string(),
            state,
        };
        let json = serde_json::to_string_pretty(&envelope)
            .map_err(|e| ModelError::Persist(format!("serialize state: {e}")))?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .map_err(|e| ModelError::Persist(format!("write {}: {e}", tmp_path.display())))?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            ModelError::Persist(format!("atomic rename failed: {e}"))
        })?;
        Ok(())
    }

    /// Restore state for a model, checking the envelope tag.
    pub fn load<T: DeserializeOwned>(&self, model_name: &str) -> Result<T, ModelError> {
        let path = self.artifact_path(model_name);
        let content = fs::read_to_string(&path)
            .map_err(|e| ModelError::Restore(format!("read {}: {e}", path.display())))?;
        let envelope: Envelope<T> = serde_json::from_str(&content)
            .map_err(|e| ModelError::Restore(format!("parse {}: {e}", path.display())))?;
        if envelope.model != model_name {
            return Err(ModelError::ModelClassMismatch {
                expected: model_name.to_string(),
                found: envelope.model,
            });
        }
        Ok(envelope.state)
    }
}
