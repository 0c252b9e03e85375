//! Per-direction model handles, built once at startup.

use std::collections::BTreeMap;
use tracing::info;

use crate::catalog::LanguageDirection;
use crate::error::{Error, Result};
use crate::inference::{SentenceQualityEstimator, WordQualityEstimator};
use crate::model::{ModelKind, ModelManager};

/// The three estimators queried for one direction
#[derive(Clone)]
pub struct DirectionModels {
    pub word: WordQualityEstimator,
    pub hter: SentenceQualityEstimator,
    pub da: SentenceQualityEstimator,
}

impl DirectionModels {
    /// Resolve and load the configured triple for `direction`
    pub fn load(manager: &ModelManager, direction: LanguageDirection) -> Result<Self> {
        let refs = manager.config().models_for(direction);
        info!(
            "Loading models for {}: word={}, hter={}, da={}",
            direction, refs.word.name, refs.hter.name, refs.da.name
        );

        Ok(Self {
            word: WordQualityEstimator::new(manager.load_model(&refs.word, ModelKind::Word)?)?,
            hter: SentenceQualityEstimator::new(
                manager.load_model(&refs.hter, ModelKind::Sentence)?,
            )?,
            da: SentenceQualityEstimator::new(manager.load_model(&refs.da, ModelKind::Sentence)?)?,
        })
    }
}

/// Read-only lookup from direction to loaded models
#[derive(Clone, Default)]
pub struct ModelRegistry {
    directions: BTreeMap<LanguageDirection, DirectionModels>,
}

impl ModelRegistry {
    /// Load every direction enabled in the manager's configuration.
    /// Any failure aborts construction.
    pub fn load(manager: &ModelManager) -> Result<Self> {
        let mut registry = Self::default();
        for direction in &manager.config().directions {
            if registry.directions.contains_key(direction) {
                continue;
            }
            let models = DirectionModels::load(manager, *direction)?;
            registry.insert(*direction, models);
        }
        info!(
            "Model registry ready for: {}",
            registry
                .loaded_directions()
                .iter()
                .map(LanguageDirection::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(registry)
    }

    pub fn insert(&mut self, direction: LanguageDirection, models: DirectionModels) {
        self.directions.insert(direction, models);
    }

    /// Models for `direction`, or `UnsupportedDirection` when it was not loaded
    pub fn get(&self, direction: LanguageDirection) -> Result<&DirectionModels> {
        self.directions
            .get(&direction)
            .ok_or_else(|| Error::UnsupportedDirection(format!("{} is not loaded", direction)))
    }

    pub fn is_loaded(&self, direction: LanguageDirection) -> bool {
        self.directions.contains_key(&direction)
    }

    pub fn loaded_directions(&self) -> Vec<LanguageDirection> {
        self.directions.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DirectionModelRefs, ModelRef};
    use crate::config::EngineConfig;
    use crate::model::download::testing::CountingFetcher;
    use crate::model::manager::testing::FakeLoader;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn manager_with(config: EngineConfig, loader: Arc<FakeLoader>) -> ModelManager {
        ModelManager::new(config, Box::new(CountingFetcher::default()), loader)
    }

    #[test]
    fn loads_only_enabled_directions() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            cache_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let loader = Arc::new(FakeLoader::default());
        let registry = ModelRegistry::load(&manager_with(config, loader.clone())).unwrap();

        assert_eq!(registry.loaded_directions(), vec![LanguageDirection::EnDe]);
        assert_eq!(loader.loads.load(Ordering::SeqCst), 3);
        assert!(registry.get(LanguageDirection::EnDe).is_ok());
    }

    #[test]
    fn unloaded_direction_is_unsupported() {
        let registry = ModelRegistry::default();
        let err = registry.get(LanguageDirection::EnZh).err().unwrap();
        assert!(matches!(err, Error::UnsupportedDirection(_)));
    }

    #[test]
    fn shared_checkpoints_load_once_across_directions() {
        let dir = tempfile::tempdir().unwrap();
        let zh_models = DirectionModelRefs {
            word: ModelRef::named("en_zh"),
            hter: ModelRef {
                name: "/models/en_zh_hter".to_string(),
                model_type: Some("xlmroberta".to_string()),
            },
            da: ModelRef {
                name: "/models/en_zh_da".to_string(),
                model_type: Some("xlmroberta".to_string()),
            },
        };
        let mut config = EngineConfig {
            cache_dir: dir.path().to_path_buf(),
            directions: vec![LanguageDirection::EnZh, LanguageDirection::Multilingual],
            ..Default::default()
        };
        config.models.insert("en-zh".to_string(), zh_models.clone());
        config.models.insert("multilingual".to_string(), zh_models);

        let loader = Arc::new(FakeLoader::default());
        let registry = ModelRegistry::load(&manager_with(config, loader.clone())).unwrap();

        assert!(registry.is_loaded(LanguageDirection::Multilingual));
        assert_eq!(loader.loads.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn missing_model_type_aborts_loading() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            cache_dir: dir.path().to_path_buf(),
            directions: vec![LanguageDirection::EnZh],
            ..Default::default()
        };
        let result = ModelRegistry::load(&manager_with(config, Arc::new(FakeLoader::default())));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }
}
