//! In-process stand-ins for the model runtime used by handler tests

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use transquest_core::inference::{
    ModelDescriptor, ModelLoader, SentenceQualityEstimator, WordQualityEstimator,
};
use transquest_core::model::ArchiveFetcher;
use transquest_core::{
    DirectionModels, EngineConfig, Error, LanguageDirection, ModelKind, ModelManager,
    ModelOutput, ModelRegistry, QualityLabel, QualityModel, QualityService, Result, SentencePair,
};

use crate::state::AppState;

/// Fixed scores and tags, optionally slow
pub struct StubModel {
    pub kind: ModelKind,
    pub delay: Duration,
}

impl QualityModel for StubModel {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn predict(&self, pairs: &[SentencePair]) -> Result<ModelOutput> {
        std::thread::sleep(self.delay);
        Ok(match self.kind {
            ModelKind::Sentence => ModelOutput::Scores {
                scores: vec![0.3333; pairs.len()],
                raw_outputs: serde_json::Value::Null,
            },
            ModelKind::Word => ModelOutput::Tags {
                source_tags: vec![vec![QualityLabel::Ok]; pairs.len()],
                target_tags: vec![
                    ["OK", "BAD", "OK", "OK", "OK"]
                        .iter()
                        .map(|t| QualityLabel::parse(t))
                        .collect();
                    pairs.len()
                ],
            },
        })
    }
}

struct NoFetch;

impl ArchiveFetcher for NoFetch {
    fn fetch_and_unpack(&self, _id: &str, _dest: &Path) -> Result<()> {
        Err(Error::DownloadError("offline".to_string()))
    }
}

struct NoLoad;

impl ModelLoader for NoLoad {
    fn load(&self, _descriptor: ModelDescriptor) -> Result<Arc<dyn QualityModel>> {
        Err(Error::ModelLoadError("not in tests".to_string()))
    }
}

fn stub(kind: ModelKind, delay: Duration) -> Arc<dyn QualityModel> {
    Arc::new(StubModel { kind, delay })
}

/// State with `en-de` served by stub models; every predict call sleeps `delay`
pub fn test_state(config: EngineConfig, delay: Duration) -> AppState {
    let config = EngineConfig {
        cache_dir: std::env::temp_dir().join("transquest-server-tests-missing"),
        ..config
    };
    let manager = Arc::new(ModelManager::new(config, Box::new(NoFetch), Arc::new(NoLoad)));

    let mut registry = ModelRegistry::default();
    registry.insert(
        LanguageDirection::EnDe,
        DirectionModels {
            word: WordQualityEstimator::new(stub(ModelKind::Word, delay)).unwrap(),
            hter: SentenceQualityEstimator::new(stub(ModelKind::Sentence, delay)).unwrap(),
            da: SentenceQualityEstimator::new(stub(ModelKind::Sentence, delay)).unwrap(),
        },
    );

    AppState::new(QualityService::new(manager, registry))
}
