//! Request-level quality estimation over the model registry

use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::alignment::PredictedToken;
use crate::catalog::LanguageDirection;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::inference::{PythonBridge, PythonModelLoader};
use crate::model::{GoogleDriveFetcher, ModelInfo, ModelManager};
use crate::registry::ModelRegistry;
use crate::render::{colorize, format_score, round_score, ColoredToken};

/// Everything shown for one source/target pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub direction: LanguageDirection,
    /// Post-editing effort estimate
    pub hter: f64,
    /// Direct assessment estimate
    pub da: f64,
    pub source_tokens: Vec<PredictedToken>,
    pub target_tokens: Vec<PredictedToken>,
}

impl QualityReport {
    pub fn hter_display(&self) -> String {
        format_score(self.hter)
    }

    pub fn da_display(&self) -> String {
        format_score(self.da)
    }

    /// JSON-friendly view with rounded scores and token colors
    pub fn to_view(&self) -> QualityReportView {
        QualityReportView {
            direction: self.direction,
            hter: round_score(self.hter),
            da: round_score(self.da),
            hter_display: self.hter_display(),
            da_display: self.da_display(),
            source_tokens: colorize(&self.source_tokens),
            target_tokens: colorize(&self.target_tokens),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityReportView {
    pub direction: LanguageDirection,
    pub hter: f64,
    pub da: f64,
    pub hter_display: String,
    pub da_display: String,
    pub source_tokens: Vec<ColoredToken>,
    pub target_tokens: Vec<ColoredToken>,
}

/// Loaded models plus the manager that resolved them
pub struct QualityService {
    manager: Arc<ModelManager>,
    registry: Arc<ModelRegistry>,
    bridge: Option<Arc<PythonBridge>>,
}

impl QualityService {
    pub fn new(manager: Arc<ModelManager>, registry: ModelRegistry) -> Self {
        Self {
            manager,
            registry: Arc::new(registry),
            bridge: None,
        }
    }

    /// Wire up the Python runtime and the given archive fetcher, then load
    /// every enabled direction. Blocks until all models are loaded.
    pub fn from_config(config: EngineConfig, fetcher: GoogleDriveFetcher) -> Result<Self> {
        let bridge = Arc::new(PythonBridge::new(&config));
        let loader = Arc::new(PythonModelLoader::new(bridge.clone()));
        let manager = Arc::new(ModelManager::new(config, Box::new(fetcher), loader));

        let registry = match ModelRegistry::load(&manager) {
            Ok(registry) => registry,
            Err(e) => {
                bridge.shutdown();
                return Err(e);
            }
        };

        Ok(Self {
            bridge: Some(bridge),
            ..Self::new(manager, registry)
        })
    }

    /// Stop the inference daemon started by `from_config`, if any
    pub fn shutdown(&self) {
        if let Some(bridge) = &self.bridge {
            bridge.shutdown();
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn manager(&self) -> &Arc<ModelManager> {
        &self.manager
    }

    pub fn list_models(&self) -> Vec<ModelInfo> {
        self.manager.list_models()
    }

    /// Run the HTER, DA and word-level models for one pair, in that order
    pub fn estimate(
        &self,
        direction: LanguageDirection,
        source: &str,
        target: &str,
    ) -> Result<QualityReport> {
        let models = self.registry.get(direction)?;

        let hter = models.hter.predict_quality(source, target)?;
        let da = models.da.predict_quality(source, target)?;
        let (source_tokens, target_tokens) = models.word.predict_quality(source, target)?;

        info!(
            direction = %direction,
            hter = round_score(hter),
            da = round_score(da),
            "Estimated translation quality"
        );

        Ok(QualityReport {
            direction,
            hter,
            da,
            source_tokens,
            target_tokens,
        })
    }
}
