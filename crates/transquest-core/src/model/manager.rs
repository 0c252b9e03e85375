//! Model lifecycle management: cache resolution, loading and status

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};
use tracing::info;

use crate::catalog::{resolve_model_source, ModelRef, ModelSource};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::inference::{ModelDescriptor, ModelLoader, QualityModel};
use crate::model::download::{ArchiveFetcher, ModelDownloader};
use crate::model::info::{ModelInfo, ModelKind, ModelStatus, ModelVariant};

/// Resolves model names to local checkpoints and loads each one once
pub struct ModelManager {
    config: EngineConfig,
    downloader: ModelDownloader,
    loader: Arc<dyn ModelLoader>,
    models: RwLock<HashMap<ModelVariant, ModelInfo>>,
    loaded: Mutex<HashMap<(ModelKind, PathBuf), Arc<dyn QualityModel>>>,
}

impl ModelManager {
    /// Create a new model manager
    pub fn new(
        config: EngineConfig,
        fetcher: Box<dyn ArchiveFetcher>,
        loader: Arc<dyn ModelLoader>,
    ) -> Self {
        let downloader = ModelDownloader::new(config.cache_dir.clone(), fetcher);

        let mut models = HashMap::new();
        for variant in ModelVariant::all() {
            let mut info = ModelInfo::new(*variant);
            if downloader.is_downloaded(*variant) {
                info = info.with_path(downloader.model_path(*variant));
                info.size_bytes = downloader.get_cached_size(*variant);
            }
            models.insert(*variant, info);
        }

        Self {
            config,
            downloader,
            loader,
            models: RwLock::new(models),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get list of all catalog models with their status
    pub fn list_models(&self) -> Vec<ModelInfo> {
        let models = self.models.read().unwrap_or_else(|p| p.into_inner());
        ModelVariant::all()
            .iter()
            .filter_map(|variant| models.get(variant).cloned())
            .collect()
    }

    /// Get info for a specific model
    pub fn get_model_info(&self, variant: ModelVariant) -> Option<ModelInfo> {
        let models = self.models.read().unwrap_or_else(|p| p.into_inner());
        models.get(&variant).cloned()
    }

    /// Fetch a catalog model into the cache if it is not there yet
    pub fn download_model(&self, variant: ModelVariant) -> Result<PathBuf> {
        match self.downloader.ensure_downloaded(variant) {
            Ok(path) => {
                self.update(variant, |info| {
                    info.status = ModelStatus::Downloaded;
                    info.local_path = Some(path.clone());
                    info.error_message = None;
                });
                let size = self.downloader.get_cached_size(variant);
                self.update(variant, |info| info.size_bytes = size);
                Ok(path)
            }
            Err(e) => {
                self.update(variant, |info| {
                    info.status = ModelStatus::Error;
                    info.error_message = Some(e.to_string());
                });
                Err(e)
            }
        }
    }

    /// Turn a configured model name into a local checkpoint path.
    ///
    /// Catalog names are downloaded on a cache miss; other names are used as
    /// paths unchanged and need an explicit model type.
    pub fn resolve(&self, model: &ModelRef) -> Result<(ModelSource, PathBuf)> {
        let source = resolve_model_source(&model.name, model.model_type.as_deref());
        let path = match &source {
            ModelSource::Catalog(variant) => self.download_model(*variant)?,
            ModelSource::Direct { path, .. } => path.clone(),
        };
        Ok((source, path))
    }

    /// Resolve and load a model of the expected kind, reusing a previously
    /// loaded instance of the same checkpoint.
    pub fn load_model(&self, model: &ModelRef, kind: ModelKind) -> Result<Arc<dyn QualityModel>> {
        let (source, model_path) = self.resolve(model)?;

        if let ModelSource::Catalog(variant) = source {
            if variant.kind() != kind {
                return Err(Error::ConfigError(format!(
                    "{} is a {} model but a {} model was configured",
                    variant,
                    variant.kind(),
                    kind
                )));
            }
        }

        let key = (kind, model_path.clone());
        {
            let loaded = self.loaded.lock().unwrap_or_else(|p| p.into_inner());
            if let Some(existing) = loaded.get(&key) {
                return Ok(existing.clone());
            }
        }

        let model_type = source.model_type().ok_or_else(|| {
            Error::ConfigError(format!(
                "{} is not a known TransQuest model and no model_type was given",
                source.label()
            ))
        })?;

        let descriptor = ModelDescriptor {
            kind,
            model_type: model_type.to_string(),
            model_path,
            use_cuda: self.config.use_cuda,
            cuda_device: self.config.cuda_device,
        };

        let loaded_model = match self.loader.load(descriptor) {
            Ok(m) => m,
            Err(e) => {
                if let ModelSource::Catalog(variant) = source {
                    self.update(variant, |info| {
                        info.status = ModelStatus::Error;
                        info.error_message = Some(e.to_string());
                    });
                }
                return Err(e);
            }
        };

        if let ModelSource::Catalog(variant) = source {
            self.update(variant, |info| info.status = ModelStatus::Ready);
        }
        info!("Model {} loaded", source.label());

        let mut loaded = self.loaded.lock().unwrap_or_else(|p| p.into_inner());
        Ok(loaded.entry(key).or_insert(loaded_model).clone())
    }

    /// Remove a catalog model from the cache
    pub fn delete_model(&self, variant: ModelVariant) -> Result<()> {
        let model_path = self.downloader.model_path(variant);
        if model_path.exists() {
            std::fs::remove_dir_all(&model_path)?;
        }
        self.loaded
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .retain(|(_, path), _| path != &model_path);
        self.update(variant, |info| *info = ModelInfo::new(variant));
        Ok(())
    }

    fn update(&self, variant: ModelVariant, f: impl FnOnce(&mut ModelInfo)) {
        let mut models = self.models.write().unwrap_or_else(|p| p.into_inner());
        if let Some(info) = models.get_mut(&variant) {
            f(info);
        }
    }
}
