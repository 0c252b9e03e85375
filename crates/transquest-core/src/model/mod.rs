//! Model metadata, checkpoint cache and lifecycle

pub mod download;
pub mod info;
pub mod manager;

pub use download::{ArchiveFetcher, GoogleDriveFetcher, ModelDownloader};
pub use info::{ModelInfo, ModelKind, ModelStatus, ModelVariant};
pub use manager::ModelManager;
