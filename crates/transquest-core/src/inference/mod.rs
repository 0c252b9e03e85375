//! Inference surface: the model capability, the Python runtime bridge and
//! the `predict_quality` wrappers.

mod backend;
mod estimator;
mod python_bridge;

pub use backend::{ModelDescriptor, ModelLoader, ModelOutput, QualityModel, SentencePair};
pub use estimator::{SentenceQualityEstimator, WordQualityEstimator};
pub use python_bridge::{
    read_frame, write_frame, BridgeRequest, BridgeResponse, PythonBridge, PythonModelLoader,
    PythonQualityModel,
};

#[cfg(test)]
pub(crate) use estimator::testing;
