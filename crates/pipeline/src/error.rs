//! Pipeline Error Types

use crate::config::ConfigError;
use classifier::ClassifierError;
use feature_engine::FeatureError;
use sensor_acquisition::AcquisitionError;
use storage::StorageError;
use thiserror::Error;

/// Errors from any stage between capture and the stored dataset
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Unknown stimulus label {label:?}, expected one of: {}", known.join(", "))]
    UnknownLabel { label: String, known: Vec<String> },
    #[error("Acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionError),
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("Training failed: {0}")]
    Classifier(#[from] ClassifierError),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
