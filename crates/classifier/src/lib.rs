//! Stimulus Classifier
//!
//! Trains and evaluates a multinomial logistic regression over the
//! accumulated feature dataset.

mod scaling;
mod split;
mod trainer;

pub use scaling::ColumnScaler;
pub use split::{stratified_split, Split};
pub use trainer::{ConfusionMatrix, TrainedModel, Trainer, TrainingConfig, TrainingReport};

use thiserror::Error;

/// Errors during training or evaluation
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Dataset is empty")]
    EmptyDataset,
    #[error("Column {column} has maximum {max}, cannot scale by it")]
    DegenerateColumn { column: &'static str, max: f64 },
    #[error("Label {label:?} has {count} rows, need at least {required} to stratify")]
    InsufficientSamples {
        label: String,
        count: usize,
        required: usize,
    },
    #[error("Need at least 2 distinct labels, got {0}")]
    TooFewClasses(usize),
    #[error("Invalid training config: {0}")]
    InvalidConfig(String),
    #[error("Model fit failed: {0}")]
    Training(String),
}
