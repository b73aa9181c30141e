//! Storage Layer
//!
//! Append-only CSV dataset of labeled feature records.

mod dataset;

pub use dataset::{FeatureDataset, HEADER};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Dataset I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Dataset {path} has header {found:?}, expected {expected:?}")]
    SchemaMismatch {
        path: String,
        expected: String,
        found: String,
    },
    #[error("Label {0:?} cannot be stored: labels may not contain commas, quotes or line breaks")]
    InvalidLabel(String),
    #[error("Dataset {path} line {line}: {reason}")]
    MalformedRow {
        path: String,
        line: usize,
        reason: String,
    },
}
