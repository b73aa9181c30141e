//! Feature Extraction Error Types

use std::fmt;
use thiserror::Error;

/// Processing stage that raised an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Sampling-rate estimation from timestamps
    RateEstimation,
    /// DC removal and spectral transform
    SpectralAnalysis,
    /// Scalar feature computation over the spectrum
    FeatureExtraction,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::RateEstimation => "rate estimation",
            Stage::SpectralAnalysis => "spectral analysis",
            Stage::FeatureExtraction => "feature extraction",
        };
        f.write_str(name)
    }
}

/// Errors that abort processing of a capture window.
///
/// None of these are recoverable inside the engine; no feature is ever
/// replaced by a default value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Too few samples or timestamp deltas to continue
    #[error("{stage} failed: need at least {required} {what}, got {actual}")]
    InsufficientData {
        stage: Stage,
        what: &'static str,
        required: usize,
        actual: usize,
    },

    /// Zero spectral energy in a ratio denominator
    #[error("{stage} failed: {quantity} is zero, cannot compute {feature}")]
    DivisionByZero {
        stage: Stage,
        quantity: &'static str,
        feature: &'static str,
    },

    /// An output violated a structural guarantee
    #[error("{stage} failed: internal invariant violated: {detail}")]
    InternalInvariant { stage: Stage, detail: String },
}

impl FeatureError {
    /// Stage that raised the error
    pub fn stage(&self) -> Stage {
        match self {
            FeatureError::InsufficientData { stage, .. }
            | FeatureError::DivisionByZero { stage, .. }
            | FeatureError::InternalInvariant { stage, .. } => *stage,
        }
    }
}
