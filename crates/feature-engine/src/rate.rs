//! Sampling-Rate Estimation

use crate::error::{FeatureError, Stage};
use sample_buffer::SampleBuffer;
use tracing::debug;

/// Minimum number of positive deltas needed for an estimate
pub const MIN_VALID_DELTAS: usize = 2;

/// Estimates the effective sampling frequency from irregular timestamps.
///
/// Uses the median positive inter-sample delta so occasional transport
/// jitter does not bias the estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateEstimator;

impl RateEstimator {
    /// Create a new rate estimator
    pub fn new() -> Self {
        Self
    }

    /// Estimate the sampling rate (Hz) of a capture window
    pub fn estimate(&self, buffer: &SampleBuffer) -> Result<f64, FeatureError> {
        self.estimate_from_timestamps(&buffer.timestamps())
    }

    /// Estimate the sampling rate (Hz) from raw timestamps in seconds
    pub fn estimate_from_timestamps(&self, timestamps: &[f64]) -> Result<f64, FeatureError> {
        // Zero or negative deltas come from duplicate or out-of-order stamps
        let mut deltas: Vec<f64> = timestamps
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|d| *d > 0.0)
            .collect();

        let discarded = timestamps.len().saturating_sub(1) - deltas.len();
        if discarded > 0 {
            debug!("Discarded {} non-positive timestamp deltas", discarded);
        }

        if deltas.len() < MIN_VALID_DELTAS {
            return Err(FeatureError::InsufficientData {
                stage: Stage::RateEstimation,
                what: "positive timestamp deltas",
                required: MIN_VALID_DELTAS,
                actual: deltas.len(),
            });
        }

        let median_delta = median(&mut deltas);
        let fs = 1.0 / median_delta;
        if !fs.is_finite() {
            return Err(FeatureError::InternalInvariant {
                stage: Stage::RateEstimation,
                detail: format!("median delta {median_delta} s gives non-finite rate"),
            });
        }

        debug!("Median delta {:.6} s -> fs {:.3} Hz", median_delta, fs);
        Ok(fs)
    }
}

/// Median of a non-empty slice; averages the two middle values for even lengths
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
