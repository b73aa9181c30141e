//! Time-Domain Signal Statistics

use serde::{Deserialize, Serialize};

/// Time-domain summary of a capture window
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalSummary {
    /// Mean value (the DC offset removed before the transform)
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Root mean square of the raw values
    pub rms: f64,
    /// Max minus min
    pub peak_to_peak: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl SignalSummary {
    /// Compute the summary; `None` for an empty signal
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = mean(values);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut m2 = 0.0;
        let mut sum_sq = 0.0;
        for &v in values {
            let d = v - mean;
            m2 += d * d;
            sum_sq += v * v;
        }

        Some(Self {
            mean,
            std_dev: (m2 / n).sqrt(),
            rms: (sum_sq / n).sqrt(),
            peak_to_peak: max - min,
            min,
            max,
        })
    }
}

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Subtract the arithmetic mean so the 0 Hz bin only carries residual offset.
///
/// A window where every value is identical centers to exact zeros; the
/// floating-point mean of such a window is not always the value itself.
pub fn center(values: &[f64]) -> Vec<f64> {
    if let Some(&first) = values.first() {
        if values.iter().all(|&v| v == first) {
            return vec![0.0; values.len()];
        }
    }
    let offset = mean(values);
    values.iter().map(|v| v - offset).collect()
}
