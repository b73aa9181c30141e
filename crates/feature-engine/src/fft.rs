//! FFT-based Spectral Analysis

use crate::error::{FeatureError, Stage};
use realfft::RealFftPlanner;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One-sided magnitude spectrum of a real signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Bin frequencies in Hz, `0..=Nyquist`, spacing `fs / N`
    pub frequencies: Vec<f64>,
    /// `|X_k|` for each bin, same length as `frequencies`
    pub magnitudes: Vec<f64>,
}

impl Spectrum {
    /// Number of bins
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    /// Check if the spectrum has no bins
    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Iterate over `(frequency, magnitude)` pairs
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.magnitudes.iter().copied())
    }
}

/// Real-input FFT analyzer producing one-sided magnitude spectra
pub struct SpectralAnalyzer {
    /// FFT planner, caches plans across windows of the same length
    planner: RealFftPlanner<f64>,
}

impl SpectralAnalyzer {
    /// Create a new spectral analyzer
    pub fn new() -> Self {
        Self {
            planner: RealFftPlanner::new(),
        }
    }

    /// Compute the spectrum of a centered (zero-mean) signal sampled at `sample_rate` Hz.
    ///
    /// The signal is transformed as-is: no window and no normalization, so a
    /// full-cycle sine of amplitude `A` over `N` samples peaks at `A·N/2`.
    pub fn analyze(&mut self, centered: &[f64], sample_rate: f64) -> Result<Spectrum, FeatureError> {
        let n = centered.len();
        if n < 2 {
            return Err(FeatureError::InsufficientData {
                stage: Stage::SpectralAnalysis,
                what: "samples",
                required: 2,
                actual: n,
            });
        }
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(FeatureError::InternalInvariant {
                stage: Stage::SpectralAnalysis,
                detail: format!("sampling rate {sample_rate} Hz is not a positive finite value"),
            });
        }

        let r2c = self.planner.plan_fft_forward(n);
        let mut input = centered.to_vec();
        let mut output = r2c.make_output_vec();
        r2c.process(&mut input, &mut output)
            .map_err(|e| FeatureError::InternalInvariant {
                stage: Stage::SpectralAnalysis,
                detail: format!("real FFT of {n} samples failed: {e}"),
            })?;

        let resolution = sample_rate / n as f64;
        let frequencies: Vec<f64> = (0..output.len())
            .map(|k| k as f64 * sample_rate / n as f64)
            .collect();
        let magnitudes: Vec<f64> = output.iter().map(|c| c.norm()).collect();

        debug!(
            "Spectrum: {} samples -> {} bins, resolution {:.4} Hz",
            n,
            magnitudes.len(),
            resolution
        );

        Ok(Spectrum {
            frequencies,
            magnitudes,
        })
    }
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
