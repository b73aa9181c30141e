//! Spectral Feature Extraction

use crate::error::{FeatureError, Stage};
use crate::fft::Spectrum;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Inclusive frequency interval (Hz) associated with a stimulus condition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBand {
    low_hz: f64,
    high_hz: f64,
}

/// Rejected band bounds
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidBand {
    pub low_hz: f64,
    pub high_hz: f64,
}

impl fmt::Display for InvalidBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid frequency band [{}, {}] Hz: bounds must be finite, non-negative and ordered",
            self.low_hz, self.high_hz
        )
    }
}

impl std::error::Error for InvalidBand {}

impl FrequencyBand {
    /// Create a band; bounds must be finite, non-negative and `low <= high`
    pub fn new(low_hz: f64, high_hz: f64) -> Result<Self, InvalidBand> {
        let valid = low_hz.is_finite() && high_hz.is_finite() && low_hz >= 0.0 && low_hz <= high_hz;
        if valid {
            Ok(Self { low_hz, high_hz })
        } else {
            Err(InvalidBand { low_hz, high_hz })
        }
    }

    /// Lower bound (Hz)
    pub fn low_hz(&self) -> f64 {
        self.low_hz
    }

    /// Upper bound (Hz)
    pub fn high_hz(&self) -> f64 {
        self.high_hz
    }

    /// Check if a frequency falls inside the band (bounds inclusive)
    pub fn contains(&self, freq: f64) -> bool {
        freq >= self.low_hz && freq <= self.high_hz
    }
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} Hz", self.low_hz, self.high_hz)
    }
}

/// Full-precision features of one capture window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralFeatures {
    /// Frequency of the strongest non-DC bin (Hz)
    pub dominant_freq: f64,
    /// Magnitude of the strongest non-DC bin
    pub peak_magnitude: f64,
    /// Target-band power over non-DC power; in [0, 1] for a centered window
    pub band_power_ratio: f64,
    /// Magnitude-weighted mean frequency, DC included (Hz)
    pub spectral_centroid: f64,
    /// Magnitude-weighted std dev of frequency around the centroid (Hz)
    pub spectral_spread: f64,
}

/// Computes scalar features from a one-sided spectrum
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract all features for the given target band
    pub fn extract(
        &self,
        spectrum: &Spectrum,
        band: &FrequencyBand,
    ) -> Result<SpectralFeatures, FeatureError> {
        check_shape(spectrum)?;

        let (dominant_freq, peak_magnitude) = self.dominant_peak(spectrum)?;
        let band_power_ratio = self.band_power_ratio(spectrum, band)?;
        let spectral_centroid = self.spectral_centroid(spectrum)?;
        let spectral_spread = self.spectral_spread(spectrum, spectral_centroid)?;

        debug!(
            "Features: dom={:.3} Hz peak={:.3} ratio={:.5} ({}) centroid={:.3} spread={:.3}",
            dominant_freq, peak_magnitude, band_power_ratio, band, spectral_centroid, spectral_spread
        );

        Ok(SpectralFeatures {
            dominant_freq,
            peak_magnitude,
            band_power_ratio,
            spectral_centroid,
            spectral_spread,
        })
    }

    /// Strongest bin excluding DC; the first maximum wins on ties
    pub fn dominant_peak(&self, spectrum: &Spectrum) -> Result<(f64, f64), FeatureError> {
        check_shape(spectrum)?;

        let mut peak_idx = 1;
        let mut peak_magnitude = spectrum.magnitudes[1];
        for (i, &m) in spectrum.magnitudes.iter().enumerate().skip(2) {
            if m > peak_magnitude {
                peak_magnitude = m;
                peak_idx = i;
            }
        }

        let dominant_freq = spectrum.frequencies[peak_idx];
        if dominant_freq < 0.0 || dominant_freq.is_nan() {
            return Err(FeatureError::InternalInvariant {
                stage: Stage::FeatureExtraction,
                detail: format!(
                    "dominant frequency {dominant_freq} Hz at bin {peak_idx} is not a non-negative value"
                ),
            });
        }

        Ok((dominant_freq, peak_magnitude))
    }

    /// Power (magnitude squared) in `band` over non-DC power.
    ///
    /// The band sum covers every bin, so a band starting at 0 Hz also counts
    /// the residual DC bin; the total always skips it.
    pub fn band_power_ratio(
        &self,
        spectrum: &Spectrum,
        band: &FrequencyBand,
    ) -> Result<f64, FeatureError> {
        check_shape(spectrum)?;

        let mut band_power = 0.0;
        let mut total_power = 0.0;
        for (i, (freq, mag)) in spectrum.bins().enumerate() {
            let power = mag * mag;
            if i > 0 {
                total_power += power;
            }
            if band.contains(freq) {
                band_power += power;
            }
        }

        if total_power == 0.0 {
            return Err(FeatureError::DivisionByZero {
                stage: Stage::FeatureExtraction,
                quantity: "total spectral power",
                feature: "band power ratio",
            });
        }

        Ok(band_power / total_power)
    }

    /// Magnitude-weighted mean frequency over all bins, DC included
    pub fn spectral_centroid(&self, spectrum: &Spectrum) -> Result<f64, FeatureError> {
        let total = total_magnitude(spectrum, "spectral centroid")?;
        let weighted: f64 = spectrum.bins().map(|(f, m)| f * m).sum();
        Ok(weighted / total)
    }

    /// Magnitude-weighted standard deviation of frequency around `centroid`
    pub fn spectral_spread(&self, spectrum: &Spectrum, centroid: f64) -> Result<f64, FeatureError> {
        let total = total_magnitude(spectrum, "spectral spread")?;
        let weighted: f64 = spectrum
            .bins()
            .map(|(f, m)| (f - centroid).powi(2) * m)
            .sum();
        Ok((weighted / total).sqrt())
    }
}

/// A one-sided spectrum from at least 2 samples has a DC bin plus one more
fn check_shape(spectrum: &Spectrum) -> Result<(), FeatureError> {
    if spectrum.frequencies.len() != spectrum.magnitudes.len() {
        return Err(FeatureError::InternalInvariant {
            stage: Stage::FeatureExtraction,
            detail: format!(
                "spectrum has {} frequencies but {} magnitudes",
                spectrum.frequencies.len(),
                spectrum.magnitudes.len()
            ),
        });
    }
    if spectrum.len() < 2 {
        return Err(FeatureError::InsufficientData {
            stage: Stage::FeatureExtraction,
            what: "spectrum bins",
            required: 2,
            actual: spectrum.len(),
        });
    }
    Ok(())
}

fn total_magnitude(spectrum: &Spectrum, feature: &'static str) -> Result<f64, FeatureError> {
    let total: f64 = spectrum.magnitudes.iter().sum();
    if total == 0.0 {
        return Err(FeatureError::DivisionByZero {
            stage: Stage::FeatureExtraction,
            quantity: "total spectral magnitude",
            feature,
        });
    }
    Ok(total)
}
