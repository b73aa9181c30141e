//! Labeled Feature Record

use crate::features::SpectralFeatures;
use serde::{Deserialize, Serialize};

/// Dataset column names, in storage order
pub const COLUMNS: [&str; 6] = [
    "label",
    "dominant_freq",
    "band_power_ratio",
    "peak_magnitude",
    "spectral_centroid",
    "spectral_spread",
];

/// Numeric feature column names, in storage order
pub const NUMERIC_COLUMNS: [&str; 5] = [
    "dominant_freq",
    "band_power_ratio",
    "peak_magnitude",
    "spectral_centroid",
    "spectral_spread",
];

/// Decimal places stored for frequencies, magnitudes, centroid and spread
pub const VALUE_DECIMALS: i32 = 2;
/// Decimal places stored for the band power ratio
pub const RATIO_DECIMALS: i32 = 4;

/// One dataset row: the features of a capture window and its stimulus label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub label: String,
    pub dominant_freq: f64,
    pub band_power_ratio: f64,
    pub peak_magnitude: f64,
    pub spectral_centroid: f64,
    pub spectral_spread: f64,
}

impl FeatureRecord {
    /// Pair features with their label, rounded to storage precision
    pub fn new(label: impl Into<String>, features: &SpectralFeatures) -> Self {
        Self {
            label: label.into(),
            dominant_freq: round_to(features.dominant_freq, VALUE_DECIMALS),
            band_power_ratio: round_to(features.band_power_ratio, RATIO_DECIMALS),
            peak_magnitude: round_to(features.peak_magnitude, VALUE_DECIMALS),
            spectral_centroid: round_to(features.spectral_centroid, VALUE_DECIMALS),
            spectral_spread: round_to(features.spectral_spread, VALUE_DECIMALS),
        }
    }

    /// Numeric features in `NUMERIC_COLUMNS` order
    pub fn values(&self) -> [f64; 5] {
        [
            self.dominant_freq,
            self.band_power_ratio,
            self.peak_magnitude,
            self.spectral_centroid,
            self.spectral_spread,
        ]
    }
}

/// Round half to even at `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_rounding() {
        let features = SpectralFeatures {
            dominant_freq: 10.004_9,
            peak_magnitude: 499.999_7,
            band_power_ratio: 0.987_654_3,
            spectral_centroid: 12.345_6,
            spectral_spread: 0.001,
        };
        let record = FeatureRecord::new("10Hz", &features);
        assert_eq!(record.label, "10Hz");
        assert_eq!(record.dominant_freq, 10.0);
        assert_eq!(record.peak_magnitude, 500.0);
        assert_eq!(record.band_power_ratio, 0.9877);
        assert_eq!(record.spectral_centroid, 12.35);
        assert_eq!(record.spectral_spread, 0.0);
    }

    #[test]
    fn test_round_ties_to_even() {
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(0.125, 2), 0.12);
    }

    #[test]
    fn test_values_follow_column_order() {
        let record = FeatureRecord {
            label: "20Hz".to_string(),
            dominant_freq: 1.0,
            band_power_ratio: 2.0,
            peak_magnitude: 3.0,
            spectral_centroid: 4.0,
            spectral_spread: 5.0,
        };
        assert_eq!(record.values(), [1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(&COLUMNS[1..], &NUMERIC_COLUMNS[..]);
    }
}
