//! Column-Maximum Scaling

use crate::ClassifierError;
use feature_engine::{FeatureRecord, NUMERIC_COLUMNS};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Divides each numeric feature column by its maximum over the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScaler {
    maxima: [f64; 5],
}

impl ColumnScaler {
    /// Learn per-column maxima from every record
    pub fn fit(records: &[FeatureRecord]) -> Result<Self, ClassifierError> {
        if records.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }

        let mut maxima = [f64::NEG_INFINITY; 5];
        for record in records {
            for (slot, value) in maxima.iter_mut().zip(record.values()) {
                *slot = slot.max(value);
            }
        }

        for (&column, &max) in NUMERIC_COLUMNS.iter().zip(maxima.iter()) {
            if !max.is_finite() || max <= 0.0 {
                return Err(ClassifierError::DegenerateColumn { column, max });
            }
        }

        Ok(Self { maxima })
    }

    /// Column maxima in `NUMERIC_COLUMNS` order
    pub fn maxima(&self) -> &[f64; 5] {
        &self.maxima
    }

    /// Scaled feature matrix, one row per record
    pub fn transform(&self, records: &[FeatureRecord]) -> Array2<f64> {
        Array2::from_shape_fn((records.len(), self.maxima.len()), |(row, col)| {
            records[row].values()[col] / self.maxima[col]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(values: [f64; 5]) -> FeatureRecord {
        FeatureRecord {
            label: "off".to_string(),
            dominant_freq: values[0],
            band_power_ratio: values[1],
            peak_magnitude: values[2],
            spectral_centroid: values[3],
            spectral_spread: values[4],
        }
    }

    #[test]
    fn test_scales_by_column_max() {
        let records = vec![
            record([10.0, 0.5, 100.0, 8.0, 1.0]),
            record([20.0, 1.0, 50.0, 16.0, 4.0]),
        ];
        let scaler = ColumnScaler::fit(&records).unwrap();
        assert_eq!(scaler.maxima(), &[20.0, 1.0, 100.0, 16.0, 4.0]);

        let scaled = scaler.transform(&records);
        assert_eq!(scaled.shape(), &[2, 5]);
        assert_eq!(scaled[[0, 0]], 0.5);
        assert_eq!(scaled[[0, 2]], 1.0);
        assert_eq!(scaled[[1, 2]], 0.5);
        assert_eq!(scaled[[1, 4]], 1.0);
    }

    #[test]
    fn test_zero_column_rejected() {
        let records = vec![
            record([10.0, 0.5, 100.0, 8.0, 0.0]),
            record([20.0, 1.0, 50.0, 16.0, 0.0]),
        ];
        let err = ColumnScaler::fit(&records).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::DegenerateColumn {
                column: "spectral_spread",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_dataset() {
        assert!(matches!(
            ColumnScaler::fit(&[]),
            Err(ClassifierError::EmptyDataset)
        ));
    }
}
