//! Stratified Train/Test Split

use crate::ClassifierError;
use feature_engine::FeatureRecord;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Row indices for each side of a split
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split row indices so every label appears on both sides.
///
/// Each label keeps `round(n * test_ratio)` rows for testing, clamped to
/// `1..=n-1`. The shuffle is seeded, so the same dataset and seed always
/// give the same split.
pub fn stratified_split(
    records: &[FeatureRecord],
    test_ratio: f64,
    seed: u64,
) -> Result<Split, ClassifierError> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(ClassifierError::InvalidConfig(format!(
            "test ratio {test_ratio} must be in (0, 1)"
        )));
    }

    let mut by_label: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, record) in records.iter().enumerate() {
        by_label.entry(record.label.as_str()).or_default().push(i);
    }

    if by_label.len() < 2 {
        return Err(ClassifierError::TooFewClasses(by_label.len()));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut split = Split {
        train: Vec::with_capacity(records.len()),
        test: Vec::new(),
    };

    for (label, mut indices) in by_label {
        let n = indices.len();
        if n < 2 {
            return Err(ClassifierError::InsufficientSamples {
                label: label.to_string(),
                count: n,
                required: 2,
            });
        }

        indices.shuffle(&mut rng);
        let n_test = ((n as f64 * test_ratio).round() as usize).clamp(1, n - 1);
        split.test.extend_from_slice(&indices[..n_test]);
        split.train.extend_from_slice(&indices[n_test..]);
    }

    Ok(split)
}
