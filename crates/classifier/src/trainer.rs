//! Logistic Regression Training and Evaluation

use crate::scaling::ColumnScaler;
use crate::split::stratified_split;
use crate::ClassifierError;
use feature_engine::FeatureRecord;
use linfa::prelude::*;
use linfa_logistic::{MultiFittedLogisticRegression, MultiLogisticRegression};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fraction of each label held out for evaluation
    pub test_ratio: f64,
    /// Optimizer iteration cap
    pub max_iterations: u64,
    /// Seed for the stratified shuffle
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            max_iterations: 1000,
            seed: 42,
        }
    }
}

/// Confusion counts; rows are true labels, columns predicted labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfusionMatrix {
    /// Sorted label order for both axes
    pub labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Tally predictions against ground truth
    pub fn from_predictions(labels: Vec<String>, truth: &[String], predicted: &[String]) -> Self {
        let mut counts = vec![vec![0; labels.len()]; labels.len()];
        let index = |label: &String| labels.binary_search(label).ok();
        for (t, p) in truth.iter().zip(predicted) {
            if let (Some(row), Some(col)) = (index(t), index(p)) {
                counts[row][col] += 1;
            }
        }
        Self { labels, counts }
    }

    /// Number of tallied rows
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Share of rows on the diagonal
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: usize = (0..self.labels.len()).map(|i| self.counts[i][i]).sum();
        correct as f64 / total as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.labels.iter().map(|l| l.len()).max().unwrap_or(0).max(5);
        write!(f, "{:>width$}", "")?;
        for label in &self.labels {
            write!(f, " {:>width$}", label)?;
        }
        writeln!(f)?;
        for (label, row) in self.labels.iter().zip(&self.counts) {
            write!(f, "{:>width$}", label)?;
            for count in row {
                write!(f, " {:>width$}", count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Held-out evaluation of a trained model
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub train_rows: usize,
    pub test_rows: usize,
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
}

/// Scaler plus fitted model
pub struct TrainedModel {
    scaler: ColumnScaler,
    model: MultiFittedLogisticRegression<f64, String>,
}

impl TrainedModel {
    /// Predict labels for records, scaled with the training maxima
    pub fn predict(&self, records: &[FeatureRecord]) -> Vec<String> {
        let features = self.scaler.transform(records);
        let predicted: Array1<String> = self.model.predict(&features);
        predicted.to_vec()
    }

    /// Scaler learned from the dataset
    pub fn scaler(&self) -> &ColumnScaler {
        &self.scaler
    }
}

/// Fits and evaluates the stimulus classifier
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    /// Create a new trainer
    pub fn new(config: TrainingConfig) -> Self {
        info!("Creating trainer with config: {:?}", config);
        Self { config }
    }

    /// Scale, split, fit and evaluate
    pub fn train(
        &self,
        records: &[FeatureRecord],
    ) -> Result<(TrainedModel, TrainingReport), ClassifierError> {
        if self.config.max_iterations == 0 {
            return Err(ClassifierError::InvalidConfig(
                "max_iterations must be greater than zero".to_string(),
            ));
        }

        // Maxima come from the whole dataset, before splitting
        let scaler = ColumnScaler::fit(records)?;
        let split = stratified_split(records, self.config.test_ratio, self.config.seed)?;

        let select = |indices: &[usize]| -> Vec<FeatureRecord> {
            indices.iter().map(|&i| records[i].clone()).collect()
        };
        let train_rows = select(&split.train);
        let test_rows = select(&split.test);

        let train_targets: Array1<String> = train_rows.iter().map(|r| r.label.clone()).collect();
        let train_set = Dataset::new(scaler.transform(&train_rows), train_targets);

        debug!(
            "Fitting on {} rows, evaluating on {} rows",
            train_rows.len(),
            test_rows.len()
        );

        let model = MultiLogisticRegression::default()
            .max_iterations(self.config.max_iterations)
            .fit(&train_set)
            .map_err(|e| ClassifierError::Training(e.to_string()))?;

        let trained = TrainedModel { scaler, model };

        let truth: Vec<String> = test_rows.iter().map(|r| r.label.clone()).collect();
        let predicted = trained.predict(&test_rows);

        let mut labels: Vec<String> = records.iter().map(|r| r.label.clone()).collect();
        labels.sort();
        labels.dedup();
        let confusion = ConfusionMatrix::from_predictions(labels, &truth, &predicted);
        let accuracy = confusion.accuracy();

        info!("Model accuracy on held-out data: {:.2}%", accuracy * 100.0);

        let report = TrainingReport {
            train_rows: train_rows.len(),
            test_rows: test_rows.len(),
            accuracy,
            confusion,
        };
        Ok((trained, report))
    }
}
