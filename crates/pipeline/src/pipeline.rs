//! Capture Window Processing
//!
//! Runs one capture window through rate estimation, DC removal, the
//! spectral transform and feature extraction, then labels the result.

use crate::config::{ConfigError, PipelineConfig};
use crate::error::{PipelineError, Result};
use feature_engine::{
    center, FeatureError, FeatureExtractor, FeatureRecord, FrequencyBand, RateEstimator,
    SignalSummary, SpectralAnalyzer, SpectralFeatures, Stage,
};
use sample_buffer::SampleBuffer;
use serde::Serialize;
use storage::FeatureDataset;
use tracing::{debug, info};

/// Full-precision result of analyzing one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowAnalysis {
    /// Estimated sampling rate (Hz)
    pub sample_rate: f64,
    /// Time-domain statistics of the raw values
    pub summary: SignalSummary,
    pub features: SpectralFeatures,
}

/// Feature pipeline for labeled capture windows
pub struct FeaturePipeline {
    stimuli: Vec<(String, FrequencyBand)>,
    rate_estimator: RateEstimator,
    analyzer: SpectralAnalyzer,
    extractor: FeatureExtractor,
}

impl FeaturePipeline {
    /// Build the pipeline from the configured stimulus table
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;

        let mut stimuli = Vec::with_capacity(config.stimuli.len());
        for stimulus in &config.stimuli {
            let band = FrequencyBand::new(stimulus.low_hz, stimulus.high_hz)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
            stimuli.push((stimulus.label.clone(), band));
        }

        info!("Feature pipeline ready with {} stimuli", stimuli.len());

        Ok(Self {
            stimuli,
            rate_estimator: RateEstimator::new(),
            analyzer: SpectralAnalyzer::new(),
            extractor: FeatureExtractor::new(),
        })
    }

    /// Configured labels, in table order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.stimuli.iter().map(|(label, _)| label.as_str())
    }

    /// Target band for a stimulus label
    pub fn band_for(&self, label: &str) -> Result<FrequencyBand> {
        self.stimuli
            .iter()
            .find(|(known, _)| known == label)
            .map(|(_, band)| *band)
            .ok_or_else(|| PipelineError::UnknownLabel {
                label: label.to_string(),
                known: self.labels().map(str::to_string).collect(),
            })
    }

    /// Analyze a window against `band` without rounding
    pub fn analyze(
        &mut self,
        buffer: &SampleBuffer,
        band: &FrequencyBand,
    ) -> std::result::Result<WindowAnalysis, FeatureError> {
        let sample_rate = self.rate_estimator.estimate(buffer)?;

        let values = buffer.values();
        let summary =
            SignalSummary::compute(&values).ok_or(FeatureError::InsufficientData {
                stage: Stage::SpectralAnalysis,
                what: "samples",
                required: 1,
                actual: 0,
            })?;
        debug!(
            "Window: {} samples over {:.2} s, fs={:.2} Hz, mean={:.2} std={:.2} p2p={:.2}",
            buffer.len(),
            buffer.span_seconds(),
            sample_rate,
            summary.mean,
            summary.std_dev,
            summary.peak_to_peak
        );

        let centered = center(&values);
        let spectrum = self.analyzer.analyze(&centered, sample_rate)?;
        let features = self.extractor.extract(&spectrum, band)?;

        Ok(WindowAnalysis {
            sample_rate,
            summary,
            features,
        })
    }

    /// Analyze a window and label it; the label must be a configured stimulus
    pub fn process(&mut self, buffer: &SampleBuffer, label: &str) -> Result<FeatureRecord> {
        let band = self.band_for(label)?;
        let analysis = self.analyze(buffer, &band)?;
        let record = FeatureRecord::new(label, &analysis.features);

        info!(
            "Extracted features for {}: dominant={} Hz ratio={} peak={} centroid={} spread={}",
            record.label,
            record.dominant_freq,
            record.band_power_ratio,
            record.peak_magnitude,
            record.spectral_centroid,
            record.spectral_spread
        );

        Ok(record)
    }

    /// Process a window and append the record to `dataset`
    pub fn record_window(
        &mut self,
        buffer: &SampleBuffer,
        label: &str,
        dataset: &FeatureDataset,
    ) -> Result<FeatureRecord> {
        let record = self.process(buffer, label)?;
        dataset.append(&record)?;
        info!("Appended {} record to {}", label, dataset.path().display());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sample_buffer::Sample;
    use sensor_acquisition::CaptureSession;
    use std::f64::consts::PI;
    use tempfile::tempdir;

    /// 10 s at 100 Hz of a `freq` sine around a 512 count offset
    fn flicker_window(freq: f64, amplitude: f64) -> SampleBuffer {
        let samples = (0..1000)
            .map(|i| {
                let t = i as f64 * 0.01;
                Sample::from_millis((i * 10) as f64, 512.0 + amplitude * (2.0 * PI * freq * t).sin())
            })
            .collect();
        SampleBuffer::from_samples(samples)
    }

    fn pipeline() -> FeaturePipeline {
        FeaturePipeline::new(&PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_ten_hz_window() {
        let record = pipeline().process(&flicker_window(10.0, 100.0), "10Hz").unwrap();

        assert_eq!(record.label, "10Hz");
        assert_eq!(record.dominant_freq, 10.0);
        assert_eq!(record.band_power_ratio, 1.0);
        assert!((record.peak_magnitude - 50_000.0).abs() < 0.5, "{}", record.peak_magnitude);
        assert!((record.spectral_centroid - 10.0).abs() < 0.01);
        assert!(record.spectral_spread < 0.05);
    }

    #[test]
    fn test_wrong_band_gives_low_ratio() {
        let record = pipeline().process(&flicker_window(10.0, 100.0), "20Hz").unwrap();
        assert_eq!(record.dominant_freq, 10.0);
        assert!(record.band_power_ratio < 0.01);
    }

    #[test]
    fn test_analysis_reports_rate_and_summary() {
        let mut pipeline = pipeline();
        let band = pipeline.band_for("10Hz").unwrap();
        let analysis = pipeline.analyze(&flicker_window(10.0, 100.0), &band).unwrap();

        assert!((analysis.sample_rate - 100.0).abs() < 1e-6);
        assert!((analysis.summary.mean - 512.0).abs() < 1e-6);
        assert!((analysis.summary.peak_to_peak - 200.0).abs() < 1.0);
    }

    #[test]
    fn test_processing_is_deterministic() {
        let mut pipeline = pipeline();
        let window = flicker_window(20.0, 80.0);
        let a = pipeline.process(&window, "20Hz").unwrap();
        let b = pipeline.process(&window, "20Hz").unwrap();
        assert_eq!(a, b);
        for (x, y) in a.values().iter().zip(b.values()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_unknown_label() {
        let err = pipeline().process(&flicker_window(10.0, 100.0), "15Hz").unwrap_err();
        match err {
            PipelineError::UnknownLabel { label, known } => {
                assert_eq!(label, "15Hz");
                assert_eq!(known, vec!["off", "10Hz", "20Hz"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_constant_signal_has_no_spectral_energy() {
        let samples = (0..500).map(|i| Sample::from_millis(i as f64 * 10.0, 512.0)).collect();
        let err = pipeline()
            .process(&SampleBuffer::from_samples(samples), "off")
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Feature(FeatureError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_fractional_constant_signal_is_rejected_and_not_stored() {
        let dir = tempdir().unwrap();
        let dataset = FeatureDataset::new(dir.path().join("features.csv"));
        let mut pipeline = pipeline();

        for value in [0.1, 3.3, 512.7] {
            let samples = (0..1000)
                .map(|i| Sample::new(i as f64 * 0.001, value))
                .collect();
            let buffer = SampleBuffer::from_samples(samples);
            let err = pipeline.record_window(&buffer, "off", &dataset).unwrap_err();
            assert!(
                matches!(err, PipelineError::Feature(FeatureError::DivisionByZero { .. })),
                "constant {value}: {err}"
            );
        }

        assert!(!dataset.path().exists());
    }

    #[test]
    fn test_one_khz_ten_hz_sine_scenario() {
        let samples = (0..1000)
            .map(|i| {
                let t = i as f64 * 0.001;
                Sample::new(t, (2.0 * PI * 10.0 * t).sin())
            })
            .collect();
        let buffer = SampleBuffer::from_samples(samples);
        let mut pipeline = pipeline();

        let band = pipeline.band_for("10Hz").unwrap();
        assert_eq!((band.low_hz(), band.high_hz()), (8.0, 12.0));
        let analysis = pipeline.analyze(&buffer, &band).unwrap();
        assert!((analysis.sample_rate - 1000.0).abs() < 1e-6);

        let record = pipeline.process(&buffer, "10Hz").unwrap();
        assert_eq!(record.label, "10Hz");
        assert_eq!(record.dominant_freq, 10.0);
        assert_eq!(record.band_power_ratio, 1.0);
        assert!((record.peak_magnitude - 500.0).abs() < 0.01, "{}", record.peak_magnitude);
        assert!((record.spectral_centroid - 10.0).abs() < 0.01);
        assert!(record.spectral_spread < 0.05);
    }

    #[test]
    fn test_repeated_timestamps_fail_rate_estimation() {
        let samples = (0..100).map(|i| Sample::from_millis(1000.0, i as f64)).collect();
        let err = pipeline()
            .process(&SampleBuffer::from_samples(samples), "off")
            .unwrap_err();
        match err {
            PipelineError::Feature(e) => assert_eq!(e.stage(), Stage::RateEstimation),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_window() {
        let err = pipeline()
            .process(&SampleBuffer::from_samples(Vec::new()), "off")
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Feature(FeatureError::InsufficientData { .. })
        ));
    }

    #[tokio::test]
    async fn test_replayed_log_to_dataset() {
        let mut log = String::from("booting\n");
        for i in 0..1000 {
            let t = i as f64 * 0.01;
            let adc = (512.0 + 100.0 * (2.0 * PI * 20.0 * t).sin()).round();
            log.push_str(&format!("{},{}\r\n", i * 10, adc));
            if i == 500 {
                log.push_str("12,oops\n\n");
            }
        }

        let mut reader = log.as_bytes();
        let report = CaptureSession::new().read_all(&mut reader).await.unwrap();
        assert_eq!(report.buffer.len(), 1000);
        assert_eq!(report.dropped_lines, 2);

        let dir = tempdir().unwrap();
        let dataset = FeatureDataset::new(dir.path().join("features.csv"));
        let mut pipeline = pipeline();
        let first = pipeline.record_window(&report.buffer, "20Hz", &dataset).unwrap();
        pipeline.record_window(&report.buffer, "20Hz", &dataset).unwrap();

        assert_eq!(first.dominant_freq, 20.0);
        assert!(first.band_power_ratio > 0.9);

        let stored = dataset.load().unwrap();
        assert_eq!(stored, vec![first.clone(), first]);
    }
}
