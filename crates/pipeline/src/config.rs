//! Pipeline configuration

use classifier::TrainingConfig;
use feature_engine::FrequencyBand;
use sensor_acquisition::SerialSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Environment variable prefix for overrides, e.g. `FLICKER__CAPTURE__DURATION_SECS=5`
pub const ENV_PREFIX: &str = "FLICKER";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Longest accepted capture window (seconds)
pub const MAX_CAPTURE_SECS: f64 = 3600.0;

/// Capture window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Length of one capture window (seconds)
    pub duration_secs: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            duration_secs: 10.0,
        }
    }
}

impl CaptureConfig {
    /// Window length as a `Duration`; zero when `duration_secs` is out of range,
    /// which the capture loop rejects
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs).unwrap_or(Duration::ZERO)
    }
}

/// One stimulus condition and the band its energy is expected in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulusConfig {
    pub label: String,
    pub low_hz: f64,
    pub high_hz: f64,
}

impl StimulusConfig {
    fn new(label: &str, low_hz: f64, high_hz: f64) -> Self {
        Self {
            label: label.to_string(),
            low_hz,
            high_hz,
        }
    }
}

/// Dataset location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/features.csv"),
        }
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub serial: SerialSettings,
    pub capture: CaptureConfig,
    /// Label-to-band table; labels are matched exactly
    pub stimuli: Vec<StimulusConfig>,
    pub dataset: DatasetConfig,
    pub training: TrainingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            serial: SerialSettings::default(),
            capture: CaptureConfig::default(),
            stimuli: vec![
                // Low-frequency noise and drift with the LED off
                StimulusConfig::new("off", 0.0, 5.0),
                StimulusConfig::new("10Hz", 8.0, 12.0),
                StimulusConfig::new("20Hz", 18.0, 22.0),
            ],
            dataset: DatasetConfig::default(),
            training: TrainingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load defaults, then the optional file, then `FLICKER__*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: PipelineConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secs = self.capture.duration_secs;
        let in_range = secs > 0.0 && secs <= MAX_CAPTURE_SECS;
        if !in_range || Duration::try_from_secs_f64(secs).is_err() {
            return Err(ConfigError::Invalid(format!(
                "capture.duration_secs must be in (0, {MAX_CAPTURE_SECS}], got {secs}"
            )));
        }

        if self.stimuli.is_empty() {
            return Err(ConfigError::Invalid("no stimuli configured".to_string()));
        }

        let mut seen = HashSet::new();
        for stimulus in &self.stimuli {
            if stimulus.label.trim().is_empty() {
                return Err(ConfigError::Invalid("stimulus label is empty".to_string()));
            }
            if stimulus.label.contains([',', '"', '\r', '\n']) {
                return Err(ConfigError::Invalid(format!(
                    "stimulus label {:?} contains a comma, quote or line break",
                    stimulus.label
                )));
            }
            if !seen.insert(stimulus.label.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate stimulus label {:?}",
                    stimulus.label
                )));
            }
            FrequencyBand::new(stimulus.low_hz, stimulus.high_hz)
                .map_err(|e| ConfigError::Invalid(format!("stimulus {:?}: {e}", stimulus.label)))?;
        }

        let ratio = self.training.test_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "training.test_ratio must be in (0, 1), got {ratio}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.stimuli.len(), 3);
        assert_eq!(config.capture.duration(), Duration::from_secs(10));
        assert_eq!(config.serial.baud_rate, 115_200);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flicker.toml");
        fs::write(
            &path,
            r#"
[serial]
port = "COM3"

[capture]
duration_secs = 2.5

[[stimuli]]
label = "off"
low_hz = 0.0
high_hz = 5.0

[[stimuli]]
label = "15Hz"
low_hz = 13.0
high_hz = 17.0

[dataset]
path = "runs/features.csv"
"#,
        )
        .unwrap();

        let config = PipelineConfig::load(Some(&path)).unwrap();
        assert_eq!(config.serial.port, "COM3");
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.capture.duration_secs, 2.5);
        assert_eq!(config.stimuli[1], StimulusConfig::new("15Hz", 13.0, 17.0));
        assert_eq!(config.dataset.path, PathBuf::from("runs/features.csv"));
        assert_eq!(config.training.max_iterations, 1000);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = PipelineConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let mut config = PipelineConfig::default();
        config.stimuli.push(StimulusConfig::new("10Hz", 9.0, 11.0));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_band_rejected() {
        let mut config = PipelineConfig::default();
        config.stimuli[1] = StimulusConfig::new("10Hz", 12.0, 8.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("10Hz"));
    }

    #[test]
    fn test_label_with_comma_rejected() {
        let mut config = PipelineConfig::default();
        config.stimuli[0] = StimulusConfig::new("off,dim", 0.0, 5.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut config = PipelineConfig::default();
        config.capture.duration_secs = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_duration_rejected() {
        let mut config = PipelineConfig::default();
        for secs in [1e20, MAX_CAPTURE_SECS + 1.0, f64::INFINITY, f64::NAN, -5.0] {
            config.capture.duration_secs = secs;
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "accepted {secs}"
            );
        }

        // Values a Duration cannot hold map to zero instead of panicking
        for secs in [1e20, f64::INFINITY, f64::NAN, -5.0] {
            config.capture.duration_secs = secs;
            assert_eq!(config.capture.duration(), Duration::ZERO);
        }

        config.capture.duration_secs = MAX_CAPTURE_SECS;
        config.validate().unwrap();
        assert_eq!(config.capture.duration(), Duration::from_secs(3600));
    }
}
