//! Flicker Feature Pipeline
//!
//! Wires acquisition, feature extraction, the CSV dataset and the
//! classifier together behind one configuration.

pub mod config;
mod error;
mod pipeline;

pub use config::{CaptureConfig, ConfigError, DatasetConfig, PipelineConfig, StimulusConfig};
pub use error::{PipelineError, Result};
pub use pipeline::{FeaturePipeline, WindowAnalysis};

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging; `RUST_LOG` overrides the default `info` level
pub fn init_logging() -> std::result::Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
