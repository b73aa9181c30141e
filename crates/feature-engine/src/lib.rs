//! Feature Engineering Engine
//!
//! Turns one capture window into labeled frequency domain features:
//! sampling-rate estimation, DC removal, one-sided magnitude spectrum,
//! dominant frequency, band power ratio, spectral centroid and spread.

mod error;
mod features;
mod fft;
mod rate;
mod record;
mod statistics;

pub use error::{FeatureError, Stage};
pub use features::{FeatureExtractor, FrequencyBand, InvalidBand, SpectralFeatures};
pub use fft::{SpectralAnalyzer, Spectrum};
pub use rate::RateEstimator;
pub use record::{round_to, FeatureRecord, COLUMNS, NUMERIC_COLUMNS};
pub use statistics::{center, mean, SignalSummary};
