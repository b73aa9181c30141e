//! Capture-Window Sample Buffer
//!
//! Holds the ordered `(timestamp, value)` pairs collected during one
//! fixed-duration capture window.

mod buffer;

pub use buffer::{SampleBuffer, SampleBufferBuilder};

use serde::{Deserialize, Serialize};

/// A single raw sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    /// Capture timestamp in seconds
    pub timestamp_s: f64,
    /// Uncalibrated sensor reading (ADC counts)
    pub value: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(timestamp_s: f64, value: f64) -> Self {
        Self { timestamp_s, value }
    }

    /// Create a sample from a millisecond device timestamp
    pub fn from_millis(timestamp_ms: f64, value: f64) -> Self {
        Self {
            timestamp_s: timestamp_ms / 1000.0,
            value,
        }
    }
}
