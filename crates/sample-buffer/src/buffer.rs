//! Sample Buffer Implementation

use crate::Sample;
use serde::{Deserialize, Serialize};

/// Default pre-allocation (10 s at ~1 kHz)
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Ordered, immutable collection of samples from one capture window.
///
/// Capture order defines the time axis. Timestamps are expected to be
/// non-decreasing but isolated irregularities are kept as-is; downstream
/// rate estimation is responsible for tolerating them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleBuffer {
    samples: Vec<Sample>,
}

impl SampleBuffer {
    /// Start building a buffer for a new capture window
    pub fn builder() -> SampleBufferBuilder {
        SampleBufferBuilder::with_capacity(DEFAULT_CAPACITY)
    }

    /// Build a buffer directly from samples already in capture order
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Number of samples in the window
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the window captured nothing
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in capture order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Timestamps in capture order
    pub fn timestamps(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.timestamp_s).collect()
    }

    /// Raw values in capture order
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    /// Span between first and last timestamp (seconds)
    pub fn span_seconds(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.timestamp_s - first.timestamp_s,
            _ => 0.0,
        }
    }
}

/// Accumulates samples while a capture window is open.
///
/// `finish` consumes the builder, so a buffer cannot be extended after
/// capture ends.
#[derive(Debug, Default)]
pub struct SampleBufferBuilder {
    samples: Vec<Sample>,
}

impl SampleBufferBuilder {
    /// Create a builder with pre-allocated storage
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Append a sample in capture order
    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// Samples collected so far
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if nothing has been collected yet
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Close the capture window
    pub fn finish(self) -> SampleBuffer {
        SampleBuffer {
            samples: self.samples,
        }
    }
}
