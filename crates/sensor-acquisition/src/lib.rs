//! Sensor Acquisition
//!
//! Async capture of `millis,adc` lines from the light-sensor board into
//! fixed-duration sample windows. Malformed lines are dropped and counted
//! so data-quality issues stay visible.

mod capture;
mod client;
mod error;
mod line;

pub use capture::{CaptureReport, CaptureSession};
pub use client::{SerialSensor, SerialSettings};
pub use error::{AcquisitionError, LineError};
pub use line::{parse_line, parse_line_bytes};
