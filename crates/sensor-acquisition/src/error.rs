//! Acquisition Error Types

use thiserror::Error;

/// Errors that can occur while capturing a window
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// Serial port could not be opened or configured
    #[error("Serial port {port} error: {reason}")]
    SerialError { port: String, reason: String },

    /// Underlying stream failed mid-capture
    #[error("I/O error during capture: {0}")]
    Io(#[from] std::io::Error),

    /// Capture window length must be positive
    #[error("Capture duration must be greater than zero")]
    ZeroDuration,
}

/// Reasons a transport line is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineError {
    /// Bytes were not valid UTF-8
    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    /// Line did not split into exactly `millis,adc`
    #[error("expected 2 comma-separated fields, got {0}")]
    FieldCount(usize),

    /// A field was not a number
    #[error("field {field} is not a number: {text:?}")]
    NotANumber { field: &'static str, text: String },

    /// A field parsed to NaN or infinity
    #[error("field {field} is not finite")]
    NonFinite { field: &'static str },
}
