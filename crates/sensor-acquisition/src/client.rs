//! Serial Sensor Client
//!
//! Opens the sensor board's serial port and captures fixed-duration windows.

use crate::capture::{CaptureReport, CaptureSession};
use crate::error::AcquisitionError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::io::BufReader;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::info;

/// Serial port settings for the sensor board
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Device path (e.g., "/dev/ttyACM0" or "COM3")
    pub port: String,
    /// Baud rate the board prints at
    pub baud_rate: u32,
    /// Wait after opening; the board resets when the port opens
    pub settle_ms: u64,
    /// Per-read timeout of the port driver
    pub read_timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_string(),
            baud_rate: 115_200,
            settle_ms: 2000,
            read_timeout_ms: 1000,
        }
    }
}

/// Light sensor attached over a serial port
pub struct SerialSensor {
    port: String,
    reader: BufReader<SerialStream>,
}

impl SerialSensor {
    /// Open the port and wait for the board to come out of reset
    pub async fn open(settings: &SerialSettings) -> Result<Self, AcquisitionError> {
        info!(
            "Opening sensor on {} at {} baud",
            settings.port, settings.baud_rate
        );

        let stream = tokio_serial::new(&settings.port, settings.baud_rate)
            .timeout(Duration::from_millis(settings.read_timeout_ms))
            .open_native_async()
            .map_err(|e| AcquisitionError::SerialError {
                port: settings.port.clone(),
                reason: e.to_string(),
            })?;

        tokio::time::sleep(Duration::from_millis(settings.settle_ms)).await;

        Ok(Self {
            port: settings.port.clone(),
            reader: BufReader::new(stream),
        })
    }

    /// Capture one window of `duration`
    pub async fn capture(&mut self, duration: Duration) -> Result<CaptureReport, AcquisitionError> {
        CaptureSession::new().capture(&mut self.reader, duration).await
    }

    /// Device path of the open port
    pub fn port(&self) -> &str {
        &self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = SerialSettings::default();
        assert_eq!(settings.baud_rate, 115_200);
        assert_eq!(settings.settle_ms, 2000);
    }

    #[tokio::test]
    async fn test_open_missing_port_fails() {
        let settings = SerialSettings {
            port: "/dev/does-not-exist-flicker".to_string(),
            settle_ms: 0,
            ..Default::default()
        };
        let err = SerialSensor::open(&settings).await.err().unwrap();
        assert!(matches!(err, AcquisitionError::SerialError { .. }));
        assert!(err.to_string().contains("/dev/does-not-exist-flicker"));
    }
}
