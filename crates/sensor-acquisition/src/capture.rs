//! Fixed-Duration Capture Loop

use crate::error::AcquisitionError;
use crate::line::parse_line_bytes;
use sample_buffer::{SampleBuffer, SampleBufferBuilder};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of one capture window
#[derive(Debug, Clone)]
pub struct CaptureReport {
    /// Samples collected, in capture order
    pub buffer: SampleBuffer,
    /// Non-blank lines received
    pub lines_read: usize,
    /// Lines rejected as malformed
    pub dropped_lines: usize,
}

impl CaptureReport {
    /// Fraction of received lines that were dropped
    pub fn drop_ratio(&self) -> f64 {
        if self.lines_read == 0 {
            0.0
        } else {
            self.dropped_lines as f64 / self.lines_read as f64
        }
    }
}

/// Collects `millis,adc` lines from a line-oriented source
#[derive(Debug, Default)]
pub struct CaptureSession {
    builder: SampleBufferBuilder,
    line: Vec<u8>,
    lines_read: usize,
    dropped_lines: usize,
}

impl CaptureSession {
    /// Create an empty capture session
    pub fn new() -> Self {
        Self::default()
    }

    /// Read lines until `duration` elapses or the source hits EOF
    pub async fn capture<R>(
        mut self,
        reader: &mut R,
        duration: Duration,
    ) -> Result<CaptureReport, AcquisitionError>
    where
        R: AsyncBufRead + Unpin,
    {
        if duration.is_zero() {
            return Err(AcquisitionError::ZeroDuration);
        }

        info!("Collecting {:.1} seconds of data...", duration.as_secs_f64());
        let deadline = Instant::now() + duration;

        loop {
            let now = Instant::now();
            if now >= deadline {
                debug!("Capture window elapsed");
                break;
            }

            self.line.clear();
            match tokio::time::timeout(deadline - now, reader.read_until(b'\n', &mut self.line)).await {
                // Window closed while waiting; a partial line is incomplete data
                Err(_) => {
                    if !self.line.iter().all(u8::is_ascii_whitespace) {
                        self.lines_read += 1;
                        self.dropped_lines += 1;
                    }
                    debug!("Capture window elapsed while waiting for data");
                    break;
                }
                Ok(Ok(0)) => {
                    debug!("Source closed before the capture window elapsed");
                    break;
                }
                Ok(Ok(_)) => self.ingest_current_line(),
                Ok(Err(e)) => return Err(e.into()),
            }
        }

        Ok(self.finish())
    }

    /// Read every line until EOF, e.g. a recorded capture log
    pub async fn read_all<R>(mut self, reader: &mut R) -> Result<CaptureReport, AcquisitionError>
    where
        R: AsyncBufRead + Unpin,
    {
        loop {
            self.line.clear();
            if reader.read_until(b'\n', &mut self.line).await? == 0 {
                break;
            }
            self.ingest_current_line();
        }
        Ok(self.finish())
    }

    fn ingest_current_line(&mut self) {
        match parse_line_bytes(&self.line) {
            Ok(Some(sample)) => {
                self.lines_read += 1;
                self.builder.push(sample);
            }
            Ok(None) => {}
            Err(e) => {
                self.lines_read += 1;
                self.dropped_lines += 1;
                debug!("Dropped line {}: {}", self.lines_read, e);
            }
        }
    }

    fn finish(self) -> CaptureReport {
        let report = CaptureReport {
            buffer: self.builder.finish(),
            lines_read: self.lines_read,
            dropped_lines: self.dropped_lines,
        };

        info!("Got {} data points.", report.buffer.len());
        if report.dropped_lines > 0 {
            warn!(
                "Dropped {} of {} lines as malformed ({:.1}%)",
                report.dropped_lines,
                report.lines_read,
                report.drop_ratio() * 100.0
            );
        }
        report
    }
}
