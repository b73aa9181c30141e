//! CSV Feature Dataset

use crate::StorageError;
use feature_engine::{FeatureRecord, COLUMNS};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Header line of the dataset file
pub const HEADER: &str =
    "label,dominant_freq,band_power_ratio,peak_magnitude,spectral_centroid,spectral_spread";

/// Append-only dataset of feature records.
///
/// Rows are only ever appended; existing content is never rewritten.
#[derive(Debug, Clone)]
pub struct FeatureDataset {
    path: PathBuf,
}

impl FeatureDataset {
    /// Dataset backed by the CSV file at `path` (created on first append)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, writing the header first if the file is new or empty
    pub fn append(&self, record: &FeatureRecord) -> Result<(), StorageError> {
        validate_label(&record.label)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let needs_header = match self.read_header()? {
            None => true,
            Some(found) if found == HEADER => false,
            Some(found) => {
                return Err(StorageError::SchemaMismatch {
                    path: self.display_path(),
                    expected: HEADER.to_string(),
                    found,
                })
            }
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        let mut writer = BufWriter::new(file);

        if needs_header {
            debug!("Writing header to new dataset {}", self.path.display());
            writeln!(writer, "{}", HEADER).map_err(|e| self.io_error(e))?;
        }
        writeln!(writer, "{}", format_row(record)).map_err(|e| self.io_error(e))?;
        writer.flush().map_err(|e| self.io_error(e))?;

        info!("Data saved to: {}", self.path.display());
        Ok(())
    }

    /// Load every record; a missing file is an empty dataset
    pub fn load(&self) -> Result<Vec<FeatureRecord>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut lines = BufReader::new(file).lines();
        let header = match lines.next() {
            Some(line) => line.map_err(|e| self.io_error(e))?,
            None => return Ok(Vec::new()),
        };
        let indices = self.column_indices(&header)?;

        let mut records = Vec::new();
        for (i, line) in lines.enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim().is_empty() {
                continue;
            }
            // Header is line 1
            records.push(self.parse_row(&line, &indices, i + 2)?);
        }

        debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn read_header(&self) -> Result<Option<String>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut first = String::new();
        BufReader::new(file)
            .read_line(&mut first)
            .map_err(|e| self.io_error(e))?;
        let first = first.trim_end_matches(['\r', '\n']);
        if first.is_empty() {
            Ok(None)
        } else {
            Ok(Some(first.to_string()))
        }
    }

    /// Position of each schema column in the file, located by name
    fn column_indices(&self, header: &str) -> Result<[usize; 6], StorageError> {
        let names: Vec<&str> = header.trim_end_matches('\r').split(',').collect();
        let mut indices = [0usize; 6];
        for (slot, column) in indices.iter_mut().zip(COLUMNS) {
            *slot = names.iter().position(|n| *n == column).ok_or_else(|| {
                StorageError::SchemaMismatch {
                    path: self.display_path(),
                    expected: HEADER.to_string(),
                    found: header.to_string(),
                }
            })?;
        }
        Ok(indices)
    }

    fn parse_row(
        &self,
        line: &str,
        indices: &[usize; 6],
        line_no: usize,
    ) -> Result<FeatureRecord, StorageError> {
        let fields: Vec<&str> = line.trim_end_matches('\r').split(',').collect();
        let malformed = |reason: String| StorageError::MalformedRow {
            path: self.display_path(),
            line: line_no,
            reason,
        };

        let label = fields
            .get(indices[0])
            .ok_or_else(|| malformed("missing column label".to_string()))?;

        let mut values = [0.0f64; 5];
        for (slot, (i, column)) in values.iter_mut().zip(COLUMNS.iter().enumerate().skip(1)) {
            let text = fields
                .get(indices[i])
                .ok_or_else(|| malformed(format!("missing column {column}")))?;
            *slot = text
                .trim()
                .parse()
                .map_err(|_| malformed(format!("column {column} is not a number: {text:?}")))?;
        }

        Ok(FeatureRecord {
            label: label.to_string(),
            dominant_freq: values[0],
            band_power_ratio: values[1],
            peak_magnitude: values[2],
            spectral_centroid: values[3],
            spectral_spread: values[4],
        })
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.display_path(),
            source,
        }
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

fn validate_label(label: &str) -> Result<(), StorageError> {
    if label.is_empty() || label.contains([',', '"', '\r', '\n']) {
        return Err(StorageError::InvalidLabel(label.to_string()));
    }
    Ok(())
}

fn format_row(record: &FeatureRecord) -> String {
    format!(
        "{},{},{},{},{},{}",
        record.label,
        record.dominant_freq,
        record.band_power_ratio,
        record.peak_magnitude,
        record.spectral_centroid,
        record.spectral_spread
    )
}
