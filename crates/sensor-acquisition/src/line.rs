//! Transport Line Parsing
//!
//! The sensor board prints one reading per line as `<millis>,<adc>`.

use crate::error::LineError;
use sample_buffer::Sample;

/// Parse raw line bytes (without or with trailing newline).
///
/// Returns `Ok(None)` for blank lines, which carry no reading.
pub fn parse_line_bytes(bytes: &[u8]) -> Result<Option<Sample>, LineError> {
    let text = std::str::from_utf8(bytes).map_err(|_| LineError::InvalidUtf8)?;
    parse_line(text)
}

/// Parse one text line into a sample; the timestamp is converted to seconds
pub fn parse_line(line: &str) -> Result<Option<Sample>, LineError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() != 2 {
        return Err(LineError::FieldCount(parts.len()));
    }

    let timestamp_ms = parse_field("timestamp", parts[0])?;
    let value = parse_field("value", parts[1])?;
    Ok(Some(Sample::from_millis(timestamp_ms, value)))
}

fn parse_field(field: &'static str, text: &str) -> Result<f64, LineError> {
    let text = text.trim();
    let value: f64 = text.parse().map_err(|_| LineError::NotANumber {
        field,
        text: text.to_string(),
    })?;
    if !value.is_finite() {
        return Err(LineError::NonFinite { field });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_line() {
        let sample = parse_line("1500,512\r\n").unwrap().unwrap();
        assert_eq!(sample.timestamp_s, 1.5);
        assert_eq!(sample.value, 512.0);
    }

    #[test]
    fn test_parse_tolerates_field_whitespace() {
        let sample = parse_line(" 20 , 1023 ").unwrap().unwrap();
        assert_eq!(sample.timestamp_s, 0.02);
        assert_eq!(sample.value, 1023.0);
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_line("\r\n").unwrap(), None);
        assert_eq!(parse_line("").unwrap(), None);
    }

    #[test]
    fn test_wrong_field_count() {
        assert_eq!(parse_line("1500").unwrap_err(), LineError::FieldCount(1));
        assert_eq!(parse_line("1,2,3").unwrap_err(), LineError::FieldCount(3));
    }

    #[test]
    fn test_not_a_number() {
        let err = parse_line("15x0,512").unwrap_err();
        assert!(matches!(err, LineError::NotANumber { field: "timestamp", .. }));
        let err = parse_line("1500,").unwrap_err();
        assert!(matches!(err, LineError::NotANumber { field: "value", .. }));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(
            parse_line("1500,nan").unwrap_err(),
            LineError::NonFinite { field: "value" }
        );
        assert_eq!(
            parse_line("inf,3").unwrap_err(),
            LineError::NonFinite { field: "timestamp" }
        );
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(
            parse_line_bytes(&[0x31, 0xFF, 0x2C, 0x32]).unwrap_err(),
            LineError::InvalidUtf8
        );
    }
}
