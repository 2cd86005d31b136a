//! Export the prediction envelope to CSV.
//!
//! One row per grid point: `x,lower,upper,mode`. Meant for spreadsheets or an
//! external plotting script.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::EnvelopeGrid;
use crate::error::AppError;

/// Write the envelope grid to a CSV file.
pub fn write_envelope_csv(path: &Path, envelope: &EnvelopeGrid) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create envelope CSV '{}': {e}", path.display())))?;
    write_envelope(file, envelope)
}

pub fn write_envelope<W: Write>(mut out: W, envelope: &EnvelopeGrid) -> Result<(), AppError> {
    let n = envelope.x.len();
    if envelope.lower.len() != n || envelope.upper.len() != n || envelope.mode.len() != n {
        return Err(AppError::io("Envelope columns differ in length."));
    }

    writeln!(out, "x,lower,upper,mode")
        .map_err(|e| AppError::io(format!("Failed to write envelope CSV header: {e}")))?;
    for i in 0..n {
        writeln!(
            out,
            "{:.6},{:.6},{:.6},{:.6}",
            envelope.x[i], envelope.lower[i], envelope.upper[i], envelope.mode[i]
        )
        .map_err(|e| AppError::io(format!("Failed to write envelope CSV row: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let env = EnvelopeGrid {
            x: vec![410.0, 440.0],
            lower: vec![30.0, 20.0],
            upper: vec![40.0, 30.0],
            mode: vec![35.0, 25.0],
        };
        let mut buf = Vec::new();
        write_envelope(&mut buf, &env).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "x,lower,upper,mode");
        assert_eq!(lines[1], "410.000000,30.000000,40.000000,35.000000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn ragged_columns_rejected() {
        let env = EnvelopeGrid {
            x: vec![410.0, 440.0],
            lower: vec![30.0],
            upper: vec![40.0, 30.0],
            mode: vec![35.0, 25.0],
        };
        assert!(write_envelope(Vec::new(), &env).is_err());
    }
}
