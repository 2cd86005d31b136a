//! Observation CSV ingest and export.
//!
//! Schema: a header row with `x`, `y`, `sigma` columns (case-insensitive, any
//! order; `wavelength`, `intensity` and `error` are accepted as aliases).
//! Extra columns are ignored. Any malformed row aborts the load with its line
//! number.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::StringRecord;

use crate::domain::ObservationSet;
use crate::error::AppError;

const X_NAMES: &[&str] = &["x", "wavelength"];
const Y_NAMES: &[&str] = &["y", "intensity"];
const SIGMA_NAMES: &[&str] = &["sigma", "error", "errors"];

/// Load observations from a CSV file.
pub fn read_observations_csv(path: &Path) -> Result<ObservationSet, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_observations(file)
}

/// Load observations from any reader (CSV with header).
pub fn read_observations<R: std::io::Read>(reader: R) -> Result<ObservationSet, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::io(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let col_x = find_column(&header_map, X_NAMES)?;
    let col_y = find_column(&header_map, Y_NAMES)?;
    let col_sigma = find_column(&header_map, SIGMA_NAMES)?;

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut sigma = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header, lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::io(format!("CSV parse error on line {line}: {e}")))?;
        x.push(parse_field(&record, col_x, line)?);
        y.push(parse_field(&record, col_y, line)?);
        sigma.push(parse_field(&record, col_sigma, line)?);
    }

    if x.is_empty() {
        return Err(AppError::domain("Observation CSV contains no rows."));
    }

    ObservationSet::new(x, y, sigma)
}

/// Write observations as `x,y,sigma` rows.
pub fn write_observations_csv(path: &Path, observations: &ObservationSet) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create CSV '{}': {e}", path.display())))?;

    writeln!(file, "x,y,sigma").map_err(|e| AppError::io(format!("Failed to write CSV header: {e}")))?;
    for (x, y, s) in observations.rows() {
        // `{}` on f64 prints the shortest string that round-trips.
        writeln!(file, "{x},{y},{s}").map_err(|e| AppError::io(format!("Failed to write CSV row: {e}")))?;
    }
    Ok(())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect()
}

fn find_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Result<usize, AppError> {
    names
        .iter()
        .find_map(|n| header_map.get(*n).copied())
        .ok_or_else(|| AppError::io(format!("Missing required CSV column (one of: {}).", names.join(", "))))
}

fn parse_field(record: &StringRecord, col: usize, line: usize) -> Result<f64, AppError> {
    let raw = record
        .get(col)
        .ok_or_else(|| AppError::io(format!("Line {line}: missing field {}.", col + 1)))?;
    raw.parse::<f64>()
        .map_err(|e| AppError::io(format!("Line {line}: invalid number '{raw}': {e}")))
}
