//! Read/write run summary JSON files.
//!
//! The summary JSON is the portable result of a run:
//! - start point, mode and acceptance rate
//! - marginal statistics per parameter and for the width ratio
//! - the width-ratio density and the prediction envelope on their grids
//!
//! The schema is defined by `domain::SummaryFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::SummaryFile;
use crate::error::AppError;

/// Write a summary JSON file.
pub fn write_summary_json(path: &Path, summary: &SummaryFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create summary JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::io(format!("Failed to write summary JSON: {e}")))?;
    Ok(())
}

/// Read a summary JSON file.
pub fn read_summary_json(path: &Path) -> Result<SummaryFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open summary JSON '{}': {e}", path.display())))?;
    let summary: SummaryFile =
        serde_json::from_reader(file).map_err(|e| AppError::io(format!("Invalid summary JSON: {e}")))?;
    Ok(summary)
}
