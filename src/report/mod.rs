//! Reporting utilities: formatted terminal output for a run.

pub mod format;

pub use format::*;
