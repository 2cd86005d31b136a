//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the parameter vector (`Theta`) and its named slots (`ParamIndex`)
//! - observations (`ObservationSet`) and line centres (`LineCenters`)
//! - run configuration (`AnalysisConfig`, `PriorKind`)
//! - exported summaries (`SummaryFile`, `EnvelopeGrid`, etc.)

pub mod types;

pub use types::*;
