//! Spectral-line forward model.
//!
//! Implemented as small, pure functions so that the posterior, the start-point
//! fitter and the summaries can share them.

pub mod model;

pub use model::*;
