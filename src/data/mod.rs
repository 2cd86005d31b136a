//! Observation sources: reproducible synthetic spectra.

pub mod sample;

pub use sample::*;
