//! `spectro-fit` library crate.
//!
//! Bayesian fit of a two-line (Lorentzian) spectrum on a linear background,
//! with posterior summaries in parameter space and pointwise credible envelopes
//! in prediction space.
//!
//! The binary (`spectro`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the posterior can be handed to any sampler implementing `sampler::Sampler`

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod posterior;
pub mod report;
pub mod sampler;
pub mod summary;
