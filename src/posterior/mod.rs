//! Posterior definition: forward model bound to observations, Gaussian
//! likelihood, pluggable prior.

pub mod model;
pub mod prior;

pub use model::*;
pub use prior::*;
