//! Posterior summaries: derived parameters, marginal statistics and
//! credible envelopes of the model prediction.
//!
//! Everything here is a pure function of its arguments.

pub mod envelope;
pub mod marginal;

pub use envelope::*;
pub use marginal::*;
