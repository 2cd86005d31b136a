//! Least-squares starting point.
//!
//! Responsibilities:
//!
//! - generate the `(w1, w2)` grid
//! - solve the linear parameters at each node (parallel)
//! - pick the lowest χ² candidate

pub mod fitter;
pub mod width_grid;

pub use fitter::*;
pub use width_grid::*;
