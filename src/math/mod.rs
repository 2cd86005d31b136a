//! Mathematical utilities: line shapes, grids, sample statistics and weighted
//! least squares.

pub mod grid;
pub mod lineshape;
pub mod ols;
pub mod stats;

pub use grid::*;
pub use lineshape::*;
pub use ols::*;
pub use stats::*;
