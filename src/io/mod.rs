//! Input/output helpers.
//!
//! - observation CSV read/write (`observations`)
//! - envelope CSV export (`export`)
//! - run summary JSON read/write (`summary`)

pub mod export;
pub mod observations;
pub mod summary;

pub use export::*;
pub use observations::*;
pub use summary::*;
