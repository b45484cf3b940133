//! Output generation.
//!
//! # Submodules
//!
//! - [`json`]: Writes the run's article records as one JSON snapshot file

pub mod json;
