//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - fit inputs (`SampleSet`, `AxisOrder`, `DegreeSpec`, `FitOptions`, `Centering`)
//! - evaluation requests and results (`Points`, `Evaluated`)
//! - run configuration and the portable model file (`FitConfig`, `ModelFile`)

pub mod types;

pub use types::*;
