//! Polynomial fitting orchestration.
//!
//! Responsibilities:
//!
//! - resolve the degree specification against the sample set
//! - build the shared design matrix once
//! - solve every series (batched or per series) and assemble the model

pub mod fitter;

pub use fitter::*;
