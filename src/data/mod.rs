//! Sample data sources that live outside the fitting core.

pub mod synth;

pub use synth::*;
