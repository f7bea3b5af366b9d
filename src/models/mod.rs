//! Fitted polynomial models.
//!
//! A fit over one series and a fit over a table of series behave differently
//! on evaluation (scalar/array in and out versus a `P x M` table), so they are
//! separate types behind one tagged enum.

pub mod model;

pub use model::*;
