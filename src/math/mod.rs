//! Mathematical building blocks: Vandermonde design matrices, SVD least
//! squares and Horner evaluation.

pub mod design;
pub mod horner;
pub mod ols;

pub use design::*;
pub use horner::*;
pub use ols::*;
