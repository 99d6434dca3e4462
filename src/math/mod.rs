//! Mathematical utilities: least-squares regression for the AR(1) fit.

pub mod ols;

pub use ols::*;
