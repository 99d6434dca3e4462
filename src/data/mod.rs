//! Remote data sources.
//!
//! - per-instrument daily quote histories (`quotes`)
//! - instrument universe discovery (`universe`)

pub mod quotes;
pub mod universe;

pub use quotes::*;
pub use universe::*;
