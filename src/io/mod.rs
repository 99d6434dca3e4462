//! Input/output helpers.
//!
//! - quote CSV ingest + validation (`ingest`)
//! - signal-tagged output export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
