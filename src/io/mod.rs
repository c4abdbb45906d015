//! Input/output helpers.
//!
//! - spreadsheet / CSV ingest with a memoized cache (`ingest`)
//! - multi-sheet `.xlsx` export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
