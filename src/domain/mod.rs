//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the input contract (`Variable`, `LogVariable`, `Observation`) and the
//!   dataset stages (`RawDataset` → `ValidatedDataset` → `OrderedDataset` → `AugmentedDataset`)
//! - the `Tabular` seam shared by datasets and result tables
//! - result tables (`ResultTable`, `CoefficientRow`, ...)
//! - scenario inputs/outputs and the run configuration

pub mod results;
pub mod types;

pub use results::*;
pub use types::*;
