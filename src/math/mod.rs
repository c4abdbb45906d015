//! Mathematical utilities: descriptive statistics, correlations and histograms.

pub mod stats;

pub use stats::*;
