//! Dataset preparation: column contract, year ordering, derived logs and
//! completeness statistics.

pub mod prepare;

pub use prepare::*;
