//! Reporting: terminal formatting and cell styling of tables.

pub mod format;
pub mod style;

pub use format::*;
pub use style::*;
