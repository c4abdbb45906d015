//! Read-only registry of the pre-estimated result tables.
//!
//! The catalog is built once (see [`global`]) and never mutated; callers only
//! get shared references.

use std::sync::OnceLock;

use crate::domain::ResultTable;
use crate::error::DashError;

pub mod tables;

pub use tables::{
    ARDL_GENERAL, BOUNDS_TEST, DIAGNOSTICS, ECM_SHORT, GRANGER, LONG_RUN, THREE_SLS_EQ1, THREE_SLS_EQ2,
    THREE_SLS_EQ3, THREE_SLS_EQ4,
};

/// Names of the four structural equations, in system order.
pub const STRUCTURAL_EQUATIONS: [&str; 4] = [THREE_SLS_EQ1, THREE_SLS_EQ2, THREE_SLS_EQ3, THREE_SLS_EQ4];

#[derive(Debug, Clone)]
pub struct ResultsCatalog {
    tables: Vec<ResultTable>,
}

impl ResultsCatalog {
    pub fn new() -> Self {
        Self { tables: tables::all() }
    }

    pub fn lookup(&self, name: &str) -> Result<&ResultTable, DashError> {
        self.tables
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| DashError::TableNotFound { name: name.to_string() })
    }

    /// All tables in registration order.
    pub fn tables(&self) -> &[ResultTable] {
        &self.tables
    }

    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name()).collect()
    }

    /// The growth equation used by the scenario simulator.
    pub fn growth_equation(&self) -> Result<&ResultTable, DashError> {
        self.lookup(THREE_SLS_EQ2)
    }
}

impl Default for ResultsCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide catalog, constructed on first use.
pub fn global() -> &'static ResultsCatalog {
    static CATALOG: OnceLock<ResultsCatalog> = OnceLock::new();
    CATALOG.get_or_init(ResultsCatalog::new)
}
