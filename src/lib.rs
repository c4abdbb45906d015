//! `remit-dash` library crate.
//!
//! The binary (`rdash`) is a thin wrapper around this library so that:
//!
//! - the preparation pipeline, catalog and simulator are testable without spawning processes
//! - the CLI and the TUI share one load pipeline
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod catalog;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod scenario;
pub mod tui;
