//! Command-line parsing for the remittances/growth dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the data/catalog/scenario code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Variable;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "rdash",
    version,
    about = "Remittances & growth dashboard: data preparation, ARDL/ECM and 3SLS results, scenarios"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the dataset and print its summary, descriptive statistics and preview.
    Summary(DataArgs),
    /// Plot one variable over the years as ASCII, with its KPIs.
    Series(SeriesArgs),
    /// Print the estimated result tables (all, or one by name).
    Tables(TablesArgs),
    /// Simulate the growth impact of shocks to the five drivers.
    Simulate(SimulateArgs),
    /// Write every result table (and the dataset, if loaded) to one .xlsx workbook.
    Export(ExportArgs),
    /// Launch the interactive TUI.
    ///
    /// The TUI uses the same load pipeline, catalog and simulator as the other
    /// commands, rendered with Ratatui.
    Tui(DataArgs),
}

/// How the dataset is located.
#[derive(Debug, Args, Clone, Default)]
pub struct DataArgs {
    /// Data file (.xlsx, .xls, .ods or .csv). Wins over the default file.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Do not try the default file (`base.xlsx` or RDASH_DEFAULT_FILE).
    #[arg(long)]
    pub no_auto_load: bool,

    /// Choose the data file interactively from files under the current directory.
    #[arg(long, conflicts_with = "file")]
    pub pick: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Variable to plot.
    #[arg(value_enum, default_value_t = Variable::Growth)]
    pub var: Variable,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct TablesArgs {
    /// Table name (e.g. 3SLS_eq2, Bounds_test). All tables when omitted.
    pub name: Option<String>,

    /// Print JSON instead of aligned text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    /// Trade-openness shock in points [-30, 30].
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub open: f64,

    /// Remittances shock in percent [-50, 50].
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub rem: f64,

    /// Investment shock in percent [-50, 50].
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub inv: f64,

    /// FDI shock in percent [-80, 80].
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub fdi: f64,

    /// Exchange-rate shock in percent [-30, 30].
    #[arg(long, default_value_t = 5.0, allow_negative_numbers = true)]
    pub tc: f64,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output file. Defaults to ARDL_3SLS_Resultats_YYYYMMDD.xlsx in the export directory.
    #[arg(long, value_name = "XLSX")]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_shocks() {
        let cli = Cli::try_parse_from(["rdash", "simulate", "--rem", "-20", "--tc", "-5.5"]).unwrap();
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.rem, -20.0);
        assert_eq!(args.tc, -5.5);
        assert_eq!(args.open, 10.0);
    }

    #[test]
    fn series_variable_and_file() {
        let cli = Cli::try_parse_from(["rdash", "series", "rem", "-f", "data.csv"]).unwrap();
        let Command::Series(args) = cli.command else {
            panic!("expected series");
        };
        assert_eq!(args.var, Variable::Rem);
        assert_eq!(args.data.file, Some(PathBuf::from("data.csv")));
    }

    #[test]
    fn pick_conflicts_with_file() {
        assert!(Cli::try_parse_from(["rdash", "summary", "--pick", "-f", "a.csv"]).is_err());
    }
}
