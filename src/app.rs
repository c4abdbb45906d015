//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and assembles the `DashConfig`
//! - sets up logging
//! - runs the load pipeline, the catalog and the simulator
//! - prints reports/plots or launches the TUI
//! - writes the workbook export

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Command, DataArgs, ExportArgs, SeriesArgs, SimulateArgs, TablesArgs};
use crate::domain::{DashConfig, ScenarioShock};
use crate::error::AppError;
use crate::io::{export, ingest::DatasetCache};
use crate::{catalog, math, report, scenario};

pub mod pipeline;

use pipeline::DataState;

/// Environment variable overriding the default data file.
pub const ENV_DEFAULT_FILE: &str = "RDASH_DEFAULT_FILE";
/// `0`/`1` (or `false`/`true`): auto-load the default file.
pub const ENV_AUTO_LOAD: &str = "RDASH_AUTO_LOAD";
/// Directory the TUI export (and the CLI default export) is written to.
pub const ENV_EXPORT_DIR: &str = "RDASH_EXPORT_DIR";

/// Log file used in TUI mode, so logs never land on the drawn terminal.
const TUI_LOG_FILE: &str = "rdash.log";

/// Entry point for the `rdash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `rdash` and `rdash -f base.csv` to behave like `rdash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_logging(matches!(cli.command, Command::Tui(_)));

    match cli.command {
        Command::Summary(args) => handle_summary(&args),
        Command::Series(args) => handle_series(&args),
        Command::Tables(args) => handle_tables(&args),
        Command::Simulate(args) => handle_simulate(&args),
        Command::Export(args) => handle_export(&args),
        Command::Tui(args) => crate::tui::run(dash_config_from_args(&args)?),
    }
}

/// `RUST_LOG`-driven logging (default `warn`): stderr for the CLI, a file for the TUI.
fn init_logging(tui: bool) {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if !tui {
        let _ = tracing_subscriber::registry()
            .with(filter())
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
        return;
    }

    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(TUI_LOG_FILE) else {
        return;
    };
    let _ = tracing_subscriber::registry()
        .with(filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
}

/// Defaults, then `.env`/environment, then flags.
pub fn dash_config_from_args(args: &DataArgs) -> Result<DashConfig, AppError> {
    dotenvy::dotenv().ok();
    let mut config = apply_env(DashConfig::default(), |key| std::env::var(key).ok())?;

    if args.no_auto_load {
        config.auto_load = false;
    }
    if let Some(path) = &args.file {
        config.data_file = Some(path.clone());
    }
    if args.pick {
        config.data_file = Some(crate::cli::picker::prompt_for_data_path()?);
    }
    Ok(config)
}

/// Environment overrides, read through `lookup` so they can be tested without
/// touching the process environment.
fn apply_env(mut config: DashConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<DashConfig, AppError> {
    if let Some(file) = lookup(ENV_DEFAULT_FILE).filter(|v| !v.trim().is_empty()) {
        config.default_file = PathBuf::from(file.trim());
    }
    if let Some(raw) = lookup(ENV_AUTO_LOAD) {
        config.auto_load = match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                return Err(AppError::new(
                    2,
                    format!("{ENV_AUTO_LOAD} must be 0 or 1 (got '{other}')"),
                ));
            }
        };
    }
    if let Some(dir) = lookup(ENV_EXPORT_DIR).filter(|v| !v.trim().is_empty()) {
        config.export_dir = PathBuf::from(dir.trim());
    }
    Ok(config)
}

fn load(args: &DataArgs) -> Result<(DashConfig, DataState), AppError> {
    let config = dash_config_from_args(args)?;
    let mut cache = DatasetCache::new();
    let state = pipeline::load_data(&config, &mut cache);
    Ok((config, state))
}

fn handle_summary(args: &DataArgs) -> Result<(), AppError> {
    let (_, state) = load(args)?;
    let data = state.require()?;

    println!("Dataset: {}", data.source.display());
    println!("{}", report::format_summary(&data.summary));
    println!("== Descriptive statistics ==");
    println!("{}", report::format_table(&data.describe));
    println!("== Pearson correlation ==");
    println!("{}", report::format_table(&data.correlation));
    println!("== First 20 rows ==");
    println!("{}", report::format_table_head(&data.augmented, 20));
    Ok(())
}

fn handle_series(args: &SeriesArgs) -> Result<(), AppError> {
    let (_, state) = load(&args.data)?;
    let data = state.require()?;

    let series = data.augmented.series(args.var);
    let title = format!("{} ({})", args.var, args.var.description());
    println!("{}", crate::plot::render_series_plot(&title, &series, args.width, args.height));

    match math::series_stats(&data.augmented.known_values(args.var)) {
        Some(stats) => print!("{}", report::format_series_kpis(args.var.column_name(), &stats)),
        None => println!("{}: no known values", args.var),
    }
    Ok(())
}

fn handle_tables(args: &TablesArgs) -> Result<(), AppError> {
    let catalog = catalog::global();
    let tables = match &args.name {
        Some(name) => vec![catalog.lookup(name)?],
        None => catalog.tables().iter().collect(),
    };

    if args.json {
        let json = serde_json::to_string_pretty(&tables)
            .map_err(|e| AppError::new(4, format!("Failed to serialize tables: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    for table in tables {
        println!("{}", report::format_result_table(table));
    }
    Ok(())
}

fn shock_from_args(args: &SimulateArgs) -> ScenarioShock {
    ScenarioShock {
        d_open: args.open,
        d_rem_pct: args.rem,
        d_inv_pct: args.inv,
        d_fdi_pct: args.fdi,
        d_tc_pct: args.tc,
    }
}

fn handle_simulate(args: &SimulateArgs) -> Result<(), AppError> {
    let shock = shock_from_args(args);
    scenario::check_bounds(&shock)?;

    let equation = catalog::global().growth_equation()?;
    let result = scenario::simulate(&shock, equation)?;
    info!(equation = %result.equation, delta = result.delta, "scenario simulated");

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| AppError::new(4, format!("Failed to serialize scenario: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", report::format_scenario(&shock, &result));
    }
    Ok(())
}

fn handle_export(args: &ExportArgs) -> Result<(), AppError> {
    let (config, state) = load(&args.data)?;

    // A file the user named must load; a missing default only drops the data sheets.
    if config.data_file.is_some() || matches!(state, DataState::Invalid { .. }) {
        state.require()?;
    }
    if state.prepared().is_none() {
        warn!(notice = %state.notice(), "exporting without dataset sheets");
        eprintln!("{} Exporting result tables only.", state.notice());
    }

    let sheets = pipeline::export_sheets(catalog::global(), state.prepared());
    let bytes = export::export(&sheets)?;

    let (dir, file_name) = export_target(&config, args.out.as_deref(), chrono::Local::now().date_naive());
    let path = export::write_export(&dir, &file_name, &bytes)?;
    println!("Wrote {} sheets to {}", sheets.len(), path.display());
    Ok(())
}

/// Directory and file name for an export: `--out` as given, otherwise the
/// dated default name inside the export directory.
fn export_target(config: &DashConfig, out: Option<&Path>, date: chrono::NaiveDate) -> (PathBuf, String) {
    match out.and_then(|o| o.file_name().map(|name| (o, name))) {
        Some((out, name)) => {
            let dir = out
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            (dir, name.to_string_lossy().into_owned())
        }
        None => (config.export_dir.clone(), export::default_export_file_name(date)),
    }
}

/// Rewrite argv so `rdash` defaults to `rdash tui`.
///
/// Rules:
/// - `rdash`                      -> `rdash tui`
/// - `rdash -f base.csv ...`      -> `rdash tui -f base.csv ...`
/// - `rdash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "summary" | "series" | "tables" | "simulate" | "export" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_and_flags_default_to_tui() {
        assert_eq!(rewrite_args(argv(&["rdash"])), argv(&["rdash", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["rdash", "-f", "a.csv"])),
            argv(&["rdash", "tui", "-f", "a.csv"])
        );
        assert_eq!(rewrite_args(argv(&["rdash", "--help"])), argv(&["rdash", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["rdash", "simulate", "--rem", "-20"])),
            argv(&["rdash", "simulate", "--rem", "-20"])
        );
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = apply_env(DashConfig::default(), |key| match key {
            ENV_DEFAULT_FILE => Some("data/macro.csv".to_string()),
            ENV_AUTO_LOAD => Some("0".to_string()),
            ENV_EXPORT_DIR => Some(" out ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.default_file, PathBuf::from("data/macro.csv"));
        assert!(!config.auto_load);
        assert_eq!(config.export_dir, PathBuf::from("out"));
        assert!(config.data_file.is_none());
    }

    #[test]
    fn invalid_auto_load_value_is_an_input_error() {
        let err = apply_env(DashConfig::default(), |key| {
            (key == ENV_AUTO_LOAD).then(|| "maybe".to_string())
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn export_target_prefers_out_flag() {
        let config = DashConfig {
            export_dir: PathBuf::from("exports"),
            ..DashConfig::default()
        };
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let (dir, name) = export_target(&config, None, date);
        assert_eq!(dir, PathBuf::from("exports"));
        assert_eq!(name, "ARDL_3SLS_Resultats_20240309.xlsx");

        let (dir, name) = export_target(&config, Some(Path::new("report.xlsx")), date);
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "report.xlsx");

        let (dir, _) = export_target(&config, Some(Path::new("/tmp/x/report.xlsx")), date);
        assert_eq!(dir, PathBuf::from("/tmp/x"));
    }

    #[test]
    fn simulate_flags_map_to_shock() {
        let cli = crate::cli::Cli::try_parse_from(["rdash", "simulate", "--open", "-5"]).unwrap();
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        let shock = shock_from_args(&args);
        assert_eq!(shock.d_open, -5.0);
        assert_eq!(shock.d_tc_pct, 5.0);
    }
}
