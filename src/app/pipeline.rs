//! Shared "load pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve source -> read (memoized) -> validate -> sort -> derive logs -> stats
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::PathBuf;

use tracing::{info, warn};

use crate::catalog::ResultsCatalog;
use crate::data::prepare;
use crate::domain::{AugmentedDataset, DashConfig, DatasetSummary, LogVariable, RawDataset, Tabular};
use crate::error::DashError;
use crate::io::ingest::DatasetCache;
use crate::math::{self, CorrelationMatrix, DescribeTable};

/// Sheet holding the augmented dataset in an export.
pub const DATA_SHEET: &str = "Data";
/// Sheet holding the descriptive statistics in an export.
pub const SUMMARY_SHEET: &str = "Summary_stats";

/// Where the dataset comes from, after applying the load policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A file the user chose explicitly.
    Explicit(PathBuf),
    /// The default file, tried because auto-load is on.
    Default(PathBuf),
    /// Nothing to load.
    None,
}

/// An explicit file wins; otherwise the default file when auto-load is on.
pub fn resolve_source(config: &DashConfig) -> DataSource {
    match &config.data_file {
        Some(path) => DataSource::Explicit(path.clone()),
        None if config.auto_load => DataSource::Default(config.default_file.clone()),
        None => DataSource::None,
    }
}

/// Everything derived from a successfully loaded dataset.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub source: PathBuf,
    pub augmented: AugmentedDataset,
    pub summary: DatasetSummary,
    pub describe: DescribeTable,
    pub correlation: CorrelationMatrix,
}

/// The request-scoped dataset value. Replaced wholesale on every (re)load.
#[derive(Debug, Clone)]
pub enum DataState {
    /// Auto-load off and no file chosen.
    NotLoaded { notice: String },
    /// No file to read, or the chosen/default file could not be read.
    Unavailable(DashError),
    /// A file was read but its contents failed validation.
    Invalid { source: PathBuf, error: DashError },
    Ready(Box<PreparedData>),
}

impl DataState {
    pub fn prepared(&self) -> Option<&PreparedData> {
        match self {
            DataState::Ready(p) => Some(&**p),
            _ => None,
        }
    }

    /// One-line status for the front-ends.
    pub fn notice(&self) -> String {
        match self {
            DataState::NotLoaded { notice } => notice.clone(),
            DataState::Unavailable(e) => e.to_string(),
            DataState::Invalid { source, error } => format!("{}: {error}", source.display()),
            DataState::Ready(p) => format!(
                "Loaded {} ({} rows, {:.1}% complete)",
                p.source.display(),
                p.summary.row_count,
                p.summary.completeness_pct
            ),
        }
    }

    /// Dataset or the error that explains its absence (for CLI commands that need data).
    pub fn require(&self) -> Result<&PreparedData, DashError> {
        match self {
            DataState::Ready(p) => Ok(&**p),
            DataState::NotLoaded { notice } => Err(DashError::DataUnavailable { reason: notice.clone() }),
            DataState::Unavailable(e) | DataState::Invalid { error: e, .. } => Err(e.clone()),
        }
    }
}

/// validate -> sort -> derive logs -> summary / describe / correlation.
pub fn prepare_dataset(source: PathBuf, raw: &RawDataset) -> Result<PreparedData, DashError> {
    let validated = prepare::validate(raw)?;
    let ordered = prepare::sort_by_year(&validated.observations);
    let augmented = prepare::derive_logs(&ordered);

    for var in LogVariable::ALL {
        let unknown = augmented.rows.iter().filter(|r| r.derived.get(var).is_none()).count();
        if unknown > 0 {
            warn!(column = var.column_name(), unknown, "derived log has unknown values");
        }
    }

    let summary = prepare::summarize(&augmented);
    let describe = math::describe(&augmented);
    let correlation = math::correlation_matrix(&augmented);
    Ok(PreparedData {
        source,
        augmented,
        summary,
        describe,
        correlation,
    })
}

/// Apply the load policy and run the pipeline. Never fails: every outcome is a `DataState`.
pub fn load_data(config: &DashConfig, cache: &mut DatasetCache) -> DataState {
    let path = match resolve_source(config) {
        DataSource::None => {
            return DataState::NotLoaded {
                notice: "Auto-load is off; choose a data file to load.".to_string(),
            };
        }
        DataSource::Default(path) if !path.exists() => {
            info!(path = %path.display(), "default data file absent");
            return DataState::Unavailable(DashError::DataUnavailable {
                reason: format!("default file '{}' not found", path.display()),
            });
        }
        DataSource::Default(path) | DataSource::Explicit(path) => path,
    };

    let raw = match cache.load(&path) {
        Ok(raw) => raw,
        Err(error) => {
            warn!(path = %path.display(), %error, "dataset read failed");
            return DataState::Unavailable(DashError::DataUnavailable {
                reason: error.to_string(),
            });
        }
    };

    match prepare_dataset(path.clone(), &raw) {
        Ok(prepared) => DataState::Ready(Box::new(prepared)),
        Err(error) => {
            warn!(path = %path.display(), %error, "dataset rejected");
            DataState::Invalid { source: path, error }
        }
    }
}

/// Sheets of an export: catalog tables in order, then the dataset sheets if loaded.
pub fn export_sheets<'a>(
    catalog: &'a ResultsCatalog,
    data: Option<&'a PreparedData>,
) -> Vec<(String, &'a dyn Tabular)> {
    let mut sheets: Vec<(String, &dyn Tabular)> = catalog
        .tables()
        .iter()
        .map(|t| (t.name().to_string(), t as &dyn Tabular))
        .collect();
    if let Some(p) = data {
        sheets.push((DATA_SHEET.to_string(), &p.augmented as &dyn Tabular));
        sheets.push((SUMMARY_SHEET.to_string(), &p.describe as &dyn Tabular));
    }
    sheets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cell, Variable, YEAR_COLUMN};
    use std::io::Write;

    fn write_csv(path: &std::path::Path, years: &[i32]) {
        let mut f = std::fs::File::create(path).unwrap();
        let mut header = vec![YEAR_COLUMN.to_string()];
        header.extend(Variable::ALL.iter().map(|v| v.column_name().to_string()));
        writeln!(f, "{}", header.join(",")).unwrap();
        for (i, y) in years.iter().enumerate() {
            let values: Vec<String> = (0..Variable::ALL.len()).map(|c| format!("{}", 1.0 + (i + c) as f64)).collect();
            writeln!(f, "{y},{}", values.join(",")).unwrap();
        }
    }

    fn config(data_file: Option<PathBuf>, default_file: PathBuf, auto_load: bool) -> DashConfig {
        DashConfig {
            data_file,
            default_file,
            auto_load,
            ..DashConfig::default()
        }
    }

    #[test]
    fn load_policy() {
        let explicit = config(Some("a.csv".into()), "base.xlsx".into(), false);
        assert_eq!(resolve_source(&explicit), DataSource::Explicit("a.csv".into()));
        let auto = config(None, "base.xlsx".into(), true);
        assert_eq!(resolve_source(&auto), DataSource::Default("base.xlsx".into()));
        let off = config(None, "base.xlsx".into(), false);
        assert_eq!(resolve_source(&off), DataSource::None);
    }

    #[test]
    fn missing_default_is_unavailable_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(None, dir.path().join("base.xlsx"), true);
        let state = load_data(&cfg, &mut DatasetCache::new());
        assert!(matches!(state, DataState::Unavailable(DashError::DataUnavailable { .. })));
        assert!(state.prepared().is_none());
        assert!(state.require().is_err());

        let off = config(None, dir.path().join("base.xlsx"), false);
        assert!(matches!(load_data(&off, &mut DatasetCache::new()), DataState::NotLoaded { .. }));
    }

    #[test]
    fn loads_sorts_and_prepares() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.csv");
        write_csv(&path, &[1997, 1995, 1996]);

        let mut cache = DatasetCache::new();
        let cfg = config(Some(path.clone()), "unused.xlsx".into(), true);
        let state = load_data(&cfg, &mut cache);
        let data = state.require().unwrap();
        let years: Vec<i32> = data.augmented.rows.iter().map(|r| r.observation.year).collect();
        assert_eq!(years, vec![1995, 1996, 1997]);
        assert_eq!(data.summary.min_year, Some(1995));
        assert_eq!(data.summary.completeness_pct, 100.0);
        assert!(state.notice().contains("3 rows"));

        load_data(&cfg, &mut cache);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn invalid_file_reports_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "year,GROWTH\n1995,1.0\n").unwrap();
        let state = load_data(&config(Some(path), "x".into(), true), &mut DatasetCache::new());
        match state {
            DataState::Invalid { error: DashError::MissingColumns { columns }, .. } => {
                assert_eq!(columns.len(), 9);
                assert_eq!(columns[0], "REM");
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn unreadable_files_are_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.xlsx");
        std::fs::write(&broken, b"not a zip archive").unwrap();

        let state = load_data(&config(Some(broken), "x".into(), true), &mut DatasetCache::new());
        let DataState::Unavailable(DashError::DataUnavailable { reason }) = &state else {
            panic!("unexpected state {state:?}");
        };
        assert!(reason.contains("broken.xlsx"));
        assert!(state.prepared().is_none());

        let missing = dir.path().join("nope.csv");
        let state = load_data(&config(Some(missing), "x".into(), true), &mut DatasetCache::new());
        assert!(matches!(state, DataState::Unavailable(DashError::DataUnavailable { .. })));
        assert!(state.notice().contains("nope.csv"));
    }

    #[test]
    fn export_sheet_order() {
        let catalog = ResultsCatalog::new();
        let names: Vec<String> = export_sheets(&catalog, None).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names.len(), 10);
        assert_eq!(names[0], "3SLS_eq1");

        let raw = RawDataset {
            headers: std::iter::once(YEAR_COLUMN.to_string())
                .chain(Variable::ALL.iter().map(|v| v.column_name().to_string()))
                .collect(),
            rows: vec![std::iter::once(Cell::Number(2000.0)).chain((0..10).map(|_| Cell::Number(2.0))).collect()],
        };
        let prepared = prepare_dataset("mem".into(), &raw).unwrap();
        let names: Vec<String> = export_sheets(&catalog, Some(&prepared)).into_iter().map(|(n, _)| n).collect();
        assert_eq!(&names[10..], &["Data".to_string(), "Summary_stats".to_string()]);
    }
}
