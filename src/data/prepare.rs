//! Dataset validation and preparation.
//!
//! This module turns a `RawDataset` (whatever the spreadsheet contained) into a
//! typed, year-ordered dataset with the six derived log columns.
//!
//! Design goals:
//! - **Strict schema** for the eleven required columns (every absent column is reported at once)
//! - **Lenient cells**: missing or non-numeric cells become unknown, never zero
//! - **Pure stages**: each step returns a new value and leaves its input untouched

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::domain::{
    AugmentedDataset, AugmentedRow, Cell, DatasetSummary, DerivedSeries, LogVariable, Observation,
    OrderedDataset, RawDataset, Tabular, ValidatedDataset, Variable, YEAR_COLUMN,
};
use crate::error::DashError;

/// Check the column contract and parse rows into typed observations.
///
/// Extra columns are ignored. Fails with `MissingColumns` listing every absent
/// required column, and rejects non-integer or duplicate years.
pub fn validate(raw: &RawDataset) -> Result<ValidatedDataset, DashError> {
    let header_map = build_header_map(&raw.headers);

    let mut missing = Vec::new();
    if !header_map.contains_key(&normalize_header_name(YEAR_COLUMN)) {
        missing.push(YEAR_COLUMN.to_string());
    }
    for var in Variable::ALL {
        if !header_map.contains_key(&normalize_header_name(var.column_name())) {
            missing.push(var.column_name().to_string());
        }
    }
    if !missing.is_empty() {
        warn!(?missing, "dataset is missing required columns");
        return Err(DashError::MissingColumns { columns: missing });
    }

    let year_idx = header_map[&normalize_header_name(YEAR_COLUMN)];
    let var_idx: Vec<(Variable, usize)> = Variable::ALL
        .iter()
        .map(|v| (*v, header_map[&normalize_header_name(v.column_name())]))
        .collect();

    let mut seen = HashSet::new();
    let mut observations = Vec::with_capacity(raw.rows.len());
    for row in 0..raw.rows.len() {
        let year = parse_year(raw.cell(row, year_idx)).ok_or_else(|| DashError::InvalidYear {
            row: row + 1,
            value: raw.cell(row, year_idx).to_string(),
        })?;
        if !seen.insert(year) {
            return Err(DashError::DuplicateYear { year });
        }

        let mut obs = Observation::empty(year);
        for &(var, idx) in &var_idx {
            obs.set(var, raw.cell(row, idx).as_f64());
        }
        observations.push(obs);
    }

    debug!(rows = observations.len(), "dataset validated");
    Ok(ValidatedDataset { observations })
}

/// Copy of `observations` ordered ascending by year (stable).
pub fn sort_by_year(observations: &[Observation]) -> OrderedDataset {
    let mut observations = observations.to_vec();
    observations.sort_by_key(|o| o.year);
    OrderedDataset { observations }
}

/// Add the six log columns. Non-positive or unknown sources stay unknown.
pub fn derive_logs(dataset: &OrderedDataset) -> AugmentedDataset {
    let rows: Vec<AugmentedRow> = dataset
        .observations
        .iter()
        .map(|o| AugmentedRow {
            observation: o.clone(),
            derived: DerivedSeries {
                log_rem: safe_log(o.rem),
                log_tc: safe_log(o.tc),
                log_fdi: safe_log(o.fdi),
                log_open: safe_log(o.open),
                log_credit: safe_log(o.credit),
                log_inv: safe_log(o.inv),
            },
        })
        .collect();

    let unknown: usize = rows
        .iter()
        .map(|r| LogVariable::ALL.iter().filter(|v| r.derived.get(**v).is_none()).count())
        .sum();
    if unknown > 0 {
        debug!(unknown, "derived log cells left unknown");
    }

    AugmentedDataset { rows }
}

/// Natural log, defined only for strictly positive finite values.
pub fn safe_log(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0).map(f64::ln)
}

/// Completeness figures for any table.
///
/// An empty table (no rows or no columns) is reported as 100% complete:
/// there is no cell that could be missing.
pub fn summarize(table: &dyn Tabular) -> DatasetSummary {
    let headers = table.headers();
    let rows = table.rows();
    let row_count = rows.len();
    let column_count = headers.len();

    let missing_cell_count = rows
        .iter()
        .map(|r| r.iter().take(column_count).filter(|c| c.is_missing()).count())
        .sum::<usize>();

    let total = row_count * column_count;
    let completeness_pct = if total == 0 {
        100.0
    } else {
        (1.0 - missing_cell_count as f64 / total as f64) * 100.0
    };

    let year_idx = headers
        .iter()
        .position(|h| normalize_header_name(h) == normalize_header_name(YEAR_COLUMN));
    let years: Vec<i32> = year_idx
        .map(|idx| rows.iter().filter_map(|r| r.get(idx).and_then(parse_year)).collect())
        .unwrap_or_default();

    DatasetSummary {
        min_year: years.iter().copied().min(),
        max_year: years.iter().copied().max(),
        row_count,
        column_count,
        missing_cell_count,
        completeness_pct,
    }
}

fn build_header_map(headers: &[String]) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins when a sheet repeats a header.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    name.trim_start_matches('\u{feff}').trim().to_ascii_lowercase()
}

fn parse_year(cell: &Cell) -> Option<i32> {
    let v = cell.as_f64()?;
    if v.fract() != 0.0 || v < f64::from(i32::MIN) || v > f64::from(i32::MAX) {
        return None;
    }
    Some(v as i32)
}
