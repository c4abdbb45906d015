//! Spreadsheet / CSV ingest.
//!
//! This module is responsible for turning a file on disk into a `RawDataset`:
//! a header row plus cells, with no schema applied yet.
//!
//! Design goals:
//! - **Format-agnostic output**: `.xlsx`/`.xls`/`.ods` (first worksheet) and `.csv` produce the same shape
//! - **No coercion**: blank cells stay `Empty`, text stays text
//! - **Memoized reads**: `DatasetCache` re-parses a file only when its identity changes
//! - **Separation of concerns**: validation lives in `data::prepare`

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use calamine::{Data, Range, Reader, Xlsx, open_workbook_auto, open_workbook_from_rs};
use tracing::{debug, info};

use crate::domain::{Cell, RawDataset};
use crate::error::DashError;

/// File extensions accepted as input.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "ods", "csv"];

/// Read a dataset from disk, dispatching on the file extension.
pub fn read_dataset(path: &Path) -> Result<RawDataset, DashError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => read_csv(path),
        "xlsx" | "xls" | "ods" => read_spreadsheet(path),
        _ => Err(DashError::Read {
            path: path.to_path_buf(),
            message: format!("unsupported file type (expected one of: {})", SUPPORTED_EXTENSIONS.join(", ")),
        }),
    }
}

/// First worksheet of a spreadsheet file.
pub fn read_spreadsheet(path: &Path) -> Result<RawDataset, DashError> {
    let read_err = |message: String| DashError::Read {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| read_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| read_err("workbook has no worksheet".to_string()))?
        .map_err(|e| read_err(e.to_string()))?;

    Ok(range_to_dataset(&range))
}

/// Every worksheet of an in-memory `.xlsx` document, in workbook order.
pub fn read_xlsx_bytes(bytes: &[u8]) -> Result<Vec<(String, RawDataset)>, DashError> {
    let read_err = |message: String| DashError::Read {
        path: PathBuf::from("<memory>"),
        message,
    };

    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes.to_vec())).map_err(|e: calamine::XlsxError| read_err(e.to_string()))?;

    let mut out = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| read_err(e.to_string()))?;
        out.push((name, range_to_dataset(&range)));
    }
    Ok(out)
}

fn range_to_dataset(range: &Range<Data>) -> RawDataset {
    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|r| r.iter().map(|c| data_to_cell(c).to_string()).collect())
        .unwrap_or_default();
    let rows = rows.map(|r| r.iter().map(data_to_cell).collect()).collect();
    RawDataset { headers, rows }
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::from_opt(Some(*f)),
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Empty | Data::Error(_) => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

/// CSV with a header row. Numeric-looking fields become numbers.
pub fn read_csv(path: &Path) -> Result<RawDataset, DashError> {
    let read_err = |message: String| DashError::Read {
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path).map_err(|e| read_err(e.to_string()))?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| read_err(format!("failed to read CSV headers: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let record = result.map_err(|e| read_err(format!("line {}: {e}", idx + 2)))?;
        rows.push(record.iter().map(parse_field).collect());
    }

    Ok(RawDataset { headers, rows })
}

fn parse_field(s: &str) -> Cell {
    if s.is_empty() {
        return Cell::Empty;
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Number(v),
        _ => Cell::Text(s.to_string()),
    }
}

/// What makes two reads of "the same file" interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileIdentity {
    pub fn of(path: &Path) -> Result<Self, DashError> {
        let meta = fs::metadata(path).map_err(|e| DashError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        Ok(Self {
            path,
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Memoized dataset reads keyed by `FileIdentity`.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<FileIdentity, RawDataset>,
    hits: usize,
    misses: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path`, reusing an earlier parse of the identical file.
    pub fn load(&mut self, path: &Path) -> Result<RawDataset, DashError> {
        let identity = FileIdentity::of(path)?;
        if let Some(raw) = self.entries.get(&identity) {
            self.hits += 1;
            debug!(path = %path.display(), "dataset cache hit");
            return Ok(raw.clone());
        }

        self.misses += 1;
        let raw = read_dataset(path)?;
        info!(path = %path.display(), rows = raw.rows.len(), columns = raw.headers.len(), "dataset read");
        self.entries.insert(identity, raw.clone());
        Ok(raw)
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use rust_xlsxwriter::Workbook;

    fn write_xlsx(path: &Path) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let headers = ["year", "GROWTH", "REM", "note"];
        for (c, h) in headers.iter().enumerate() {
            sheet.write_string(0, c as u16, *h).unwrap();
        }
        sheet.write_number(1, 0, 1996.0).unwrap();
        sheet.write_number(1, 1, 3.5).unwrap();
        sheet.write_string(1, 3, "first").unwrap();
        sheet.write_number(2, 0, 1995.0).unwrap();
        sheet.write_number(2, 1, -1.25).unwrap();
        sheet.write_number(2, 2, 120.0).unwrap();
        workbook.save(path).unwrap();
    }

    #[test]
    fn reads_first_worksheet_of_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.xlsx");
        write_xlsx(&path);

        let raw = read_dataset(&path).unwrap();
        assert_eq!(raw.headers, vec!["year", "GROWTH", "REM", "note"]);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.cell(0, 0), &Cell::Number(1996.0));
        assert_eq!(raw.cell(0, 2), &Cell::Empty);
        assert_eq!(raw.cell(0, 3), &Cell::text("first"));
        assert_eq!(raw.cell(1, 1), &Cell::Number(-1.25));
    }

    #[test]
    fn reads_csv_with_blanks_and_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "\u{feff}year,GROWTH,REM").unwrap();
        writeln!(f, "1995, 2.5 ,").unwrap();
        writeln!(f, "1996,n/a,10").unwrap();
        drop(f);

        let raw = read_dataset(&path).unwrap();
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.cell(0, 1), &Cell::Number(2.5));
        assert_eq!(raw.cell(0, 2), &Cell::Empty);
        assert_eq!(raw.cell(1, 1), &Cell::text("n/a"));
    }

    #[test]
    fn unsupported_and_missing_files_are_read_errors() {
        let err = read_dataset(Path::new("data.json")).unwrap_err();
        assert!(matches!(err, DashError::Read { .. }));

        let mut cache = DatasetCache::new();
        let err = cache.load(Path::new("definitely-not-here.xlsx")).unwrap_err();
        assert!(matches!(err, DashError::Read { .. }));
    }

    #[test]
    fn cache_reuses_unchanged_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.xlsx");
        write_xlsx(&path);

        let mut cache = DatasetCache::new();
        let first = cache.load(&path).unwrap();
        let second = cache.load(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }
}
