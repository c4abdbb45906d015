//! Export named tables to a multi-sheet `.xlsx` workbook.
//!
//! One worksheet per table, header row first, no index column. The export is
//! meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::{Workbook, XlsxError};
use tracing::info;

use crate::domain::{Cell, Tabular};
use crate::error::DashError;

/// Longest sheet name a workbook accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Sheet name for a table: the first 31 characters of its name.
///
/// Two names sharing a 31-character prefix collide; the workbook writer then
/// rejects the second sheet and the export fails.
pub fn sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME_LEN).collect()
}

fn export_err(e: XlsxError) -> DashError {
    DashError::Export { message: e.to_string() }
}

/// Serialize `(name, table)` pairs, in order, into an in-memory workbook.
///
/// Unknown and non-finite cells are left empty.
pub fn export(sheets: &[(String, &dyn Tabular)]) -> Result<Vec<u8>, DashError> {
    let mut workbook = Workbook::new();

    for (name, table) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(name)).map_err(export_err)?;

        for (c, header) in table.headers().iter().enumerate() {
            sheet.write_string(0, col(c)?, header).map_err(export_err)?;
        }

        for (r, row) in table.rows().iter().enumerate() {
            let r = u32::try_from(r + 1).map_err(|_| DashError::Export {
                message: format!("table '{name}' has too many rows"),
            })?;
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Number(v) if v.is_finite() => {
                        sheet.write_number(r, col(c)?, *v).map_err(export_err)?;
                    }
                    Cell::Text(s) if !s.is_empty() => {
                        sheet.write_string(r, col(c)?, s).map_err(export_err)?;
                    }
                    _ => {}
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(export_err)
}

fn col(c: usize) -> Result<u16, DashError> {
    u16::try_from(c).map_err(|_| DashError::Export {
        message: format!("column index {c} out of range"),
    })
}

/// `ARDL_3SLS_Resultats_YYYYMMDD.xlsx`
pub fn default_export_file_name(date: NaiveDate) -> String {
    format!("ARDL_3SLS_Resultats_{}.xlsx", date.format("%Y%m%d"))
}

/// Write exported bytes to `dir/file_name`, returning the full path.
pub fn write_export(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DashError> {
    let path = dir.join(file_name);
    fs::write(&path, bytes).map_err(|e| DashError::Export {
        message: format!("failed to write '{}': {e}", path.display()),
    })?;
    info!(path = %path.display(), bytes = bytes.len(), "export written");
    Ok(path)
}
