//! Cell styling for result tables.
//!
//! Styling is a pure classification step: the renderers (TUI, terminal)
//! decide what a `CellStyle` looks like. A cell that should carry a style but
//! cannot be read as a number is reported, not silently left unstyled.

use crate::domain::{Cell, CoefficientRow, ResultTable, Tabular};
use crate::error::DashError;

/// Upper limit for the shading intensity of a coefficient cell.
pub const MAX_INTENSITY: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PValueBand {
    /// p < 0.01
    Strong,
    /// p < 0.05
    Moderate,
    /// p < 0.10
    Weak,
    Insignificant,
}

impl PValueBand {
    pub fn from_p_value(p: f64) -> Self {
        if p < 0.01 {
            PValueBand::Strong
        } else if p < 0.05 {
            PValueBand::Moderate
        } else if p < 0.10 {
            PValueBand::Weak
        } else {
            PValueBand::Insignificant
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellStyle {
    Plain,
    Coefficient { positive: bool, intensity: f64 },
    PValue(PValueBand),
    Diagnostic { passes: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnRole {
    Plain,
    Coefficient,
    PValue,
}

fn column_role(header: &str) -> ColumnRole {
    if header.contains("Coefficient") || header.contains("Estimate") {
        ColumnRole::Coefficient
    } else if header.contains("p-value") || header.contains("Pr(>|t|)") {
        ColumnRole::PValue
    } else {
        ColumnRole::Plain
    }
}

/// Style grid for a catalog table, one entry per cell of `Tabular::rows`.
pub fn style_table(table: &ResultTable) -> Result<Vec<Vec<CellStyle>>, DashError> {
    let diagnostics = matches!(table, ResultTable::Diagnostics(_));
    style_cells(table.name(), table, diagnostics)
}

/// Style grid for any table. Columns are classified by header; with
/// `pass_fail` set, p-value cells are read as diagnostic outcomes.
pub fn style_cells(name: &str, table: &dyn Tabular, pass_fail: bool) -> Result<Vec<Vec<CellStyle>>, DashError> {
    let headers = table.headers();
    let rows = table.rows();
    let roles: Vec<ColumnRole> = headers.iter().map(|h| column_role(h)).collect();

    let numeric = |row: usize, col: usize, cell: &Cell| -> Result<Option<f64>, DashError> {
        if cell.is_missing() {
            return Ok(None);
        }
        cell.as_f64().map(Some).ok_or_else(|| DashError::Style {
            table: name.to_string(),
            column: headers[col].clone(),
            row,
            value: cell.to_string(),
        })
    };

    // Scale of the shading: largest magnitude in the first coefficient column.
    let scale = match roles.iter().position(|r| *r == ColumnRole::Coefficient) {
        Some(col) => {
            let mut max_abs: f64 = 0.0;
            for (i, row) in rows.iter().enumerate() {
                let Some(cell) = row.get(col) else { continue };
                if let Some(v) = numeric(i, col, cell)? {
                    max_abs = max_abs.max(v.abs());
                }
            }
            max_abs.max(1.0)
        }
        None => 1.0,
    };

    let mut out = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let mut styles = Vec::with_capacity(row.len());
        for (col, cell) in row.iter().enumerate() {
            let role = roles.get(col).copied().unwrap_or(ColumnRole::Plain);
            let style = match role {
                ColumnRole::Plain => CellStyle::Plain,
                ColumnRole::Coefficient => match numeric(i, col, cell)? {
                    Some(v) => CellStyle::Coefficient {
                        positive: v > 0.0,
                        intensity: (v.abs() / scale).min(MAX_INTENSITY),
                    },
                    None => CellStyle::Plain,
                },
                ColumnRole::PValue => match numeric(i, col, cell)? {
                    Some(p) if pass_fail => CellStyle::Diagnostic { passes: p > 0.05 },
                    Some(p) => CellStyle::PValue(PValueBand::from_p_value(p)),
                    None => CellStyle::Plain,
                },
            };
            styles.push(style);
        }
        out.push(styles);
    }
    Ok(out)
}

/// One bar of a coefficient chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientBar {
    pub variable: String,
    pub value: f64,
}

/// Signed coefficient bars, intercept/constant rows left out.
pub fn coefficient_bars(rows: &[CoefficientRow]) -> Vec<CoefficientBar> {
    rows.iter()
        .filter(|r| !r.is_intercept() && r.estimate.is_finite())
        .map(|r| CoefficientBar {
            variable: r.variable.clone(),
            value: r.estimate,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, ResultsCatalog};
    use crate::domain::{CoefficientLayout, CoefficientTable, RawDataset};

    #[test]
    fn p_value_bands() {
        assert_eq!(PValueBand::from_p_value(0.0), PValueBand::Strong);
        assert_eq!(PValueBand::from_p_value(0.01), PValueBand::Moderate);
        assert_eq!(PValueBand::from_p_value(0.0854), PValueBand::Weak);
        assert_eq!(PValueBand::from_p_value(0.10), PValueBand::Insignificant);
    }

    #[test]
    fn structural_equation_styles() {
        let catalog = ResultsCatalog::new();
        let eq1 = catalog.lookup(catalog::THREE_SLS_EQ1).unwrap();
        let styles = style_table(eq1).unwrap();
        assert_eq!(styles.len(), 5);

        // Intercept 19.87 is the largest magnitude: capped intensity.
        assert_eq!(styles[0][1], CellStyle::Coefficient { positive: true, intensity: MAX_INTENSITY });
        match styles[1][1] {
            CellStyle::Coefficient { positive, intensity } => {
                assert!(!positive);
                assert!((intensity - 0.049708380 / 19.867206200).abs() < 1e-12);
            }
            other => panic!("unexpected style {other:?}"),
        }
        assert_eq!(styles[0][0], CellStyle::Plain);
        assert_eq!(styles[0][4], CellStyle::PValue(PValueBand::Strong));
        assert_eq!(styles[2][4], CellStyle::PValue(PValueBand::Insignificant));
    }

    #[test]
    fn small_coefficients_use_unit_scale() {
        let table = ResultTable::Coefficients(CoefficientTable::new(
            "t",
            "t",
            CoefficientLayout::LongRun,
            vec![CoefficientRow::new("a", 0.2), CoefficientRow::new("b", -0.5)],
        ));
        let styles = style_table(&table).unwrap();
        assert_eq!(styles[0][1], CellStyle::Coefficient { positive: true, intensity: 0.2 });
        assert_eq!(styles[1][1], CellStyle::Coefficient { positive: false, intensity: 0.4 });
    }

    #[test]
    fn diagnostics_pass_above_five_percent() {
        let catalog = ResultsCatalog::new();
        let styles = style_table(catalog.lookup(catalog::DIAGNOSTICS).unwrap()).unwrap();
        assert!(styles.iter().all(|r| r[1] == CellStyle::Diagnostic { passes: true }));
    }

    #[test]
    fn every_catalog_table_styles_cleanly() {
        for table in catalog::global().tables() {
            assert!(style_table(table).is_ok(), "{}", table.name());
        }
    }

    #[test]
    fn uninterpretable_cell_is_reported() {
        let table = ResultTable::Coefficients(CoefficientTable::new(
            "bad",
            "bad",
            CoefficientLayout::LongRun,
            vec![CoefficientRow::new("x", f64::NAN)],
        ));
        // NaN renders as an empty cell: unstyled, not an error.
        assert_eq!(style_table(&table).unwrap()[0][1], CellStyle::Plain);

        let raw = RawDataset {
            headers: vec!["Variable".to_string(), "Coefficient".to_string()],
            rows: vec![
                vec![Cell::text("a"), Cell::Number(1.0)],
                vec![Cell::text("b"), Cell::text("n.a.")],
            ],
        };
        let err = style_cells("custom", &raw, false).unwrap_err();
        assert_eq!(
            err,
            DashError::Style {
                table: "custom".to_string(),
                column: "Coefficient".to_string(),
                row: 1,
                value: "n.a.".to_string()
            }
        );
    }

    #[test]
    fn bars_skip_intercept_and_constant() {
        let catalog = ResultsCatalog::new();
        let eq2 = catalog.growth_equation().unwrap().as_coefficients().unwrap();
        let bars = coefficient_bars(&eq2.rows);
        assert_eq!(bars.len(), 5);
        assert_eq!(bars[0].variable, "logREM");

        let ardl = catalog.lookup(catalog::ARDL_GENERAL).unwrap().as_coefficients().unwrap();
        assert!(coefficient_bars(&ardl.rows).iter().all(|b| b.variable != "Constant"));
    }
}
