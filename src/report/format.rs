//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the data/catalog/scenario code stays clean and testable
//! - output changes are localized (important for snapshot-style tests)

use crate::domain::{
    BoundsTest, Cell, DatasetSummary, GrangerTable, ResultTable, ScenarioResult, ScenarioShock, Tabular,
};
use crate::math::SeriesStats;

/// Decimal places used for numeric cells.
pub const PRECISION: usize = 4;

/// Widest a rendered column may get before values are truncated.
const MAX_COLUMN_WIDTH: usize = 24;

/// Render any table as aligned text: header, dash rule, one line per row.
///
/// Text is left-aligned, numbers right-aligned; unknown cells are blank.
pub fn format_table(table: &dyn Tabular) -> String {
    format_rows(&table.headers(), &table.rows(), usize::MAX)
}

/// Like [`format_table`], limited to the first `limit` rows.
pub fn format_table_head(table: &dyn Tabular, limit: usize) -> String {
    format_rows(&table.headers(), &table.rows(), limit)
}

fn format_rows(headers: &[String], rows: &[Vec<Cell>], limit: usize) -> String {
    let rendered: Vec<Vec<(String, bool)>> = rows
        .iter()
        .take(limit)
        .map(|r| {
            (0..headers.len())
                .map(|c| {
                    let cell = r.get(c).unwrap_or(&Cell::Empty);
                    (truncate(&fmt_cell(cell), MAX_COLUMN_WIDTH), matches!(cell, Cell::Number(_)))
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(c, h)| {
            rendered
                .iter()
                .map(|r| r[c].0.chars().count())
                .chain(std::iter::once(h.chars().count().min(MAX_COLUMN_WIDTH)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<w$}", truncate(h, MAX_COLUMN_WIDTH)))
        .collect();
    out.push_str(header_line.join(" ").trim_end());
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join(" "));
    out.push('\n');

    for row in &rendered {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|((s, numeric), &w)| if *numeric { format!("{s:>w$}") } else { format!("{s:<w$}") })
            .collect();
        out.push_str(line.join(" ").trim_end());
        out.push('\n');
    }

    out
}

/// Text of one cell as shown in terminal tables.
pub fn fmt_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e9 => format!("{v:.0}"),
        Cell::Number(v) if v.is_finite() => format!("{v:.PRECISION$}"),
        Cell::Number(_) | Cell::Empty => String::new(),
        Cell::Text(s) => s.clone(),
    }
}

/// Format a number with [`PRECISION`] decimals, or `n/a`.
pub fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.PRECISION$}"),
        _ => "n/a".to_string(),
    }
}

pub fn format_summary(summary: &DatasetSummary) -> String {
    let span = match (summary.min_year, summary.max_year) {
        (Some(a), Some(b)) => format!("{a}–{b}"),
        _ => "n/a".to_string(),
    };
    let mut out = String::new();
    out.push_str(&format!("Period      : {span}\n"));
    out.push_str(&format!("Observations: {}\n", summary.row_count));
    out.push_str(&format!("Variables   : {}\n", summary.column_count));
    out.push_str(&format!("Missing     : {}\n", summary.missing_cell_count));
    out.push_str(&format!("Completeness: {:.1}%\n", summary.completeness_pct));
    out
}

pub fn format_series_kpis(name: &str, stats: &SeriesStats) -> String {
    format!(
        "{name}: n={} mean={:.PRECISION$} std={} min={:.PRECISION$} max={:.PRECISION$}\n",
        stats.count,
        stats.mean,
        fmt_opt(stats.std),
        stats.min,
        stats.max,
    )
}

/// Titled table, followed by the verdict lines that go with its kind.
pub fn format_result_table(table: &ResultTable) -> String {
    let mut out = format!("== {} ({}) ==\n", table.title(), table.name());
    out.push_str(&format_table(table));
    match table {
        ResultTable::Bounds(b) => out.push_str(&format_bounds_verdict(b)),
        ResultTable::Granger(g) => out.push_str(&format_granger_summary(g)),
        ResultTable::Diagnostics(d) => {
            let verdict = if d.all_ok() {
                "All residual tests pass at 5%."
            } else {
                "At least one residual test rejects at 5%."
            };
            out.push_str(verdict);
            out.push('\n');
        }
        ResultTable::Coefficients(c) => {
            if c.rows.iter().any(|r| r.p_value.is_some()) {
                out.push_str("Signif.: *** p<0.01, ** p<0.05, * p<0.10\n");
            }
        }
    }
    out
}

pub fn format_bounds_verdict(b: &BoundsTest) -> String {
    match b.bound(b.decision_level_pct).and_then(|cv| cv.lower_i0.zip(cv.upper_i1)) {
        Some((lower, upper)) => format!(
            "F = {:.4} vs {}% bounds [{lower}, {upper}]: {}\n",
            b.f_stat,
            b.decision_level_pct,
            b.conclusion.label()
        ),
        None => format!("F = {:.4}: {}\n", b.f_stat, b.conclusion.label()),
    }
}

pub fn format_granger_summary(g: &GrangerTable) -> String {
    let causal = g.causal_at_5pct();
    if causal.is_empty() {
        "Causal at 5%: none\n".to_string()
    } else {
        format!("Causal at 5%: {}\n", causal.join(", "))
    }
}

pub fn format_scenario(shock: &ScenarioShock, result: &ScenarioResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Scenario on {}\n", result.equation));
    out.push_str(&format!(
        "{:<6} {:>10} {:>12} {:>12} {:>12}\n",
        "driver", "shock", "coefficient", "term", "contrib"
    ));
    out.push_str(&format!("{:-<6} {:-<10} {:-<12} {:-<12} {:-<12}\n", "", "", "", "", ""));
    for c in &result.contributions {
        let value = format!("{:+.1}{}", shock.get(c.driver), c.driver.unit());
        out.push_str(&format!(
            "{:<6} {:>10} {:>12.4} {:>12.6} {:>12.4}\n",
            c.driver.label(),
            value,
            c.coefficient,
            c.term,
            c.value
        ));
    }
    out.push_str(&format!("\nImplied change in GROWTH: {:+.4} points\n", result.delta));
    out
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, ResultsCatalog};
    use crate::domain::RawDataset;
    use crate::scenario;

    #[test]
    fn aligns_text_left_and_numbers_right() {
        let raw = RawDataset {
            headers: vec!["name".to_string(), "value".to_string()],
            rows: vec![
                vec![Cell::text("alpha"), Cell::Number(1.5)],
                vec![Cell::text("b"), Cell::Empty],
                vec![Cell::text("year"), Cell::Number(1995.0)],
            ],
        };
        let s = format_table(&raw);
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines[0], "name  value");
        assert_eq!(lines[1], "----- ------");
        assert_eq!(lines[2], "alpha 1.5000");
        assert_eq!(lines[3], "b");
        assert_eq!(lines[4], "year    1995");
    }

    #[test]
    fn head_limits_rows() {
        let raw = RawDataset {
            headers: vec!["x".to_string()],
            rows: (0..30).map(|i| vec![Cell::Number(f64::from(i))]).collect(),
        };
        assert_eq!(format_table_head(&raw, 20).lines().count(), 22);
    }

    #[test]
    fn result_tables_carry_verdicts() {
        let catalog = ResultsCatalog::new();
        let bounds = format_result_table(catalog.lookup(catalog::BOUNDS_TEST).unwrap());
        assert!(bounds.contains("cointegration"));
        assert!(bounds.contains("F = 5.3808 vs 5% bounds [2.73, 4.163]: cointegration"));

        let granger = format_result_table(catalog.lookup(catalog::GRANGER).unwrap());
        assert!(granger.contains("Causal at 5%: logINV, logOPEN"));

        let eq2 = format_result_table(catalog.lookup(catalog::THREE_SLS_EQ2).unwrap());
        assert!(eq2.contains("(Intercept)"));
        assert!(eq2.contains("***"));
    }

    #[test]
    fn summary_and_scenario_text() {
        let summary = DatasetSummary {
            min_year: Some(1995),
            max_year: Some(2022),
            row_count: 28,
            column_count: 17,
            missing_cell_count: 0,
            completeness_pct: 100.0,
        };
        let s = format_summary(&summary);
        assert!(s.contains("1995–2022"));
        assert!(s.contains("100.0%"));

        let shock = ScenarioShock::default();
        let result = scenario::simulate(&shock, catalog::global().growth_equation().unwrap()).unwrap();
        let s = format_scenario(&shock, &result);
        assert!(s.contains("+4.99"));
        assert!(s.contains("+10.0pts"));
        assert!(s.contains("+5.0%"));
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
