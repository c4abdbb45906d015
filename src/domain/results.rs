//! Result-table types: coefficient tables, the bounds test, residual
//! diagnostics and Granger-causality statistics.
//!
//! Derived fields (significance markers, conclusions) are computed once in the
//! constructors, so a table can never carry a marker that disagrees with its
//! p-value.

use serde::Serialize;

use crate::domain::{Cell, Tabular};

/// Significance marker derived from a p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Significance {
    None,
    /// p < 0.10
    Ten,
    /// p < 0.05
    Five,
    /// p < 0.01
    One,
}

impl Significance {
    /// Fixed thresholds; an undefined p-value carries no marker.
    pub fn from_p_value(p: Option<f64>) -> Self {
        match p {
            Some(p) if p < 0.01 => Significance::One,
            Some(p) if p < 0.05 => Significance::Five,
            Some(p) if p < 0.10 => Significance::Ten,
            _ => Significance::None,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Significance::None => "",
            Significance::Ten => "*",
            Significance::Five => "**",
            Significance::One => "***",
        }
    }
}

/// One line of a regression results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoefficientRow {
    /// Regressor label; may encode a lag (`L(INF,2)`) or a difference (`d(logTC)`).
    pub variable: String,
    pub estimate: f64,
    pub std_error: Option<f64>,
    pub t_value: Option<f64>,
    pub p_value: Option<f64>,
    pub significance: Significance,
}

impl CoefficientRow {
    /// A point estimate with no inference attached.
    pub fn new(variable: impl Into<String>, estimate: f64) -> Self {
        Self {
            variable: variable.into(),
            estimate,
            std_error: None,
            t_value: None,
            p_value: None,
            significance: Significance::None,
        }
    }

    pub fn with_p_value(mut self, p: f64) -> Self {
        self.p_value = Some(p);
        self.significance = Significance::from_p_value(self.p_value);
        self
    }

    pub fn with_inference(self, std_error: f64, t_value: f64, p: f64) -> Self {
        let mut row = self.with_p_value(p);
        row.std_error = Some(std_error);
        row.t_value = Some(t_value);
        row
    }

    /// Intercept / constant rows are left out of coefficient charts.
    pub fn is_intercept(&self) -> bool {
        self.variable.contains("Intercept") || self.variable.contains("Constant")
    }
}

/// Which columns a coefficient table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoefficientLayout {
    /// 3SLS output: estimate, std. error, t value, p-value, marker.
    Structural,
    /// ARDL levels form: coefficient, p-value, marker.
    Ardl,
    /// ECM short-run form: coefficient, marker.
    ShortRun,
    /// Long-run elasticities only.
    LongRun,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoefficientTable {
    pub name: String,
    pub title: String,
    pub layout: CoefficientLayout,
    pub rows: Vec<CoefficientRow>,
}

impl CoefficientTable {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        layout: CoefficientLayout,
        rows: Vec<CoefficientRow>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            layout,
            rows,
        }
    }

    pub fn row(&self, variable: &str) -> Option<&CoefficientRow> {
        self.rows.iter().find(|r| r.variable == variable)
    }

    /// Header of the coefficient column for this layout.
    pub fn estimate_header(&self) -> &'static str {
        match self.layout {
            CoefficientLayout::Structural => "Estimate",
            CoefficientLayout::Ardl | CoefficientLayout::ShortRun => "Coefficient",
            CoefficientLayout::LongRun => "Coefficient (LR)",
        }
    }
}

impl Tabular for CoefficientTable {
    fn headers(&self) -> Vec<String> {
        let cols: &[&str] = match self.layout {
            CoefficientLayout::Structural => &["Variable", "Estimate", "Std. Error", "t value", "Pr(>|t|)", "Sig"],
            CoefficientLayout::Ardl => &["Variable", "Coefficient", "p-value", "Sig"],
            CoefficientLayout::ShortRun => &["Variable", "Coefficient", "Sig"],
            CoefficientLayout::LongRun => &["Variable", "Coefficient (LR)"],
        };
        cols.iter().map(|c| c.to_string()).collect()
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                let variable = Cell::text(r.variable.as_str());
                let estimate = Cell::Number(r.estimate);
                let sig = Cell::text(r.significance.marker());
                match self.layout {
                    CoefficientLayout::Structural => vec![
                        variable,
                        estimate,
                        Cell::from_opt(r.std_error),
                        Cell::from_opt(r.t_value),
                        Cell::from_opt(r.p_value),
                        sig,
                    ],
                    CoefficientLayout::Ardl => vec![variable, estimate, Cell::from_opt(r.p_value), sig],
                    CoefficientLayout::ShortRun => vec![variable, estimate, sig],
                    CoefficientLayout::LongRun => vec![variable, estimate],
                }
            })
            .collect()
    }
}

/// Lower (I(0)) and upper (I(1)) critical bounds at one significance level.
///
/// `None` marks a level whose bounds were not tabulated with the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalBound {
    /// Significance level in percent (10, 5, 1).
    pub level_pct: f64,
    pub lower_i0: Option<f64>,
    pub upper_i1: Option<f64>,
}

impl CriticalBound {
    pub fn tabulated(level_pct: f64, lower_i0: f64, upper_i1: f64) -> Self {
        Self {
            level_pct,
            lower_i0: Some(lower_i0),
            upper_i1: Some(upper_i1),
        }
    }

    pub fn unknown(level_pct: f64) -> Self {
        Self {
            level_pct,
            lower_i0: None,
            upper_i1: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoundsConclusion {
    Cointegration,
    Inconclusive,
    NoCointegration,
}

impl BoundsConclusion {
    /// F above the upper bound rejects "no level relationship"; below the lower
    /// bound it cannot be rejected; in between (or without bounds) the test is silent.
    pub fn from_bound(f_stat: f64, bound: &CriticalBound) -> Self {
        let (Some(lower), Some(upper)) = (bound.lower_i0, bound.upper_i1) else {
            return BoundsConclusion::Inconclusive;
        };
        if f_stat > upper {
            BoundsConclusion::Cointegration
        } else if f_stat < lower {
            BoundsConclusion::NoCointegration
        } else {
            BoundsConclusion::Inconclusive
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BoundsConclusion::Cointegration => "cointegration",
            BoundsConclusion::Inconclusive => "inconclusive",
            BoundsConclusion::NoCointegration => "no cointegration",
        }
    }
}

/// Pesaran bounds test for a long-run level relationship.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundsTest {
    pub name: String,
    pub title: String,
    pub test: String,
    pub f_stat: f64,
    /// Ordered from the loosest (10%) to the strictest (1%) level.
    pub bounds: Vec<CriticalBound>,
    /// Level whose bounds decide the conclusion.
    pub decision_level_pct: f64,
    pub conclusion: BoundsConclusion,
}

impl BoundsTest {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        test: impl Into<String>,
        f_stat: f64,
        bounds: Vec<CriticalBound>,
        decision_level_pct: f64,
    ) -> Self {
        let conclusion = bounds
            .iter()
            .find(|b| (b.level_pct - decision_level_pct).abs() < 1e-9)
            .map(|b| BoundsConclusion::from_bound(f_stat, b))
            .unwrap_or(BoundsConclusion::Inconclusive);
        Self {
            name: name.into(),
            title: title.into(),
            test: test.into(),
            f_stat,
            bounds,
            decision_level_pct,
            conclusion,
        }
    }

    pub fn bound(&self, level_pct: f64) -> Option<&CriticalBound> {
        self.bounds.iter().find(|b| (b.level_pct - level_pct).abs() < 1e-9)
    }
}

impl Tabular for BoundsTest {
    fn headers(&self) -> Vec<String> {
        let mut out = vec!["Test".to_string(), "F-stat".to_string()];
        for b in &self.bounds {
            out.push(format!("CV {}% I(0)", b.level_pct));
            out.push(format!("CV {}% I(1)", b.level_pct));
        }
        out.push("Result".to_string());
        out
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        let mut row = vec![Cell::text(self.test.as_str()), Cell::Number(self.f_stat)];
        for b in &self.bounds {
            row.push(Cell::from_opt(b.lower_i0));
            row.push(Cell::from_opt(b.upper_i1));
        }
        row.push(Cell::text(self.conclusion.label()));
        vec![row]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticStatus {
    /// Null hypothesis of a well-behaved residual not rejected at 5%.
    Ok,
    Rejected,
}

impl DiagnosticStatus {
    pub fn from_p_value(p: f64) -> Self {
        if p > 0.05 { DiagnosticStatus::Ok } else { DiagnosticStatus::Rejected }
    }

    pub fn label(self) -> &'static str {
        match self {
            DiagnosticStatus::Ok => "ok",
            DiagnosticStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRow {
    pub test: String,
    pub p_value: f64,
    pub status: DiagnosticStatus,
}

impl DiagnosticRow {
    pub fn new(test: impl Into<String>, p_value: f64) -> Self {
        Self {
            test: test.into(),
            p_value,
            status: DiagnosticStatus::from_p_value(p_value),
        }
    }
}

/// Residual diagnostics of the ARDL model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticsTable {
    pub name: String,
    pub title: String,
    pub rows: Vec<DiagnosticRow>,
}

impl DiagnosticsTable {
    pub fn all_ok(&self) -> bool {
        self.rows.iter().all(|r| r.status == DiagnosticStatus::Ok)
    }
}

impl Tabular for DiagnosticsTable {
    fn headers(&self) -> Vec<String> {
        vec!["Test".to_string(), "p-value".to_string(), "Status".to_string()]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    Cell::text(r.test.as_str()),
                    Cell::Number(r.p_value),
                    Cell::text(r.status.label()),
                ]
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CausalityConclusion {
    /// p < 0.05
    Causal,
    /// 0.05 <= p < 0.10
    Marginal,
    NotSignificant,
}

impl CausalityConclusion {
    pub fn from_p_value(p: f64) -> Self {
        if p < 0.05 {
            CausalityConclusion::Causal
        } else if p < 0.10 {
            CausalityConclusion::Marginal
        } else {
            CausalityConclusion::NotSignificant
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CausalityConclusion::Causal => "causal",
            CausalityConclusion::Marginal => "marginal",
            CausalityConclusion::NotSignificant => "not significant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrangerRow {
    pub variable: String,
    pub f_stat: f64,
    pub p_value: f64,
    pub significance: Significance,
    pub conclusion: CausalityConclusion,
}

impl GrangerRow {
    pub fn new(variable: impl Into<String>, f_stat: f64, p_value: f64) -> Self {
        Self {
            variable: variable.into(),
            f_stat,
            p_value,
            significance: Significance::from_p_value(Some(p_value)),
            conclusion: CausalityConclusion::from_p_value(p_value),
        }
    }
}

/// Granger-causality F tests of each regressor on growth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrangerTable {
    pub name: String,
    pub title: String,
    pub rows: Vec<GrangerRow>,
}

impl GrangerTable {
    /// Variables whose p-value is at or below 5%.
    pub fn causal_at_5pct(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|r| r.p_value <= 0.05)
            .map(|r| r.variable.as_str())
            .collect()
    }
}

impl Tabular for GrangerTable {
    fn headers(&self) -> Vec<String> {
        ["Variable", "F", "p-value", "Sig", "Status"]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    Cell::text(r.variable.as_str()),
                    Cell::Number(r.f_stat),
                    Cell::Number(r.p_value),
                    Cell::text(r.significance.marker()),
                    Cell::text(r.conclusion.label()),
                ]
            })
            .collect()
    }
}

/// A named, immutable entry of the results catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResultTable {
    Coefficients(CoefficientTable),
    Bounds(BoundsTest),
    Diagnostics(DiagnosticsTable),
    Granger(GrangerTable),
}

impl ResultTable {
    pub fn name(&self) -> &str {
        match self {
            ResultTable::Coefficients(t) => &t.name,
            ResultTable::Bounds(t) => &t.name,
            ResultTable::Diagnostics(t) => &t.name,
            ResultTable::Granger(t) => &t.name,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ResultTable::Coefficients(t) => &t.title,
            ResultTable::Bounds(t) => &t.title,
            ResultTable::Diagnostics(t) => &t.title,
            ResultTable::Granger(t) => &t.title,
        }
    }

    pub fn as_coefficients(&self) -> Option<&CoefficientTable> {
        match self {
            ResultTable::Coefficients(t) => Some(t),
            _ => None,
        }
    }

    /// Point estimate for `variable`, if this is a coefficient table that has it.
    pub fn estimate(&self, variable: &str) -> Option<f64> {
        self.as_coefficients()?.row(variable).map(|r| r.estimate)
    }
}

impl Tabular for ResultTable {
    fn headers(&self) -> Vec<String> {
        match self {
            ResultTable::Coefficients(t) => t.headers(),
            ResultTable::Bounds(t) => t.headers(),
            ResultTable::Diagnostics(t) => t.headers(),
            ResultTable::Granger(t) => t.headers(),
        }
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        match self {
            ResultTable::Coefficients(t) => t.rows(),
            ResultTable::Bounds(t) => t.rows(),
            ResultTable::Diagnostics(t) => t.rows(),
            ResultTable::Granger(t) => t.rows(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn significance_thresholds_are_strict() {
        assert_eq!(Significance::from_p_value(Some(0.0)).marker(), "***");
        assert_eq!(Significance::from_p_value(Some(0.0099)).marker(), "***");
        assert_eq!(Significance::from_p_value(Some(0.01)).marker(), "**");
        assert_eq!(Significance::from_p_value(Some(0.05)).marker(), "*");
        assert_eq!(Significance::from_p_value(Some(0.10)).marker(), "");
        assert_eq!(Significance::from_p_value(Some(0.9)).marker(), "");
    }

    #[test]
    fn undefined_p_value_has_no_marker() {
        assert_eq!(Significance::from_p_value(None).marker(), "");
        assert_eq!(Significance::from_p_value(Some(f64::NAN)).marker(), "");
    }

    proptest! {
        #[test]
        fn significance_matches_band(p in 0.0f64..1.0) {
            let marker = Significance::from_p_value(Some(p)).marker();
            let expected = if p < 0.01 {
                "***"
            } else if p < 0.05 {
                "**"
            } else if p < 0.10 {
                "*"
            } else {
                ""
            };
            prop_assert_eq!(marker, expected);
        }
    }

    #[test]
    fn granger_conclusion_three_way() {
        assert_eq!(GrangerRow::new("a", 1.0, 0.02).conclusion, CausalityConclusion::Causal);
        assert_eq!(GrangerRow::new("b", 1.0, 0.05).conclusion, CausalityConclusion::Marginal);
        assert_eq!(GrangerRow::new("c", 1.0, 0.0854).conclusion, CausalityConclusion::Marginal);
        assert_eq!(GrangerRow::new("d", 1.0, 0.10).conclusion, CausalityConclusion::NotSignificant);
    }

    #[test]
    fn bounds_conclusion_uses_decision_level() {
        let bounds = vec![
            CriticalBound::tabulated(10.0, 2.0, 3.0),
            CriticalBound::tabulated(5.0, 2.5, 4.0),
            CriticalBound::unknown(1.0),
        ];
        let t = BoundsTest::new("b", "b", "Pesaran Bounds", 3.5, bounds.clone(), 5.0);
        assert_eq!(t.conclusion, BoundsConclusion::Inconclusive);
        let t = BoundsTest::new("b", "b", "Pesaran Bounds", 3.5, bounds.clone(), 10.0);
        assert_eq!(t.conclusion, BoundsConclusion::Cointegration);
        let t = BoundsTest::new("b", "b", "Pesaran Bounds", 9.0, bounds, 1.0);
        assert_eq!(t.conclusion, BoundsConclusion::Inconclusive);
    }

    #[test]
    fn short_run_layout_keeps_sig_column_without_p_values() {
        let table = CoefficientTable::new(
            "ECM_short",
            "ECM",
            CoefficientLayout::ShortRun,
            vec![CoefficientRow::new("ect", -1.139)],
        );
        assert_eq!(table.headers(), vec!["Variable", "Coefficient", "Sig"]);
        assert_eq!(
            table.rows(),
            vec![vec![Cell::text("ect"), Cell::Number(-1.139), Cell::text("")]]
        );
    }
}
