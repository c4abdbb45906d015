//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the preparation pipeline and the simulator
//! - written to spreadsheets / printed as terminal tables
//! - serialized as JSON for scripting

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Name of the natural key column.
pub const YEAR_COLUMN: &str = "year";

/// The ten numeric fields every dataset must carry besides `year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Variable {
    /// Real GDP growth rate (%).
    Growth,
    /// Remittance inflows.
    Rem,
    /// Exchange rate.
    Tc,
    /// Foreign direct investment.
    Fdi,
    /// Trade-openness index.
    Open,
    /// Domestic credit to the private sector.
    Credit,
    /// Gross investment.
    Inv,
    /// Inflation rate.
    Inf,
    /// Emigrant stock.
    Migstock,
    /// Host-country GDP indicator.
    Hostgdp,
}

impl Variable {
    /// Column order of the input contract.
    pub const ALL: [Variable; 10] = [
        Variable::Growth,
        Variable::Rem,
        Variable::Tc,
        Variable::Fdi,
        Variable::Open,
        Variable::Credit,
        Variable::Inv,
        Variable::Inf,
        Variable::Migstock,
        Variable::Hostgdp,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            Variable::Growth => "GROWTH",
            Variable::Rem => "REM",
            Variable::Tc => "TC",
            Variable::Fdi => "FDI",
            Variable::Open => "OPEN",
            Variable::Credit => "CREDIT",
            Variable::Inv => "INV",
            Variable::Inf => "INF",
            Variable::Migstock => "MIGSTOCK",
            Variable::Hostgdp => "HOSTGDP",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Variable::Growth => "GDP growth",
            Variable::Rem => "remittances",
            Variable::Tc => "exchange rate",
            Variable::Fdi => "foreign direct investment",
            Variable::Open => "trade openness",
            Variable::Credit => "domestic credit",
            Variable::Inv => "investment",
            Variable::Inf => "inflation",
            Variable::Migstock => "migrant stock",
            Variable::Hostgdp => "host-country GDP",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// The six natural-log transforms derived from the raw fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogVariable {
    Rem,
    Tc,
    Fdi,
    Open,
    Credit,
    Inv,
}

impl LogVariable {
    pub const ALL: [LogVariable; 6] = [
        LogVariable::Rem,
        LogVariable::Tc,
        LogVariable::Fdi,
        LogVariable::Open,
        LogVariable::Credit,
        LogVariable::Inv,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            LogVariable::Rem => "logREM",
            LogVariable::Tc => "logTC",
            LogVariable::Fdi => "logFDI",
            LogVariable::Open => "logOPEN",
            LogVariable::Credit => "logCREDIT",
            LogVariable::Inv => "logINV",
        }
    }

    pub fn source(self) -> Variable {
        match self {
            LogVariable::Rem => Variable::Rem,
            LogVariable::Tc => Variable::Tc,
            LogVariable::Fdi => Variable::Fdi,
            LogVariable::Open => Variable::Open,
            LogVariable::Credit => Variable::Credit,
            LogVariable::Inv => Variable::Inv,
        }
    }
}

/// One cell of a rectangular table.
///
/// `Empty` is the "unknown" value: missing input cells and undefined derived
/// values are never coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    pub fn from_opt(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Empty,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// True for empty cells and for numbers that cannot be represented (NaN/inf).
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Number(v) => !v.is_finite(),
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Empty => true,
        }
    }

    /// Numeric view of the cell; text is parsed leniently (surrounding spaces).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if v.is_finite() => Some(*v),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => {
                if let Some(p) = f.precision() {
                    write!(f, "{v:.p$}")
                } else {
                    write!(f, "{v}")
                }
            }
            Cell::Text(s) => f.write_str(s),
            Cell::Empty => Ok(()),
        }
    }
}

/// Anything that can be laid out as a header row plus records.
///
/// This is the single seam between the components and the spreadsheet /
/// terminal renderers: datasets and result tables both implement it.
pub trait Tabular {
    fn headers(&self) -> Vec<String>;
    fn rows(&self) -> Vec<Vec<Cell>>;
}

/// A table as read from disk, before any schema validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawDataset {
    /// Cell at `(row, col)`; short rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&Cell::Empty)
    }
}

impl Tabular for RawDataset {
    fn headers(&self) -> Vec<String> {
        self.headers.clone()
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        let width = self.headers.len();
        self.rows
            .iter()
            .map(|r| {
                let mut row = r.clone();
                row.resize(width, Cell::Empty);
                row
            })
            .collect()
    }
}

/// One row of the raw dataset, keyed by year.
///
/// A `None` field is an unknown cell (missing or non-numeric in the source).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub year: i32,
    pub growth: Option<f64>,
    pub rem: Option<f64>,
    pub tc: Option<f64>,
    pub fdi: Option<f64>,
    pub open: Option<f64>,
    pub credit: Option<f64>,
    pub inv: Option<f64>,
    pub inf: Option<f64>,
    pub migstock: Option<f64>,
    pub hostgdp: Option<f64>,
}

impl Observation {
    /// An observation with every numeric field unknown.
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            growth: None,
            rem: None,
            tc: None,
            fdi: None,
            open: None,
            credit: None,
            inv: None,
            inf: None,
            migstock: None,
            hostgdp: None,
        }
    }

    pub fn get(&self, var: Variable) -> Option<f64> {
        match var {
            Variable::Growth => self.growth,
            Variable::Rem => self.rem,
            Variable::Tc => self.tc,
            Variable::Fdi => self.fdi,
            Variable::Open => self.open,
            Variable::Credit => self.credit,
            Variable::Inv => self.inv,
            Variable::Inf => self.inf,
            Variable::Migstock => self.migstock,
            Variable::Hostgdp => self.hostgdp,
        }
    }

    pub fn set(&mut self, var: Variable, value: Option<f64>) {
        let slot = match var {
            Variable::Growth => &mut self.growth,
            Variable::Rem => &mut self.rem,
            Variable::Tc => &mut self.tc,
            Variable::Fdi => &mut self.fdi,
            Variable::Open => &mut self.open,
            Variable::Credit => &mut self.credit,
            Variable::Inv => &mut self.inv,
            Variable::Inf => &mut self.inf,
            Variable::Migstock => &mut self.migstock,
            Variable::Hostgdp => &mut self.hostgdp,
        };
        *slot = value;
    }
}

/// Natural-log transforms of one observation. `None` where the source is
/// unknown or not strictly positive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedSeries {
    pub log_rem: Option<f64>,
    pub log_tc: Option<f64>,
    pub log_fdi: Option<f64>,
    pub log_open: Option<f64>,
    pub log_credit: Option<f64>,
    pub log_inv: Option<f64>,
}

impl DerivedSeries {
    pub fn get(&self, var: LogVariable) -> Option<f64> {
        match var {
            LogVariable::Rem => self.log_rem,
            LogVariable::Tc => self.log_tc,
            LogVariable::Fdi => self.log_fdi,
            LogVariable::Open => self.log_open,
            LogVariable::Credit => self.log_credit,
            LogVariable::Inv => self.log_inv,
        }
    }
}

/// Dataset that passed the column contract; rows still in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDataset {
    pub observations: Vec<Observation>,
}

/// Dataset ordered ascending by year.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedDataset {
    pub observations: Vec<Observation>,
}

/// One observation together with its derived logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedRow {
    pub observation: Observation,
    pub derived: DerivedSeries,
}

/// Ordered dataset plus the six derived log columns.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedDataset {
    pub rows: Vec<AugmentedRow>,
}

impl AugmentedDataset {
    /// `(year, value)` pairs for one raw variable, in year order.
    pub fn series(&self, var: Variable) -> Vec<(i32, Option<f64>)> {
        self.rows
            .iter()
            .map(|r| (r.observation.year, r.observation.get(var)))
            .collect()
    }

    /// Known values of one raw variable, in year order.
    pub fn known_values(&self, var: Variable) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.observation.get(var)).collect()
    }
}

impl Tabular for AugmentedDataset {
    fn headers(&self) -> Vec<String> {
        let mut out = vec![YEAR_COLUMN.to_string()];
        out.extend(Variable::ALL.iter().map(|v| v.column_name().to_string()));
        out.extend(LogVariable::ALL.iter().map(|v| v.column_name().to_string()));
        out
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                let mut row = Vec::with_capacity(1 + Variable::ALL.len() + LogVariable::ALL.len());
                row.push(Cell::Number(f64::from(r.observation.year)));
                row.extend(Variable::ALL.iter().map(|v| Cell::from_opt(r.observation.get(*v))));
                row.extend(LogVariable::ALL.iter().map(|v| Cell::from_opt(r.derived.get(*v))));
                row
            })
            .collect()
    }
}

/// Completeness / coverage figures for a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub row_count: usize,
    pub column_count: usize,
    pub missing_cell_count: usize,
    /// `(1 - missing / (rows * cols)) * 100`; defined as 100 for a table with no cells.
    pub completeness_pct: f64,
}

/// Decision variables of the scenario simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Driver {
    /// Trade openness, shocked in index points.
    Open,
    /// Remittances, shocked in percent.
    Rem,
    /// Investment, shocked in percent.
    Inv,
    /// Foreign direct investment, shocked in percent.
    Fdi,
    /// Exchange rate, shocked in percent.
    Tc,
}

impl Driver {
    pub const ALL: [Driver; 5] = [Driver::Open, Driver::Rem, Driver::Inv, Driver::Fdi, Driver::Tc];

    pub fn label(self) -> &'static str {
        match self {
            Driver::Open => "OPEN",
            Driver::Rem => "REM",
            Driver::Inv => "INV",
            Driver::Fdi => "FDI",
            Driver::Tc => "TC",
        }
    }

    /// Regressor name in the growth equation.
    pub fn coefficient_name(self) -> &'static str {
        match self {
            Driver::Open => "OPEN",
            Driver::Rem => "logREM",
            Driver::Inv => "logINV",
            Driver::Fdi => "logFDI",
            Driver::Tc => "logTC",
        }
    }

    pub fn is_percent(self) -> bool {
        !matches!(self, Driver::Open)
    }

    pub fn unit(self) -> &'static str {
        if self.is_percent() { "%" } else { "pts" }
    }

    /// Slider range `[min, max]`.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Driver::Open => (-30.0, 30.0),
            Driver::Rem | Driver::Inv => (-50.0, 50.0),
            Driver::Fdi => (-80.0, 80.0),
            Driver::Tc => (-30.0, 30.0),
        }
    }
}

/// Slider increment for every driver.
pub const SHOCK_STEP: f64 = 1.0;

/// User-supplied shocks: openness in points, the rest in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioShock {
    pub d_open: f64,
    pub d_rem_pct: f64,
    pub d_inv_pct: f64,
    pub d_fdi_pct: f64,
    pub d_tc_pct: f64,
}

impl Default for ScenarioShock {
    fn default() -> Self {
        Self {
            d_open: 10.0,
            d_rem_pct: 10.0,
            d_inv_pct: 10.0,
            d_fdi_pct: 10.0,
            d_tc_pct: 5.0,
        }
    }
}

impl ScenarioShock {
    pub fn get(&self, driver: Driver) -> f64 {
        match driver {
            Driver::Open => self.d_open,
            Driver::Rem => self.d_rem_pct,
            Driver::Inv => self.d_inv_pct,
            Driver::Fdi => self.d_fdi_pct,
            Driver::Tc => self.d_tc_pct,
        }
    }

    pub fn set(&mut self, driver: Driver, value: f64) {
        match driver {
            Driver::Open => self.d_open = value,
            Driver::Rem => self.d_rem_pct = value,
            Driver::Inv => self.d_inv_pct = value,
            Driver::Fdi => self.d_fdi_pct = value,
            Driver::Tc => self.d_tc_pct = value,
        }
    }
}

/// Contribution of one driver to the simulated outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub driver: Driver,
    pub coefficient: f64,
    /// Point change (openness) or log-change (percent drivers).
    pub term: f64,
    pub value: f64,
}

/// Implied point change in the outcome variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub equation: String,
    pub delta: f64,
    pub contributions: Vec<Contribution>,
}

/// A run's configuration as understood by the pipeline.
///
/// Built from defaults, then `.env`/environment, then CLI flags.
#[derive(Debug, Clone)]
pub struct DashConfig {
    /// Explicitly chosen data file (wins over the default file).
    pub data_file: Option<PathBuf>,
    /// File tried automatically when `auto_load` is on.
    pub default_file: PathBuf,
    pub auto_load: bool,
    pub export_dir: PathBuf,
    pub shock: ScenarioShock,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            default_file: PathBuf::from("base.xlsx"),
            auto_load: true,
            export_dir: PathBuf::from("."),
            shock: ScenarioShock::default(),
        }
    }
}
