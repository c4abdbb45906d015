//! Previously estimated results, fixed as reference data.
//!
//! Sample: annual observations 1995–2022. Nothing here is re-estimated at
//! runtime; significance markers and conclusions are derived from the stored
//! p-values / statistics by the row constructors.

use crate::domain::{
    BoundsTest, CoefficientLayout, CoefficientRow, CoefficientTable, CriticalBound, DiagnosticRow,
    DiagnosticsTable, GrangerRow, GrangerTable, ResultTable,
};

pub const THREE_SLS_EQ1: &str = "3SLS_eq1";
pub const THREE_SLS_EQ2: &str = "3SLS_eq2";
pub const THREE_SLS_EQ3: &str = "3SLS_eq3";
pub const THREE_SLS_EQ4: &str = "3SLS_eq4";
pub const ARDL_GENERAL: &str = "ARDL_general";
pub const ECM_SHORT: &str = "ECM_short";
pub const LONG_RUN: &str = "Long_run";
pub const BOUNDS_TEST: &str = "Bounds_test";
pub const DIAGNOSTICS: &str = "Diagnostics";
pub const GRANGER: &str = "Granger";

/// Registration order (also the export sheet order).
pub fn all() -> Vec<ResultTable> {
    vec![
        three_sls_eq1(),
        three_sls_eq2(),
        three_sls_eq3(),
        three_sls_eq4(),
        ardl_general(),
        ecm_short(),
        long_run(),
        bounds_test(),
        diagnostics(),
        granger(),
    ]
}

fn structural(variable: &str, estimate: f64, std_error: f64, t_value: f64, p: f64) -> CoefficientRow {
    CoefficientRow::new(variable, estimate).with_inference(std_error, t_value, p)
}

fn ardl(variable: &str, coefficient: f64, p: f64) -> CoefficientRow {
    CoefficientRow::new(variable, coefficient).with_p_value(p)
}

/// Equation (1): remittances (logREM).
pub fn three_sls_eq1() -> ResultTable {
    ResultTable::Coefficients(CoefficientTable::new(
        THREE_SLS_EQ1,
        "3SLS equation 1: remittances (logREM)",
        CoefficientLayout::Structural,
        vec![
            structural("(Intercept)", 19.867206200, 0.337291584, 58.90217, 0.0),
            structural("GROWTH", -0.049708380, 0.001640530, -30.30019, 0.0),
            structural("MIGSTOCK", 0.000853106, 0.005728275, 0.14893, 0.88291),
            structural("HOSTGDP", -0.450865283, 0.012902207, -34.94482, 0.0),
            structural("logTC", -1.998338922, 0.049374055, -40.47346, 0.0),
        ],
    ))
}

/// Equation (2): growth (GROWTH). The scenario simulator reads this one.
pub fn three_sls_eq2() -> ResultTable {
    ResultTable::Coefficients(CoefficientTable::new(
        THREE_SLS_EQ2,
        "3SLS equation 2: growth (GROWTH)",
        CoefficientLayout::Structural,
        vec![
            structural("(Intercept)", -64.0286419, 130.7465478, -0.48972, 0.62918),
            structural("logREM", 6.9329983, 7.8687708, 0.88108, 0.38780),
            structural("logINV", 0.3976088, 6.1718758, 0.06442, 0.94922),
            structural("OPEN", 0.4263826, 0.0879557, 4.84770, 7.6231e-05),
            structural("logFDI", -0.0071939, 0.0568619, -0.12652, 0.90047),
            structural("logTC", 0.6139383, 14.4947751, 0.04236, 0.96660),
        ],
    ))
}

/// Equation (3): investment (logINV).
pub fn three_sls_eq3() -> ResultTable {
    ResultTable::Coefficients(CoefficientTable::new(
        THREE_SLS_EQ3,
        "3SLS equation 3: investment (logINV)",
        CoefficientLayout::Structural,
        vec![
            structural("(Intercept)", 4.6102489, 2.1739193, 2.12071, 0.044943),
            structural("logREM", -0.4648178, 0.3688956, -1.26003, 0.220296),
            structural("CREDIT", 0.1363536, 0.0602302, 2.26387, 0.033323),
            structural("GROWTH", 0.0740374, 0.0334644, 2.21242, 0.037141),
            structural("INF", 0.0168264, 0.0167276, 1.00590, 0.324928),
        ],
    ))
}

/// Equation (4): trade openness (OPEN).
pub fn three_sls_eq4() -> ResultTable {
    ResultTable::Coefficients(CoefficientTable::new(
        THREE_SLS_EQ4,
        "3SLS equation 4: openness (OPEN)",
        CoefficientLayout::Structural,
        vec![
            structural("(Intercept)", 131.589512, 123.522193, 1.06531, 0.29779),
            structural("logREM", -15.134111, 15.736289, -0.96173, 0.34619),
            structural("GROWTH", 2.395862, 0.789872, 3.03323, 0.00591),
            structural("logINV", -0.589054, 13.955603, -0.04221, 0.96670),
            structural("HOSTGDP", 0.595468, 7.280021, 0.08179, 0.93552),
        ],
    ))
}

/// ARDL(1,2,2,1,3,3,1,3) in levels.
pub fn ardl_general() -> ResultTable {
    ResultTable::Coefficients(CoefficientTable::new(
        ARDL_GENERAL,
        "ARDL(1,2,2,1,3,3,1,3)",
        CoefficientLayout::Ardl,
        vec![
            ardl("L(GROWTH,1)", -0.139283, 0.02416),
            ardl("logREM", -14.065258, 0.00307),
            ardl("L(logREM,1)", 0.814373, 0.05571),
            ardl("L(logREM,2)", 3.478532, 0.00583),
            ardl("logINV", -1.494072, 0.08327),
            ardl("L(logINV,1)", 12.180486, 0.01421),
            ardl("L(logINV,2)", -4.376342, 0.02008),
            ardl("logOPEN", 5.883577, 0.00700),
            ardl("L(logOPEN,1)", 4.602755, 0.00946),
            ardl("INF", -0.366516, 0.00346),
            ardl("L(INF,1)", -0.270084, 0.01617),
            ardl("L(INF,2)", 0.006172, 0.44050),
            ardl("L(INF,3)", 0.225961, 0.01498),
            ardl("logCREDIT", -5.238680, 0.01116),
            ardl("L(logCREDIT,1)", -13.878765, 0.00460),
            ardl("L(logCREDIT,2)", 15.429603, 0.00349),
            ardl("L(logCREDIT,3)", 5.595321, 0.00958),
            ardl("logTC", 9.669343, 0.00917),
            ardl("L(logTC,1)", -40.599514, 0.00235),
            ardl("logFDI", -0.045632, 0.05533),
            ardl("L(logFDI,1)", 0.586344, 0.00313),
            ardl("L(logFDI,2)", -0.029744, 0.09182),
            ardl("L(logFDI,3)", -0.443065, 0.00331),
            ardl("Constant", 193.713570, 0.00425),
        ],
    ))
}

/// Short-run dynamics with the error-correction term. No p-values were
/// reported for this form, so every marker is empty.
pub fn ecm_short() -> ResultTable {
    let rows = [
        ("d(logREM)", -14.065),
        ("d(L(logREM,1))", -3.479),
        ("d(logINV)", -1.494),
        ("d(L(logINV,1))", 4.376),
        ("d(logOPEN)", 5.884),
        ("d(INF)", -0.367),
        ("d(L(INF,1))", -0.232),
        ("d(L(INF,2))", -0.226),
        ("d(logCREDIT)", -5.239),
        ("d(L(logCREDIT,1))", -21.025),
        ("d(L(logCREDIT,2))", -5.595),
        ("d(logTC)", 9.669),
        ("d(logFDI)", -0.046),
        ("d(L(logFDI,1))", 0.473),
        ("d(L(logFDI,2))", 0.443),
        ("ect", -1.139),
        ("Constant", 193.714),
    ];
    ResultTable::Coefficients(CoefficientTable::new(
        ECM_SHORT,
        "Short-run dynamics (ECM)",
        CoefficientLayout::ShortRun,
        rows.iter().map(|(v, c)| CoefficientRow::new(*v, *c)).collect(),
    ))
}

/// Long-run elasticities implied by the ARDL model.
pub fn long_run() -> ResultTable {
    let rows = [
        ("logREM", -5.0981021),
        ("logINV", 10.4298151),
        ("logOPEN", 27.7491541),
        ("INF", -1.3883375),
        ("logCREDIT", -3.7688735),
        ("logTC", -36.4546632),
        ("logFDI", 0.7089692),
    ];
    ResultTable::Coefficients(CoefficientTable::new(
        LONG_RUN,
        "Long-run relationship",
        CoefficientLayout::LongRun,
        rows.iter().map(|(v, c)| CoefficientRow::new(*v, *c)).collect(),
    ))
}

/// Pesaran bounds test, k = 7 regressors, unrestricted intercept.
///
/// Only the 5% small-sample bounds were reported with the estimation. The 10%
/// and 1% levels stay unknown rather than mixing in another table's values.
pub fn bounds_test() -> ResultTable {
    ResultTable::Bounds(BoundsTest::new(
        BOUNDS_TEST,
        "Pesaran bounds test",
        "Pesaran Bounds",
        5.3808,
        vec![
            CriticalBound::unknown(10.0),
            CriticalBound::tabulated(5.0, 2.73, 4.163),
            CriticalBound::unknown(1.0),
        ],
        5.0,
    ))
}

/// Residual diagnostics of the ARDL model.
pub fn diagnostics() -> ResultTable {
    let rows = [
        ("Wilcoxon", 0.9368),
        ("t-test", 1.0),
        ("ARCH LM", 0.214),
        ("Box-Pierce", 0.4823),
        ("Ljung-Box", 0.3432),
        ("Lilliefors", 0.8563),
        ("Shapiro-Wilk", 0.6508),
    ];
    ResultTable::Diagnostics(DiagnosticsTable {
        name: DIAGNOSTICS.to_string(),
        title: "Residual diagnostics".to_string(),
        rows: rows.iter().map(|(t, p)| DiagnosticRow::new(*t, *p)).collect(),
    })
}

/// Granger-causality F tests towards GROWTH.
pub fn granger() -> ResultTable {
    let rows = [
        ("logREM", 1.0089, 0.4117),
        ("logINV", 4.1263, 0.02164),
        ("logOPEN", 4.6084, 0.01461),
        ("INF", 0.3763, 0.7712),
        ("logCREDIT", 0.1844, 0.9056),
        ("logTC", 2.6538, 0.07975),
        ("logFDI", 2.5814, 0.0854),
    ];
    ResultTable::Granger(GrangerTable {
        name: GRANGER.to_string(),
        title: "Granger causality".to_string(),
        rows: rows.iter().map(|(v, f, p)| GrangerRow::new(*v, *f, *p)).collect(),
    })
}
