//! Scenario simulator: percentage/point shocks to five drivers → implied
//! change in growth.
//!
//! Percentage shocks enter the log-linear equation as log-changes,
//! `ln(1 + pct/100)`, which is only defined for `1 + pct/100 > 0`. Openness
//! enters in levels, so its shock is used as-is.
//!
//! Precondition: the equation must carry a coefficient for every driver
//! (`OPEN`, `logREM`, `logINV`, `logFDI`, `logTC`), i.e. it must have the shape
//! of the growth equation. A missing coefficient is an error, never a zero.

use tracing::debug;

use crate::domain::{Contribution, Driver, ResultTable, ScenarioResult, ScenarioShock, SHOCK_STEP};
use crate::error::DashError;

/// Log-change implied by a percentage shock.
pub fn log_change(driver: Driver, pct: f64) -> Result<f64, DashError> {
    let factor = 1.0 + pct / 100.0;
    if !pct.is_finite() || factor <= 0.0 {
        return Err(DashError::UndefinedInput {
            driver: driver.label().to_string(),
            pct,
        });
    }
    Ok(factor.ln())
}

/// Shock term entering the equation for one driver.
fn shock_term(driver: Driver, shock: &ScenarioShock) -> Result<f64, DashError> {
    let value = shock.get(driver);
    if driver.is_percent() {
        return log_change(driver, value);
    }
    if !value.is_finite() {
        return Err(DashError::UndefinedInput {
            driver: driver.label().to_string(),
            pct: value,
        });
    }
    Ok(value)
}

/// Implied point change in the outcome of `equation` under `shock`.
///
/// Pure: identical inputs give identical output or identical failure. Every
/// shock term is checked before any coefficient is looked up.
pub fn simulate(shock: &ScenarioShock, equation: &ResultTable) -> Result<ScenarioResult, DashError> {
    let terms = Driver::ALL
        .iter()
        .map(|d| shock_term(*d, shock).map(|t| (*d, t)))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| debug!(error = %e, "scenario rejected"))?;

    let mut contributions = Vec::with_capacity(terms.len());
    for (driver, term) in terms {
        let coefficient = equation
            .estimate(driver.coefficient_name())
            .ok_or_else(|| DashError::MissingCoefficient {
                table: equation.name().to_string(),
                variable: driver.coefficient_name().to_string(),
            })?;
        contributions.push(Contribution {
            driver,
            coefficient,
            term,
            value: coefficient * term,
        });
    }

    let delta = contributions.iter().map(|c| c.value).sum();
    Ok(ScenarioResult {
        equation: equation.name().to_string(),
        delta,
        contributions,
    })
}

/// Reject shocks outside the slider ranges (used for typed-in values).
pub fn check_bounds(shock: &ScenarioShock) -> Result<(), DashError> {
    for driver in Driver::ALL {
        let (min, max) = driver.bounds();
        let value = shock.get(driver);
        if !(min..=max).contains(&value) {
            return Err(DashError::ShockOutOfRange {
                driver: driver.label().to_string(),
                value,
                min,
                max,
            });
        }
    }
    Ok(())
}

/// Move one slider by `steps` increments, clamped to its range.
pub fn nudge(shock: &mut ScenarioShock, driver: Driver, steps: i32) {
    let (min, max) = driver.bounds();
    let next = (shock.get(driver) + f64::from(steps) * SHOCK_STEP).clamp(min, max);
    shock.set(driver, next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, ResultsCatalog};
    use crate::domain::{CoefficientLayout, CoefficientRow, CoefficientTable};

    fn shock(d_open: f64, rem: f64, inv: f64, fdi: f64, tc: f64) -> ScenarioShock {
        ScenarioShock {
            d_open,
            d_rem_pct: rem,
            d_inv_pct: inv,
            d_fdi_pct: fdi,
            d_tc_pct: tc,
        }
    }

    #[test]
    fn growth_equation_example() {
        let catalog = ResultsCatalog::new();
        let eq = catalog.growth_equation().unwrap();
        let result = simulate(&shock(10.0, 10.0, 10.0, 10.0, 5.0), eq).unwrap();

        let expected = 0.4263826 * 10.0
            + 6.9329983 * 1.10_f64.ln()
            + 0.3976088 * 1.10_f64.ln()
            + (-0.0071939) * 1.10_f64.ln()
            + 0.6139383 * 1.05_f64.ln();
        assert!((result.delta - expected).abs() < 1e-12);
        assert!((result.delta - 4.9918).abs() < 1e-3);
        assert_eq!(result.equation, "3SLS_eq2");

        let sum: f64 = result.contributions.iter().map(|c| c.value).sum();
        assert!((sum - result.delta).abs() < 1e-12);
        assert_eq!(result.contributions[0].driver, Driver::Open);
        assert_eq!(result.contributions[0].term, 10.0);
    }

    #[test]
    fn zero_shock_has_zero_log_change() {
        assert_eq!(log_change(Driver::Rem, 0.0).unwrap(), 0.0);
        let eq = catalog::global().growth_equation().unwrap();
        let result = simulate(&shock(0.0, 0.0, 0.0, 0.0, 0.0), eq).unwrap();
        assert_eq!(result.delta, 0.0);
    }

    #[test]
    fn minus_hundred_percent_is_undefined() {
        let eq = catalog::global().growth_equation().unwrap();
        let err = simulate(&shock(0.0, -100.0, 0.0, 0.0, 0.0), eq).unwrap_err();
        assert_eq!(
            err,
            DashError::UndefinedInput {
                driver: "REM".to_string(),
                pct: -100.0
            }
        );
        assert!(log_change(Driver::Fdi, -150.0).is_err());
        assert!(log_change(Driver::Tc, f64::NAN).is_err());
        assert!(log_change(Driver::Inv, -99.0).is_ok());
    }

    #[test]
    fn non_finite_openness_is_undefined() {
        let eq = catalog::global().growth_equation().unwrap();
        assert!(matches!(
            simulate(&shock(f64::INFINITY, 0.0, 0.0, 0.0, 0.0), eq),
            Err(DashError::UndefinedInput { .. })
        ));
    }

    #[test]
    fn missing_coefficient_is_not_defaulted() {
        let catalog = ResultsCatalog::new();
        let eq1 = catalog.lookup(catalog::THREE_SLS_EQ1).unwrap();
        let err = simulate(&ScenarioShock::default(), eq1).unwrap_err();
        assert_eq!(
            err,
            DashError::MissingCoefficient {
                table: "3SLS_eq1".to_string(),
                variable: "OPEN".to_string()
            }
        );

        let partial = ResultTable::Coefficients(CoefficientTable::new(
            "partial",
            "partial",
            CoefficientLayout::Structural,
            vec![
                CoefficientRow::new("OPEN", 1.0),
                CoefficientRow::new("logREM", 1.0),
                CoefficientRow::new("logINV", 1.0),
                CoefficientRow::new("logFDI", 1.0),
            ],
        ));
        let err = simulate(&ScenarioShock::default(), &partial).unwrap_err();
        assert!(matches!(err, DashError::MissingCoefficient { variable, .. } if variable == "logTC"));
    }

    #[test]
    fn undefined_input_wins_over_missing_coefficient() {
        let catalog = ResultsCatalog::new();
        let granger = catalog.lookup(catalog::GRANGER).unwrap();
        let err = simulate(&shock(0.0, 0.0, 0.0, 0.0, -100.0), granger).unwrap_err();
        assert!(matches!(err, DashError::UndefinedInput { .. }));
    }

    #[test]
    fn simulate_is_deterministic() {
        let eq = catalog::global().growth_equation().unwrap();
        let s = shock(-12.0, 33.0, -7.0, 64.0, -21.0);
        assert_eq!(simulate(&s, eq).unwrap(), simulate(&s, eq).unwrap());
    }

    #[test]
    fn bounds_and_nudge() {
        assert!(check_bounds(&ScenarioShock::default()).is_ok());
        let err = check_bounds(&shock(0.0, 0.0, 0.0, -81.0, 0.0)).unwrap_err();
        assert!(matches!(err, DashError::ShockOutOfRange { driver, .. } if driver == "FDI"));

        let mut s = ScenarioShock::default();
        nudge(&mut s, Driver::Tc, 100);
        assert_eq!(s.d_tc_pct, 30.0);
        nudge(&mut s, Driver::Open, -3);
        assert_eq!(s.d_open, 7.0);
        nudge(&mut s, Driver::Fdi, -1000);
        assert_eq!(s.d_fdi_pct, -80.0);
    }
}
