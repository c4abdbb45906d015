//! Descriptive statistics over the prepared dataset.
//!
//! Everything here skips unknown cells. Sample standard deviations use the
//! `n - 1` denominator and quantiles interpolate linearly between order
//! statistics, so figures line up with the usual spreadsheet/pandas output.

use nalgebra::{DMatrix, DVector};

use crate::domain::{AugmentedDataset, Cell, Tabular, Variable};

/// Mean / spread / range of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    /// Undefined for fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

/// Summary of the known values; `None` when there are none.
pub fn series_stats(values: &[f64]) -> Option<SeriesStats> {
    if values.is_empty() {
        return None;
    }
    let v = DVector::from_row_slice(values);
    let mean = v.mean();
    let std = sample_std(&v, mean);
    Some(SeriesStats {
        count: values.len(),
        mean,
        std,
        min: v.min(),
        max: v.max(),
    })
}

fn sample_std(v: &DVector<f64>, mean: f64) -> Option<f64> {
    if v.len() < 2 {
        return None;
    }
    let centered = v.add_scalar(-mean);
    Some((centered.norm_squared() / (v.len() as f64 - 1.0)).sqrt())
}

/// Linear-interpolated quantile of an ascending slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = q * (sorted.len() as f64 - 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// One line of the descriptive-statistics table.
#[derive(Debug, Clone, PartialEq)]
pub struct DescribeRow {
    pub variable: Variable,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Descriptive statistics for the ten required variables (one row each).
#[derive(Debug, Clone, PartialEq)]
pub struct DescribeTable {
    pub rows: Vec<DescribeRow>,
}

impl Tabular for DescribeTable {
    fn headers(&self) -> Vec<String> {
        ["variable", "count", "mean", "std", "min", "25%", "50%", "75%", "max"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    Cell::text(r.variable.column_name()),
                    Cell::Number(r.count as f64),
                    Cell::from_opt(r.mean),
                    Cell::from_opt(r.std),
                    Cell::from_opt(r.min),
                    Cell::from_opt(r.q25),
                    Cell::from_opt(r.q50),
                    Cell::from_opt(r.q75),
                    Cell::from_opt(r.max),
                ]
            })
            .collect()
    }
}

pub fn describe(dataset: &AugmentedDataset) -> DescribeTable {
    let rows = Variable::ALL
        .iter()
        .map(|&variable| {
            let mut values = dataset.known_values(variable);
            values.sort_by(|a, b| a.total_cmp(b));
            let stats = series_stats(&values);
            DescribeRow {
                variable,
                count: values.len(),
                mean: stats.as_ref().map(|s| s.mean),
                std: stats.as_ref().and_then(|s| s.std),
                min: stats.as_ref().map(|s| s.min),
                q25: quantile(&values, 0.25),
                q50: quantile(&values, 0.50),
                q75: quantile(&values, 0.75),
                max: stats.as_ref().map(|s| s.max),
            }
        })
        .collect();
    DescribeTable { rows }
}

/// Pairwise-complete Pearson correlations between the ten variables.
///
/// Undefined entries (fewer than two complete pairs, or a constant series) are NaN
/// in the matrix and `None` through `get`.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub variables: Vec<Variable>,
    pub values: DMatrix<f64>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: Variable, b: Variable) -> Option<f64> {
        let i = self.variables.iter().position(|v| *v == a)?;
        let j = self.variables.iter().position(|v| *v == b)?;
        let v = self.values[(i, j)];
        v.is_finite().then_some(v)
    }
}

impl Tabular for CorrelationMatrix {
    fn headers(&self) -> Vec<String> {
        let mut out = vec!["variable".to_string()];
        out.extend(self.variables.iter().map(|v| v.column_name().to_string()));
        out
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mut row = vec![Cell::text(v.column_name())];
                row.extend((0..self.variables.len()).map(|j| Cell::from_opt(Some(self.values[(i, j)]))));
                row
            })
            .collect()
    }
}

pub fn correlation_matrix(dataset: &AugmentedDataset) -> CorrelationMatrix {
    let variables = Variable::ALL.to_vec();
    let n = variables.len();
    let mut values = DMatrix::from_element(n, n, f64::NAN);

    for i in 0..n {
        for j in i..n {
            let pairs: Vec<(f64, f64)> = dataset
                .rows
                .iter()
                .filter_map(|r| Some((r.observation.get(variables[i])?, r.observation.get(variables[j])?)))
                .collect();
            let r = pearson(&pairs).unwrap_or(f64::NAN);
            values[(i, j)] = r;
            values[(j, i)] = r;
        }
    }

    CorrelationMatrix { variables, values }
}

/// Pearson correlation of paired observations.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let x = DVector::from_iterator(pairs.len(), pairs.iter().map(|p| p.0));
    let y = DVector::from_iterator(pairs.len(), pairs.iter().map(|p| p.1));
    let xc = x.add_scalar(-x.mean());
    let yc = y.add_scalar(-y.mean());
    let denom = xc.norm() * yc.norm();
    if denom <= 0.0 || !denom.is_finite() {
        return None;
    }
    Some((xc.dot(&yc) / denom).clamp(-1.0, 1.0))
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Bin `values` into `bins` equal-width buckets spanning `[min, max]`.
///
/// The last bucket is closed on the right. A constant series is widened by
/// ±0.5 so it still lands in a single, non-degenerate bucket.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return None;
    }
    let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < 1e-12 {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Some(Histogram { edges, counts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AugmentedRow, DerivedSeries, Observation};

    fn dataset(growth: &[Option<f64>], rem: &[Option<f64>]) -> AugmentedDataset {
        let rows = growth
            .iter()
            .zip(rem)
            .enumerate()
            .map(|(i, (g, r))| {
                let mut o = Observation::empty(2000 + i as i32);
                o.growth = *g;
                o.rem = *r;
                AugmentedRow {
                    observation: o,
                    derived: DerivedSeries::default(),
                }
            })
            .collect();
        AugmentedDataset { rows }
    }

    #[test]
    fn series_stats_sample_std() {
        let s = series_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(s.count, 8);
        assert!((s.mean - 5.0).abs() < 1e-12);
        // Sample (n-1) std of the classic example.
        assert!((s.std.unwrap() - 2.138089935299395).abs() < 1e-12);
        assert_eq!((s.min, s.max), (2.0, 9.0));
        assert_eq!(series_stats(&[1.0]).unwrap().std, None);
        assert!(series_stats(&[]).is_none());
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&v, 0.0), Some(1.0));
        assert_eq!(quantile(&v, 0.25), Some(1.75));
        assert_eq!(quantile(&v, 0.5), Some(2.5));
        assert_eq!(quantile(&v, 1.0), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn describe_skips_unknown_cells() {
        let ds = dataset(&[Some(1.0), None, Some(3.0)], &[None, None, None]);
        let table = describe(&ds);
        let growth = &table.rows[0];
        assert_eq!(growth.variable, Variable::Growth);
        assert_eq!(growth.count, 2);
        assert_eq!(growth.mean, Some(2.0));
        assert_eq!(growth.q50, Some(2.0));
        let rem = &table.rows[1];
        assert_eq!(rem.count, 0);
        assert_eq!(rem.mean, None);
        assert_eq!(table.rows().len(), 10);
    }

    #[test]
    fn correlation_is_pairwise_complete() {
        let ds = dataset(
            &[Some(1.0), Some(2.0), Some(3.0), Some(100.0)],
            &[Some(2.0), Some(4.0), Some(6.0), None],
        );
        let corr = correlation_matrix(&ds);
        assert!((corr.get(Variable::Growth, Variable::Rem).unwrap() - 1.0).abs() < 1e-12);
        assert!((corr.get(Variable::Growth, Variable::Growth).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(corr.get(Variable::Growth, Variable::Inf), None);
    }

    #[test]
    fn pearson_of_constant_series_is_undefined() {
        assert_eq!(pearson(&[(1.0, 2.0), (1.0, 3.0)]), None);
        let r = pearson(&[(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn histogram_counts_every_value() {
        let values: Vec<f64> = (0..30).map(f64::from).collect();
        let h = histogram(&values, 15).unwrap();
        assert_eq!(h.edges.len(), 16);
        assert_eq!(h.counts.iter().sum::<usize>(), 30);
        assert_eq!(h.counts[14], 2);

        let flat = histogram(&[4.0, 4.0], 15).unwrap();
        assert_eq!(flat.counts.iter().sum::<usize>(), 2);
        assert!(histogram(&[], 15).is_none());
    }
}
