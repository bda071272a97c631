//! Pearson correlation between every parameter and the requested targets.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::{Parameter, TableView, Target};
use crate::stats::{has_spread, mean};

/// Correlation of each requested target with each parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    values: FxHashMap<Target, FxHashMap<Parameter, f64>>,
}

impl CorrelationMatrix {
    /// Correlation for one pair; `None` when the target was not requested
    #[must_use]
    pub fn get(&self, target: Target, parameter: Parameter) -> Option<f64> {
        self.values.get(&target)?.get(&parameter).copied()
    }

    /// All parameter correlations of one target
    #[must_use]
    pub fn for_target(&self, target: Target) -> Option<&FxHashMap<Parameter, f64>> {
        self.values.get(&target)
    }

    /// Targets present in the matrix, in column order
    pub fn targets(&self) -> impl Iterator<Item = Target> + '_ {
        Target::ALL
            .into_iter()
            .filter(|t| self.values.contains_key(t))
    }

    /// Parameters of one target ordered by descending `|r|`.
    /// Equal magnitudes keep column order.
    #[must_use]
    pub fn strongest(&self, target: Target) -> Vec<(Parameter, f64)> {
        let Some(row) = self.values.get(&target) else {
            return Vec::new();
        };
        let mut pairs: Vec<(Parameter, f64)> = Parameter::ALL
            .into_iter()
            .filter_map(|p| row.get(&p).map(|r| (p, *r)))
            .collect();
        pairs.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        pairs
    }
}

/// Correlate every parameter with each of `targets` over `view`.
///
/// A parameter with fewer than two distinct values correlates at exactly 0,
/// as does any pair whose coefficient is not finite (a constant target).
#[must_use]
pub fn correlate(view: TableView<'_>, targets: &[Target]) -> CorrelationMatrix {
    let columns: Vec<(Parameter, Vec<f64>)> = Parameter::ALL
        .into_iter()
        .map(|p| (p, view.parameter_values(p)))
        .collect();

    let mut values = FxHashMap::default();
    for &target in targets {
        let ys = view.target_values(target);
        let row: FxHashMap<Parameter, f64> = columns
            .iter()
            .map(|(p, xs)| (*p, pearson(xs, &ys)))
            .collect();
        values.insert(target, row);
    }

    CorrelationMatrix { values }
}

/// Population Pearson coefficient with degenerate inputs mapped to 0
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if !has_spread(xs) {
        return 0.0;
    }
    let n = xs.len() as f64;
    let mean_x = mean(xs);
    let mean_y = mean(ys);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let r = (cov / n) / ((var_x / n).sqrt() * (var_y / n).sqrt());
    if r.is_finite() { r } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IterationRecord, IterationTable};

    fn table(points: &[(f64, f64)]) -> IterationTable {
        let records = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                IterationRecord::new(
                    i as u32 + 1,
                    [x, 5.0, -x, 1.0, 2.0, 3.0, 0.5],
                    [y, 7.0, 1.0 / (i as f64 + 1.0)],
                )
            })
            .collect();
        IterationTable::new(records).unwrap()
    }

    #[test]
    fn test_perfect_linear_relationship() {
        let table = table(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0), (4.0, 8.0)]);
        let matrix = correlate(table.view(), &[Target::Yield]);

        let r = matrix.get(Target::Yield, Parameter::T1Celsius).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        let r = matrix.get(Target::Yield, Parameter::T2Celsius).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_parameter_is_zero() {
        let table = table(&[(1.0, 2.0), (2.0, 5.0), (3.0, 1.0)]);
        let matrix = correlate(table.view(), &Target::ALL);
        for target in Target::ALL {
            assert_eq!(matrix.get(target, Parameter::T1Minutes), Some(0.0));
            assert_eq!(matrix.get(target, Parameter::ConcentrationMolar), Some(0.0));
        }
    }

    #[test]
    fn test_constant_target_is_zero() {
        let table = table(&[(1.0, 2.0), (2.0, 5.0), (3.0, 1.0)]);
        let matrix = correlate(table.view(), &[Target::Impurity]);
        assert_eq!(matrix.get(Target::Impurity, Parameter::T1Celsius), Some(0.0));
    }

    #[test]
    fn test_single_record_is_zero() {
        let table = table(&[(1.0, 2.0)]);
        let matrix = correlate(table.view(), &[Target::Yield]);
        assert_eq!(matrix.get(Target::Yield, Parameter::T1Celsius), Some(0.0));
    }

    #[test]
    fn test_unrequested_target_is_absent() {
        let table = table(&[(1.0, 2.0), (2.0, 3.0)]);
        let matrix = correlate(table.view(), &[Target::Yield]);
        assert!(matrix.get(Target::Impurity, Parameter::T1Celsius).is_none());
        assert!(matrix.for_target(Target::Impurity).is_none());
        assert_eq!(matrix.targets().collect::<Vec<_>>(), vec![Target::Yield]);
    }

    #[test]
    fn test_known_partial_correlation() {
        // x = [1,2,3,4,5], y = [2,1,4,3,5] → r = 0.8
        let table = table(&[(1.0, 2.0), (2.0, 1.0), (3.0, 4.0), (4.0, 3.0), (5.0, 5.0)]);
        let matrix = correlate(table.view(), &[Target::Yield]);
        let r = matrix.get(Target::Yield, Parameter::T1Celsius).unwrap();
        assert!((r - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_strongest_orders_by_magnitude() {
        let table = table(&[(1.0, 2.0), (2.0, 1.0), (3.0, 4.0), (4.0, 3.0), (5.0, 5.0)]);
        let matrix = correlate(table.view(), &[Target::ImpurityXRatio]);
        let ranked = matrix.strongest(Target::ImpurityXRatio);
        assert_eq!(ranked.len(), Parameter::COUNT);
        for pair in ranked.windows(2) {
            assert!(pair[0].1.abs() >= pair[1].1.abs());
        }
        assert!(matrix.strongest(Target::Yield).is_empty());
    }
}
