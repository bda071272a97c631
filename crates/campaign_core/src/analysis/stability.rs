//! Local stability over a pair of parameters.
//!
//! Each record's neighborhood is every record (itself included) whose values
//! of both parameters lie within [`NEIGHBORHOOD_FRACTION`] of that
//! parameter's padded display domain width. The target's coefficient of
//! variation over the neighborhood decides the record's stability level.
//!
//! The scan is a plain O(n²) pairwise comparison over the active slice, which
//! is adequate for campaigns of a few hundred iterations.

use serde::{Deserialize, Serialize};

use crate::model::{Parameter, TableView, Target};
use crate::stats::{mean, neighborhood_variation, population_std_dev};

/// Neighborhood radius as a fraction of the padded domain width
pub const NEIGHBORHOOD_FRACTION: f64 = 0.1;

/// Fewest neighbors (self included) needed to classify a point
pub const MIN_NEIGHBORS: usize = 3;

/// Local stability bucket of one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StabilityLevel {
    /// Variation below 5%
    High,
    /// Variation below 10%
    Medium,
    Low,
    /// Fewer than [`MIN_NEIGHBORS`] neighbors
    Unknown,
}

impl StabilityLevel {
    pub const HIGH_BELOW: f64 = 0.05;
    pub const MEDIUM_BELOW: f64 = 0.10;

    /// Bucket a neighborhood coefficient of variation
    #[must_use]
    pub fn from_variation(cv: f64) -> Self {
        if cv < Self::HIGH_BELOW {
            Self::High
        } else if cv < Self::MEDIUM_BELOW {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Stability classification of a single record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointStability {
    pub iteration: u32,
    pub value_a: f64,
    pub value_b: f64,
    pub target_value: f64,
    /// Neighborhood size including the point itself
    pub neighbors: usize,
    /// Coefficient of variation; `None` when the neighborhood is too small
    pub variation: Option<f64>,
    pub level: StabilityLevel,
}

/// Stability classification of every record in a slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityMap {
    pub target: Target,
    pub parameter_a: Parameter,
    pub parameter_b: Parameter,
    /// Neighborhood radius along `parameter_a`
    pub radius_a: f64,
    /// Neighborhood radius along `parameter_b`
    pub radius_b: f64,
    /// One entry per record, in iteration order
    pub points: Vec<PointStability>,
}

impl StabilityMap {
    /// Number of points classified at `level`
    #[must_use]
    pub fn count(&self, level: StabilityLevel) -> usize {
        self.points.iter().filter(|p| p.level == level).count()
    }
}

/// Classify the local stability of `target` around every record of `view`
/// in the plane of `parameter_a` and `parameter_b`.
#[must_use]
pub fn local_stability(
    view: TableView<'_>,
    target: Target,
    parameter_a: Parameter,
    parameter_b: Parameter,
) -> StabilityMap {
    let radius_a = neighborhood_radius(view, parameter_a);
    let radius_b = neighborhood_radius(view, parameter_b);

    let points = view
        .iter()
        .map(|record| {
            let a = record.parameter(parameter_a);
            let b = record.parameter(parameter_b);
            let neighborhood: Vec<f64> = view
                .iter()
                .filter(|other| {
                    (other.parameter(parameter_a) - a).abs() <= radius_a
                        && (other.parameter(parameter_b) - b).abs() <= radius_b
                })
                .map(|other| other.target(target))
                .collect();

            let variation = (neighborhood.len() >= MIN_NEIGHBORS).then(|| {
                neighborhood_variation(mean(&neighborhood), population_std_dev(&neighborhood))
            });

            PointStability {
                iteration: record.iteration,
                value_a: a,
                value_b: b,
                target_value: record.target(target),
                neighbors: neighborhood.len(),
                variation,
                level: variation.map_or(StabilityLevel::Unknown, StabilityLevel::from_variation),
            }
        })
        .collect();

    StabilityMap {
        target,
        parameter_a,
        parameter_b,
        radius_a,
        radius_b,
        points,
    }
}

/// 10% of the padded display domain width
fn neighborhood_radius(view: TableView<'_>, parameter: Parameter) -> f64 {
    let (lo, hi) = view.range(parameter).padded_domain();
    NEIGHBORHOOD_FRACTION * (hi - lo)
}
