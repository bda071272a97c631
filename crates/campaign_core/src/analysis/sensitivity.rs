//! Binned sensitivity analysis.
//!
//! Each parameter's observed range is split into [`BIN_COUNT`] equal-width
//! bins. Per-bin target statistics feed normalized gradients (elasticities)
//! between consecutive non-empty bins, and every gradient segment is then
//! classified against the sensitivity and stability thresholds:
//!
//! - **safe zone**: `|g| < sensitivity threshold`
//! - **boundary**: `|g| >= sensitivity threshold`
//! - **stability region**: averaged bin variation `< stability threshold`
//!
//! Safe zones and boundaries partition the segments; stability regions are an
//! independent predicate, so a segment can be both a boundary and stable.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::Thresholds;
use crate::model::{IterationRecord, Parameter, ParameterRange, ParameterRanges, TableView, Target};
use crate::stats::{bin_variation, mean, population_std_dev};

use super::ranking::{RankedParameter, rank};

/// Number of equal-width bins per parameter
pub const BIN_COUNT: usize = 10;

/// Target statistics of the records falling into one bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinStatistic {
    /// Bin index in `0..BIN_COUNT`
    pub index: usize,
    pub count: usize,
    pub target_mean: f64,
    /// Population standard deviation of the target
    pub target_std_dev: f64,
    pub parameter_mean: f64,
    /// Coefficient of variation of the target (`+∞` for a zero mean with spread)
    pub stability: f64,
}

/// Normalized sensitivity between two consecutive non-empty bins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientSegment {
    pub from_bin: usize,
    pub to_bin: usize,
    /// Mean parameter value of the lower bin
    pub start: f64,
    /// Mean parameter value of the upper bin
    pub end: f64,
    /// Relative target change over relative parameter change
    pub gradient: f64,
    pub abs_gradient: f64,
    /// Average of the two bins' variation
    pub stability: f64,
}

/// Parameter sub-range covered by one gradient segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl From<&GradientSegment> for Interval {
    fn from(segment: &GradientSegment) -> Self {
        Self {
            start: segment.start,
            end: segment.end,
        }
    }
}

/// Full bin and gradient breakdown of one parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSensitivity {
    pub parameter: Parameter,
    pub range: ParameterRange,
    /// Non-empty bins in index order
    pub bins: Vec<BinStatistic>,
    pub segments: Vec<GradientSegment>,
    /// Mean of `|g|` over segments; zero without segments
    pub mean_gradient: f64,
    /// Largest `|g|`; zero without segments
    pub max_gradient: f64,
    pub safe_zones: Vec<Interval>,
    pub boundaries: Vec<Interval>,
    pub stability_regions: Vec<Interval>,
}

impl ParameterSensitivity {
    /// Degenerate breakdown of a parameter whose range is zero
    #[must_use]
    pub fn constant(parameter: Parameter, range: ParameterRange) -> Self {
        Self {
            parameter,
            range,
            bins: Vec::new(),
            segments: Vec::new(),
            mean_gradient: 0.0,
            max_gradient: 0.0,
            safe_zones: Vec::new(),
            boundaries: Vec::new(),
            stability_regions: Vec::new(),
        }
    }

    /// Aggregate and classify precomputed bins and segments
    #[must_use]
    pub fn from_parts(
        parameter: Parameter,
        range: ParameterRange,
        bins: Vec<BinStatistic>,
        segments: Vec<GradientSegment>,
        thresholds: Thresholds,
    ) -> Self {
        let abs: Vec<f64> = segments.iter().map(|s| s.abs_gradient).collect();
        let mean_gradient = mean(&abs);
        let max_gradient = abs.iter().copied().fold(0.0, f64::max);

        let (boundaries, safe_zones): (Vec<&GradientSegment>, Vec<&GradientSegment>) = segments
            .iter()
            .partition(|s| s.abs_gradient >= thresholds.sensitivity());
        let stability_regions = segments
            .iter()
            .filter(|s| s.stability < thresholds.stability())
            .map(Interval::from)
            .collect();

        Self {
            parameter,
            range,
            mean_gradient,
            max_gradient,
            safe_zones: safe_zones.into_iter().map(Interval::from).collect(),
            boundaries: boundaries.into_iter().map(Interval::from).collect(),
            stability_regions,
            bins,
            segments,
        }
    }

    /// True when the parameter never varied in the analyzed slice
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.range.is_constant()
    }
}

/// Sensitivity of one target to every parameter, plus the ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityAnalysis {
    pub target: Target,
    pub sensitivity_threshold: f64,
    pub stability_threshold: f64,
    pub parameters: FxHashMap<Parameter, ParameterSensitivity>,
    /// Parameters by descending mean sensitivity
    pub ranking: Vec<RankedParameter>,
}

impl SensitivityAnalysis {
    #[must_use]
    pub fn get(&self, parameter: Parameter) -> Option<&ParameterSensitivity> {
        self.parameters.get(&parameter)
    }

    /// Per-parameter breakdowns in column order
    pub fn iter(&self) -> impl Iterator<Item = &ParameterSensitivity> {
        Parameter::ALL
            .into_iter()
            .filter_map(|p| self.parameters.get(&p))
    }
}

/// Analyze how `target` responds to every parameter over `view`.
///
/// `ranges` supplies the binning range per parameter, normally
/// `view.ranges()`. Values outside a supplied range are clamped into the
/// first or last bin.
#[must_use]
pub fn analyze_sensitivity(
    view: TableView<'_>,
    target: Target,
    ranges: &ParameterRanges,
    thresholds: Thresholds,
) -> SensitivityAnalysis {
    let analyze_one = |parameter: Parameter| {
        parameter_sensitivity(view.records(), target, parameter, ranges.get(parameter), thresholds)
    };

    #[cfg(feature = "parallel")]
    let breakdowns: Vec<ParameterSensitivity> =
        Parameter::ALL.par_iter().map(|&p| analyze_one(p)).collect();

    #[cfg(not(feature = "parallel"))]
    let breakdowns: Vec<ParameterSensitivity> =
        Parameter::ALL.iter().map(|&p| analyze_one(p)).collect();

    let ranking = rank(&breakdowns);
    let parameters = breakdowns
        .into_iter()
        .map(|breakdown| (breakdown.parameter, breakdown))
        .collect();

    SensitivityAnalysis {
        target,
        sensitivity_threshold: thresholds.sensitivity(),
        stability_threshold: thresholds.stability(),
        parameters,
        ranking,
    }
}

/// Breakdown of a single parameter
#[must_use]
pub fn parameter_sensitivity(
    records: &[IterationRecord],
    target: Target,
    parameter: Parameter,
    range: ParameterRange,
    thresholds: Thresholds,
) -> ParameterSensitivity {
    if range.is_constant() {
        tracing::debug!(%parameter, "Constant parameter, no gradient segments");
        return ParameterSensitivity::constant(parameter, range);
    }

    let bins = bin_statistics(records, target, parameter, range);
    let segments = bins
        .windows(2)
        .map(|pair| gradient_segment(&pair[0], &pair[1]))
        .collect();

    ParameterSensitivity::from_parts(parameter, range, bins, segments, thresholds)
}

/// Bin index of `value` within `range`, clamped to `0..BIN_COUNT`
#[must_use]
pub fn bin_index(value: f64, range: ParameterRange) -> usize {
    let width = range.range / BIN_COUNT as f64;
    let raw = ((value - range.min) / width).floor();
    raw.clamp(0.0, (BIN_COUNT - 1) as f64) as usize
}

/// Statistics of every non-empty bin, in bin order
fn bin_statistics(
    records: &[IterationRecord],
    target: Target,
    parameter: Parameter,
    range: ParameterRange,
) -> Vec<BinStatistic> {
    let mut targets: [Vec<f64>; BIN_COUNT] = Default::default();
    let mut params: [Vec<f64>; BIN_COUNT] = Default::default();
    for record in records {
        let x = record.parameter(parameter);
        let i = bin_index(x, range);
        params[i].push(x);
        targets[i].push(record.target(target));
    }

    targets
        .iter()
        .zip(&params)
        .enumerate()
        .filter(|(_, (ys, _))| !ys.is_empty())
        .map(|(index, (ys, xs))| {
            let target_mean = mean(ys);
            let target_std_dev = population_std_dev(ys);
            BinStatistic {
                index,
                count: ys.len(),
                target_mean,
                target_std_dev,
                parameter_mean: mean(xs),
                stability: bin_variation(target_mean, target_std_dev),
            }
        })
        .collect()
}

/// Elasticity between two consecutive non-empty bins.
///
/// Zero when the parameter means coincide, when the lower bin's target mean
/// is zero, or when the ratio is not finite.
fn gradient_segment(current: &BinStatistic, next: &BinStatistic) -> GradientSegment {
    let param_delta = next.parameter_mean - current.parameter_mean;
    let gradient = if param_delta == 0.0 || current.target_mean == 0.0 {
        0.0
    } else {
        let target_change = (next.target_mean - current.target_mean) / current.target_mean;
        let param_change = param_delta / current.parameter_mean;
        let g = target_change / param_change;
        if g.is_finite() { g } else { 0.0 }
    };

    GradientSegment {
        from_bin: current.index,
        to_bin: next.index,
        start: current.parameter_mean,
        end: next.parameter_mean,
        gradient,
        abs_gradient: gradient.abs(),
        stability: (current.stability + next.stability) / 2.0,
    }
}
