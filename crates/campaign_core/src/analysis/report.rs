//! One-call analysis of a campaign under a single configuration.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::model::{IterationTable, TableView, Target};

use super::correlation::{CorrelationMatrix, correlate};
use super::ranking::RankedParameter;
use super::sensitivity::{SensitivityAnalysis, analyze_sensitivity};
use super::stability::{StabilityMap, local_stability};
use super::surrogate::{SurrogateCurve, surrogate_curve};

/// Best observed value of the selected target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestIteration {
    pub iteration: u32,
    pub target: Target,
    pub value: f64,
}

/// Everything the engine computes for one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Length of the analyzed prefix
    pub iterations_used: usize,
    pub target: Target,
    /// Correlations of every target with every parameter
    pub correlations: CorrelationMatrix,
    pub sensitivity: SensitivityAnalysis,
    pub stability: Option<StabilityMap>,
    pub surrogate: Option<SurrogateCurve>,
    pub best: BestIteration,
}

/// Run every configured analysis over the active prefix of `table`.
///
/// Only configuration problems fail; numeric degeneracies in the data are
/// reported through the sentinel values of each module.
pub fn analyze(table: &IterationTable, config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;
    let thresholds = config.thresholds()?;
    let view = match config.active_iterations {
        Some(len) => table.prefix(len)?,
        None => table.view(),
    };
    let target = config.target;

    tracing::debug!(
        iterations = view.len(),
        metric = %target,
        "analyzing campaign"
    );

    let sensitivity_pass = || analyze_sensitivity(view, target, &view.ranges(), thresholds);
    let optional_pass = || -> Result<(Option<StabilityMap>, Option<SurrogateCurve>)> {
        let stability = config
            .parameter_pair
            .map(|(a, b)| local_stability(view, target, a, b));
        let surrogate = config
            .parameter
            .map(|p| surrogate_curve(view, target, p, config.surrogate_samples))
            .transpose()?;
        Ok((stability, surrogate))
    };

    #[cfg(feature = "parallel")]
    let ((correlations, sensitivity), optional) = rayon::join(
        || rayon::join(|| correlate(view, &Target::ALL), sensitivity_pass),
        optional_pass,
    );

    #[cfg(not(feature = "parallel"))]
    let ((correlations, sensitivity), optional) = (
        (correlate(view, &Target::ALL), sensitivity_pass()),
        optional_pass(),
    );

    let (stability, surrogate) = optional?;

    Ok(AnalysisReport {
        iterations_used: view.len(),
        target,
        correlations,
        sensitivity,
        stability,
        surrogate,
        best: best_iteration(view, target),
    })
}

fn best_iteration(view: TableView<'_>, target: Target) -> BestIteration {
    let record = view.best(target);
    BestIteration {
        iteration: record.iteration,
        target,
        value: record.target(target),
    }
}

impl AnalysisReport {
    /// Parameter with the highest mean sensitivity, if any parameter varies
    #[must_use]
    pub fn most_sensitive(&self) -> Option<&RankedParameter> {
        self.sensitivity
            .ranking
            .first()
            .filter(|r| r.mean_sensitivity > 0.0)
    }
}
