//! Per-call analysis configuration
//!
//! Everything a host would otherwise keep as ambient selection state (the
//! chosen target, parameters, thresholds and slice length) is passed to the
//! engine explicitly through [`AnalysisConfig`]. The engine keeps nothing
//! between calls.

use serde::{Deserialize, Serialize};

use crate::error::{InvalidInputError, Result};
use crate::model::{Parameter, Target};

fn default_sensitivity_threshold() -> f64 {
    0.05
}

fn default_stability_threshold() -> f64 {
    0.15
}

fn default_surrogate_samples() -> usize {
    101
}

/// Validated classification thresholds for the binned sensitivity analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    /// Segments with `|g|` below this are safe zones, the rest boundaries
    sensitivity: f64,
    /// Segments with averaged variation below this are stability regions
    stability: f64,
}

impl Thresholds {
    pub fn new(sensitivity: f64, stability: f64) -> Result<Self> {
        check_threshold("sensitivity", sensitivity)?;
        check_threshold("stability", stability)?;
        Ok(Self {
            sensitivity,
            stability,
        })
    }

    #[must_use]
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    #[must_use]
    pub fn stability(&self) -> f64 {
        self.stability
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity_threshold(),
            stability: default_stability_threshold(),
        }
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InvalidInputError::InvalidThreshold { name, value })
    }
}

/// Complete configuration for one [`analyze`](crate::analysis::analyze) call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Target analyzed by the sensitivity, stability and surrogate modules
    #[serde(default)]
    pub target: Target,

    /// Parameter for the surrogate curve; skipped when absent
    #[serde(default)]
    pub parameter: Option<Parameter>,

    /// Parameter pair for the local stability map; skipped when absent
    #[serde(default)]
    pub parameter_pair: Option<(Parameter, Parameter)>,

    #[serde(default = "default_sensitivity_threshold")]
    pub sensitivity_threshold: f64,

    #[serde(default = "default_stability_threshold")]
    pub stability_threshold: f64,

    /// Number of leading iterations to analyze; `None` analyzes all of them
    #[serde(default)]
    pub active_iterations: Option<usize>,

    /// Evenly spaced evaluation points of the surrogate curve
    #[serde(default = "default_surrogate_samples")]
    pub surrogate_samples: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target: Target::default(),
            parameter: None,
            parameter_pair: None,
            sensitivity_threshold: default_sensitivity_threshold(),
            stability_threshold: default_stability_threshold(),
            active_iterations: None,
            surrogate_samples: default_surrogate_samples(),
        }
    }
}

impl AnalysisConfig {
    /// Configuration analyzing `target` with default thresholds
    #[must_use]
    pub fn for_target(target: Target) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameter = Some(parameter);
        self
    }

    #[must_use]
    pub fn with_pair(mut self, a: Parameter, b: Parameter) -> Self {
        self.parameter_pair = Some((a, b));
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, sensitivity: f64, stability: f64) -> Self {
        self.sensitivity_threshold = sensitivity;
        self.stability_threshold = stability;
        self
    }

    #[must_use]
    pub fn with_active_iterations(mut self, iterations: usize) -> Self {
        self.active_iterations = Some(iterations);
        self
    }

    /// Validated threshold pair
    pub fn thresholds(&self) -> Result<Thresholds> {
        Thresholds::new(self.sensitivity_threshold, self.stability_threshold)
    }

    /// Check every scalar setting without touching any data
    pub fn validate(&self) -> Result<()> {
        self.thresholds()?;
        if self.surrogate_samples < 2 {
            return Err(InvalidInputError::TooFewSamplePoints(
                self.surrogate_samples,
            ));
        }
        if self.active_iterations == Some(0) {
            return Err(InvalidInputError::EmptySlice);
        }
        Ok(())
    }
}
