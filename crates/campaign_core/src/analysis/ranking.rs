//! Parameter ranking by mean sensitivity and the derived control levels.

use serde::{Deserialize, Serialize};

use crate::model::Parameter;

use super::sensitivity::ParameterSensitivity;

/// Qualitative sensitivity bucket used for control guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SensitivityLevel {
    Low,
    Medium,
    High,
}

impl SensitivityLevel {
    /// Mean sensitivity above which a parameter is `High`
    pub const HIGH_ABOVE: f64 = 0.5;
    /// Mean sensitivity above which a parameter is `Medium`
    pub const MEDIUM_ABOVE: f64 = 0.2;

    /// Bucket a mean sensitivity value
    #[must_use]
    pub fn from_mean(mean_sensitivity: f64) -> Self {
        if mean_sensitivity > Self::HIGH_ABOVE {
            Self::High
        } else if mean_sensitivity > Self::MEDIUM_ABOVE {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// One entry of the sensitivity ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedParameter {
    pub parameter: Parameter,
    pub mean_sensitivity: f64,
    pub max_sensitivity: f64,
    pub safe_zone_count: usize,
    pub boundary_count: usize,
    pub stability_region_count: usize,
    pub level: SensitivityLevel,
}

impl From<&ParameterSensitivity> for RankedParameter {
    fn from(s: &ParameterSensitivity) -> Self {
        Self {
            parameter: s.parameter,
            mean_sensitivity: s.mean_gradient,
            max_sensitivity: s.max_gradient,
            safe_zone_count: s.safe_zones.len(),
            boundary_count: s.boundaries.len(),
            stability_region_count: s.stability_regions.len(),
            level: SensitivityLevel::from_mean(s.mean_gradient),
        }
    }
}

/// Rank parameters by descending mean sensitivity.
///
/// The sort is stable, so ties keep their input order; callers should treat
/// the relative order of tied entries as unspecified.
pub fn rank<'a>(
    sensitivities: impl IntoIterator<Item = &'a ParameterSensitivity>,
) -> Vec<RankedParameter> {
    let mut ranked: Vec<RankedParameter> = sensitivities
        .into_iter()
        .map(RankedParameter::from)
        .collect();
    ranked.sort_by(|a, b| b.mean_sensitivity.total_cmp(&a.mean_sensitivity));
    ranked
}
