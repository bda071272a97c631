//! A single experiment trial

use serde::{Deserialize, Serialize};

use super::{Parameter, Target};

/// One row of the iteration log: the parameter settings of a trial and the
/// targets measured for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based position of this trial in the campaign
    pub iteration: u32,
    /// Values indexed by [`Parameter::index`]
    pub parameters: [f64; Parameter::COUNT],
    /// Values indexed by [`Target::index`]
    pub targets: [f64; Target::COUNT],
}

impl IterationRecord {
    #[must_use]
    pub fn new(
        iteration: u32,
        parameters: [f64; Parameter::COUNT],
        targets: [f64; Target::COUNT],
    ) -> Self {
        Self {
            iteration,
            parameters,
            targets,
        }
    }

    #[inline]
    #[must_use]
    pub fn parameter(&self, parameter: Parameter) -> f64 {
        self.parameters[parameter.index()]
    }

    #[inline]
    #[must_use]
    pub fn target(&self, target: Target) -> f64 {
        self.targets[target.index()]
    }

    /// Name of the first non-finite column, if any
    pub(crate) fn first_non_finite(&self) -> Option<&'static str> {
        Parameter::ALL
            .into_iter()
            .find(|p| !self.parameter(*p).is_finite())
            .map(Parameter::column_name)
            .or_else(|| {
                Target::ALL
                    .into_iter()
                    .find(|t| !self.target(*t).is_finite())
                    .map(Target::column_name)
            })
    }
}
