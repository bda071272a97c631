//! Fixed column schema of an iteration log
//!
//! Parameters and targets are closed enumerations. Each variant maps to one
//! column of the ingested table and to a slot in the fixed-size value arrays
//! of [`IterationRecord`](super::IterationRecord).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInputError;

/// A controllable experimental input
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Parameter {
    /// Stage 1 temperature (°C)
    T1Celsius,
    /// Stage 1 duration (minutes)
    #[serde(rename = "t1min")]
    T1Minutes,
    /// Stage 2 temperature (°C)
    T2Celsius,
    /// Stage 2 duration (minutes)
    #[serde(rename = "t2min")]
    T2Minutes,
    /// Equivalents of reagent 1
    EquivalentsReagent1,
    /// Equivalents of base 1
    #[serde(rename = "EquivalentsBASE1")]
    EquivalentsBase1,
    /// Molar concentration
    ConcentrationMolar,
}

impl Parameter {
    pub const COUNT: usize = 7;

    /// Every parameter in column order
    pub const ALL: [Parameter; Self::COUNT] = [
        Parameter::T1Celsius,
        Parameter::T1Minutes,
        Parameter::T2Celsius,
        Parameter::T2Minutes,
        Parameter::EquivalentsReagent1,
        Parameter::EquivalentsBase1,
        Parameter::ConcentrationMolar,
    ];

    /// Column header used by the iteration log
    #[must_use]
    pub fn column_name(self) -> &'static str {
        match self {
            Self::T1Celsius => "T1Celsius",
            Self::T1Minutes => "t1min",
            Self::T2Celsius => "T2Celsius",
            Self::T2Minutes => "t2min",
            Self::EquivalentsReagent1 => "EquivalentsReagent1",
            Self::EquivalentsBase1 => "EquivalentsBASE1",
            Self::ConcentrationMolar => "ConcentrationMolar",
        }
    }

    /// Slot of this parameter in a record's value array
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Parameter {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.column_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| InvalidInputError::UnknownParameter(s.to_string()))
    }
}

/// Whether a target should be driven up or down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Maximize,
    Minimize,
}

impl Direction {
    /// True when `candidate` is strictly better than `incumbent`
    #[must_use]
    pub fn improves(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Self::Maximize => candidate > incumbent,
            Self::Minimize => candidate < incumbent,
        }
    }
}

/// A measured outcome of an iteration
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Target {
    #[default]
    Yield,
    Impurity,
    ImpurityXRatio,
}

impl Target {
    pub const COUNT: usize = 3;

    /// Every target in column order
    pub const ALL: [Target; Self::COUNT] = [Target::Yield, Target::Impurity, Target::ImpurityXRatio];

    /// Column header used by the iteration log
    #[must_use]
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Yield => "Yield",
            Self::Impurity => "Impurity",
            Self::ImpurityXRatio => "ImpurityXRatio",
        }
    }

    /// Slot of this target in a record's value array
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Optimization direction declared for this target
    #[must_use]
    pub fn direction(self) -> Direction {
        match self {
            Self::Yield => Direction::Maximize,
            Self::Impurity | Self::ImpurityXRatio => Direction::Minimize,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Target {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.column_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| InvalidInputError::UnknownTarget(s.to_string()))
    }
}
