//! Analyses over an iteration log.
//!
//! Every module is a pure function of a [`TableView`](crate::model::TableView)
//! and scalar settings, so the modules are independent of one another and
//! can run in any order or in parallel:
//!
//! - `correlation` - Pearson coefficient of each parameter with each target
//! - `sensitivity` - binned elasticities with safe zone, boundary and
//!   stability region classification
//! - `ranking` - parameters ordered by mean sensitivity with control levels
//! - `stability` - neighborhood variation over a pair of parameters
//! - `surrogate` - quadratic fit of one target against one parameter with a
//!   distance-based uncertainty band
//!
//! [`analyze`] runs all of them for one [`AnalysisConfig`](crate::config::AnalysisConfig):
//!
//! ```ignore
//! use campaign_core::{AnalysisConfig, IterationTable, Parameter, Target, analyze};
//!
//! let config = AnalysisConfig::for_target(Target::Impurity)
//!     .with_parameter(Parameter::T2Celsius)
//!     .with_pair(Parameter::T1Celsius, Parameter::T2Celsius);
//! let report = analyze(&table, &config)?;
//! println!("{:?}", report.sensitivity.ranking);
//! ```

mod correlation;
mod ranking;
mod report;
mod sensitivity;
mod stability;
mod surrogate;

pub use correlation::*;
pub use ranking::*;
pub use report::*;
pub use sensitivity::*;
pub use stability::*;
pub use surrogate::*;
