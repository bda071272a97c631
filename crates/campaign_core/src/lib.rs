//! Analysis engine for reaction-optimization campaign logs
//!
//! A campaign is a sequence of iterations, each recording the process
//! parameters that were tried and the targets that were measured. This crate
//! turns such a log into numeric descriptions of it:
//! - Pearson correlation of every parameter with every target
//! - Binned sensitivity (elasticity) per parameter with safe zones,
//!   boundaries and stability regions
//! - A ranking of parameters by sensitivity with control levels
//! - Local stability of a target over a pair of parameters
//! - A quadratic surrogate curve with a heuristic uncertainty band
//!
//! All analyses are pure functions of a validated [`IterationTable`] (or a
//! prefix of it) and an [`AnalysisConfig`]. Nothing is cached between calls.

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod stats;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analysis::{AnalysisReport, analyze};
pub use config::{AnalysisConfig, Thresholds};
pub use error::{InvalidInputError, Result};
pub use model::{Direction, IterationRecord, IterationTable, Parameter, TableView, Target};
