//! Command-line host for the campaign analysis engine
//!
//! Reads a comma-delimited iteration log, resolves the analysis settings
//! (YAML file plus command-line overrides), runs
//! [`campaign_core::analyze`] and emits the report as JSON.

pub mod ingest;
pub mod logging;
pub mod output;
pub mod settings;
pub mod util;

use std::path::Path;

use campaign_core::analysis::StabilityLevel;
use campaign_core::config::AnalysisConfig;
use color_eyre::eyre::WrapErr;

pub use ingest::{IngestError, load_table, parse_table};
pub use logging::init_logging;
pub use output::{RunReport, write_report};
pub use settings::{Overrides, load_settings};

/// Load `input`, analyze it under `config` and wrap the result for output
pub fn run(input: &Path, config: &AnalysisConfig) -> color_eyre::Result<RunReport> {
    let table = load_table(input)
        .wrap_err_with(|| format!("failed to load iteration log {}", input.display()))?;
    tracing::info!(iterations = table.len(), "loaded iteration log");

    let report = campaign_core::analyze(&table, config).wrap_err("analysis failed")?;

    tracing::info!(
        metric = %report.target,
        best_iteration = report.best.iteration,
        best_value = report.best.value,
        "analysis complete"
    );
    if let Some(top) = report.most_sensitive() {
        tracing::info!(
            parameter = %top.parameter,
            level = top.level.label(),
            "most sensitive parameter"
        );
    }
    if let Some(&(parameter, r)) = report.correlations.strongest(report.target).first() {
        tracing::info!(%parameter, r, "strongest correlation");
    }
    if let Some(map) = &report.stability {
        tracing::info!(
            high = map.count(StabilityLevel::High),
            medium = map.count(StabilityLevel::Medium),
            low = map.count(StabilityLevel::Low),
            unknown = map.count(StabilityLevel::Unknown),
            "local stability"
        );
    }

    Ok(RunReport::new(input, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::model::{Parameter, Target};
    use std::fs;
    use tempfile::tempdir;

    const LOG: &str = "\
iteration,T1Celsius,t1min,T2Celsius,t2min,EquivalentsReagent1,EquivalentsBASE1,ConcentrationMolar,Yield,Impurity,ImpurityXRatio
1,20,10,40,5,1.0,1.5,0.5,41.0,1.2,0.029
2,30,20,60,10,1.2,1.8,0.5,55.0,1.5,0.027
3,40,30,80,15,1.4,2.1,0.5,63.0,1.9,0.030
4,50,40,100,20,1.6,2.4,0.5,66.0,2.4,0.036
5,60,50,120,25,1.8,2.7,0.5,64.0,3.0,0.047
";

    #[test]
    fn test_run_end_to_end() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("campaign.csv");
        fs::write(&input, LOG).unwrap();

        let config = AnalysisConfig::for_target(Target::Impurity)
            .with_parameter(Parameter::T1Celsius)
            .with_pair(Parameter::T1Celsius, Parameter::T2Celsius);
        let run = run(&input, &config).unwrap();

        assert_eq!(run.report.iterations_used, 5);
        assert_eq!(run.report.best.iteration, 1);
        assert_eq!(run.report.best.value, 1.2);
        assert!(run.report.surrogate.is_some());
        assert_eq!(run.report.stability.unwrap().points.len(), 5);
        // the fixed concentration cannot correlate with anything
        assert_eq!(
            run.report
                .correlations
                .get(Target::Yield, Parameter::ConcentrationMolar),
            Some(0.0)
        );
    }

    #[test]
    fn test_run_reports_bad_input() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("campaign.csv");
        fs::write(&input, "Yield,Impurity\n1,2\n").unwrap();

        let err = run(&input, &AnalysisConfig::default()).unwrap_err();
        assert!(format!("{err:?}").contains("missing required column"));
    }
}
