//! JSON report output

use std::path::Path;

use campaign_core::analysis::AnalysisReport;
use color_eyre::eyre::WrapErr;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::util::io::atomic_write;

/// An analysis report together with where and when it was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: Timestamp,
    /// Path of the iteration log that was analyzed
    pub source: String,
    pub report: AnalysisReport,
}

impl RunReport {
    #[must_use]
    pub fn new(source: &Path, report: AnalysisReport) -> Self {
        Self {
            generated_at: Timestamp::now(),
            source: source.display().to_string(),
            report,
        }
    }

    /// Pretty-printed JSON; non-finite numbers (an infinite bin variation)
    /// are written as `null`
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Write the report to `path`, or to stdout when no path is given
pub fn write_report(report: &RunReport, path: Option<&Path>) -> color_eyre::Result<()> {
    let json = report.to_json().wrap_err("failed to serialize report")?;
    match path {
        Some(path) => {
            atomic_write(path, &json)
                .wrap_err_with(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::analysis::analyze;
    use campaign_core::config::AnalysisConfig;
    use campaign_core::model::{IterationRecord, IterationTable};
    use std::fs;
    use tempfile::tempdir;

    fn sample_report() -> AnalysisReport {
        let records = (1..=6)
            .map(|i| {
                let x = f64::from(i);
                IterationRecord::new(
                    i,
                    [20.0 + x, 30.0, 50.0 + 2.0 * x, 10.0, 1.1, 2.0, 0.5],
                    [40.0 + x * x, 2.0 - 0.1 * x, 0.05],
                )
            })
            .collect();
        let table = IterationTable::new(records).unwrap();
        analyze(&table, &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_json_layout() {
        let run = RunReport::new(Path::new("runs/campaign.csv"), sample_report());
        let json = run.to_json().unwrap();
        assert!(json.contains("\"source\": \"runs/campaign.csv\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let stamp: Timestamp = value["generated_at"].as_str().unwrap().parse().unwrap();
        assert_eq!(stamp, run.generated_at);
        assert_eq!(value["report"]["iterations_used"], 6);
        assert!(value["report"]["stability"].is_null());
        assert_eq!(
            value["report"]["sensitivity"]["ranking"].as_array().unwrap().len(),
            7
        );
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let run = RunReport::new(Path::new("campaign.csv"), sample_report());

        write_report(&run, Some(&path)).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["report"]["best"]["iteration"], 6);
        assert_eq!(value["report"]["target"], "Yield");
    }
}
