//! Analysis settings: YAML file plus command-line overrides
//!
//! Lookup order for the settings file:
//! 1. An explicit `--config` path (must exist)
//! 2. `~/.campaign/config.yaml` when present
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use campaign_core::config::AnalysisConfig;
use campaign_core::model::{Parameter, Target};
use color_eyre::eyre::{WrapErr, bail};

/// Default settings directory (`~/.campaign/`)
pub fn default_settings_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".campaign")
}

/// Settings file path inside a settings directory
pub fn settings_path(settings_dir: &Path) -> PathBuf {
    settings_dir.join("config.yaml")
}

/// Parse settings from YAML text; omitted keys take their defaults
pub fn from_yaml(yaml: &str) -> Result<AnalysisConfig, serde_saphyr::Error> {
    serde_saphyr::from_str(yaml)
}

/// Load the settings to use for a run.
///
/// An explicit path that cannot be read or parsed is an error; a missing
/// file at the default location silently yields the defaults.
pub fn load_settings(explicit: Option<&Path>, settings_dir: &Path) -> color_eyre::Result<AnalysisConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (settings_path(settings_dir), false),
    };

    if !path.exists() {
        if required {
            bail!("settings file {} does not exist", path.display());
        }
        tracing::debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(AnalysisConfig::default());
    }

    let yaml = std::fs::read_to_string(&path)
        .wrap_err_with(|| format!("failed to read settings from {}", path.display()))?;
    let config = from_yaml(&yaml)
        .wrap_err_with(|| format!("failed to parse settings from {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded settings");
    Ok(config)
}

/// Command-line values that take precedence over the settings file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub target: Option<Target>,
    pub parameter: Option<Parameter>,
    pub pair: Option<(Parameter, Parameter)>,
    pub sensitivity_threshold: Option<f64>,
    pub stability_threshold: Option<f64>,
    pub active_iterations: Option<usize>,
    pub surrogate_samples: Option<usize>,
}

impl Overrides {
    /// Apply every set override to `config`
    #[must_use]
    pub fn apply(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(target) = self.target {
            config.target = target;
        }
        if let Some(parameter) = self.parameter {
            config.parameter = Some(parameter);
        }
        if let Some(pair) = self.pair {
            config.parameter_pair = Some(pair);
        }
        if let Some(value) = self.sensitivity_threshold {
            config.sensitivity_threshold = value;
        }
        if let Some(value) = self.stability_threshold {
            config.stability_threshold = value;
        }
        if let Some(value) = self.active_iterations {
            config.active_iterations = Some(value);
        }
        if let Some(value) = self.surrogate_samples {
            config.surrogate_samples = value;
        }
        config
    }
}
