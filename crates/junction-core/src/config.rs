//! # Monitor Configuration
//!
//! Recognized options for one monitored intersection, loadable from YAML:
//!
//! ```yaml
//! name: Monitor
//! time_resolution: 0.5
//! max_models: 20
//! rules_path: rules/uncontrolled-intersection.cl
//! artifact_dir: saved/
//! ```
//!
//! Every field is optional; defaults match the values the monitor was tuned
//! with.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{JunctionError, ValidationError};
use crate::temporal::{TimeDiscretizer, DEFAULT_TIME_RESOLUTION};

/// Default cap on models requested per solve.
pub const DEFAULT_MAX_MODELS: usize = 20;

/// Default traffic-rule program file name.
pub const DEFAULT_RULES_FILE: &str = "uncontrolled-intersection.cl";

/// Configuration for one monitor instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Monitor name. Used as the stem of persisted artifact files.
    pub name: String,
    /// Discretization resolution in simulated seconds.
    pub time_resolution: f64,
    /// Maximum models requested from the oracle per solve.
    pub max_models: usize,
    /// Path to the static traffic-rule program.
    pub rules_path: PathBuf,
    /// Directory for the geometry dump and solved-program log. `None`
    /// disables persisted artifacts.
    pub artifact_dir: Option<PathBuf>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            name: "Monitor".to_string(),
            time_resolution: DEFAULT_TIME_RESOLUTION,
            max_models: DEFAULT_MAX_MODELS,
            rules_path: PathBuf::from(DEFAULT_RULES_FILE),
            artifact_dir: None,
        }
    }
}

impl MonitorConfig {
    /// Parse and validate a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, JunctionError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, JunctionError> {
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded monitor configuration");
        Self::from_yaml_str(&text)
    }

    /// Check every field against its constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty()
            || !self
                .name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError::InvalidName(self.name.clone()));
        }
        if self.max_models == 0 {
            return Err(ValidationError::InvalidModelCap);
        }
        TimeDiscretizer::new(self.time_resolution)?;
        Ok(())
    }

    /// Build the discretizer for this configuration.
    pub fn discretizer(&self) -> Result<TimeDiscretizer, ValidationError> {
        TimeDiscretizer::new(self.time_resolution)
    }

    /// Builder: set the rule program path.
    pub fn with_rules_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules_path = path.into();
        self
    }

    /// Builder: set the artifact directory.
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(dir.into());
        self
    }

    /// Builder: set the model cap.
    pub fn with_max_models(mut self, max_models: usize) -> Self {
        self.max_models = max_models;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_values() {
        let config = MonitorConfig::default();
        assert_eq!(config.time_resolution, 0.5);
        assert_eq!(config.max_models, 20);
        assert_eq!(config.rules_path, PathBuf::from("uncontrolled-intersection.cl"));
        assert!(config.artifact_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = MonitorConfig::from_yaml_str("name: Crossing4\nmax_models: 5\n").unwrap();
        assert_eq!(config.name, "Crossing4");
        assert_eq!(config.max_models, 5);
        assert_eq!(config.time_resolution, 0.5);
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(MonitorConfig::from_yaml_str("timeout: 3\n").is_err());
    }

    #[test]
    fn rejects_zero_model_cap() {
        let err = MonitorConfig::from_yaml_str("max_models: 0\n").unwrap_err();
        assert!(err.to_string().contains("max_models"));
    }

    #[test]
    fn rejects_bad_resolution() {
        let config = MonitorConfig {
            time_resolution: 0.0,
            ..MonitorConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidResolution(0.0))
        );
    }

    #[test]
    fn rejects_path_like_names() {
        let config = MonitorConfig {
            name: "../escape".into(),
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.yaml");
        std::fs::write(&path, "time_resolution: 0.25\n").unwrap();
        let config = MonitorConfig::load(&path).unwrap();
        assert_eq!(config.discretizer().unwrap().resolution(), 0.25);
    }
}
