//! Pipeline configuration.
//!
//! Clinical bucket boundaries (age, size, observation interval) are constants in
//! `classify`. What lives here are the tunable modeling parameters; every field
//! has a default so a partial TOML file is enough.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Early/late split for post-surgery and post-radiation phases.
    pub early_phase_window_months: f64,

    /// Shorter intervals carry the previous growth velocity forward.
    pub min_velocity_interval_months: f64,

    /// Lower bound of `slow_growth` in cm/year.
    pub slow_growth_cm_per_year: f64,

    /// Lower bound of `fast_growth` in cm/year.
    pub fast_growth_cm_per_year: f64,

    /// Post-GTR size when no measurement was recorded at the surgery visit.
    pub gtr_size_factor: f64,

    /// Post-STR size when no measurement was recorded at the surgery visit.
    pub str_size_factor: f64,

    /// Cap for a post-surgery measurement larger than the pre-surgery size.
    pub contradiction_cap_factor: f64,

    /// Concurrent per-patient workers.
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            early_phase_window_months: 6.0,
            min_velocity_interval_months: 3.0,
            slow_growth_cm_per_year: 0.2,
            fast_growth_cm_per_year: 1.0,
            gtr_size_factor: 0.5,
            str_size_factor: 0.7,
            contradiction_cap_factor: 0.9,
            workers: 4,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.early_phase_window_months <= 0.0 {
            return Err(ConfigError::Invalid(
                "early_phase_window_months must be positive".to_string(),
            ));
        }
        if self.min_velocity_interval_months < 0.0 {
            return Err(ConfigError::Invalid(
                "min_velocity_interval_months must not be negative".to_string(),
            ));
        }
        if !(0.0..self.fast_growth_cm_per_year).contains(&self.slow_growth_cm_per_year) {
            return Err(ConfigError::Invalid(format!(
                "growth thresholds must satisfy 0 <= slow ({}) < fast ({})",
                self.slow_growth_cm_per_year, self.fast_growth_cm_per_year
            )));
        }
        for (name, factor) in [
            ("gtr_size_factor", self.gtr_size_factor),
            ("str_size_factor", self.str_size_factor),
            ("contradiction_cap_factor", self.contradiction_cap_factor),
        ] {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(ConfigError::Invalid(format!("{name} must be in (0, 1], got {factor}")));
            }
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".to_string()));
        }
        Ok(())
    }
}
