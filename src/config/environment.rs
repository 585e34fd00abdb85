// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based overrides for the periodization configuration

use super::periodization_config::{PeriodizationConfig, TargetModelType};
use crate::constants::env_config;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};

/// Configuration values supplied through environment variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentOverrides {
    /// Explicit config file path
    pub config_path: Option<PathBuf>,
    pub min_phase_weeks: Option<usize>,
    pub target_model: Option<TargetModelType>,
    pub analyze_form: Option<bool>,
}

impl EnvironmentOverrides {
    /// Read overrides from the process environment, loading `.env` first if present
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenv::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read overrides through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = lookup(env_config::CONFIG_PATH).map(PathBuf::from);

        let min_phase_weeks = lookup(env_config::MIN_PHASE_WEEKS)
            .map(|value| value.trim().parse::<usize>())
            .transpose()
            .with_context(|| format!("Invalid {} value", env_config::MIN_PHASE_WEEKS))?;

        let target_model = lookup(env_config::TARGET_MODEL)
            .map(|value| value.parse::<TargetModelType>())
            .transpose()
            .with_context(|| format!("Invalid {} value", env_config::TARGET_MODEL))?;

        let analyze_form = lookup(env_config::ANALYZE_FORM)
            .map(|value| parse_bool(&value))
            .transpose()
            .with_context(|| format!("Invalid {} value", env_config::ANALYZE_FORM))?;

        Ok(Self {
            config_path,
            min_phase_weeks,
            target_model,
            analyze_form,
        })
    }

    /// Whether any value would change a loaded config
    pub fn is_empty(&self) -> bool {
        self.min_phase_weeks.is_none() && self.target_model.is_none() && self.analyze_form.is_none()
    }

    /// Apply the overrides on top of a loaded config
    pub fn apply(&self, mut config: PeriodizationConfig) -> PeriodizationConfig {
        if self.is_empty() {
            return config;
        }
        if let Some(weeks) = self.min_phase_weeks {
            info!(config.min_phase_weeks = weeks, "Environment override applied");
            config.min_phase_weeks = weeks;
        }
        if let Some(model) = self.target_model {
            info!(config.target_model = %model, "Environment override applied");
            config = config.with_target_model(model);
        }
        if let Some(enabled) = self.analyze_form {
            info!(config.analyze_form = enabled, "Environment override applied");
            config.analyze_form = enabled;
        }
        config
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("expected a boolean, got '{}'", other)),
    }
}
