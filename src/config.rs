// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the periodization engine

pub mod environment;
pub mod periodization_config;

use crate::logging::AppLogger;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub use environment::EnvironmentOverrides;
pub use periodization_config::{
    ConfidenceWeights, ConfigError, DurationRange, PeriodizationConfig, PhaseTransitions,
    ScoringConfig, TargetModel, TargetModelType, TssThresholds, VolumeThresholds,
};

/// File name looked up in the working directory when no path is given
pub const LOCAL_CONFIG_FILE: &str = "periodization.toml";

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Default per-user config location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pierre-periodization/config.toml"))
}

/// Load the configuration, apply environment overrides and validate the result
///
/// Lookup order: explicit path, `PERIODIZATION_CONFIG`, the per-user config
/// directory, `./periodization.toml`, then built-in defaults.
pub fn load(path: Option<&Path>) -> Result<(PeriodizationConfig, ConfigSource)> {
    let overrides = EnvironmentOverrides::from_env()?;
    load_with(path, &overrides)
}

/// Load the configuration with an explicit set of overrides
pub fn load_with(
    path: Option<&Path>,
    overrides: &EnvironmentOverrides,
) -> Result<(PeriodizationConfig, ConfigSource)> {
    let explicit = path.map(Path::to_path_buf).or_else(|| overrides.config_path.clone());
    let (config, source) = match explicit {
        Some(config_path) => (
            PeriodizationConfig::load_from_file(&config_path)?,
            ConfigSource::File(config_path),
        ),
        None => discover()?,
    };

    let config = overrides.apply(config);
    config
        .validate()
        .context("Invalid periodization configuration")?;

    AppLogger::log_config_loaded(&source, &config);
    Ok((config, source))
}

fn discover() -> Result<(PeriodizationConfig, ConfigSource)> {
    let candidates = default_config_path()
        .into_iter()
        .chain(std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE)));

    for candidate in candidates {
        if candidate.exists() {
            let config = PeriodizationConfig::load_from_file(&candidate)?;
            return Ok((config, ConfigSource::File(candidate)));
        }
    }

    Ok((PeriodizationConfig::default(), ConfigSource::Defaults))
}

/// Write a configuration as TOML, creating parent directories as needed
pub fn save(config: &PeriodizationConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::TrainingPhase;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_reload_roundtrip() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested/config.toml");

        let config = PeriodizationConfig::default().with_target_model(TargetModelType::Polarized);
        save(&config, &config_path)?;

        let reloaded = PeriodizationConfig::load_from_file(&config_path)?;
        assert_eq!(reloaded, config);
        assert!(reloaded
            .transitions
            .is_allowed(TrainingPhase::Recovery, TrainingPhase::Base));

        Ok(())
    }

    #[test]
    fn test_load_explicit_path() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("custom.toml");
        fs::write(&config_path, "min_phase_weeks = 4\n")?;

        let (config, source) = load_with(Some(&config_path), &EnvironmentOverrides::default())?;
        assert_eq!(source, ConfigSource::File(config_path));
        assert_eq!(config.min_phase_weeks, 4);

        Ok(())
    }

    #[test]
    fn test_overrides_win_over_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("custom.toml");
        fs::write(&config_path, "min_phase_weeks = 4\nanalyze_form = true\n")?;

        let overrides = EnvironmentOverrides::from_lookup(|key| match key {
            "PERIODIZATION_MIN_PHASE_WEEKS" => Some("3".to_owned()),
            _ => None,
        })?;
        let (config, _) = load_with(Some(&config_path), &overrides)?;
        assert_eq!(config.min_phase_weeks, 3);
        assert!(config.analyze_form);

        // The lookup can also supply the file path
        let overrides = EnvironmentOverrides::from_lookup(|key| match key {
            "PERIODIZATION_CONFIG" => Some(config_path.display().to_string()),
            _ => None,
        })?;
        let (config, source) = load_with(None, &overrides)?;
        assert_eq!(source, ConfigSource::File(config_path.clone()));
        assert_eq!(config.min_phase_weeks, 4);

        Ok(())
    }

    #[test]
    fn test_load_rejects_invalid_values() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "min_phase_weeks = 0\n")?;

        assert!(load_with(Some(&config_path), &EnvironmentOverrides::default()).is_err());
        Ok(())
    }
}
