// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration loading integration tests

use anyhow::Result;
use pierre_periodization::config::{
    self, ConfigSource, EnvironmentOverrides, PeriodizationConfig, TargetModelType,
};
use pierre_periodization::intelligence::{PhaseDetector, TrainingPhase};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_partial_file_keeps_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("periodization.toml");
    fs::write(
        &config_path,
        r#"
min_phase_weeks = 3
analyze_form = false
"#,
    )?;

    let (config, source) = config::load_with(Some(&config_path), &EnvironmentOverrides::default())?;
    assert_eq!(source, ConfigSource::File(config_path));
    assert_eq!(config.min_phase_weeks, 3);
    assert!(!config.analyze_form);

    let defaults = PeriodizationConfig::default();
    assert_eq!(config.volume_thresholds, defaults.volume_thresholds);
    assert_eq!(config.transitions, defaults.transitions);

    Ok(())
}

#[test]
fn test_saved_target_model_drives_detector() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("block.toml");

    let config = PeriodizationConfig::default().with_target_model(TargetModelType::Block);
    config::save(&config, &config_path)?;

    let (loaded, _) = config::load_with(Some(&config_path), &EnvironmentOverrides::default())?;
    assert_eq!(loaded, config);

    let detector = PhaseDetector::new(loaded);
    let model = detector.config().target_model.as_ref();
    assert_eq!(model.map(|m| m.model_type), Some(TargetModelType::Block));
    assert!(detector
        .config()
        .transitions
        .is_allowed(TrainingPhase::Build, TrainingPhase::Peak));

    Ok(())
}

#[test]
fn test_malformed_file_is_an_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "min_phase_weeks = \"two\"\n")?;

    assert!(config::load_with(Some(&config_path), &EnvironmentOverrides::default()).is_err());
    assert!(config::load_with(
        Some(&temp_dir.path().join("missing.toml")),
        &EnvironmentOverrides::default()
    ).is_err());

    Ok(())
}
