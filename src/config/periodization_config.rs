// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Periodization-specific configuration for phase detection and effectiveness scoring

use crate::constants::{detection, scoring};
use crate::intelligence::TrainingPhase;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Main periodization configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodizationConfig {
    /// Phases shorter than this are merged into a neighbor
    pub min_phase_weeks: usize,
    pub volume_thresholds: VolumeThresholds,
    pub tss_thresholds: TssThresholds,
    pub confidence_weights: ConfidenceWeights,
    /// Compute form (TSB) metrics and the form-management score
    pub analyze_form: bool,
    pub target_model: Option<TargetModel>,
    pub scoring: ScoringConfig,
    pub transitions: PhaseTransitions,
}

/// Weekly volume bands in hours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeThresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

/// Weekly TSS bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TssThresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

/// Weight of each classifier in the per-week consensus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    pub volume: f64,
    pub intensity: f64,
    pub tss: f64,
}

/// Fixed scoring tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Ascending bands on weeks per CTL point gained
    pub ctl_gain_bands: Vec<CtlGainBand>,
    /// Score when weeks per point exceeds every band
    pub ctl_gain_beyond_score: f64,
    pub ctl_gain_negative_score: f64,
    pub ctl_gain_zero_score: f64,
    /// Ideal average TSB per phase
    pub optimal_tsb: BTreeMap<TrainingPhase, f64>,
    /// Duration range applied to phases the target model does not describe
    pub default_phase_duration: DurationRange,
    pub default_min_base_weeks: usize,
    pub default_min_build_weeks: usize,
}

/// One CTL-gain band: weeks per point strictly below `max_weeks_per_point` scores `score`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CtlGainBand {
    pub max_weeks_per_point: f64,
    pub score: f64,
}

/// Inclusive duration range in weeks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: usize,
    pub max: usize,
}

impl DurationRange {
    pub fn contains(&self, weeks: usize) -> bool {
        weeks >= self.min && weeks <= self.max
    }
}

/// Adjacency table of legal phase-to-phase transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseTransitions(BTreeMap<TrainingPhase, Vec<TrainingPhase>>);

impl PhaseTransitions {
    /// Whether `from` may be directly followed by `to`
    pub fn is_allowed(&self, from: TrainingPhase, to: TrainingPhase) -> bool {
        self.0.get(&from).is_some_and(|next| next.contains(&to))
    }
}

impl Default for PhaseTransitions {
    fn default() -> Self {
        use TrainingPhase::{Base, Build, Peak, Recovery, Taper, Transition};

        let table = BTreeMap::from([
            (Base, vec![Build, Recovery, Transition]),
            (Build, vec![Peak, Taper, Recovery, Build]),
            (Peak, vec![Taper, Recovery, Transition]),
            (Taper, vec![Peak, Recovery, Transition]),
            (Recovery, vec![Base, Build, Transition]),
            (Transition, vec![Base, Build]),
        ]);
        Self(table)
    }
}

/// Periodization model an athlete is following
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetModelType {
    Linear,
    Undulating,
    Block,
    Polarized,
}

impl fmt::Display for TargetModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "linear",
            Self::Undulating => "undulating",
            Self::Block => "block",
            Self::Polarized => "polarized",
        };
        f.write_str(name)
    }
}

impl FromStr for TargetModelType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "undulating" => Ok(Self::Undulating),
            "block" => Ok(Self::Block),
            "polarized" => Ok(Self::Polarized),
            other => Err(ConfigError::UnknownTargetModel(other.to_owned())),
        }
    }
}

/// Target periodization model used by the structure scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetModel {
    pub model_type: TargetModelType,
    pub effectiveness_criteria: EffectivenessCriteria,
    #[serde(default)]
    pub phase_characteristics: BTreeMap<TrainingPhase, PhaseCharacteristics>,
}

/// Minimum phase lengths the target model expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivenessCriteria {
    pub min_base_phase_weeks: usize,
    pub min_build_phase_weeks: usize,
}

/// Expected shape of one phase in a target model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCharacteristics {
    pub typical_duration: DurationRange,
}

impl TargetModel {
    /// Built-in preset for a model type
    pub fn preset(model_type: TargetModelType) -> Self {
        use TrainingPhase::{Base, Build, Peak, Recovery, Taper, Transition};

        // (min base, min build, [(phase, min, max)])
        let (min_base, min_build, durations): (usize, usize, [(TrainingPhase, usize, usize); 6]) =
            match model_type {
                TargetModelType::Linear => (
                    8,
                    4,
                    [
                        (Base, 6, 16),
                        (Build, 4, 10),
                        (Peak, 1, 3),
                        (Taper, 1, 3),
                        (Recovery, 1, 2),
                        (Transition, 1, 4),
                    ],
                ),
                TargetModelType::Undulating => (
                    4,
                    4,
                    [
                        (Base, 3, 8),
                        (Build, 3, 8),
                        (Peak, 1, 3),
                        (Taper, 1, 2),
                        (Recovery, 1, 2),
                        (Transition, 1, 3),
                    ],
                ),
                TargetModelType::Block => (
                    3,
                    3,
                    [
                        (Base, 2, 4),
                        (Build, 2, 4),
                        (Peak, 1, 2),
                        (Taper, 1, 2),
                        (Recovery, 1, 1),
                        (Transition, 1, 3),
                    ],
                ),
                TargetModelType::Polarized => (
                    8,
                    3,
                    [
                        (Base, 6, 20),
                        (Build, 3, 8),
                        (Peak, 1, 3),
                        (Taper, 1, 3),
                        (Recovery, 1, 2),
                        (Transition, 1, 4),
                    ],
                ),
            };

        let phase_characteristics = durations
            .into_iter()
            .map(|(phase, min, max)| {
                (
                    phase,
                    PhaseCharacteristics {
                        typical_duration: DurationRange { min, max },
                    },
                )
            })
            .collect();

        Self {
            model_type,
            effectiveness_criteria: EffectivenessCriteria {
                min_base_phase_weeks: min_base,
                min_build_phase_weeks: min_build,
            },
            phase_characteristics,
        }
    }
}

/// Invalid configuration values
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("min_phase_weeks must be at least 1")]
    ZeroMinPhaseWeeks,

    #[error("{name} thresholds must be non-negative and ascending (low={low}, medium={medium}, high={high})")]
    UnorderedThresholds {
        name: &'static str,
        low: f64,
        medium: f64,
        high: f64,
    },

    #[error("confidence weights must be finite and non-negative with a positive sum")]
    InvalidWeights,

    #[error("Unknown target model: {0} (expected linear, undulating, block or polarized)")]
    UnknownTargetModel(String),

    #[error("Invalid duration range for {phase}: min={min}, max={max}")]
    InvalidDurationRange {
        phase: TrainingPhase,
        min: usize,
        max: usize,
    },
}

impl PeriodizationConfig {
    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read periodization config file: {}", path.display()))?;

        let config: PeriodizationConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse periodization config file: {}", path.display()))?;

        Ok(config)
    }

    /// Replace the target model with a built-in preset
    pub fn with_target_model(mut self, model_type: TargetModelType) -> Self {
        self.target_model = Some(TargetModel::preset(model_type));
        self
    }

    /// Check value ranges the pipeline relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_phase_weeks == 0 {
            return Err(ConfigError::ZeroMinPhaseWeeks);
        }

        check_ascending(
            "volume",
            self.volume_thresholds.low,
            self.volume_thresholds.medium,
            self.volume_thresholds.high,
        )?;
        check_ascending(
            "tss",
            self.tss_thresholds.low,
            self.tss_thresholds.medium,
            self.tss_thresholds.high,
        )?;

        let weights = [
            self.confidence_weights.volume,
            self.confidence_weights.intensity,
            self.confidence_weights.tss,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || weights.iter().sum::<f64>() <= 0.0 {
            return Err(ConfigError::InvalidWeights);
        }

        if let Some(model) = &self.target_model {
            for (phase, characteristics) in &model.phase_characteristics {
                let range = characteristics.typical_duration;
                if range.min > range.max {
                    return Err(ConfigError::InvalidDurationRange {
                        phase: *phase,
                        min: range.min,
                        max: range.max,
                    });
                }
            }
        }

        Ok(())
    }

    /// Minimum base phase length expected by the target model
    pub fn min_base_phase_weeks(&self) -> usize {
        self.target_model.as_ref().map_or(self.scoring.default_min_base_weeks, |m| {
            m.effectiveness_criteria.min_base_phase_weeks
        })
    }

    /// Minimum build phase length expected by the target model
    pub fn min_build_phase_weeks(&self) -> usize {
        self.target_model.as_ref().map_or(self.scoring.default_min_build_weeks, |m| {
            m.effectiveness_criteria.min_build_phase_weeks
        })
    }

    /// Typical duration range for a phase
    pub fn typical_duration(&self, phase: TrainingPhase) -> DurationRange {
        self.target_model
            .as_ref()
            .and_then(|m| m.phase_characteristics.get(&phase))
            .map_or(self.scoring.default_phase_duration, |c| c.typical_duration)
    }

    /// Optimal average TSB for a phase
    pub fn optimal_tsb(&self, phase: TrainingPhase) -> f64 {
        self.scoring
            .optimal_tsb
            .get(&phase)
            .copied()
            .unwrap_or(scoring::OPTIMAL_TSB[phase.index()])
    }
}

fn check_ascending(name: &'static str, low: f64, medium: f64, high: f64) -> Result<(), ConfigError> {
    let ordered = low >= 0.0 && low <= medium && medium <= high && high.is_finite();
    if ordered {
        Ok(())
    } else {
        Err(ConfigError::UnorderedThresholds {
            name,
            low,
            medium,
            high,
        })
    }
}

impl Default for PeriodizationConfig {
    fn default() -> Self {
        Self {
            min_phase_weeks: detection::DEFAULT_MIN_PHASE_WEEKS,
            volume_thresholds: VolumeThresholds::default(),
            tss_thresholds: TssThresholds::default(),
            confidence_weights: ConfidenceWeights::default(),
            analyze_form: true,
            target_model: None,
            scoring: ScoringConfig::default(),
            transitions: PhaseTransitions::default(),
        }
    }
}

impl Default for VolumeThresholds {
    fn default() -> Self {
        Self {
            low: detection::VOLUME_LOW_HOURS,
            medium: detection::VOLUME_MEDIUM_HOURS,
            high: detection::VOLUME_HIGH_HOURS,
        }
    }
}

impl Default for TssThresholds {
    fn default() -> Self {
        Self {
            low: detection::TSS_LOW,
            medium: detection::TSS_MEDIUM,
            high: detection::TSS_HIGH,
        }
    }
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            volume: detection::WEIGHT_VOLUME,
            intensity: detection::WEIGHT_INTENSITY,
            tss: detection::WEIGHT_TSS,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ctl_gain_bands: scoring::CTL_GAIN_BANDS
                .iter()
                .map(|&(max_weeks_per_point, score)| CtlGainBand {
                    max_weeks_per_point,
                    score,
                })
                .collect(),
            ctl_gain_beyond_score: scoring::CTL_GAIN_BEYOND_SCORE,
            ctl_gain_negative_score: scoring::CTL_GAIN_NEGATIVE_SCORE,
            ctl_gain_zero_score: scoring::CTL_GAIN_ZERO_SCORE,
            optimal_tsb: TrainingPhase::ALL
                .iter()
                .map(|phase| (*phase, scoring::OPTIMAL_TSB[phase.index()]))
                .collect(),
            default_phase_duration: DurationRange {
                min: scoring::DEFAULT_PHASE_MIN_WEEKS,
                max: scoring::DEFAULT_PHASE_MAX_WEEKS,
            },
            default_min_base_weeks: scoring::DEFAULT_MIN_BASE_WEEKS,
            default_min_build_weeks: scoring::DEFAULT_MIN_BUILD_WEEKS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_periodization_config() {
        let config = PeriodizationConfig::default();

        assert_eq!(config.min_phase_weeks, 2);
        assert_eq!(config.tss_thresholds.low, 150.0);
        assert_eq!(config.tss_thresholds.medium, 300.0);
        assert_eq!(config.tss_thresholds.high, 500.0);
        assert!(config.analyze_form);
        assert!(config.target_model.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_transition_table() {
        let transitions = PhaseTransitions::default();

        assert!(transitions.is_allowed(TrainingPhase::Base, TrainingPhase::Build));
        assert!(transitions.is_allowed(TrainingPhase::Build, TrainingPhase::Build));
        assert!(transitions.is_allowed(TrainingPhase::Taper, TrainingPhase::Peak));
        assert!(!transitions.is_allowed(TrainingPhase::Base, TrainingPhase::Peak));
        assert!(!transitions.is_allowed(TrainingPhase::Base, TrainingPhase::Base));
        assert!(!transitions.is_allowed(TrainingPhase::Transition, TrainingPhase::Peak));
        assert!(transitions.is_allowed(TrainingPhase::Transition, TrainingPhase::Base));
    }

    #[test]
    fn test_scoring_defaults_without_target_model() {
        let config = PeriodizationConfig::default();

        assert_eq!(config.min_base_phase_weeks(), 6);
        assert_eq!(config.min_build_phase_weeks(), 4);
        assert_eq!(config.typical_duration(TrainingPhase::Peak), DurationRange { min: 2, max: 16 });
        assert_eq!(config.optimal_tsb(TrainingPhase::Taper), 18.0);
        assert_eq!(config.optimal_tsb(TrainingPhase::Build), -10.0);
    }

    #[test]
    fn test_target_model_preset() {
        let config = PeriodizationConfig::default().with_target_model(TargetModelType::Block);

        assert_eq!(config.min_base_phase_weeks(), 3);
        assert_eq!(config.typical_duration(TrainingPhase::Recovery), DurationRange { min: 1, max: 1 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_target_model_parsing() {
        assert_eq!("Polarized".parse::<TargetModelType>(), Ok(TargetModelType::Polarized));
        assert_eq!(
            "pyramidal".parse::<TargetModelType>(),
            Err(ConfigError::UnknownTargetModel("pyramidal".to_string()))
        );
    }

    #[test]
    fn test_validation_errors() {
        let mut config = PeriodizationConfig::default();
        config.min_phase_weeks = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroMinPhaseWeeks));

        let mut config = PeriodizationConfig::default();
        config.volume_thresholds.medium = 20.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnorderedThresholds { name: "volume", .. })
        ));

        let mut config = PeriodizationConfig::default();
        config.confidence_weights = ConfidenceWeights {
            volume: 0.0,
            intensity: 0.0,
            tss: 0.0,
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidWeights));
    }

    #[test]
    fn test_config_file_loading() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(
            temp_file,
            r#"
min_phase_weeks = 3
analyze_form = false

[volume_thresholds]
low = 4.0
medium = 7.0
high = 10.0

[confidence_weights]
volume = 0.25
intensity = 0.5
tss = 0.25

[target_model]
model_type = "linear"

[target_model.effectiveness_criteria]
min_base_phase_weeks = 10
min_build_phase_weeks = 5

[target_model.phase_characteristics.taper]
typical_duration = {{ min = 1, max = 2 }}
        "#
        )?;

        let config = PeriodizationConfig::load_from_file(temp_file.path())?;

        assert_eq!(config.min_phase_weeks, 3);
        assert!(!config.analyze_form);
        assert_eq!(config.volume_thresholds.high, 10.0);
        assert_eq!(config.confidence_weights.intensity, 0.5);
        // Untouched sections keep their defaults
        assert_eq!(config.tss_thresholds.medium, 300.0);
        assert_eq!(config.min_base_phase_weeks(), 10);
        assert_eq!(config.typical_duration(TrainingPhase::Taper), DurationRange { min: 1, max: 2 });
        assert_eq!(config.typical_duration(TrainingPhase::Base), DurationRange { min: 2, max: 16 });
        assert!(config.validate().is_ok());

        Ok(())
    }
}
