// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Intelligence Module
//!
//! Periodization analysis over weekly training-load summaries.
//!
//! This module includes:
//! - Per-week signal classifiers (volume, intensity, TSS)
//! - Consensus segmentation into contiguous training phases
//! - Phase enrichment with load, heart rate and form statistics
//! - Effectiveness scoring with a letter grade and findings
//! - The training-load, form-zone and weekly-aggregation collaborators

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod classifiers;
pub mod effectiveness;
pub mod enricher;
pub mod form_management;
pub mod form_zones;
pub mod insights;
pub mod metrics;
pub mod phase_detector;
pub mod segmenter;
pub mod training_load;
pub mod weekly;

pub use effectiveness::{EffectivenessAnalysis, EffectivenessScorer};
pub use form_zones::{FormZone, FormZoneClassifier};
pub use phase_detector::PhaseDetector;
pub use training_load::TrainingLoadCalculator;
pub use weekly::WeeklyAggregator;

/// Macro-periodization label for a multi-week block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingPhase {
    Base,
    Build,
    Peak,
    Taper,
    Recovery,
    Transition,
}

impl TrainingPhase {
    /// All phases in declaration order
    pub const ALL: [Self; 6] = [
        Self::Base,
        Self::Build,
        Self::Peak,
        Self::Taper,
        Self::Recovery,
        Self::Transition,
    ];

    /// Lowercase name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Build => "build",
            Self::Peak => "peak",
            Self::Taper => "taper",
            Self::Recovery => "recovery",
            Self::Transition => "transition",
        }
    }

    /// Position in [`TrainingPhase::ALL`], used to index per-phase tables
    pub fn index(&self) -> usize {
        match self {
            Self::Base => 0,
            Self::Build => 1,
            Self::Peak => 2,
            Self::Taper => 3,
            Self::Recovery => 4,
            Self::Transition => 5,
        }
    }
}

impl fmt::Display for TrainingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|phase| phase.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown training phase: {s}"))
    }
}

/// Direction of a trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        };
        f.write_str(label)
    }
}

/// The classifier that produced a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    Volume,
    Intensity,
    Tss,
}

/// One classifier's opinion about one week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseVote {
    pub phase: TrainingPhase,
    /// Confidence (0-100)
    pub confidence: f64,
    pub reasoning: String,
}

/// The three votes cast for a single week, in fixed classifier order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekVotes {
    pub volume: PhaseVote,
    pub intensity: PhaseVote,
    pub tss: PhaseVote,
}

impl WeekVotes {
    /// Votes in the order they take part in the consensus
    pub fn ordered(&self) -> [(SignalSource, &PhaseVote); 3] {
        [
            (SignalSource::Volume, &self.volume),
            (SignalSource::Intensity, &self.intensity),
            (SignalSource::Tss, &self.tss),
        ]
    }
}

/// How the detector arrived at a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    Hybrid,
}

/// Per-method breakdown of a phase's confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub volume_confidence: f64,
    pub intensity_confidence: f64,
    pub tss_confidence: f64,
    /// How much of the full-confidence duration the phase covers (0-100)
    pub duration_confidence: f64,
}

/// A maximal contiguous run of weeks sharing one phase label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPhase {
    pub phase: TrainingPhase,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_weeks: usize,

    /// Average weekly training hours
    pub avg_weekly_hours: f64,
    pub total_hours: f64,
    pub avg_weekly_distance_km: f64,
    pub avg_weekly_tss: f64,
    pub total_tss: f64,
    pub avg_ctl: f64,
    pub avg_atl: f64,
    pub avg_tsb: f64,
    pub ctl_start: f64,
    pub ctl_end: f64,
    /// Last week's CTL minus first week's CTL
    pub ctl_gain: f64,
    pub volume_trend: TrendDirection,
    pub tss_trend: TrendDirection,

    /// Confidence (0-100)
    pub confidence: f64,
    pub confidence_breakdown: ConfidenceBreakdown,
    pub detection_method: DetectionMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<PhasePerformance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr_zone_profile: Option<HrZoneProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_metrics: Option<FormMetrics>,
}

/// Personal records that fell inside a phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasePerformance {
    pub pr_count: usize,
    pub records: Vec<PhaseRecord>,
}

/// A single personal record inside a phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub category: String,
    pub date: NaiveDate,
}

/// Average heart rate zone profile of a phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrZoneProfile {
    /// Average percentage per zone, zone 1 first
    pub avg_zones: [f64; 5],
    /// The two zones (1-5) with the highest average percentage
    pub dominant_zones: [u8; 2],
    /// Number of weeks that carried heart rate data
    pub weeks_with_data: usize,
}

/// Form (TSB) statistics of a phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormMetrics {
    pub avg_tsb: f64,
    pub min_tsb: f64,
    pub max_tsb: f64,
    pub tsb_trend: TrendDirection,
    /// Weeks per form zone
    pub zone_distribution: Vec<FormZoneCount>,
    pub dominant_zone: FormZone,
    /// Estimated days spent overreaching
    pub overreaching_days: u32,
}

/// Number of weeks a phase spent in one form zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormZoneCount {
    pub zone: FormZone,
    pub weeks: usize,
}
