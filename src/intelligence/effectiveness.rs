// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Periodization Effectiveness
//!
//! Scores how well a detected phase sequence was executed.
//!
//! Sub-scores (each 0-100):
//! - **Structure**: phase balance, transition logic, phase lengths
//! - **Progression**: volume ramp, CTL gain rate, recovery frequency
//! - **Recovery**: TSB management across the weekly series
//! - **Performance**: personal records and fitness gain
//! - **Form management**: optional, see [`form_management`](super::form_management)
//!
//! The overall score is a weighted sum, rounded, with the weights shifting
//! when form management is absent.

use super::form_management::{score_form_management, FormManagementScore};
use super::insights::{FindingGenerator, Findings};
use super::metrics::{clamp_score, mean, mean_or_zero};
use super::{DetectedPhase, TrainingPhase};
use crate::config::PeriodizationConfig;
use crate::constants::scoring;
use crate::logging::AppLogger;
use crate::models::WeeklyMetric;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Letter grade for an overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "C+")]
    CPlus,
    C,
    D,
    F,
}

impl Grade {
    /// Fixed banding of a 0-100 score
    pub fn from_score(score: u32) -> Self {
        match score {
            95.. => Self::APlus,
            90..=94 => Self::A,
            85..=89 => Self::BPlus,
            80..=84 => Self::B,
            75..=79 => Self::CPlus,
            70..=74 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structure sub-score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureScore {
    pub score: f64,
    pub phase_balance: f64,
    pub transitions: f64,
    pub lengths: f64,
    pub smooth_transitions: usize,
    pub total_transitions: usize,
    pub phases_within_typical_duration: usize,
}

/// Progression sub-score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionScore {
    pub score: f64,
    pub volume_progression: f64,
    pub ctl_gain_score: f64,
    pub recovery_frequency: f64,
    /// Average week-over-week volume change in percent
    pub avg_weekly_volume_change_pct: Option<f64>,
    /// Weeks whose volume rose by more than 15%
    pub rapid_increase_weeks: usize,
    pub total_ctl_gain: f64,
    pub weeks_per_ctl_point: Option<f64>,
    pub recovery_weeks: usize,
}

/// Recovery (TSB management) sub-score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryScore {
    pub score: f64,
    pub avg_tsb: f64,
    /// Weeks with TSB below -30
    pub overreaching_episodes: usize,
    /// Weeks with TSB above 15
    pub adequate_recovery_weeks: usize,
}

/// Performance sub-score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceScore {
    pub score: f64,
    pub total_prs: usize,
    /// CTL change from the first to the last week
    pub fitness_gain: f64,
    /// Distinct phase types in which records were set
    pub phase_types_with_prs: usize,
}

/// Share of weeks spent in each phase type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseBalance {
    pub total_weeks: usize,
    pub ratios: BTreeMap<TrainingPhase, f64>,
    pub recommendations: Vec<String>,
}

/// Complete effectiveness report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectivenessAnalysis {
    pub overall_score: u32,
    pub grade: Grade,
    pub structure: StructureScore,
    pub progression: ProgressionScore,
    pub recovery: RecoveryScore,
    pub performance: PerformanceScore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_management: Option<FormManagementScore>,
    pub phase_balance: PhaseBalance,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub critical_issues: Vec<String>,
}

/// Scores detected phases against the weekly series they came from
#[derive(Debug, Clone, Default)]
pub struct EffectivenessScorer {
    config: PeriodizationConfig,
}

impl EffectivenessScorer {
    pub fn new(config: PeriodizationConfig) -> Self {
        Self { config }
    }

    /// Full analysis: sub-scores, overall score, grade, balance and findings
    pub fn analyze(&self, phases: &[DetectedPhase], weeks: &[WeeklyMetric]) -> EffectivenessAnalysis {
        let structure = self.score_structure(phases);
        let progression = self.score_progression(phases, weeks);
        let recovery = score_recovery(weeks);
        let performance = score_performance(phases, weeks);
        let form_management = score_form_management(phases, &self.config);

        let overall = match &form_management {
            Some(form) => {
                let w = scoring::WEIGHTS_WITH_FORM;
                w[0] * structure.score
                    + w[1] * progression.score
                    + w[2] * recovery.score
                    + w[3] * performance.score
                    + w[4] * form.score
            }
            None => {
                let w = scoring::WEIGHTS_WITHOUT_FORM;
                w[0] * structure.score + w[1] * progression.score + w[2] * recovery.score + w[3] * performance.score
            }
        };
        let overall_score = clamp_score(overall).round() as u32;
        let grade = Grade::from_score(overall_score);

        let Findings {
            strengths,
            weaknesses,
            critical_issues,
        } = FindingGenerator::new().generate(
            &structure,
            &progression,
            &recovery,
            &performance,
            form_management.as_ref(),
        );

        AppLogger::log_effectiveness_summary(overall_score, grade);

        EffectivenessAnalysis {
            overall_score,
            grade,
            structure,
            progression,
            recovery,
            performance,
            form_management,
            phase_balance: phase_balance(phases),
            strengths,
            weaknesses,
            critical_issues,
        }
    }

    /// `0.40 x balance + 0.30 x transitions + 0.30 x lengths`
    pub fn score_structure(&self, phases: &[DetectedPhase]) -> StructureScore {
        let phase_balance = self.balance_component(phases);

        let total_transitions = phases.len().saturating_sub(1);
        let smooth_transitions = phases
            .windows(2)
            .filter(|pair| self.config.transitions.is_allowed(pair[0].phase, pair[1].phase))
            .count();
        let transitions = if phases.len() <= 1 {
            100.0
        } else {
            100.0 * smooth_transitions as f64 / total_transitions as f64
        };

        let within = phases
            .iter()
            .filter(|p| self.config.typical_duration(p.phase).contains(p.duration_weeks))
            .count();
        let lengths = if phases.is_empty() {
            0.0
        } else {
            100.0 * within as f64 / phases.len() as f64
        };

        StructureScore {
            score: clamp_score(0.40 * phase_balance + 0.30 * transitions + 0.30 * lengths),
            phase_balance,
            transitions,
            lengths,
            smooth_transitions,
            total_transitions,
            phases_within_typical_duration: within,
        }
    }

    fn balance_component(&self, phases: &[DetectedPhase]) -> f64 {
        let of_type = |kind: TrainingPhase| phases.iter().filter(move |p| p.phase == kind);

        let mut score = 70.0;
        if of_type(TrainingPhase::Base).next().is_some() {
            score += 15.0;
            let min = self.config.min_base_phase_weeks();
            if of_type(TrainingPhase::Base).all(|p| p.duration_weeks < min) {
                score -= 20.0;
            }
        }
        if of_type(TrainingPhase::Build).next().is_some() {
            score += 15.0;
            let min = self.config.min_build_phase_weeks();
            if of_type(TrainingPhase::Build).all(|p| p.duration_weeks < min) {
                score -= 15.0;
            }
        }
        clamp_score(score)
    }

    /// `0.40 x volume + 0.40 x CTL gain + 0.20 x recovery frequency`
    pub fn score_progression(&self, phases: &[DetectedPhase], weeks: &[WeeklyMetric]) -> ProgressionScore {
        let changes: Vec<f64> = weeks
            .windows(2)
            .filter_map(|pair| {
                let previous = pair[0].duration_hours();
                (previous > 0.0).then(|| (pair[1].duration_hours() - previous) / previous * 100.0)
            })
            .collect();
        let avg_change = mean(&changes);
        let rapid_increase_weeks = changes
            .iter()
            .filter(|&&c| c > scoring::RAPID_VOLUME_INCREASE_PCT)
            .count();

        let mut volume_progression = 70.0;
        if avg_change.is_some_and(|c| c > 0.0 && c < scoring::RAPID_VOLUME_INCREASE_PCT) {
            volume_progression += 20.0;
        }
        let rapid_ratio = if weeks.is_empty() {
            0.0
        } else {
            rapid_increase_weeks as f64 / weeks.len() as f64
        };
        if rapid_ratio < 0.10 {
            volume_progression += 10.0;
        }
        volume_progression -= 5.0 * rapid_increase_weeks as f64;
        let volume_progression = clamp_score(volume_progression);

        let total_ctl_gain = series_ctl_delta(weeks);
        let (ctl_gain_score, weeks_per_ctl_point) = self.ctl_gain_score(total_ctl_gain, weeks.len());

        let recovery_weeks: usize = phases
            .iter()
            .filter(|p| p.phase == TrainingPhase::Recovery)
            .map(|p| p.duration_weeks)
            .sum();
        let recovery_frequency = recovery_frequency_score(recovery_weeks, weeks.len());

        ProgressionScore {
            score: clamp_score(0.40 * volume_progression + 0.40 * ctl_gain_score + 0.20 * recovery_frequency),
            volume_progression,
            ctl_gain_score,
            recovery_frequency,
            avg_weekly_volume_change_pct: avg_change,
            rapid_increase_weeks,
            total_ctl_gain,
            weeks_per_ctl_point,
            recovery_weeks,
        }
    }

    /// Banded lookup on weeks per CTL point gained
    pub fn ctl_gain_score(&self, gain: f64, total_weeks: usize) -> (f64, Option<f64>) {
        let bands = &self.config.scoring;
        if gain < 0.0 {
            return (bands.ctl_gain_negative_score, None);
        }
        if gain == 0.0 {
            return (bands.ctl_gain_zero_score, None);
        }

        let weeks_per_point = total_weeks as f64 / gain;
        let score = bands
            .ctl_gain_bands
            .iter()
            .find(|band| weeks_per_point < band.max_weeks_per_point)
            .map_or(bands.ctl_gain_beyond_score, |band| band.score);
        (score, Some(weeks_per_point))
    }
}

fn series_ctl_delta(weeks: &[WeeklyMetric]) -> f64 {
    match (weeks.first(), weeks.last()) {
        (Some(first), Some(last)) => last.avg_ctl - first.avg_ctl,
        _ => 0.0,
    }
}

fn recovery_frequency_score(recovery_weeks: usize, total_weeks: usize) -> f64 {
    if total_weeks < scoring::MIN_WEEKS_FOR_RECOVERY_FREQUENCY {
        return 80.0;
    }
    let expected = total_weeks as f64 / 4.0;
    let ratio = recovery_weeks as f64 / expected;
    if ratio < 0.5 {
        60.0
    } else if ratio > 2.0 {
        70.0
    } else {
        90.0
    }
}

/// TSB management over the weekly series
pub fn score_recovery(weeks: &[WeeklyMetric]) -> RecoveryScore {
    let tsb: Vec<f64> = weeks.iter().map(|w| w.avg_tsb).collect();
    let overreaching_episodes = tsb.iter().filter(|&&t| t < -30.0).count();
    let adequate_recovery_weeks = tsb
        .iter()
        .filter(|&&t| t > scoring::ADEQUATE_RECOVERY_TSB)
        .count();
    let avg_tsb = mean_or_zero(&tsb);

    if weeks.is_empty() {
        return RecoveryScore {
            score: 70.0,
            avg_tsb,
            overreaching_episodes,
            adequate_recovery_weeks,
        };
    }

    let total = weeks.len() as f64;
    let mut score = 70.0;
    if (-10.0..=10.0).contains(&avg_tsb) {
        score += 10.0;
    }
    if overreaching_episodes == 0 {
        score += 10.0;
    } else if overreaching_episodes as f64 / total > 0.10 {
        score -= 20.0;
    }
    if adequate_recovery_weeks as f64 / total >= 0.20 {
        score += 10.0;
    }

    RecoveryScore {
        score: clamp_score(score),
        avg_tsb,
        overreaching_episodes,
        adequate_recovery_weeks,
    }
}

/// Personal records and fitness gain
pub fn score_performance(phases: &[DetectedPhase], weeks: &[WeeklyMetric]) -> PerformanceScore {
    let total_prs: usize = phases
        .iter()
        .filter_map(|p| p.performance_metrics.as_ref())
        .map(|m| m.pr_count)
        .sum();
    let phase_types_with_prs = phases
        .iter()
        .filter(|p| p.performance_metrics.as_ref().is_some_and(|m| m.pr_count > 0))
        .map(|p| p.phase)
        .collect::<BTreeSet<_>>()
        .len();
    let fitness_gain = series_ctl_delta(weeks);

    let mut score = 60.0;
    if total_prs > 0 {
        score += 20.0;
    }
    if fitness_gain > 10.0 {
        score += 10.0;
    }
    if phase_types_with_prs >= 2 {
        score += 10.0;
    }

    PerformanceScore {
        score: clamp_score(score),
        total_prs,
        fitness_gain,
        phase_types_with_prs,
    }
}

/// Weeks per phase type as a share of all detected weeks
pub fn phase_balance(phases: &[DetectedPhase]) -> PhaseBalance {
    let total_weeks: usize = phases.iter().map(|p| p.duration_weeks).sum();

    let ratios: BTreeMap<TrainingPhase, f64> = TrainingPhase::ALL
        .iter()
        .map(|&kind| {
            let weeks: usize = phases
                .iter()
                .filter(|p| p.phase == kind)
                .map(|p| p.duration_weeks)
                .sum();
            let ratio = if total_weeks == 0 {
                0.0
            } else {
                weeks as f64 / total_weeks as f64
            };
            (kind, ratio)
        })
        .collect();

    let mut recommendations = Vec::new();
    if total_weeks > 0 {
        let share = |kind: TrainingPhase| ratios.get(&kind).copied().unwrap_or(0.0);

        if share(TrainingPhase::Base) < 0.20 {
            recommendations
                .push("Increase base phase duration to build a stronger aerobic foundation".to_owned());
        }
        if share(TrainingPhase::Build) < 0.20 {
            recommendations.push("Add more build weeks to develop race-specific fitness".to_owned());
        }
        if total_weeks >= scoring::MIN_WEEKS_FOR_RECOVERY_FREQUENCY && share(TrainingPhase::Recovery) < 0.10 {
            recommendations.push("Schedule regular recovery weeks to absorb training load".to_owned());
        }
        if share(TrainingPhase::Peak) + share(TrainingPhase::Taper) > 0.30 {
            recommendations.push("Shorten peak and taper phases; extended sharpening erodes fitness".to_owned());
        }
        if share(TrainingPhase::Transition) > 0.25 {
            recommendations.push("Reduce unstructured transition time between training blocks".to_owned());
        }
    }

    PhaseBalance {
        total_weeks,
        ratios,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::{ConfidenceBreakdown, DetectionMethod, PhasePerformance, PhaseRecord, TrendDirection};
    use chrono::{Duration, NaiveDate};

    fn phase(kind: TrainingPhase, weeks: usize) -> DetectedPhase {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        DetectedPhase {
            phase: kind,
            start_date: date,
            end_date: date + Duration::weeks(weeks as i64) - Duration::days(1),
            duration_weeks: weeks,
            avg_weekly_hours: 8.0,
            total_hours: 8.0 * weeks as f64,
            avg_weekly_distance_km: 60.0,
            avg_weekly_tss: 350.0,
            total_tss: 350.0 * weeks as f64,
            avg_ctl: 50.0,
            avg_atl: 50.0,
            avg_tsb: 0.0,
            ctl_start: 45.0,
            ctl_end: 55.0,
            ctl_gain: 10.0,
            volume_trend: TrendDirection::Stable,
            tss_trend: TrendDirection::Stable,
            confidence: 70.0,
            confidence_breakdown: ConfidenceBreakdown {
                volume_confidence: 70.0,
                intensity_confidence: 70.0,
                tss_confidence: 70.0,
                duration_confidence: 100.0,
            },
            detection_method: DetectionMethod::Hybrid,
            performance_metrics: None,
            hr_zone_profile: None,
            form_metrics: None,
        }
    }

    fn week(index: i64, hours: f64, ctl: f64, tsb: f64) -> WeeklyMetric {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::weeks(index);
        WeeklyMetric {
            week_start: start,
            week_end: start + Duration::days(6),
            total_duration: (hours * 3600.0) as u64,
            total_distance: 0.0,
            total_elevation: 0.0,
            activity_count: 4,
            avg_weekly_tss: 300.0,
            avg_ctl: ctl,
            avg_atl: ctl - tsb,
            avg_tsb: tsb,
            hr_zone_distribution: None,
            activities: vec![],
        }
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(Grade::from_score(100), Grade::APlus);
        assert_eq!(Grade::from_score(94), Grade::A);
        assert_eq!(Grade::from_score(84), Grade::B);
        assert_eq!(Grade::from_score(69), Grade::D);
        assert_eq!(Grade::from_score(0), Grade::F);
        assert_eq!(serde_json::to_string(&Grade::BPlus).unwrap(), "\"B+\"");
    }

    #[test]
    fn test_structure_score() {
        let scorer = EffectivenessScorer::default();
        let phases = vec![
            phase(TrainingPhase::Base, 6),
            phase(TrainingPhase::Build, 4),
            phase(TrainingPhase::Taper, 2),
        ];

        let structure = scorer.score_structure(&phases);
        assert_eq!(structure.phase_balance, 100.0);
        assert_eq!(structure.transitions, 100.0);
        assert_eq!(structure.lengths, 100.0);
        assert!((structure.score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_structure_penalizes_short_base_and_illegal_transition() {
        let scorer = EffectivenessScorer::default();
        let phases = vec![
            phase(TrainingPhase::Base, 3),
            phase(TrainingPhase::Peak, 1),
            phase(TrainingPhase::Build, 5),
        ];

        let structure = scorer.score_structure(&phases);
        // 70 + 15 + 15 - 20 for the short base
        assert_eq!(structure.phase_balance, 80.0);
        assert_eq!(structure.smooth_transitions, 0);
        assert_eq!(structure.transitions, 0.0);
        // The single-week peak is outside 2-16
        assert!((structure.lengths - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_structure_of_nothing() {
        let structure = EffectivenessScorer::default().score_structure(&[]);
        assert_eq!(structure.phase_balance, 70.0);
        assert_eq!(structure.transitions, 100.0);
        assert_eq!(structure.lengths, 0.0);
    }

    #[test]
    fn test_ctl_gain_bands() {
        let scorer = EffectivenessScorer::default();
        assert_eq!(scorer.ctl_gain_score(-2.0, 12).0, 30.0);
        assert_eq!(scorer.ctl_gain_score(0.0, 12).0, 50.0);
        assert_eq!(scorer.ctl_gain_score(60.0, 12).0, 40.0); // 0.2 weeks/point
        assert_eq!(scorer.ctl_gain_score(24.0, 12).0, 95.0); // 0.5 is the lower edge of the optimum
        assert_eq!(scorer.ctl_gain_score(15.0, 12).0, 90.0); // 0.8
        assert_eq!(scorer.ctl_gain_score(8.0, 12).0, 80.0); // 1.5
        assert_eq!(scorer.ctl_gain_score(2.0, 12), (60.0, Some(6.0)));
    }

    #[test]
    fn test_progression_rapid_increases() {
        let scorer = EffectivenessScorer::default();
        let weeks = vec![
            week(0, 5.0, 40.0, 0.0),
            week(1, 7.0, 42.0, 0.0),
            week(2, 7.0, 44.0, 0.0),
            week(3, 7.0, 46.0, 0.0),
        ];

        let progression = scorer.score_progression(&[], &weeks);
        assert_eq!(progression.rapid_increase_weeks, 1);
        // 70 - 5; average change 13.3% earns +20; 1 of 4 weeks is not rare
        assert_eq!(progression.volume_progression, 85.0);
        assert_eq!(progression.total_ctl_gain, 6.0);
        assert_eq!(progression.recovery_frequency, 80.0);
    }

    #[test]
    fn test_progression_skips_zero_volume_weeks() {
        let scorer = EffectivenessScorer::default();
        let weeks = vec![week(0, 0.0, 40.0, 0.0), week(1, 6.0, 40.0, 0.0)];

        let progression = scorer.score_progression(&[], &weeks);
        assert_eq!(progression.avg_weekly_volume_change_pct, None);
        assert_eq!(progression.rapid_increase_weeks, 0);
        assert_eq!(progression.volume_progression, 80.0);
    }

    #[test]
    fn test_recovery_frequency() {
        assert_eq!(recovery_frequency_score(0, 6), 80.0);
        assert_eq!(recovery_frequency_score(0, 12), 60.0);
        assert_eq!(recovery_frequency_score(3, 12), 90.0);
        assert_eq!(recovery_frequency_score(7, 12), 70.0);
    }

    #[test]
    fn test_recovery_score() {
        assert_eq!(score_recovery(&[]).score, 70.0);

        let calm: Vec<_> = (0..10).map(|i| week(i, 6.0, 40.0, if i < 2 { 18.0 } else { -5.0 })).collect();
        let recovery = score_recovery(&calm);
        assert_eq!(recovery.adequate_recovery_weeks, 2);
        assert_eq!(recovery.score, 100.0);

        let strained: Vec<_> = (0..10).map(|i| week(i, 6.0, 40.0, if i < 2 { -35.0 } else { -15.0 })).collect();
        let recovery = score_recovery(&strained);
        assert_eq!(recovery.overreaching_episodes, 2);
        assert_eq!(recovery.score, 50.0);
    }

    #[test]
    fn test_performance_score() {
        let mut base = phase(TrainingPhase::Base, 6);
        base.performance_metrics = Some(PhasePerformance {
            pr_count: 1,
            records: vec![PhaseRecord {
                category: "longest_run".to_owned(),
                date: base.start_date,
            }],
        });
        let mut taper = phase(TrainingPhase::Taper, 2);
        taper.performance_metrics = Some(PhasePerformance {
            pr_count: 1,
            records: vec![PhaseRecord {
                category: "fastest_10k".to_owned(),
                date: taper.start_date,
            }],
        });

        let weeks = vec![week(0, 6.0, 40.0, 0.0), week(1, 6.0, 55.0, 0.0)];
        let performance = score_performance(&[base, taper], &weeks);
        assert_eq!(performance.total_prs, 2);
        assert_eq!(performance.phase_types_with_prs, 2);
        assert_eq!(performance.score, 100.0);

        assert_eq!(score_performance(&[], &[]).score, 60.0);
    }

    #[test]
    fn test_phase_balance() {
        let phases = vec![
            phase(TrainingPhase::Base, 6),
            phase(TrainingPhase::Build, 3),
            phase(TrainingPhase::Taper, 1),
        ];

        let balance = phase_balance(&phases);
        assert_eq!(balance.total_weeks, 10);
        assert_eq!(balance.ratios[&TrainingPhase::Base], 0.6);
        assert_eq!(balance.ratios[&TrainingPhase::Peak], 0.0);
        // Build at 30% is fine; no recovery in 10 weeks is not
        assert_eq!(balance.recommendations.len(), 1);
        assert!(balance.recommendations[0].contains("recovery"));

        assert!(phase_balance(&[]).recommendations.is_empty());
    }

    #[test]
    fn test_weights_shift_without_form() {
        let scorer = EffectivenessScorer::default();
        let phases = vec![
            phase(TrainingPhase::Base, 6),
            phase(TrainingPhase::Build, 4),
            phase(TrainingPhase::Taper, 2),
        ];
        let weeks: Vec<_> = (0..12).map(|i| week(i, 6.0, 40.0 + i as f64, 0.0)).collect();

        let analysis = scorer.analyze(&phases, &weeks);
        assert!(analysis.form_management.is_none());

        let expected = 0.20 * analysis.structure.score
            + 0.25 * analysis.progression.score
            + 0.25 * analysis.recovery.score
            + 0.30 * analysis.performance.score;
        assert_eq!(analysis.overall_score, expected.round() as u32);
        assert_eq!(analysis.grade, Grade::from_score(analysis.overall_score));
    }
}
