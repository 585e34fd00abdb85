// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Strength, weakness and critical-issue findings for an effectiveness report
//!
//! Every check is an independent threshold test. Checks run in a fixed order
//! (structure, progression, recovery, performance, form) and each finding is
//! appended to its list in that order.

use super::effectiveness::{PerformanceScore, ProgressionScore, RecoveryScore, StructureScore};
use super::form_management::FormManagementScore;
use serde::{Deserialize, Serialize};

/// A finding extracted from the sub-scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub finding_type: FindingType,
    pub category: ScoreCategory,
    /// Human-readable finding
    pub message: String,
}

/// How a finding is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingType {
    Strength,
    Weakness,
    CriticalIssue,
}

/// Sub-score a finding was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Structure,
    Progression,
    Recovery,
    Performance,
    Form,
}

/// Findings split by type, each list in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Findings {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub critical_issues: Vec<String>,
}

impl From<Vec<Finding>> for Findings {
    fn from(findings: Vec<Finding>) -> Self {
        let mut grouped = Self::default();
        for finding in findings {
            match finding.finding_type {
                FindingType::Strength => grouped.strengths.push(finding.message),
                FindingType::Weakness => grouped.weaknesses.push(finding.message),
                FindingType::CriticalIssue => grouped.critical_issues.push(finding.message),
            }
        }
        grouped
    }
}

/// Thresholds for finding generation
#[derive(Debug, Clone)]
pub struct FindingConfig {
    /// Sub-scores at or above this are strengths
    pub strength_threshold: f64,
    /// Sub-scores below this are weaknesses
    pub weakness_threshold: f64,
    /// Performance scores below this are weaknesses
    pub performance_weakness_threshold: f64,
    /// Taper scores below this are weaknesses
    pub taper_weakness_threshold: f64,
}

impl Default for FindingConfig {
    fn default() -> Self {
        Self {
            strength_threshold: 80.0,
            weakness_threshold: 60.0,
            performance_weakness_threshold: 70.0,
            taper_weakness_threshold: 50.0,
        }
    }
}

/// Finding generator for effectiveness reports
#[derive(Debug, Clone, Default)]
pub struct FindingGenerator {
    config: FindingConfig,
}

impl FindingGenerator {
    /// Generator with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FindingConfig) -> Self {
        Self { config }
    }

    /// Generate findings grouped by type
    pub fn generate(
        &self,
        structure: &StructureScore,
        progression: &ProgressionScore,
        recovery: &RecoveryScore,
        performance: &PerformanceScore,
        form: Option<&FormManagementScore>,
    ) -> Findings {
        let mut findings = Vec::new();

        findings.extend(self.structure_findings(structure));
        findings.extend(self.progression_findings(progression));
        findings.extend(self.recovery_findings(recovery));
        findings.extend(self.performance_findings(performance));
        if let Some(form) = form {
            findings.extend(self.form_findings(form));
        }

        Findings::from(findings)
    }

    fn structure_findings(&self, structure: &StructureScore) -> Vec<Finding> {
        let mut findings = Vec::new();

        if structure.score >= self.config.strength_threshold {
            findings.push(finding(
                FindingType::Strength,
                ScoreCategory::Structure,
                "Well-structured training phases".to_owned(),
            ));
        }
        if structure.score < self.config.weakness_threshold {
            findings.push(finding(
                FindingType::Weakness,
                ScoreCategory::Structure,
                "Poor phase structure".to_owned(),
            ));
        }
        if structure.total_transitions > 0 && structure.smooth_transitions < structure.total_transitions {
            findings.push(finding(
                FindingType::Weakness,
                ScoreCategory::Structure,
                format!(
                    "{} of {} phase transitions do not follow a logical progression",
                    structure.total_transitions - structure.smooth_transitions,
                    structure.total_transitions
                ),
            ));
        }

        findings
    }

    fn progression_findings(&self, progression: &ProgressionScore) -> Vec<Finding> {
        let mut findings = Vec::new();

        if progression.score >= self.config.strength_threshold {
            findings.push(finding(
                FindingType::Strength,
                ScoreCategory::Progression,
                "Effective fitness progression".to_owned(),
            ));
        }
        if progression.score < self.config.weakness_threshold {
            findings.push(finding(
                FindingType::Weakness,
                ScoreCategory::Progression,
                "Suboptimal training progression".to_owned(),
            ));
        }
        if progression.rapid_increase_weeks > 0 {
            findings.push(finding(
                FindingType::CriticalIssue,
                ScoreCategory::Progression,
                format!(
                    "{} week(s) with rapid volume increases (>15%), raising injury risk",
                    progression.rapid_increase_weeks
                ),
            ));
        }
        if progression.total_ctl_gain < 0.0 {
            findings.push(finding(
                FindingType::Weakness,
                ScoreCategory::Progression,
                format!("Fitness (CTL) declined by {:.1} points", -progression.total_ctl_gain),
            ));
        }

        findings
    }

    fn recovery_findings(&self, recovery: &RecoveryScore) -> Vec<Finding> {
        let mut findings = Vec::new();

        if recovery.score >= self.config.strength_threshold {
            findings.push(finding(
                FindingType::Strength,
                ScoreCategory::Recovery,
                "Good recovery management".to_owned(),
            ));
        }
        if recovery.score < self.config.weakness_threshold {
            findings.push(finding(
                FindingType::Weakness,
                ScoreCategory::Recovery,
                "Inadequate recovery between training blocks".to_owned(),
            ));
        }
        if recovery.overreaching_episodes > 0 {
            findings.push(finding(
                FindingType::CriticalIssue,
                ScoreCategory::Recovery,
                format!(
                    "{} overreaching episode(s) detected (TSB < -30)",
                    recovery.overreaching_episodes
                ),
            ));
        }

        findings
    }

    fn performance_findings(&self, performance: &PerformanceScore) -> Vec<Finding> {
        let mut findings = Vec::new();

        if performance.total_prs > 0 {
            findings.push(finding(
                FindingType::Strength,
                ScoreCategory::Performance,
                format!("{} personal record(s) achieved", performance.total_prs),
            ));
        }
        if performance.score < self.config.performance_weakness_threshold {
            findings.push(finding(
                FindingType::Weakness,
                ScoreCategory::Performance,
                "Limited performance gains".to_owned(),
            ));
        }

        findings
    }

    fn form_findings(&self, form: &FormManagementScore) -> Vec<Finding> {
        let mut findings = Vec::new();

        if form.score >= self.config.strength_threshold {
            findings.push(finding(
                FindingType::Strength,
                ScoreCategory::Form,
                "Excellent form management".to_owned(),
            ));
        }
        if form.score < self.config.weakness_threshold {
            findings.push(finding(
                FindingType::Weakness,
                ScoreCategory::Form,
                "Poor form management".to_owned(),
            ));
        }
        if form.taper_effectiveness < self.config.taper_weakness_threshold {
            findings.push(finding(
                FindingType::Weakness,
                ScoreCategory::Form,
                "Ineffective taper".to_owned(),
            ));
        }

        findings
    }
}

fn finding(finding_type: FindingType, category: ScoreCategory, message: String) -> Finding {
    Finding {
        finding_type,
        category,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structure(score: f64, smooth: usize, total: usize) -> StructureScore {
        StructureScore {
            score,
            phase_balance: score,
            transitions: score,
            lengths: score,
            smooth_transitions: smooth,
            total_transitions: total,
            phases_within_typical_duration: 0,
        }
    }

    fn progression(score: f64, rapid: usize) -> ProgressionScore {
        ProgressionScore {
            score,
            volume_progression: score,
            ctl_gain_score: score,
            recovery_frequency: score,
            avg_weekly_volume_change_pct: None,
            rapid_increase_weeks: rapid,
            total_ctl_gain: 8.0,
            weeks_per_ctl_point: Some(1.5),
            recovery_weeks: 0,
        }
    }

    fn recovery(score: f64, episodes: usize) -> RecoveryScore {
        RecoveryScore {
            score,
            avg_tsb: -2.0,
            overreaching_episodes: episodes,
            adequate_recovery_weeks: 0,
        }
    }

    fn performance(score: f64, prs: usize) -> PerformanceScore {
        PerformanceScore {
            score,
            total_prs: prs,
            fitness_gain: 8.0,
            phase_types_with_prs: 0,
        }
    }

    #[test]
    fn test_strong_block() {
        let findings = FindingGenerator::new().generate(
            &structure(90.0, 2, 2),
            &progression(85.0, 0),
            &recovery(90.0, 0),
            &performance(90.0, 2),
            None,
        );

        assert_eq!(
            findings.strengths,
            vec![
                "Well-structured training phases",
                "Effective fitness progression",
                "Good recovery management",
                "2 personal record(s) achieved",
            ]
        );
        assert!(findings.weaknesses.is_empty());
        assert!(findings.critical_issues.is_empty());
    }

    #[test]
    fn test_weak_block_reports_in_fixed_order() {
        let form = FormManagementScore {
            score: 50.0,
            tsb_balance: 50.0,
            overreach_management: 60.0,
            taper_effectiveness: 40.0,
            recovery_timing: 55.0,
        };

        let findings = FindingGenerator::new().generate(
            &structure(55.0, 1, 3),
            &progression(58.0, 3),
            &recovery(50.0, 2),
            &performance(60.0, 0),
            Some(&form),
        );

        assert_eq!(findings.weaknesses[0], "Poor phase structure");
        assert!(findings.weaknesses[1].starts_with("2 of 3"));
        assert_eq!(findings.weaknesses.last().map(String::as_str), Some("Ineffective taper"));
        assert!(findings.weaknesses.contains(&"Poor form management".to_owned()));
        assert_eq!(findings.critical_issues.len(), 2);
        assert!(findings.critical_issues[0].starts_with("3 week(s)"));
        assert!(findings.critical_issues[1].contains("overreaching"));
        assert!(findings.strengths.is_empty());
    }
}
