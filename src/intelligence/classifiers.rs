// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-week signal classifiers
//!
//! Each classifier sees only the weeks up to and including the one being
//! classified (`history`, current week last) and emits one [`PhaseVote`].
//! Rules are evaluated top to bottom and the first match wins, so the order
//! of every rule table below is part of the behavior.

use super::metrics::{absolute_window_trend, relative_window_trend, WindowTrend};
use super::{PhaseVote, TrainingPhase, TrendDirection, WeekVotes};
use crate::config::{PeriodizationConfig, TssThresholds, VolumeThresholds};
use crate::constants::detection;
use crate::models::{HrZoneDistribution, WeeklyMetric};

/// One entry of a rule cascade
struct Rule<S> {
    phase: TrainingPhase,
    confidence: f64,
    label: &'static str,
    matches: fn(&S) -> bool,
}

/// First matching rule, if any
fn first_match<'r, S>(rules: &'r [Rule<S>], signals: &S) -> Option<&'r Rule<S>> {
    rules.iter().find(|rule| (rule.matches)(signals))
}

fn vote(phase: TrainingPhase, confidence: f64, reasoning: String) -> PhaseVote {
    PhaseVote {
        phase,
        confidence: confidence.clamp(0.0, 100.0),
        reasoning,
    }
}

/// Runs the three classifiers against a shared configuration
pub struct SignalClassifiers<'a> {
    config: &'a PeriodizationConfig,
}

impl<'a> SignalClassifiers<'a> {
    pub fn new(config: &'a PeriodizationConfig) -> Self {
        Self { config }
    }

    /// Classify the week at `index`, never reading later weeks
    pub fn classify_week(&self, weeks: &[WeeklyMetric], index: usize) -> WeekVotes {
        let history = &weeks[..=index];
        WeekVotes {
            volume: self.classify_volume(history),
            intensity: self.classify_intensity(&history[index]),
            tss: self.classify_tss(history),
        }
    }

    /// Volume classifier over weekly training hours
    pub fn classify_volume(&self, history: &[WeeklyMetric]) -> PhaseVote {
        let Some(current) = history.last() else {
            return vote(TrainingPhase::Transition, 0.0, "No volume data".to_owned());
        };
        let index = history.len() - 1;

        let trend = relative_window_trend(history.len(), index, detection::VOLUME_TREND_THRESHOLD, |i| {
            history[i].duration_hours()
        });

        let signals = VolumeSignals {
            hours: current.duration_hours(),
            trend: trend.direction,
            thresholds: self.config.volume_thresholds,
        };

        let mut confidence = 60.0;
        if trend.is_established() {
            confidence += 10.0;
        }

        let (phase, bonus, label) = first_match(VOLUME_RULES, &signals)
            .map_or((TrainingPhase::Build, 0.0, "default"), |rule| {
                (rule.phase, rule.confidence, rule.label)
            });

        vote(
            phase,
            confidence + bonus,
            format!(
                "Volume {:.1}h/week ({}), trend {}",
                signals.hours,
                label,
                describe_trend(&trend, true)
            ),
        )
    }

    /// Intensity classifier over the week's heart rate zone distribution
    pub fn classify_intensity(&self, week: &WeeklyMetric) -> PhaseVote {
        let Some(zones) = week.hr_zone_distribution else {
            return vote(
                TrainingPhase::Transition,
                30.0,
                "No heart rate zone data available".to_owned(),
            );
        };

        let signals = IntensitySignals::from(zones);
        let (phase, confidence, label) = first_match(INTENSITY_RULES, &signals)
            .map_or((TrainingPhase::Build, 50.0, "mixed intensity"), |rule| {
                (rule.phase, rule.confidence, rule.label)
            });

        vote(
            phase,
            confidence,
            format!(
                "{}: low {:.0}%, moderate {:.0}%, high {:.0}% (Z5 {:.0}%)",
                label, signals.low, signals.moderate, signals.high, signals.zone5
            ),
        )
    }

    /// TSS classifier over weekly stress, CTL trend and TSB
    pub fn classify_tss(&self, history: &[WeeklyMetric]) -> PhaseVote {
        let Some(current) = history.last() else {
            return vote(TrainingPhase::Transition, 0.0, "No training stress data".to_owned());
        };
        let index = history.len() - 1;

        let ctl_trend = absolute_window_trend(history.len(), index, detection::CTL_TREND_THRESHOLD, |i| {
            history[i].avg_ctl
        });

        let signals = TssSignals {
            tss: current.avg_weekly_tss,
            tsb: current.avg_tsb,
            ctl_trend: ctl_trend.direction,
            early: ctl_trend.early,
            thresholds: self.config.tss_thresholds,
        };

        let (phase, confidence, label) = first_match(TSS_RULES, &signals)
            .map_or((TrainingPhase::Build, 55.0, "default"), |rule| {
                (rule.phase, 60.0 + rule.confidence, rule.label)
            });

        vote(
            phase,
            confidence,
            format!(
                "TSS {:.0}/week, TSB {:.1}, CTL trend {} ({})",
                signals.tss,
                signals.tsb,
                describe_trend(&ctl_trend, false),
                label
            ),
        )
    }
}

fn describe_trend(trend: &WindowTrend, relative: bool) -> String {
    match (trend.change, trend.early) {
        (Some(change), _) if relative => format!("{} ({:+.0}%)", trend.direction, change * 100.0),
        (Some(change), _) => format!("{} ({:+.1})", trend.direction, change),
        (None, true) => "not yet established".to_owned(),
        (None, false) => "unavailable".to_owned(),
    }
}

struct VolumeSignals {
    hours: f64,
    trend: TrendDirection,
    thresholds: VolumeThresholds,
}

impl VolumeSignals {
    fn below_low(&self) -> bool {
        self.hours < self.thresholds.low
    }

    fn low_to_medium(&self) -> bool {
        self.hours >= self.thresholds.low && self.hours < self.thresholds.medium
    }

    fn medium_to_high(&self) -> bool {
        self.hours >= self.thresholds.medium && self.hours < self.thresholds.high
    }

    fn above_high(&self) -> bool {
        self.hours >= self.thresholds.high
    }
}

const VOLUME_RULES: &[Rule<VolumeSignals>] = &[
    Rule {
        phase: TrainingPhase::Recovery,
        confidence: 10.0,
        label: "very low volume",
        matches: |s| s.below_low(),
    },
    Rule {
        phase: TrainingPhase::Recovery,
        confidence: 5.0,
        label: "low volume, decreasing",
        matches: |s| s.low_to_medium() && s.trend == TrendDirection::Decreasing,
    },
    Rule {
        phase: TrainingPhase::Base,
        confidence: 5.0,
        label: "low volume",
        matches: |s| s.low_to_medium(),
    },
    Rule {
        phase: TrainingPhase::Taper,
        confidence: 10.0,
        label: "moderate volume, decreasing",
        matches: |s| s.medium_to_high() && s.trend == TrendDirection::Decreasing,
    },
    Rule {
        phase: TrainingPhase::Build,
        confidence: 10.0,
        label: "moderate volume, increasing",
        matches: |s| s.medium_to_high() && s.trend == TrendDirection::Increasing,
    },
    Rule {
        phase: TrainingPhase::Build,
        confidence: 5.0,
        label: "moderate volume",
        matches: |s| s.medium_to_high(),
    },
    Rule {
        phase: TrainingPhase::Base,
        confidence: 10.0,
        label: "very high volume, increasing",
        matches: |s| s.above_high() && s.trend == TrendDirection::Increasing,
    },
    Rule {
        phase: TrainingPhase::Taper,
        confidence: 5.0,
        label: "very high volume, decreasing",
        matches: |s| s.above_high() && s.trend == TrendDirection::Decreasing,
    },
];

struct IntensitySignals {
    zone1: f64,
    zone5: f64,
    low: f64,
    moderate: f64,
    high: f64,
}

impl From<HrZoneDistribution> for IntensitySignals {
    fn from(zones: HrZoneDistribution) -> Self {
        Self {
            zone1: zones.zone1,
            zone5: zones.zone5,
            low: zones.low_intensity(),
            moderate: zones.moderate_intensity(),
            high: zones.high_intensity(),
        }
    }
}

const INTENSITY_RULES: &[Rule<IntensitySignals>] = &[
    Rule {
        phase: TrainingPhase::Peak,
        confidence: 75.0,
        label: "High-intensity focus",
        matches: |s| s.high > 25.0 || s.zone5 > 8.0,
    },
    Rule {
        phase: TrainingPhase::Base,
        confidence: 75.0,
        label: "Aerobic base focus",
        matches: |s| s.low >= 80.0 && s.high < 10.0,
    },
    Rule {
        phase: TrainingPhase::Recovery,
        confidence: 75.0,
        label: "Recovery-dominant",
        matches: |s| s.zone1 >= 70.0 && s.high < 5.0,
    },
    Rule {
        phase: TrainingPhase::Build,
        confidence: 70.0,
        label: "Threshold development",
        matches: |s| s.low >= 50.0 && s.high >= 10.0 && s.high <= 25.0,
    },
    Rule {
        phase: TrainingPhase::Taper,
        confidence: 65.0,
        label: "Race-pace sharpening",
        matches: |s| s.moderate > 30.0 && s.high >= 8.0 && s.high <= 20.0,
    },
];

struct TssSignals {
    tss: f64,
    tsb: f64,
    ctl_trend: TrendDirection,
    /// Not enough history for a CTL trend yet
    early: bool,
    thresholds: TssThresholds,
}

impl TssSignals {
    fn ctl_rising_or_early(&self) -> bool {
        self.early || self.ctl_trend == TrendDirection::Increasing
    }

    fn ctl_flat_or_falling(&self) -> bool {
        matches!(self.ctl_trend, TrendDirection::Stable | TrendDirection::Decreasing)
    }
}

// Rule confidences here are bonuses on top of a base of 60
const TSS_RULES: &[Rule<TssSignals>] = &[
    Rule {
        phase: TrainingPhase::Recovery,
        confidence: 10.0,
        label: "very low training stress",
        matches: |s| s.tss < s.thresholds.low,
    },
    Rule {
        phase: TrainingPhase::Recovery,
        confidence: 5.0,
        label: "form extreme, recovery needed",
        matches: |s| s.tsb >= 25.0 || s.tsb < -30.0,
    },
    Rule {
        phase: TrainingPhase::Taper,
        confidence: 10.0,
        label: "reduced stress with rising freshness",
        matches: |s| s.tss < s.thresholds.medium && s.ctl_flat_or_falling() && s.tsb > 5.0 && s.tsb < 25.0,
    },
    Rule {
        phase: TrainingPhase::Base,
        confidence: 10.0,
        label: "moderate stress building fitness",
        matches: |s| s.tss < s.thresholds.medium && s.ctl_rising_or_early() && s.tsb >= -15.0 && s.tsb <= 10.0,
    },
    Rule {
        phase: TrainingPhase::Build,
        confidence: 10.0,
        label: "high stress building fitness",
        matches: |s| s.tss >= s.thresholds.medium && s.ctl_rising_or_early() && s.tsb >= -30.0 && s.tsb < 5.0,
    },
    Rule {
        phase: TrainingPhase::Peak,
        confidence: 10.0,
        label: "very high stress holding fitness",
        matches: |s| {
            s.tss >= s.thresholds.high
                && !s.early
                && s.ctl_trend == TrendDirection::Stable
                && s.tsb > -20.0
                && s.tsb < 10.0
        },
    },
];
