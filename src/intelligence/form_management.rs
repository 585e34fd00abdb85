// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Form management scoring
//!
//! Only computed when at least one phase carries form metrics.

use super::metrics::{clamp_score, mean};
use super::{DetectedPhase, TrainingPhase};
use crate::config::PeriodizationConfig;
use serde::{Deserialize, Serialize};

/// Neutral taper score when no build/base phase leads into a peak or taper
const DEFAULT_TAPER_SCORE: f64 = 75.0;

/// Form management sub-score and its components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormManagementScore {
    pub score: f64,
    /// Deviation of each phase's average TSB from its optimum
    pub tsb_balance: f64,
    /// Overreaching in phases where it does not belong
    pub overreach_management: f64,
    /// TSB rise from build/base into peak/taper
    pub taper_effectiveness: f64,
    /// Long, deep build/peak blocks without a following recovery or taper
    pub recovery_timing: f64,
}

/// Score form management, or `None` when no phase has form metrics
pub fn score_form_management(phases: &[DetectedPhase], config: &PeriodizationConfig) -> Option<FormManagementScore> {
    if !phases.iter().any(|p| p.form_metrics.is_some()) {
        return None;
    }

    let tsb_balance = tsb_balance(phases, config);
    let overreach_management = overreach_management(phases);
    let taper_effectiveness = taper_effectiveness(phases);
    let recovery_timing = recovery_timing(phases);

    let score = 0.30 * tsb_balance
        + 0.25 * overreach_management
        + 0.25 * taper_effectiveness
        + 0.20 * recovery_timing;

    Some(FormManagementScore {
        score: clamp_score(score),
        tsb_balance,
        overreach_management,
        taper_effectiveness,
        recovery_timing,
    })
}

fn tsb_balance(phases: &[DetectedPhase], config: &PeriodizationConfig) -> f64 {
    let mut score = 100.0;
    for phase in phases {
        let Some(form) = &phase.form_metrics else {
            continue;
        };
        let deviation = (form.avg_tsb - config.optimal_tsb(phase.phase)).abs();
        score -= if deviation > 15.0 {
            15.0
        } else if deviation > 10.0 {
            10.0
        } else if deviation > 5.0 {
            5.0
        } else {
            0.0
        };
    }
    clamp_score(score)
}

fn overreach_management(phases: &[DetectedPhase]) -> f64 {
    let mut score = 100.0;
    for phase in phases {
        let Some(form) = &phase.form_metrics else {
            continue;
        };
        match phase.phase {
            TrainingPhase::Base | TrainingPhase::Recovery | TrainingPhase::Transition
                if form.overreaching_days > 0 =>
            {
                score -= 20.0;
            }
            TrainingPhase::Build if form.overreaching_days > 14 => score -= 10.0,
            _ => {}
        }
    }
    clamp_score(score)
}

fn taper_effectiveness(phases: &[DetectedPhase]) -> f64 {
    let scores: Vec<f64> = phases
        .windows(2)
        .filter(|pair| {
            matches!(pair[0].phase, TrainingPhase::Build | TrainingPhase::Base)
                && matches!(pair[1].phase, TrainingPhase::Peak | TrainingPhase::Taper)
        })
        .filter_map(|pair| {
            let before = pair[0].form_metrics.as_ref()?;
            let after = pair[1].form_metrics.as_ref()?;
            let increase = after.avg_tsb - before.avg_tsb;
            Some(if increase > 10.0 {
                95.0
            } else if increase > 5.0 {
                85.0
            } else if increase < -5.0 {
                40.0
            } else {
                60.0
            })
        })
        .collect();

    mean(&scores).unwrap_or(DEFAULT_TAPER_SCORE)
}

fn recovery_timing(phases: &[DetectedPhase]) -> f64 {
    let mut score = 100.0;
    for (i, phase) in phases.iter().enumerate() {
        if !matches!(phase.phase, TrainingPhase::Build | TrainingPhase::Peak) || phase.duration_weeks < 6 {
            continue;
        }
        let deep = phase.form_metrics.as_ref().is_some_and(|f| f.min_tsb < -25.0);
        let relieved = phases
            .get(i + 1)
            .is_some_and(|next| matches!(next.phase, TrainingPhase::Recovery | TrainingPhase::Taper));
        if deep && !relieved {
            score -= 15.0;
        }
    }
    clamp_score(score)
}
