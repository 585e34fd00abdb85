// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Form zone classification from training stress balance

use serde::{Deserialize, Serialize};
use std::fmt;

/// CTL below which the athlete has too little fitness for a race-ready zone
const MIN_CTL_FOR_RACE_FORM: f64 = 10.0;

/// Named readiness bucket for a TSB/CTL pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormZone {
    Transition,
    OptimalRace,
    Fresh,
    Neutral,
    OptimalTraining,
    Overreached,
}

impl FormZone {
    /// All zones from freshest to most fatigued
    pub const ALL: [Self; 6] = [
        Self::Transition,
        Self::OptimalRace,
        Self::Fresh,
        Self::Neutral,
        Self::OptimalTraining,
        Self::Overreached,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transition => "transition",
            Self::OptimalRace => "optimal_race",
            Self::Fresh => "fresh",
            Self::Neutral => "neutral",
            Self::OptimalTraining => "optimal_training",
            Self::Overreached => "overreached",
        }
    }

    /// TSB bounds of the zone; `None` means unbounded on that side
    pub fn tsb_range(&self) -> TsbRange {
        let (min, max) = match self {
            Self::Transition => (Some(25.0), None),
            Self::OptimalRace => (Some(15.0), Some(25.0)),
            Self::Fresh => (Some(5.0), Some(15.0)),
            Self::Neutral => (Some(-10.0), Some(5.0)),
            Self::OptimalTraining => (Some(-30.0), Some(-10.0)),
            Self::Overreached => (None, Some(-30.0)),
        };
        TsbRange { min, max }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Transition => "Very fresh, fitness is likely declining",
            Self::OptimalRace => "Fresh and fit, ready to race",
            Self::Fresh => "Rested with fitness intact",
            Self::Neutral => "Balanced training load",
            Self::OptimalTraining => "Productive training fatigue",
            Self::Overreached => "High fatigue, recovery needed",
        }
    }
}

impl fmt::Display for FormZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TSB interval covered by a form zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TsbRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Result of classifying one TSB/CTL pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormZoneInfo {
    pub zone: FormZone,
    pub tsb_range: TsbRange,
    pub description: String,
}

/// Buckets training stress balance into form zones
#[derive(Debug, Clone, Copy, Default)]
pub struct FormZoneClassifier;

impl FormZoneClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a TSB/CTL pair
    pub fn classify(&self, tsb: f64, ctl: f64) -> FormZoneInfo {
        let zone = self.zone(tsb, ctl);
        FormZoneInfo {
            zone,
            tsb_range: zone.tsb_range(),
            description: zone.description().to_owned(),
        }
    }

    fn zone(&self, tsb: f64, ctl: f64) -> FormZone {
        if tsb > 25.0 {
            FormZone::Transition
        } else if tsb > 15.0 {
            if ctl < MIN_CTL_FOR_RACE_FORM {
                FormZone::Fresh
            } else {
                FormZone::OptimalRace
            }
        } else if tsb > 5.0 {
            FormZone::Fresh
        } else if tsb > -10.0 {
            FormZone::Neutral
        } else if tsb >= -30.0 {
            FormZone::OptimalTraining
        } else {
            FormZone::Overreached
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_boundaries() {
        let classifier = FormZoneClassifier::new();

        assert_eq!(classifier.zone(30.0, 50.0), FormZone::Transition);
        assert_eq!(classifier.zone(25.0, 50.0), FormZone::OptimalRace);
        assert_eq!(classifier.zone(15.0, 50.0), FormZone::Fresh);
        assert_eq!(classifier.zone(5.0, 50.0), FormZone::Neutral);
        assert_eq!(classifier.zone(-10.0, 50.0), FormZone::OptimalTraining);
        assert_eq!(classifier.zone(-30.0, 50.0), FormZone::OptimalTraining);
        assert_eq!(classifier.zone(-30.5, 50.0), FormZone::Overreached);
    }

    #[test]
    fn test_low_fitness_is_never_race_ready() {
        let classifier = FormZoneClassifier::new();
        assert_eq!(classifier.zone(20.0, 5.0), FormZone::Fresh);
        assert_eq!(classifier.zone(20.0, 10.0), FormZone::OptimalRace);
    }

    #[test]
    fn test_classify_carries_range() {
        let info = FormZoneClassifier::new().classify(-40.0, 60.0);
        assert_eq!(info.zone, FormZone::Overreached);
        assert_eq!(info.tsb_range.min, None);
        assert_eq!(info.tsb_range.max, Some(-30.0));
        assert!(!info.description.is_empty());

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["zone"], "overreached");
    }
}
