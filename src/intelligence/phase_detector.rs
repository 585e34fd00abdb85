// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Hybrid phase detection: classify, segment, enrich

use super::classifiers::SignalClassifiers;
use super::enricher::PhaseEnricher;
use super::segmenter::Segmenter;
use super::{DetectedPhase, WeekVotes};
use crate::config::PeriodizationConfig;
use crate::logging::AppLogger;
use crate::models::{PersonalRecord, WeeklyMetric};
use tracing::debug;

/// Detects training phases in a weekly series
///
/// The detector is a pure function of its input and configuration: the same
/// weeks, records and config always produce the same phases.
#[derive(Debug, Clone, Default)]
pub struct PhaseDetector {
    config: PeriodizationConfig,
}

impl PhaseDetector {
    pub fn new(config: PeriodizationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PeriodizationConfig {
        &self.config
    }

    /// Per-week votes of the three classifiers
    pub fn classify_weeks(&self, weeks: &[WeeklyMetric]) -> Vec<WeekVotes> {
        let classifiers = SignalClassifiers::new(&self.config);
        (0..weeks.len())
            .map(|index| classifiers.classify_week(weeks, index))
            .collect()
    }

    /// Segment `weeks` into enriched phases
    ///
    /// Weeks are expected in ascending `week_start` order. Fewer weeks than
    /// `min_phase_weeks` yield no phases.
    pub fn detect(&self, weeks: &[WeeklyMetric], records: Option<&[PersonalRecord]>) -> Vec<DetectedPhase> {
        if weeks.is_empty() || weeks.len() < self.config.min_phase_weeks {
            debug!(
                weeks.count = weeks.len(),
                min_phase_weeks = self.config.min_phase_weeks,
                "Not enough weeks for phase detection"
            );
            return Vec::new();
        }

        if let Some(position) = weeks
            .windows(2)
            .position(|pair| pair[1].week_start <= pair[0].week_start)
        {
            AppLogger::log_input_warning(
                "weekly metrics are not in ascending week_start order",
                position + 1,
            );
        }

        let votes = self.classify_weeks(weeks);
        let segments = Segmenter::new(&self.config).segment(&votes);
        let enricher = PhaseEnricher::new(&self.config);

        let phases: Vec<DetectedPhase> = segments
            .iter()
            .map(|segment| enricher.enrich(weeks, segment, records))
            .collect();

        AppLogger::log_detection_summary(weeks.len(), &phases);
        phases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::TrainingPhase;
    use crate::models::HrZoneDistribution;
    use chrono::{Duration, NaiveDate};

    fn week(index: i64, hours: f64, zones: [f64; 5]) -> WeeklyMetric {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::weeks(index);
        WeeklyMetric {
            week_start: start,
            week_end: start + Duration::days(6),
            total_duration: (hours * 3600.0) as u64,
            total_distance: hours * 9_000.0,
            total_elevation: 0.0,
            activity_count: 5,
            avg_weekly_tss: hours * 45.0,
            avg_ctl: 40.0,
            avg_atl: 40.0,
            avg_tsb: 0.0,
            hr_zone_distribution: Some(HrZoneDistribution::from_array(zones)),
            activities: vec![],
        }
    }

    #[test]
    fn test_too_few_weeks() {
        let detector = PhaseDetector::default();
        assert!(detector.detect(&[], None).is_empty());

        let weeks = vec![week(0, 6.0, [40.0, 45.0, 10.0, 4.0, 1.0])];
        assert!(detector.detect(&weeks, None).is_empty());
    }

    #[test]
    fn test_steady_aerobic_block_is_one_base_phase() {
        let detector = PhaseDetector::default();
        let weeks: Vec<_> = (0..6).map(|i| week(i, 6.0, [40.0, 45.0, 10.0, 4.0, 1.0])).collect();

        let phases = detector.detect(&weeks, None);
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].phase, TrainingPhase::Base);
        assert_eq!(phases[0].duration_weeks, 6);
        assert_eq!(phases[0].start_date, weeks[0].week_start);
        assert_eq!(phases[0].end_date, weeks[5].week_end);
    }

    #[test]
    fn test_classify_weeks_one_vote_set_per_week() {
        let detector = PhaseDetector::default();
        let weeks: Vec<_> = (0..3).map(|i| week(i, 6.0, [40.0, 45.0, 10.0, 4.0, 1.0])).collect();

        let votes = detector.classify_weeks(&weeks);
        assert_eq!(votes.len(), 3);
        assert!(votes.iter().all(|v| v.intensity.phase == TrainingPhase::Base));
    }
}
