// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Phase enrichment
//!
//! Recomputes every statistic of a finalized segment over the weeks it covers
//! and attaches the optional personal-record, heart-rate and form blocks.

use super::form_zones::{FormZone, FormZoneClassifier};
use super::metrics::{half_split_trend, mean_or_zero};
use super::segmenter::Segment;
use super::{
    DetectedPhase, DetectionMethod, FormMetrics, FormZoneCount, HrZoneProfile, PhasePerformance,
    PhaseRecord,
};
use crate::config::PeriodizationConfig;
use crate::constants::enrichment;
use crate::models::{PersonalRecord, WeeklyMetric};

/// Builds [`DetectedPhase`] records from segments
pub struct PhaseEnricher<'a> {
    config: &'a PeriodizationConfig,
    form_zones: FormZoneClassifier,
}

impl<'a> PhaseEnricher<'a> {
    pub fn new(config: &'a PeriodizationConfig) -> Self {
        Self {
            config,
            form_zones: FormZoneClassifier::new(),
        }
    }

    /// Enrich one segment of `weeks`
    pub fn enrich(
        &self,
        weeks: &[WeeklyMetric],
        segment: &Segment,
        records: Option<&[PersonalRecord]>,
    ) -> DetectedPhase {
        let span = &weeks[segment.start..=segment.end];
        let first = &span[0];
        let last = &span[span.len() - 1];

        let hours: Vec<f64> = span.iter().map(WeeklyMetric::duration_hours).collect();
        let tss: Vec<f64> = span.iter().map(|w| w.avg_weekly_tss).collect();
        let distance: Vec<f64> = span.iter().map(WeeklyMetric::distance_km).collect();
        let ctl: Vec<f64> = span.iter().map(|w| w.avg_ctl).collect();
        let atl: Vec<f64> = span.iter().map(|w| w.avg_atl).collect();
        let tsb: Vec<f64> = span.iter().map(|w| w.avg_tsb).collect();

        let start_date = first.week_start;
        let end_date = last.week_end;

        DetectedPhase {
            phase: segment.phase,
            start_date,
            end_date,
            duration_weeks: span.len(),
            avg_weekly_hours: mean_or_zero(&hours),
            total_hours: hours.iter().sum(),
            avg_weekly_distance_km: mean_or_zero(&distance),
            avg_weekly_tss: mean_or_zero(&tss),
            total_tss: tss.iter().sum(),
            avg_ctl: mean_or_zero(&ctl),
            avg_atl: mean_or_zero(&atl),
            avg_tsb: mean_or_zero(&tsb),
            ctl_start: first.avg_ctl,
            ctl_end: last.avg_ctl,
            ctl_gain: last.avg_ctl - first.avg_ctl,
            volume_trend: half_split_trend(&hours, enrichment::HALF_SPLIT_TREND_THRESHOLD, true),
            tss_trend: half_split_trend(&tss, enrichment::HALF_SPLIT_TREND_THRESHOLD, true),
            confidence: segment.confidence(),
            confidence_breakdown: segment.confidence_breakdown(),
            detection_method: DetectionMethod::Hybrid,
            performance_metrics: records.map(|records| performance_in_range(records, start_date, end_date)),
            hr_zone_profile: hr_zone_profile(span),
            form_metrics: self.form_metrics(span),
        }
    }

    fn form_metrics(&self, span: &[WeeklyMetric]) -> Option<FormMetrics> {
        if !self.config.analyze_form || !span.iter().any(WeeklyMetric::has_load_data) {
            return None;
        }

        let tsb: Vec<f64> = span.iter().map(|w| w.avg_tsb).collect();
        let min_tsb = tsb.iter().copied().fold(f64::INFINITY, f64::min);
        let max_tsb = tsb.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut counts = [0usize; 6];
        for week in span {
            let zone = self.form_zones.classify(week.avg_tsb, week.avg_ctl).zone;
            counts[zone_slot(zone)] += 1;
        }

        let zone_distribution: Vec<FormZoneCount> = FormZone::ALL
            .iter()
            .zip(counts)
            .filter(|(_, weeks)| *weeks > 0)
            .map(|(&zone, weeks)| FormZoneCount { zone, weeks })
            .collect();

        let dominant_zone = zone_distribution
            .iter()
            .copied()
            .reduce(|best, candidate| if candidate.weeks > best.weeks { candidate } else { best })
            .map_or(FormZone::Neutral, |count| count.zone);

        let overreaching_weeks = tsb
            .iter()
            .filter(|&&value| value < enrichment::OVERREACHING_TSB)
            .count();

        Some(FormMetrics {
            avg_tsb: mean_or_zero(&tsb),
            min_tsb,
            max_tsb,
            tsb_trend: half_split_trend(&tsb, enrichment::TSB_TREND_THRESHOLD, false),
            zone_distribution,
            dominant_zone,
            overreaching_days: u32::try_from(overreaching_weeks)
                .unwrap_or(u32::MAX)
                .saturating_mul(enrichment::DAYS_PER_OVERREACHING_WEEK),
        })
    }
}

fn zone_slot(zone: FormZone) -> usize {
    FormZone::ALL.iter().position(|z| *z == zone).unwrap_or(0)
}

fn performance_in_range(
    records: &[PersonalRecord],
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
) -> PhasePerformance {
    let records: Vec<PhaseRecord> = records
        .iter()
        .filter(|record| {
            let date = record.date();
            date >= start && date <= end
        })
        .map(|record| PhaseRecord {
            category: record.category.clone(),
            date: record.date(),
        })
        .collect();

    PhasePerformance {
        pr_count: records.len(),
        records,
    }
}

fn hr_zone_profile(span: &[WeeklyMetric]) -> Option<HrZoneProfile> {
    let with_zones: Vec<[f64; 5]> = span
        .iter()
        .filter_map(|w| w.hr_zone_distribution.map(|z| z.as_array()))
        .collect();

    if with_zones.is_empty() {
        return None;
    }

    let mut avg_zones = [0.0; 5];
    for (zone, avg) in avg_zones.iter_mut().enumerate() {
        let values: Vec<f64> = with_zones.iter().map(|z| z[zone]).collect();
        *avg = mean_or_zero(&values);
    }

    // Stable sort keeps the lower zone first on equal percentages
    let mut order: Vec<usize> = (0..5).collect();
    order.sort_by(|a, b| avg_zones[*b].total_cmp(&avg_zones[*a]));

    Some(HrZoneProfile {
        avg_zones,
        dominant_zones: [order[0] as u8 + 1, order[1] as u8 + 1],
        weeks_with_data: with_zones.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::{PhaseVote, TrainingPhase, TrendDirection, WeekVotes};
    use crate::models::HrZoneDistribution;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn week(index: i64, hours: f64, tss: f64, ctl: f64, tsb: f64) -> WeeklyMetric {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::weeks(index);
        WeeklyMetric {
            week_start: start,
            week_end: start + Duration::days(6),
            total_duration: (hours * 3600.0) as u64,
            total_distance: hours * 10_000.0,
            total_elevation: 0.0,
            activity_count: 4,
            avg_weekly_tss: tss,
            avg_ctl: ctl,
            avg_atl: ctl - tsb,
            avg_tsb: tsb,
            hr_zone_distribution: None,
            activities: vec![],
        }
    }

    fn segment(phase: TrainingPhase, start: usize, end: usize) -> Segment {
        let vote = PhaseVote {
            phase,
            confidence: 70.0,
            reasoning: String::new(),
        };
        let votes = WeekVotes {
            volume: vote.clone(),
            intensity: vote.clone(),
            tss: vote,
        };
        Segment {
            phase,
            start,
            end,
            start_votes: votes,
        }
    }

    #[test]
    fn test_aggregates_and_trends() {
        let config = PeriodizationConfig::default();
        let enricher = PhaseEnricher::new(&config);
        let weeks = vec![
            week(0, 4.0, 200.0, 30.0, 2.0),
            week(1, 5.0, 220.0, 33.0, 0.0),
            week(2, 8.0, 300.0, 37.0, -5.0),
            week(3, 9.0, 340.0, 40.0, -8.0),
        ];

        let phase = enricher.enrich(&weeks, &segment(TrainingPhase::Base, 0, 3), None);
        assert_eq!(phase.duration_weeks, 4);
        assert_eq!(phase.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(phase.end_date, NaiveDate::from_ymd_opt(2024, 1, 28).unwrap());
        assert_eq!(phase.total_hours, 26.0);
        assert_eq!(phase.avg_weekly_hours, 6.5);
        assert_eq!(phase.total_tss, 1060.0);
        assert_eq!(phase.ctl_gain, 10.0);
        assert_eq!(phase.volume_trend, TrendDirection::Increasing);
        assert_eq!(phase.tss_trend, TrendDirection::Increasing);
        assert_eq!(phase.confidence, 70.0);
        assert_eq!(phase.detection_method, DetectionMethod::Hybrid);
        assert!(phase.performance_metrics.is_none());
        assert!(phase.hr_zone_profile.is_none());
    }

    #[test]
    fn test_personal_records_inclusive_range() {
        let config = PeriodizationConfig::default();
        let enricher = PhaseEnricher::new(&config);
        let weeks = vec![week(0, 6.0, 250.0, 40.0, 0.0), week(1, 6.0, 250.0, 40.0, 0.0)];

        let record = |d: u32, category: &str| PersonalRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 1, d, 18, 30, 0).unwrap(),
            category: category.to_owned(),
            value: None,
            activity_id: None,
        };
        let records = vec![record(1, "fastest_5k"), record(14, "longest_run"), record(15, "fastest_10k")];

        let phase = enricher.enrich(&weeks, &segment(TrainingPhase::Build, 0, 1), Some(&records));
        let performance = phase.performance_metrics.unwrap();
        assert_eq!(performance.pr_count, 2);
        assert_eq!(performance.records[1].category, "longest_run");

        let phase = enricher.enrich(&weeks, &segment(TrainingPhase::Build, 0, 1), Some(&[]));
        assert_eq!(phase.performance_metrics.unwrap().pr_count, 0);
    }

    #[test]
    fn test_hr_zone_profile() {
        let config = PeriodizationConfig::default();
        let enricher = PhaseEnricher::new(&config);
        let mut weeks = vec![week(0, 6.0, 250.0, 40.0, 0.0), week(1, 6.0, 250.0, 40.0, 0.0), week(2, 6.0, 250.0, 40.0, 0.0)];
        weeks[0].hr_zone_distribution = Some(HrZoneDistribution::from_array([30.0, 50.0, 10.0, 8.0, 2.0]));
        weeks[2].hr_zone_distribution = Some(HrZoneDistribution::from_array([40.0, 40.0, 10.0, 6.0, 4.0]));

        let phase = enricher.enrich(&weeks, &segment(TrainingPhase::Base, 0, 2), None);
        let profile = phase.hr_zone_profile.unwrap();
        assert_eq!(profile.weeks_with_data, 2);
        assert_eq!(profile.avg_zones[0], 35.0);
        assert_eq!(profile.avg_zones[1], 45.0);
        assert_eq!(profile.dominant_zones, [2, 1]);
    }

    #[test]
    fn test_form_metrics() {
        let config = PeriodizationConfig::default();
        let enricher = PhaseEnricher::new(&config);
        let weeks = vec![
            week(0, 10.0, 450.0, 50.0, -12.0),
            week(1, 11.0, 500.0, 54.0, -35.0),
            week(2, 11.0, 480.0, 57.0, -20.0),
            week(3, 7.0, 250.0, 56.0, 8.0),
        ];

        let phase = enricher.enrich(&weeks, &segment(TrainingPhase::Build, 0, 3), None);
        let form = phase.form_metrics.unwrap();
        assert_eq!(form.min_tsb, -35.0);
        assert_eq!(form.max_tsb, 8.0);
        assert_eq!(form.avg_tsb, -14.75);
        assert_eq!(form.overreaching_days, 7);
        assert_eq!(form.dominant_zone, FormZone::OptimalTraining);
        assert_eq!(
            form.zone_distribution,
            vec![
                FormZoneCount { zone: FormZone::Fresh, weeks: 1 },
                FormZoneCount { zone: FormZone::OptimalTraining, weeks: 2 },
                FormZoneCount { zone: FormZone::Overreached, weeks: 1 },
            ]
        );
    }

    #[test]
    fn test_form_zones_degrade_at_low_fitness() {
        let config = PeriodizationConfig::default();
        let enricher = PhaseEnricher::new(&config);
        let weeks = vec![week(0, 3.0, 120.0, 6.0, 20.0), week(1, 3.0, 120.0, 40.0, 20.0)];

        let phase = enricher.enrich(&weeks, &segment(TrainingPhase::Taper, 0, 1), None);
        assert_eq!(
            phase.form_metrics.unwrap().zone_distribution,
            vec![
                FormZoneCount { zone: FormZone::OptimalRace, weeks: 1 },
                FormZoneCount { zone: FormZone::Fresh, weeks: 1 },
            ]
        );
    }

    #[test]
    fn test_form_metrics_require_load_data_and_flag() {
        let weeks = vec![week(0, 6.0, 250.0, 0.0, 0.0), week(1, 6.0, 250.0, 0.0, 0.0)];

        let config = PeriodizationConfig::default();
        let phase = PhaseEnricher::new(&config).enrich(&weeks, &segment(TrainingPhase::Base, 0, 1), None);
        assert!(phase.form_metrics.is_none());

        let loaded = vec![week(0, 6.0, 250.0, 40.0, -2.0), week(1, 6.0, 250.0, 41.0, -3.0)];
        let config = PeriodizationConfig {
            analyze_form: false,
            ..PeriodizationConfig::default()
        };
        let phase = PhaseEnricher::new(&config).enrich(&loaded, &segment(TrainingPhase::Base, 0, 1), None);
        assert!(phase.form_metrics.is_none());
    }
}
