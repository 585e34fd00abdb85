// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Weekly aggregation of activities and daily training load
//!
//! Produces one [`WeeklyMetric`] per Monday-start calendar week, from the week
//! holding the earliest date to the week holding the latest one. Weeks without
//! any training are still emitted so the series stays contiguous.

use super::metrics::mean_or_zero;
use super::training_load::DailyLoad;
use crate::models::{ActivityRef, ActivitySummary, HrZoneDistribution, WeeklyMetric};
use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

/// Groups activities and daily loads into calendar weeks
#[derive(Debug, Clone, Copy, Default)]
pub struct WeeklyAggregator;

impl WeeklyAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Monday of the week containing `date`
    pub fn week_start(date: NaiveDate) -> NaiveDate {
        date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
    }

    /// Aggregate into contiguous weekly metrics
    ///
    /// Weekly TSS is the sum of the daily loads falling in the week; when a
    /// week has no daily loads the activities' own TSS values are summed instead.
    pub fn aggregate(&self, activities: &[ActivitySummary], daily_loads: &[DailyLoad]) -> Vec<WeeklyMetric> {
        let dates = activities
            .iter()
            .map(|a| a.start_date.date_naive())
            .chain(daily_loads.iter().map(|l| l.date));

        let (Some(first), Some(last)) = min_max(dates) else {
            return Vec::new();
        };

        let mut week_start = Self::week_start(first);
        let mut weeks = Vec::new();
        while week_start <= last {
            let week_end = week_start + Duration::days(6);
            let in_week = |date: NaiveDate| date >= week_start && date <= week_end;

            let mut week_activities: Vec<&ActivitySummary> = activities
                .iter()
                .filter(|a| in_week(a.start_date.date_naive()))
                .collect();
            week_activities.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));

            let week_loads: Vec<&DailyLoad> = daily_loads.iter().filter(|l| in_week(l.date)).collect();

            weeks.push(build_week(week_start, week_end, &week_activities, &week_loads));
            week_start += Duration::weeks(1);
        }

        debug!(
            weeks.count = weeks.len(),
            activities.count = activities.len(),
            "Aggregated weekly metrics"
        );
        weeks
    }
}

fn min_max(dates: impl Iterator<Item = NaiveDate>) -> (Option<NaiveDate>, Option<NaiveDate>) {
    dates.fold((None, None), |(min, max), date| {
        (
            Some(min.map_or(date, |m: NaiveDate| m.min(date))),
            Some(max.map_or(date, |m: NaiveDate| m.max(date))),
        )
    })
}

fn build_week(
    week_start: NaiveDate,
    week_end: NaiveDate,
    activities: &[&ActivitySummary],
    loads: &[&DailyLoad],
) -> WeeklyMetric {
    let total_duration: u64 = activities.iter().map(|a| a.duration_seconds).sum();
    let total_distance: f64 = activities.iter().filter_map(|a| a.distance_meters).sum();
    let total_elevation: f64 = activities.iter().filter_map(|a| a.elevation_gain).sum();

    let weekly_tss: f64 = if loads.is_empty() {
        activities.iter().filter_map(|a| a.tss).sum()
    } else {
        loads.iter().map(|l| l.tss).sum()
    };

    let ctl: Vec<f64> = loads.iter().map(|l| l.ctl).collect();
    let atl: Vec<f64> = loads.iter().map(|l| l.atl).collect();
    let tsb: Vec<f64> = loads.iter().map(|l| l.tsb).collect();

    WeeklyMetric {
        week_start,
        week_end,
        total_duration,
        total_distance,
        total_elevation,
        activity_count: u32::try_from(activities.len()).unwrap_or(u32::MAX),
        avg_weekly_tss: weekly_tss,
        avg_ctl: mean_or_zero(&ctl),
        avg_atl: mean_or_zero(&atl),
        avg_tsb: mean_or_zero(&tsb),
        hr_zone_distribution: weighted_zones(activities),
        activities: activities
            .iter()
            .map(|a| ActivityRef {
                id: a.id.clone(),
                date: a.start_date.date_naive(),
                name: a.name.clone(),
            })
            .collect(),
    }
}

/// Duration-weighted zone distribution over activities that carry one
fn weighted_zones(activities: &[&ActivitySummary]) -> Option<HrZoneDistribution> {
    let mut totals = [0.0; 5];
    let mut weight = 0.0;

    for activity in activities {
        let Some(zones) = activity.hr_zone_distribution else {
            continue;
        };
        let seconds = activity.duration_seconds as f64;
        for (total, pct) in totals.iter_mut().zip(zones.as_array()) {
            *total += pct * seconds;
        }
        weight += seconds;
    }

    if weight == 0.0 {
        return None;
    }
    Some(HrZoneDistribution::from_array(totals.map(|t| t / weight)))
}
