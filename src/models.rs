// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Input records consumed by the periodization engine.
//!
//! ## Core Models
//!
//! - [`WeeklyMetric`]: one calendar week of aggregated training load
//! - [`HrZoneDistribution`]: percentage of time spent in each of five heart rate zones
//! - [`PersonalRecord`]: a record produced by an upstream PR detector
//! - [`ActivitySummary`]: a single activity, used only by the weekly aggregator
//!
//! Weekly metrics are read-only inside the engine. They are expected in ascending
//! `week_start` order but are not required to be contiguous.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One calendar week of training, as produced by the weekly aggregator
///
/// # Examples
///
/// ```rust
/// use pierre_periodization::models::WeeklyMetric;
/// use chrono::NaiveDate;
///
/// let week = WeeklyMetric {
///     week_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     week_end: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
///     total_duration: 6 * 3600,
///     total_distance: 50_000.0,
///     total_elevation: 400.0,
///     activity_count: 5,
///     avg_weekly_tss: 320.0,
///     avg_ctl: 45.0,
///     avg_atl: 50.0,
///     avg_tsb: -5.0,
///     hr_zone_distribution: None,
///     activities: vec![],
/// };
/// assert_eq!(week.duration_hours(), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMetric {
    /// First day of the week
    pub week_start: NaiveDate,
    /// Last day of the week
    pub week_end: NaiveDate,
    /// Total training time in seconds
    pub total_duration: u64,
    /// Total distance in meters
    pub total_distance: f64,
    /// Total elevation gain in meters
    pub total_elevation: f64,
    /// Number of activities in the week
    pub activity_count: u32,
    /// Training stress accumulated over the week
    pub avg_weekly_tss: f64,
    /// Average chronic training load over the week
    pub avg_ctl: f64,
    /// Average acute training load over the week
    pub avg_atl: f64,
    /// Average training stress balance over the week
    pub avg_tsb: f64,
    /// Heart rate zone distribution, when heart rate data was recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr_zone_distribution: Option<HrZoneDistribution>,
    /// Lightweight references to the activities in this week
    #[serde(default)]
    pub activities: Vec<ActivityRef>,
}

impl WeeklyMetric {
    /// Total training time in hours
    pub fn duration_hours(&self) -> f64 {
        self.total_duration as f64 / 3600.0
    }

    /// Total distance in kilometers
    pub fn distance_km(&self) -> f64 {
        self.total_distance / 1000.0
    }

    /// Whether this week carries any training-load data at all
    pub fn has_load_data(&self) -> bool {
        self.avg_ctl != 0.0 || self.avg_atl != 0.0 || self.avg_tsb != 0.0
    }
}

/// Percentage of training time in each heart rate zone
///
/// Values are percentages (0-100). They need not sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HrZoneDistribution {
    pub zone1: f64,
    pub zone2: f64,
    pub zone3: f64,
    pub zone4: f64,
    pub zone5: f64,
}

impl HrZoneDistribution {
    /// Zones as an array, zone 1 first
    pub fn as_array(&self) -> [f64; 5] {
        [self.zone1, self.zone2, self.zone3, self.zone4, self.zone5]
    }

    /// Build a distribution from an array, zone 1 first
    pub fn from_array(zones: [f64; 5]) -> Self {
        Self {
            zone1: zones[0],
            zone2: zones[1],
            zone3: zones[2],
            zone4: zones[3],
            zone5: zones[4],
        }
    }

    /// Zones 1 and 2 combined
    pub fn low_intensity(&self) -> f64 {
        self.zone1 + self.zone2
    }

    /// Zone 3
    pub fn moderate_intensity(&self) -> f64 {
        self.zone3
    }

    /// Zones 4 and 5 combined
    pub fn high_intensity(&self) -> f64 {
        self.zone4 + self.zone5
    }
}

/// Lightweight reference to an activity inside a week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRef {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A personal record reported by the upstream PR detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    /// When the record was set
    pub timestamp: DateTime<Utc>,
    /// Record category (e.g. "fastest_5k", "longest_ride")
    pub category: String,
    /// Record value in the category's unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
}

impl PersonalRecord {
    /// Calendar date of the record
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// A single activity as seen by the weekly aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub start_date: DateTime<Utc>,
    /// Duration in seconds
    pub duration_seconds: u64,
    /// Distance in meters
    #[serde(default)]
    pub distance_meters: Option<f64>,
    /// Elevation gain in meters
    #[serde(default)]
    pub elevation_gain: Option<f64>,
    /// Training stress score of the activity
    #[serde(default)]
    pub tss: Option<f64>,
    #[serde(default)]
    pub hr_zone_distribution: Option<HrZoneDistribution>,
}
