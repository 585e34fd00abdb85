// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Training Block Simulator
//!
//! Generates a deterministic base, build and taper block of activities, runs it
//! through load calculation, weekly aggregation, phase detection and
//! effectiveness scoring, and prints the resulting report as JSON.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use pierre_periodization::config::PeriodizationConfig;
use pierre_periodization::intelligence::{
    DetectedPhase, EffectivenessAnalysis, EffectivenessScorer, PhaseDetector,
    TrainingLoadCalculator, WeeklyAggregator,
};
use pierre_periodization::logging;
use pierre_periodization::models::{ActivitySummary, HrZoneDistribution, WeeklyMetric};

#[derive(Parser, Debug)]
#[command(name = "simulate-training-block")]
#[command(about = "Simulate a base/build/taper block and analyze it")]
struct Args {
    /// Monday the simulated block starts on
    #[arg(long, default_value = "2024-01-01")]
    start: NaiveDate,

    /// Weeks of base training
    #[arg(long, default_value_t = 6)]
    base_weeks: u32,

    /// Weeks of build training
    #[arg(long, default_value_t = 4)]
    build_weeks: u32,

    /// Weeks of taper
    #[arg(long, default_value_t = 2)]
    taper_weeks: u32,

    /// Also write the aggregated weekly metrics to this file
    #[arg(long)]
    weeks_output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

/// Shape of one simulated week
struct WeekPlan {
    label: &'static str,
    hours: f64,
    tss_per_hour: f64,
    zones: [f64; 5],
}

const BASE_ZONES: [f64; 5] = [45.0, 42.0, 8.0, 4.0, 1.0];
const BUILD_ZONES: [f64; 5] = [30.0, 35.0, 15.0, 15.0, 5.0];
const TAPER_ZONES: [f64; 5] = [20.0, 25.0, 40.0, 12.0, 3.0];

/// Share of the weekly hours done on each weekday, Monday and Friday off
const SESSION_SPLIT: [(Weekday, f64); 5] = [
    (Weekday::Tue, 0.15),
    (Weekday::Wed, 0.20),
    (Weekday::Thu, 0.15),
    (Weekday::Sat, 0.30),
    (Weekday::Sun, 0.20),
];

#[derive(Serialize)]
struct SimulationReport {
    weeks: usize,
    phases: Vec<DetectedPhase>,
    effectiveness: EffectivenessAnalysis,
}

fn plan_block(args: &Args) -> Vec<WeekPlan> {
    let base = (0..args.base_weeks).map(|i| WeekPlan {
        label: "base",
        hours: 5.5 + 0.4 * f64::from(i),
        tss_per_hour: 50.0,
        zones: BASE_ZONES,
    });

    let build = (0..args.build_weeks).map(|i| WeekPlan {
        label: "build",
        hours: 10.0 + 0.3 * f64::from(i),
        tss_per_hour: 70.0,
        zones: BUILD_ZONES,
    });

    let peak_hours = 10.0 + 0.3 * f64::from(args.build_weeks.saturating_sub(1));
    let taper = (0..args.taper_weeks).map(move |i| WeekPlan {
        label: "taper",
        hours: peak_hours * 0.75_f64.powi(i32::try_from(i + 1).unwrap_or(i32::MAX)),
        tss_per_hour: 45.0,
        zones: TAPER_ZONES,
    });

    base.chain(build).chain(taper).collect()
}

fn simulate_activities(start: NaiveDate, plan: &[WeekPlan]) -> Result<Vec<ActivitySummary>> {
    let monday = WeeklyAggregator::week_start(start);
    let mut activities = Vec::new();

    for (week_index, week) in plan.iter().enumerate() {
        let week_monday = monday + Duration::weeks(i64::try_from(week_index)?);

        for (weekday, share) in SESSION_SPLIT {
            let date = week_monday + Duration::days(i64::from(weekday.num_days_from_monday()));
            let hours = week.hours * share;
            let start_date = date
                .and_hms_opt(7, 0, 0)
                .context("Invalid session start time")?
                .and_utc();

            activities.push(ActivitySummary {
                id: format!("sim-{}-{}", date, weekday),
                name: Some(format!("{} {} session", week.label, date.weekday())),
                start_date,
                duration_seconds: (hours * 3600.0).round() as u64,
                distance_meters: Some(hours * 28_000.0),
                elevation_gain: Some(hours * 150.0),
                tss: Some(hours * week.tss_per_hour),
                hr_zone_distribution: Some(HrZoneDistribution::from_array(week.zones)),
            });
        }
    }

    Ok(activities)
}

fn main() -> Result<()> {
    logging::init_from_env()?;

    let args = Args::parse();
    let plan = plan_block(&args);
    let activities = simulate_activities(args.start, &plan)?;

    let daily_tss: Vec<(NaiveDate, f64)> = activities
        .iter()
        .map(|a| (a.start_date.date_naive(), a.tss.unwrap_or(0.0)))
        .collect();
    let loads = TrainingLoadCalculator::new().calculate_history(&daily_tss);
    let weeks: Vec<WeeklyMetric> = WeeklyAggregator::new().aggregate(&activities, &loads);

    info!(
        activities.count = activities.len(),
        weeks.count = weeks.len(),
        "Simulated training block"
    );

    if let Some(path) = &args.weeks_output {
        let content = serde_json::to_string_pretty(&weeks).context("Failed to serialize weekly metrics")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write weekly metrics: {}", path.display()))?;
    }

    let config = PeriodizationConfig::default();
    let phases = PhaseDetector::new(config.clone()).detect(&weeks, None);
    let effectiveness = EffectivenessScorer::new(config).analyze(&phases, &weeks);

    let report = SimulationReport {
        weeks: weeks.len(),
        phases,
        effectiveness,
    };
    let output = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize simulation report")?;

    println!("{output}");
    Ok(())
}
