// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Training load calculations (CTL/ATL/TSB)
//!
//! Performance-management model over a daily TSS series:
//! - CTL (Chronic Training Load): 42-day exponentially weighted moving average
//! - ATL (Acute Training Load): 7-day exponentially weighted moving average
//! - TSB (Training Stress Balance): CTL - ATL
//!
//! Each day applies `x = x + (tss - x) / window`. Days without training are
//! filled in with zero TSS so the decay stays continuous.

use crate::constants::training_load::{ATL_WINDOW_DAYS, CTL_WINDOW_DAYS};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Training load values for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyLoad {
    pub date: NaiveDate,
    /// Total TSS for the day
    pub tss: f64,
    pub ctl: f64,
    pub atl: f64,
    pub tsb: f64,
}

/// Fitness and fatigue carried from one day to the next
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadState {
    pub ctl: f64,
    pub atl: f64,
}

/// Calculator for training load metrics
#[derive(Debug, Clone, Copy)]
pub struct TrainingLoadCalculator {
    ctl_window_days: f64,
    atl_window_days: f64,
}

impl Default for TrainingLoadCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingLoadCalculator {
    /// Calculator with the standard 42/7-day windows
    pub const fn new() -> Self {
        Self {
            ctl_window_days: CTL_WINDOW_DAYS,
            atl_window_days: ATL_WINDOW_DAYS,
        }
    }

    /// Calculator with custom window sizes
    pub const fn with_windows(ctl_days: f64, atl_days: f64) -> Self {
        Self {
            ctl_window_days: ctl_days,
            atl_window_days: atl_days,
        }
    }

    /// Advance the state by one day of training
    pub fn step(&self, previous: LoadState, tss: f64) -> LoadState {
        LoadState {
            ctl: previous.ctl + (tss - previous.ctl) / self.ctl_window_days,
            atl: previous.atl + (tss - previous.atl) / self.atl_window_days,
        }
    }

    /// CTL/ATL/TSB for every day from the first to the last date in `daily_tss`
    ///
    /// Entries may arrive unsorted and may repeat a date; repeated dates are summed.
    pub fn calculate_history(&self, daily_tss: &[(NaiveDate, f64)]) -> Vec<DailyLoad> {
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for (date, tss) in daily_tss {
            *by_date.entry(*date).or_insert(0.0) += tss;
        }

        let (Some(first), Some(last)) = (
            by_date.keys().next().copied(),
            by_date.keys().next_back().copied(),
        ) else {
            return Vec::new();
        };

        let days = (last - first).num_days();
        let mut history = Vec::with_capacity(usize::try_from(days + 1).unwrap_or(0));
        let mut state = LoadState::default();

        for offset in 0..=days {
            let date = first + Duration::days(offset);
            let tss = by_date.get(&date).copied().unwrap_or(0.0);
            state = self.step(state, tss);
            history.push(DailyLoad {
                date,
                tss,
                ctl: state.ctl,
                atl: state.atl,
                tsb: calculate_tsb(state.ctl, state.atl),
            });
        }

        history
    }

    /// Final day's load, if any
    pub fn current_load(&self, daily_tss: &[(NaiveDate, f64)]) -> Option<DailyLoad> {
        self.calculate_history(daily_tss).last().copied()
    }
}

/// Training Stress Balance: positive is fresh, negative is fatigued
pub const fn calculate_tsb(ctl: f64, atl: f64) -> f64 {
    ctl - atl
}
