// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Default thresholds and fixed tables for phase detection and effectiveness scoring.
//! Values here seed [`PeriodizationConfig`](crate::config::PeriodizationConfig); the
//! pipeline itself only ever reads the config it is handed.

/// Per-week classification defaults
pub mod detection {
    /// Minimum number of weeks for a phase to stand on its own
    pub const DEFAULT_MIN_PHASE_WEEKS: usize = 2;

    /// Weekly volume bands in hours
    pub const VOLUME_LOW_HOURS: f64 = 5.0;
    pub const VOLUME_MEDIUM_HOURS: f64 = 8.0;
    pub const VOLUME_HIGH_HOURS: f64 = 12.0;

    /// Weekly TSS bands
    pub const TSS_LOW: f64 = 150.0;
    pub const TSS_MEDIUM: f64 = 300.0;
    pub const TSS_HIGH: f64 = 500.0;

    /// Classifier vote weights in the consensus
    pub const WEIGHT_VOLUME: f64 = 0.3;
    pub const WEIGHT_INTENSITY: f64 = 0.4;
    pub const WEIGHT_TSS: f64 = 0.3;

    /// Look-back window for per-week trends
    pub const TREND_MIN_LOOKBACK_WEEKS: usize = 2;
    pub const TREND_MAX_LOOKBACK_WEEKS: usize = 4;

    /// Relative volume change that counts as a trend (10%)
    pub const VOLUME_TREND_THRESHOLD: f64 = 0.10;

    /// Absolute CTL change that counts as a trend
    pub const CTL_TREND_THRESHOLD: f64 = 3.0;

    /// Weights of the per-method confidences in a segment's confidence
    pub const SEGMENT_VOLUME_CONFIDENCE_WEIGHT: f64 = 0.30;
    pub const SEGMENT_INTENSITY_CONFIDENCE_WEIGHT: f64 = 0.40;
    pub const SEGMENT_TSS_CONFIDENCE_WEIGHT: f64 = 0.30;

    /// Segments shorter than this have their confidence scaled down
    pub const FULL_CONFIDENCE_WEEKS: f64 = 4.0;
}

/// Enrichment defaults
pub mod enrichment {
    /// Relative first-half/second-half change that counts as a trend
    pub const HALF_SPLIT_TREND_THRESHOLD: f64 = 0.10;

    /// Absolute first-half/second-half TSB change that counts as a trend
    pub const TSB_TREND_THRESHOLD: f64 = 3.0;

    /// TSB below this marks a week as overreaching
    pub const OVERREACHING_TSB: f64 = -30.0;

    /// Days counted per overreaching week
    pub const DAYS_PER_OVERREACHING_WEEK: u32 = 7;
}

/// Effectiveness scoring defaults
pub mod scoring {
    /// Minimum base/build lengths when no target model is supplied
    pub const DEFAULT_MIN_BASE_WEEKS: usize = 6;
    pub const DEFAULT_MIN_BUILD_WEEKS: usize = 4;

    /// Phase duration range when no target model is supplied
    pub const DEFAULT_PHASE_MIN_WEEKS: usize = 2;
    pub const DEFAULT_PHASE_MAX_WEEKS: usize = 16;

    /// Week-over-week volume change above this percentage is a rapid increase
    pub const RAPID_VOLUME_INCREASE_PCT: f64 = 15.0;

    /// Below this many weeks the recovery frequency check has too little data
    pub const MIN_WEEKS_FOR_RECOVERY_FREQUENCY: usize = 8;

    /// TSB above this marks a week as adequately recovered
    pub const ADEQUATE_RECOVERY_TSB: f64 = 15.0;

    /// Sub-score weights with form management present
    pub const WEIGHTS_WITH_FORM: [f64; 5] = [0.18, 0.22, 0.22, 0.26, 0.12];

    /// Sub-score weights without form management
    pub const WEIGHTS_WITHOUT_FORM: [f64; 4] = [0.20, 0.25, 0.25, 0.30];

    /// Upper bound (exclusive) on weeks per CTL point and the resulting score
    pub const CTL_GAIN_BANDS: [(f64, f64); 6] = [
        (0.25, 40.0),
        (0.5, 75.0),
        (0.8, 95.0),
        (1.0, 90.0),
        (2.0, 80.0),
        (3.0, 70.0),
    ];
    pub const CTL_GAIN_BEYOND_SCORE: f64 = 60.0;
    pub const CTL_GAIN_NEGATIVE_SCORE: f64 = 30.0;
    pub const CTL_GAIN_ZERO_SCORE: f64 = 50.0;

    /// Optimal average TSB per phase: base, build, peak, taper, recovery, transition
    pub const OPTIMAL_TSB: [f64; 6] = [0.0, -10.0, 15.0, 18.0, 20.0, 10.0];
}

/// Training load model defaults
pub mod training_load {
    /// Chronic training load time constant in days
    pub const CTL_WINDOW_DAYS: f64 = 42.0;

    /// Acute training load time constant in days
    pub const ATL_WINDOW_DAYS: f64 = 7.0;
}

/// Environment variable names recognized by the config loader
pub mod env_config {
    pub const CONFIG_PATH: &str = "PERIODIZATION_CONFIG";
    pub const MIN_PHASE_WEEKS: &str = "PERIODIZATION_MIN_PHASE_WEEKS";
    pub const TARGET_MODEL: &str = "PERIODIZATION_TARGET_MODEL";
    pub const ANALYZE_FORM: &str = "PERIODIZATION_ANALYZE_FORM";
}
