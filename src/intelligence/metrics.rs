//! Numeric helpers shared by the classifiers, the enricher and the scorers

use super::TrendDirection;
use crate::constants::detection;

/// Arithmetic mean, or `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Arithmetic mean, zero for an empty slice
pub fn mean_or_zero(values: &[f64]) -> f64 {
    mean(values).unwrap_or(0.0)
}

/// Clamp a score into 0-100
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Trend of the current value against a bounded look-back window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowTrend {
    pub direction: TrendDirection,
    /// Relative (volume) or absolute (CTL) change, when one could be computed
    pub change: Option<f64>,
    /// Fewer than the minimum look-back weeks were available
    pub early: bool,
}

impl WindowTrend {
    fn unavailable(early: bool) -> Self {
        Self {
            direction: TrendDirection::Stable,
            change: None,
            early,
        }
    }

    /// Whether a change value backs the direction
    pub fn is_established(&self) -> bool {
        self.change.is_some()
    }
}

/// Values of the weeks preceding `index`, at most the maximum look-back
fn lookback<F>(series_len: usize, index: usize, value: F) -> Option<Vec<f64>>
where
    F: Fn(usize) -> f64,
{
    debug_assert!(index < series_len);
    if index < detection::TREND_MIN_LOOKBACK_WEEKS {
        return None;
    }
    let start = index.saturating_sub(detection::TREND_MAX_LOOKBACK_WEEKS);
    Some((start..index).map(value).collect())
}

/// Percentage-change trend: `(current - avg(previous)) / avg(previous)`
///
/// A zero previous average yields a stable trend with no change value.
pub fn relative_window_trend<F>(series_len: usize, index: usize, threshold: f64, value: F) -> WindowTrend
where
    F: Fn(usize) -> f64,
{
    let Some(previous) = lookback(series_len, index, &value) else {
        return WindowTrend::unavailable(true);
    };

    let average = mean_or_zero(&previous);
    if average == 0.0 || !average.is_finite() {
        return WindowTrend::unavailable(false);
    }

    let change = (value(index) - average) / average;
    WindowTrend {
        direction: direction_for(change, threshold),
        change: Some(change),
        early: false,
    }
}

/// Absolute-change trend: `current - avg(previous)`
pub fn absolute_window_trend<F>(series_len: usize, index: usize, threshold: f64, value: F) -> WindowTrend
where
    F: Fn(usize) -> f64,
{
    let Some(previous) = lookback(series_len, index, &value) else {
        return WindowTrend::unavailable(true);
    };

    let change = value(index) - mean_or_zero(&previous);
    WindowTrend {
        direction: direction_for(change, threshold),
        change: Some(change),
        early: false,
    }
}

fn direction_for(change: f64, threshold: f64) -> TrendDirection {
    if change > threshold {
        TrendDirection::Increasing
    } else if change < -threshold {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// Compare the averages of the first and second halves of a series
///
/// With an odd length the middle value belongs to the second half.
/// The change is relative when `relative` is set, absolute otherwise.
pub fn half_split_trend(values: &[f64], threshold: f64, relative: bool) -> TrendDirection {
    if values.len() < 2 {
        return TrendDirection::Stable;
    }

    let (first, second) = values.split_at(values.len() / 2);
    let first_avg = mean_or_zero(first);
    let second_avg = mean_or_zero(second);

    let change = if relative {
        if first_avg == 0.0 {
            return TrendDirection::Stable;
        }
        (second_avg - first_avg) / first_avg
    } else {
        second_avg - first_avg
    };

    direction_for(change, threshold)
}
