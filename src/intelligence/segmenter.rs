// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Consensus segmentation
//!
//! Turns the per-week votes into contiguous phase segments in three steps:
//!
//! 1. **Consensus**: weighted vote per week, ties going to the phase seen first
//!    (volume vote, then intensity, then TSS).
//! 2. **Fold**: a single left-to-right pass accumulating runs of equal labels.
//!    A run shorter than `min_phase_weeks` is absorbed into the previous
//!    finalized segment. A short leading run has nothing to join, so the next
//!    run starts from its first week instead.
//! 3. **Transition validation**: adjacent segments that form an illegal
//!    transition, or whose earlier half is too short, are merged under the
//!    label of the more confident segment until every pair is valid.
//!
//! Segments are index ranges into the weekly series; statistics are computed
//! later by the enricher over the final ranges.

use super::{ConfidenceBreakdown, SignalSource, TrainingPhase, WeekVotes};
use crate::config::{ConfidenceWeights, PeriodizationConfig};
use crate::constants::detection;
use tracing::{debug, trace};

/// A contiguous, inclusive range of week indices sharing one label
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub phase: TrainingPhase,
    pub start: usize,
    pub end: usize,
    /// Votes of the first week covered
    pub start_votes: WeekVotes,
}

impl Segment {
    fn new(phase: TrainingPhase, start: usize, end: usize, start_votes: WeekVotes) -> Self {
        Self {
            phase,
            start,
            end,
            start_votes,
        }
    }

    /// Number of weeks covered
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Per-method confidences from the start votes plus the duration factor
    pub fn confidence_breakdown(&self) -> ConfidenceBreakdown {
        ConfidenceBreakdown {
            volume_confidence: self.start_votes.volume.confidence,
            intensity_confidence: self.start_votes.intensity.confidence,
            tss_confidence: self.start_votes.tss.confidence,
            duration_confidence: self.duration_factor() * 100.0,
        }
    }

    /// `round(weighted start-week confidence) x min(1, weeks / 4)`
    pub fn confidence(&self) -> f64 {
        let votes = &self.start_votes;
        let weighted = votes.volume.confidence * detection::SEGMENT_VOLUME_CONFIDENCE_WEIGHT
            + votes.intensity.confidence * detection::SEGMENT_INTENSITY_CONFIDENCE_WEIGHT
            + votes.tss.confidence * detection::SEGMENT_TSS_CONFIDENCE_WEIGHT;
        (weighted.round() * self.duration_factor()).clamp(0.0, 100.0)
    }

    fn duration_factor(&self) -> f64 {
        (self.len() as f64 / detection::FULL_CONFIDENCE_WEEKS).min(1.0)
    }
}

/// Extend `earlier` over the weeks of `later`, keeping the earlier label
fn absorb(earlier: Segment, later: &Segment) -> Segment {
    Segment {
        end: later.end,
        ..earlier
    }
}

/// Merge an adjacent pair under the label of the more confident segment
///
/// Ties keep the earlier segment's label. The merged segment starts where
/// `earlier` does, so it keeps the earlier start votes.
fn merge_pair(earlier: &Segment, later: &Segment) -> Segment {
    let phase = if later.confidence() > earlier.confidence() {
        later.phase
    } else {
        earlier.phase
    };
    Segment::new(phase, earlier.start, later.end, earlier.start_votes.clone())
}

/// Weighted consensus label for one week
///
/// Scores accumulate in first-seen order and only a strictly greater score
/// displaces the current leader, so ties go to the earliest-seen phase.
pub fn consensus(votes: &WeekVotes, weights: &ConfidenceWeights) -> TrainingPhase {
    let mut scores: Vec<(TrainingPhase, f64)> = Vec::with_capacity(3);

    for (source, vote) in votes.ordered() {
        let weight = match source {
            SignalSource::Volume => weights.volume,
            SignalSource::Intensity => weights.intensity,
            SignalSource::Tss => weights.tss,
        };
        let contribution = vote.confidence * weight;
        match scores.iter_mut().find(|(phase, _)| *phase == vote.phase) {
            Some((_, score)) => *score += contribution,
            None => scores.push((vote.phase, contribution)),
        }
    }

    scores
        .into_iter()
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .map_or(votes.volume.phase, |(phase, _)| phase)
}

/// Runs consensus, fold and transition validation
pub struct Segmenter<'a> {
    config: &'a PeriodizationConfig,
}

impl<'a> Segmenter<'a> {
    pub fn new(config: &'a PeriodizationConfig) -> Self {
        Self { config }
    }

    /// Full segmentation of a vote series
    pub fn segment(&self, votes: &[WeekVotes]) -> Vec<Segment> {
        let labels: Vec<TrainingPhase> = votes
            .iter()
            .enumerate()
            .map(|(week, week_votes)| {
                let label = consensus(week_votes, &self.config.confidence_weights);
                trace!(week, phase = %label, "Consensus label");
                label
            })
            .collect();

        let folded = self.fold(&labels, votes);
        self.validate_transitions(folded)
    }

    /// Accumulate runs of equal labels into segments, absorbing short runs
    pub fn fold(&self, labels: &[TrainingPhase], votes: &[WeekVotes]) -> Vec<Segment> {
        let min_weeks = self.config.min_phase_weeks;
        let mut finalized: Vec<Segment> = Vec::new();
        let mut running: Option<Segment> = None;

        for (week, (&label, week_votes)) in labels.iter().zip(votes).enumerate() {
            match running.take() {
                Some(mut current) if current.phase == label => {
                    current.end = week;
                    running = Some(current);
                }
                Some(closed) => {
                    let next_start = match close_run(&mut finalized, closed, min_weeks) {
                        Closed::Held(start) => start,
                        Closed::Done => week,
                    };
                    let start_votes = votes.get(next_start).unwrap_or(week_votes).clone();
                    running = Some(Segment::new(label, next_start, week, start_votes));
                }
                None => {
                    running = Some(Segment::new(label, week, week, week_votes.clone()));
                }
            }
        }

        if let Some(last) = running {
            match finalized.pop() {
                Some(previous) if last.len() < min_weeks => {
                    debug!(
                        phase = %last.phase,
                        weeks = last.len(),
                        into = %previous.phase,
                        "Absorbing short trailing run"
                    );
                    finalized.push(absorb(previous, &last));
                }
                Some(previous) => {
                    finalized.push(previous);
                    finalized.push(last);
                }
                None => finalized.push(last),
            }
        }

        finalized
    }

    /// Merge adjacent pairs until every transition is legal
    pub fn validate_transitions(&self, mut segments: Vec<Segment>) -> Vec<Segment> {
        while let Some(i) = self.first_invalid_pair(&segments) {
            let merged = merge_pair(&segments[i], &segments[i + 1]);
            debug!(
                from = %segments[i].phase,
                to = %segments[i + 1].phase,
                merged = %merged.phase,
                "Merging invalid transition"
            );
            segments[i] = merged;
            segments.remove(i + 1);
        }
        segments
    }

    fn first_invalid_pair(&self, segments: &[Segment]) -> Option<usize> {
        segments.windows(2).position(|pair| {
            !self.config.transitions.is_allowed(pair[0].phase, pair[1].phase)
                || pair[0].len() < self.config.min_phase_weeks
        })
    }
}

enum Closed {
    /// Short leading run; the next run starts at this week
    Held(usize),
    Done,
}

fn close_run(finalized: &mut Vec<Segment>, closed: Segment, min_weeks: usize) -> Closed {
    if closed.len() >= min_weeks {
        finalized.push(closed);
        return Closed::Done;
    }

    match finalized.pop() {
        Some(previous) => {
            debug!(
                phase = %closed.phase,
                weeks = closed.len(),
                into = %previous.phase,
                "Absorbing short run"
            );
            finalized.push(absorb(previous, &closed));
            Closed::Done
        }
        None => Closed::Held(closed.start),
    }
}
