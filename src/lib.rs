// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Pierre Periodization
//!
//! Training periodization analysis over weekly training-load summaries.
//! Given a chronological series of weeks, the engine segments the timeline
//! into labeled training phases (base, build, peak, taper, recovery,
//! transition) and scores how well that periodization was executed.
//!
//! ## Features
//!
//! - **Hybrid phase detection**: volume, intensity and TSS classifiers vote per week
//! - **Consensus segmentation**: minimum phase length and legal transitions enforced
//! - **Phase enrichment**: load trends, personal records, heart rate and form profiles
//! - **Effectiveness scoring**: structure, progression, recovery, performance and
//!   form management combined into a letter grade with findings
//!
//! ## Architecture
//!
//! - **Models**: weekly metrics, personal records, activity summaries
//! - **Intelligence**: classifiers, segmenter, enricher, scorers and their collaborators
//! - **Config**: thresholds, target models and environment overrides
//!
//! The analysis is synchronous and deterministic: the same weeks and config
//! always produce the same phases and scores.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_periodization::config::PeriodizationConfig;
//! use pierre_periodization::intelligence::{EffectivenessScorer, PhaseDetector};
//! use pierre_periodization::models::WeeklyMetric;
//!
//! fn main() -> anyhow::Result<()> {
//!     let json = std::fs::read_to_string("weeks.json")?;
//!     let weeks: Vec<WeeklyMetric> = serde_json::from_str(&json)?;
//!
//!     let config = PeriodizationConfig::default();
//!     let phases = PhaseDetector::new(config.clone()).detect(&weeks, None);
//!     let analysis = EffectivenessScorer::new(config).analyze(&phases, &weeks);
//!
//!     println!("{} ({})", analysis.overall_score, analysis.grade);
//!     Ok(())
//! }
//! ```

/// Input data models
pub mod models;

/// Configuration management and persistence
pub mod config;

/// Default thresholds and fixed tables
pub mod constants;

/// Phase detection, effectiveness scoring and their collaborators
pub mod intelligence;

/// Structured logging setup
pub mod logging;
