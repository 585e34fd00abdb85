// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use pierre_periodization::config::{self, TargetModelType};
use pierre_periodization::intelligence::{
    DetectedPhase, EffectivenessAnalysis, EffectivenessScorer, PhaseDetector,
};
use pierre_periodization::logging;
use pierre_periodization::models::{PersonalRecord, WeeklyMetric};

#[derive(Parser, Debug)]
#[command(author, version, about = "Detect training phases and score periodization effectiveness", long_about = None)]
struct Args {
    /// JSON array of weekly metrics, oldest first
    #[arg(short, long)]
    weeks: PathBuf,

    /// JSON array of personal records
    #[arg(short, long)]
    records: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target periodization model (linear, undulating, block, polarized)
    #[arg(short, long)]
    target_model: Option<TargetModelType>,

    /// Skip effectiveness scoring
    #[arg(long)]
    phases_only: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct Report {
    phases: Vec<DetectedPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    effectiveness: Option<EffectivenessAnalysis>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", what, path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} file: {}", what, path.display()))
}

fn main() -> Result<()> {
    logging::init_from_env()?;

    let args = Args::parse();

    let (mut config, _source) = config::load(args.config.as_deref())?;
    if let Some(model) = args.target_model {
        config = config.with_target_model(model);
    }

    let weeks: Vec<WeeklyMetric> = read_json(&args.weeks, "weekly metrics")?;
    let records: Option<Vec<PersonalRecord>> = args
        .records
        .as_deref()
        .map(|path| read_json(path, "personal records"))
        .transpose()?;

    info!(
        weeks.count = weeks.len(),
        records.count = records.as_ref().map_or(0, Vec::len),
        "Analyzing training history"
    );

    let phases = PhaseDetector::new(config.clone()).detect(&weeks, records.as_deref());
    let effectiveness = (!args.phases_only).then(|| EffectivenessScorer::new(config).analyze(&phases, &weeks));

    let report = Report { phases, effectiveness };
    let output = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize report")?;

    println!("{output}");
    Ok(())
}
