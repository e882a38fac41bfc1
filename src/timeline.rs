use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Weeks saved for every stage that can run alongside others.
pub const PARALLEL_DISCOUNT_WEEKS: f64 = 0.25;
/// The optimized schedule never drops below this share of the sequential one.
pub const OPTIMIZED_FLOOR_RATIO: f64 = 0.75;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimelineStage {
    pub stage_name: String,
    /// Predicted duration in weeks.
    pub duration_weeks: f64,
    pub can_parallelize: bool,
    /// Names of stages that must finish first.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// Partial update of one stage, matched by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageAdjustment {
    pub stage_name: String,
    #[serde(default)]
    pub duration_weeks: Option<f64>,
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
    #[serde(default)]
    pub can_parallelize: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// What to do with an adjustment naming a stage the timeline does not have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedStagePolicy {
    #[default]
    Ignore,
    Warn,
    Reject,
}

impl FromStr for UnmatchedStagePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(UnmatchedStagePolicy::Ignore),
            "warn" => Ok(UnmatchedStagePolicy::Warn),
            "reject" => Ok(UnmatchedStagePolicy::Reject),
            other => Err(format!(
                "unknown unmatched-stage policy '{other}' (expected ignore, warn or reject)"
            )),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TimelineError {
    #[error("no stage named '{0}' in the timeline")]
    UnknownStage(String),
    #[error("stage '{stage}' has an invalid duration of {weeks} weeks")]
    InvalidDuration { stage: String, weeks: f64 },
    #[error("total duration of {stages} stages is not a finite number of weeks")]
    DurationOverflow { stages: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelizationOpportunity {
    pub stages: Vec<String>,
    pub savings_weeks: f64,
    pub feasibility: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub stages: Vec<TimelineStage>,
    pub sequential_weeks: f64,
    pub optimized_weeks: f64,
    pub time_saved_weeks: f64,
    pub critical_path: Vec<String>,
    pub parallelization_opportunities: Vec<ParallelizationOpportunity>,
}

fn check_duration(stage: &str, weeks: f64) -> Result<(), TimelineError> {
    if weeks.is_finite() && weeks >= 0.0 {
        Ok(())
    } else {
        Err(TimelineError::InvalidDuration {
            stage: stage.to_string(),
            weeks,
        })
    }
}

impl Timeline {
    /// Builds a timeline and derives every aggregate from the stage list.
    pub fn from_stages(stages: Vec<TimelineStage>) -> Result<Self, TimelineError> {
        for stage in &stages {
            check_duration(&stage.stage_name, stage.duration_weeks)?;
        }

        let sequential_weeks: f64 = stages.iter().map(|s| s.duration_weeks).sum();
        if !sequential_weeks.is_finite() {
            return Err(TimelineError::DurationOverflow {
                stages: stages.len(),
            });
        }
        let parallel_count = stages.iter().filter(|s| s.can_parallelize).count();
        let optimized_weeks = (sequential_weeks - PARALLEL_DISCOUNT_WEEKS * parallel_count as f64)
            .max(sequential_weeks * OPTIMIZED_FLOOR_RATIO);
        let time_saved_weeks = sequential_weeks - optimized_weeks;

        let critical_path = stages
            .iter()
            .filter(|s| !s.can_parallelize)
            .map(|s| s.stage_name.clone())
            .collect();
        let parallelization_opportunities = find_parallel_runs(&stages);

        Ok(Self {
            stages,
            sequential_weeks,
            optimized_weeks,
            time_saved_weeks,
            critical_path,
            parallelization_opportunities,
        })
    }

    pub fn apply_adjustments(
        &self,
        adjustments: &[StageAdjustment],
        policy: UnmatchedStagePolicy,
    ) -> Result<Self, TimelineError> {
        recalculate(&self.stages, adjustments, policy)
    }
}

/// Consecutive runs of at least two parallelizable stages.
fn find_parallel_runs(stages: &[TimelineStage]) -> Vec<ParallelizationOpportunity> {
    let mut runs = Vec::new();
    let mut current: Vec<&TimelineStage> = Vec::new();

    let mut flush = |run: &mut Vec<&TimelineStage>| {
        if run.len() >= 2 {
            let names: Vec<String> = run.iter().map(|s| s.stage_name.clone()).collect();
            let depends_within_run = run
                .iter()
                .any(|s| s.dependencies.iter().any(|d| names.contains(d)));
            runs.push(ParallelizationOpportunity {
                savings_weeks: PARALLEL_DISCOUNT_WEEKS * run.len() as f64,
                feasibility: if depends_within_run { "low" } else { "high" }.to_string(),
                stages: names,
            });
        }
        run.clear();
    };

    for stage in stages {
        if stage.can_parallelize {
            current.push(stage);
        } else {
            flush(&mut current);
        }
    }
    flush(&mut current);
    runs
}

/// Applies `adjustments` to a copy of `stages` and recomputes the aggregates.
pub fn recalculate(
    stages: &[TimelineStage],
    adjustments: &[StageAdjustment],
    policy: UnmatchedStagePolicy,
) -> Result<Timeline, TimelineError> {
    let mut updated = stages.to_vec();

    for adjustment in adjustments {
        let Some(stage) = updated
            .iter_mut()
            .find(|s| s.stage_name == adjustment.stage_name)
        else {
            match policy {
                UnmatchedStagePolicy::Ignore => {}
                UnmatchedStagePolicy::Warn => {
                    warn!(stage = %adjustment.stage_name, "ignoring adjustment for unknown stage");
                }
                UnmatchedStagePolicy::Reject => {
                    return Err(TimelineError::UnknownStage(adjustment.stage_name.clone()));
                }
            }
            continue;
        };

        if let Some(weeks) = adjustment.duration_weeks {
            check_duration(&adjustment.stage_name, weeks)?;
            stage.duration_weeks = weeks;
        }
        if let Some(dependencies) = &adjustment.dependencies {
            stage.dependencies = dependencies.clone();
        }
        if let Some(can_parallelize) = adjustment.can_parallelize {
            stage.can_parallelize = can_parallelize;
        }
        if let Some(notes) = &adjustment.notes {
            stage.notes = notes.clone();
        }
    }

    Timeline::from_stages(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(name: &str, weeks: f64, parallel: bool) -> TimelineStage {
        TimelineStage {
            stage_name: name.to_string(),
            duration_weeks: weeks,
            can_parallelize: parallel,
            dependencies: vec![],
            tasks: vec![],
            notes: String::new(),
        }
    }

    #[test]
    fn one_parallel_stage_saves_a_quarter_week() {
        let timeline = Timeline::from_stages(vec![stage("A", 2.0, false), stage("B", 3.0, true)]).unwrap();
        assert_eq!(timeline.sequential_weeks, 5.0);
        assert_eq!(timeline.optimized_weeks, 4.75);
        assert_eq!(timeline.time_saved_weeks, 0.25);
        assert_eq!(timeline.critical_path, vec!["A".to_string()]);
    }

    #[test]
    fn no_parallel_stages_means_no_savings() {
        let timeline = Timeline::from_stages(vec![stage("A", 2.0, false), stage("B", 3.0, false)]).unwrap();
        assert_eq!(timeline.optimized_weeks, timeline.sequential_weeks);
        assert_eq!(timeline.time_saved_weeks, 0.0);
        assert!(timeline.parallelization_opportunities.is_empty());
    }

    #[test]
    fn optimized_duration_is_floored_at_three_quarters() {
        // Eight half-week parallel stages: a 2.0 week discount exceeds the 25% cap.
        let stages: Vec<_> = (0..8).map(|i| stage(&format!("S{i}"), 0.5, true)).collect();
        let timeline = Timeline::from_stages(stages).unwrap();
        assert_eq!(timeline.sequential_weeks, 4.0);
        assert_eq!(timeline.optimized_weeks, 3.0);
        assert_eq!(timeline.time_saved_weeks, 1.0);
        assert!(timeline.optimized_weeks <= timeline.sequential_weeks);
    }

    #[test]
    fn overflowing_total_duration_is_rejected() {
        let err = Timeline::from_stages(vec![stage("A", 1e308, false), stage("B", 1e308, true)])
            .unwrap_err();
        assert_eq!(err, TimelineError::DurationOverflow { stages: 2 });

        let stages = vec![stage("A", 1e308, false), stage("B", 1.0, true)];
        let adjustments = vec![StageAdjustment {
            stage_name: "B".to_string(),
            duration_weeks: Some(1e308),
            ..Default::default()
        }];
        let err = recalculate(&stages, &adjustments, UnmatchedStagePolicy::Ignore).unwrap_err();
        assert!(matches!(err, TimelineError::DurationOverflow { .. }));
    }

    #[test]
    fn empty_timeline_is_all_zero() {
        let timeline = Timeline::from_stages(vec![]).unwrap();
        assert_eq!(timeline.sequential_weeks, 0.0);
        assert_eq!(timeline.optimized_weeks, 0.0);
        assert_eq!(timeline.time_saved_weeks, 0.0);
    }

    #[test]
    fn adjustment_updates_matching_stage() {
        let stages = vec![stage("Sourcing", 4.0, false), stage("Testing", 6.0, false)];
        let adjustments = vec![StageAdjustment {
            stage_name: "Testing".to_string(),
            duration_weeks: Some(3.0),
            can_parallelize: Some(true),
            notes: Some("outsourced lab".to_string()),
            ..Default::default()
        }];
        let timeline = recalculate(&stages, &adjustments, UnmatchedStagePolicy::Ignore).unwrap();
        assert_eq!(timeline.sequential_weeks, 7.0);
        assert_eq!(timeline.optimized_weeks, 6.75);
        assert_eq!(timeline.stages[1].notes, "outsourced lab");
        // Input is untouched.
        assert_eq!(stages[1].duration_weeks, 6.0);
    }

    #[test]
    fn unknown_stage_is_ignored_by_default() {
        let stages = vec![stage("A", 2.0, false), stage("B", 3.0, true)];
        let before = Timeline::from_stages(stages.clone()).unwrap();
        let adjustments = vec![StageAdjustment {
            stage_name: "Launch".to_string(),
            duration_weeks: Some(10.0),
            ..Default::default()
        }];
        let after = recalculate(&stages, &adjustments, UnmatchedStagePolicy::Ignore).unwrap();
        assert_eq!(before, after);
        let warned = recalculate(&stages, &adjustments, UnmatchedStagePolicy::Warn).unwrap();
        assert_eq!(before, warned);
    }

    #[test]
    fn unknown_stage_is_rejected_when_strict() {
        let stages = vec![stage("A", 2.0, false)];
        let adjustments = vec![StageAdjustment {
            stage_name: "Typo".to_string(),
            ..Default::default()
        }];
        let err = recalculate(&stages, &adjustments, UnmatchedStagePolicy::Reject).unwrap_err();
        assert_eq!(err, TimelineError::UnknownStage("Typo".to_string()));
    }

    #[test]
    fn negative_durations_are_rejected() {
        assert!(matches!(
            Timeline::from_stages(vec![stage("A", -1.0, false)]),
            Err(TimelineError::InvalidDuration { .. })
        ));
        let adjustments = vec![StageAdjustment {
            stage_name: "A".to_string(),
            duration_weeks: Some(-2.0),
            ..Default::default()
        }];
        assert!(recalculate(&[stage("A", 1.0, false)], &adjustments, UnmatchedStagePolicy::Ignore).is_err());
    }

    #[test]
    fn consecutive_parallel_stages_form_an_opportunity() {
        let mut packaging = stage("Packaging", 2.0, true);
        packaging.dependencies = vec!["Labeling".to_string()];
        let stages = vec![
            stage("Sourcing", 4.0, false),
            stage("Labeling", 1.0, true),
            packaging,
            stage("Launch", 1.0, false),
            stage("PR", 1.0, true),
        ];
        let timeline = Timeline::from_stages(stages).unwrap();
        assert_eq!(timeline.parallelization_opportunities.len(), 1);
        let run = &timeline.parallelization_opportunities[0];
        assert_eq!(run.stages, vec!["Labeling".to_string(), "Packaging".to_string()]);
        assert_eq!(run.savings_weeks, 0.5);
        assert_eq!(run.feasibility, "low");
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("WARN".parse::<UnmatchedStagePolicy>(), Ok(UnmatchedStagePolicy::Warn));
        assert!("strict".parse::<UnmatchedStagePolicy>().is_err());
    }
}
