use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tokio::fs;

use crate::timeline::{recalculate, StageAdjustment, Timeline, TimelineStage, UnmatchedStagePolicy};

pub async fn read_text_file(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file '{}'", path.display()))?;
    if content.trim().is_empty() {
        anyhow::bail!("File '{}' is empty", path.display());
    }
    Ok(content)
}

pub async fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_text_file(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("File '{}' does not hold the expected JSON", path.display()))
}

/// Loads stages (and optional adjustments) from disk and recalculates them.
pub async fn recalculate_from_files(
    stages_path: &Path,
    adjustments_path: Option<&Path>,
    policy: UnmatchedStagePolicy,
) -> Result<Timeline> {
    let stages: Vec<TimelineStage> = read_json_file(stages_path).await?;
    let adjustments: Vec<StageAdjustment> = match adjustments_path {
        Some(path) => read_json_file(path).await?,
        None => Vec::new(),
    };
    recalculate(&stages, &adjustments, policy).context("Timeline recalculation failed")
}
