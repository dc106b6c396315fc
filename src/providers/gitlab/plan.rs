use std::collections::HashSet;
use std::fmt;

use super::types::PipelineSummary;

/// Why a running pipeline is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Built for the newest commit on the ref
    LatestCommit,
    /// The pipeline this tool is running in
    CurrentPipeline,
    /// Same id already planned earlier in the list
    Duplicate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LatestCommit => "latest commit",
            Self::CurrentPipeline => "current pipeline",
            Self::Duplicate => "duplicate entry",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Cancel,
    Skip(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAction {
    pub pipeline_id: u64,
    pub sha: String,
    pub web_url: Option<String>,
    pub decision: Decision,
}

/// Decides, in API order, what happens to each running pipeline.
///
/// A pipeline is cancelled unless it was built for `latest_sha` or is the
/// pipeline identified by `current_pipeline_id`. Ids are compared in their
/// decimal string form since that is how CI hands the current id over.
pub fn plan_cancellations(
    running: &[PipelineSummary],
    latest_sha: &str,
    current_pipeline_id: &str,
) -> Vec<PlannedAction> {
    let mut seen = HashSet::new();

    running
        .iter()
        .map(|pipeline| {
            let decision = if !seen.insert(pipeline.id) {
                Decision::Skip(SkipReason::Duplicate)
            } else if pipeline.id.to_string() == current_pipeline_id {
                Decision::Skip(SkipReason::CurrentPipeline)
            } else if pipeline.sha == latest_sha {
                Decision::Skip(SkipReason::LatestCommit)
            } else {
                Decision::Cancel
            };

            PlannedAction {
                pipeline_id: pipeline.id,
                sha: pipeline.sha.clone(),
                web_url: pipeline.web_url.clone(),
                decision,
            }
        })
        .collect()
}
