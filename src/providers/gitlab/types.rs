use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Pipeline status as reported by the GitLab REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Created,
    WaitingForResource,
    Preparing,
    Pending,
    Running,
    Success,
    Failed,
    Canceling,
    Canceled,
    Skipped,
    Manual,
    Scheduled,
    /// Any status this build does not know about yet
    #[serde(other)]
    Unknown,
}

impl PipelineStatus {
    /// Whether a cancel request has been accepted for the pipeline.
    pub fn is_cancelled(self) -> bool {
        matches!(self, Self::Canceling | Self::Canceled)
    }
}

/// One entry of the `GET /projects/:id/pipelines` list.
///
/// Also the shape returned by `POST /projects/:id/pipelines/:pipeline_id/cancel`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineSummary {
    /// Numeric pipeline id, unique per instance
    pub id: u64,
    /// Commit the pipeline was created for
    pub sha: String,
    /// Branch or tag name
    #[serde(rename = "ref")]
    pub ref_: String,
    pub status: PipelineStatus,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The subset of `GET /projects/:id/pipelines/:pipeline_id` we rely on.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineDetail {
    pub id: u64,
    #[serde(rename = "ref")]
    pub ref_: String,
    pub sha: String,
    pub status: PipelineStatus,
}
