use log::{debug, info, warn};

use crate::config::{CancelPolicy, MAX_PAGE_SIZE};
use crate::context::ExecutionContext;
use crate::error::{CiPruneError, Result};

use super::client::{decode, GitLabClient, PipelineQuery};
use super::plan::{plan_cancellations, Decision, SkipReason};
use super::types::{PipelineStatus, PipelineSummary};

/// Knobs that change how cancellation behaves, independent of which pipeline
/// is running.
#[derive(Debug, Clone, Copy)]
pub struct CancelOptions {
    pub policy: CancelPolicy,
    pub dry_run: bool,
    pub running_page_size: usize,
}

impl Default for CancelOptions {
    fn default() -> Self {
        Self {
            policy: CancelPolicy::FireAndForget,
            dry_run: false,
            running_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// What happened to one running pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Ignored(SkipReason),
    /// Cancel request sent. `confirmed` is only set under `CancelPolicy::Verify`.
    Canceled {
        response: String,
        confirmed: Option<bool>,
    },
    WouldCancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub pipeline_id: u64,
    pub sha: String,
    pub web_url: Option<String>,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub reference: String,
    pub latest_sha: String,
    pub entries: Vec<ReportEntry>,
}

impl RunReport {
    /// Ids a cancel request was sent for, in order.
    pub fn canceled_ids(&self) -> Vec<u64> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.action, Action::Canceled { .. }))
            .map(|entry| entry.pipeline_id)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No pipeline is running on the ref; nothing was cancelled.
    NothingToCancel { reference: String },
    Completed(RunReport),
}

/// Cancels running pipelines superseded by a newer commit on the same ref.
///
/// The current pipeline and every pipeline built for the latest commit on the
/// ref are always left running. Requests are issued one at a time and any
/// failure aborts the run; nothing is retried.
pub struct PipelineCanceller<'a> {
    client: GitLabClient,
    context: &'a ExecutionContext,
    options: CancelOptions,
}

impl<'a> PipelineCanceller<'a> {
    /// # Errors
    ///
    /// Returns an error if the API URL cannot be built from `base_url`.
    pub fn new(base_url: &str, context: &'a ExecutionContext, options: CancelOptions) -> Result<Self> {
        let client = GitLabClient::new(base_url, &context.project_id, context.token.clone())?;

        Ok(Self {
            client,
            context,
            options,
        })
    }

    /// Ref of the current pipeline, read from the API.
    ///
    /// `CI_COMMIT_REF_NAME` is not used because it differs from the pipeline
    /// ref for detached merge request pipelines.
    pub async fn resolve_current_reference(&self) -> Result<String> {
        info!("Getting ref from current pipeline");
        let detail = self.client.fetch_pipeline(&self.context.pipeline_id).await?;
        debug!(
            "Current pipeline {} is {:?} on {} ({})",
            detail.id, detail.status, detail.ref_, detail.sha
        );
        Ok(detail.ref_)
    }

    pub async fn fetch_running_pipelines(&self, reference: &str) -> Result<Vec<PipelineSummary>> {
        info!("Getting list of running pipelines for ref: {reference}");
        let running = self
            .client
            .list_pipelines(PipelineQuery {
                ref_: reference,
                status: Some(PipelineStatus::Running),
                per_page: self.options.running_page_size,
            })
            .await?;

        for pipeline in &running {
            debug!(
                "Running pipeline {} on {} for {} created at {}",
                pipeline.id,
                pipeline.ref_,
                pipeline.sha,
                pipeline
                    .created_at
                    .map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339())
            );
        }

        Ok(running)
    }

    /// Sha of the newest pipeline on `reference`, whatever its status.
    pub async fn resolve_latest_sha(&self, reference: &str) -> Result<String> {
        info!("Getting latest pipeline for ref: {reference}");
        let latest = self
            .client
            .list_pipelines(PipelineQuery {
                ref_: reference,
                status: None,
                per_page: 1,
            })
            .await?;

        latest
            .into_iter()
            .next()
            .map(|pipeline| pipeline.sha)
            .ok_or_else(|| CiPruneError::LatestPipelineNotFound(reference.to_string()))
    }

    pub async fn cancel(&self, pipeline_id: u64) -> Result<Action> {
        if self.options.dry_run {
            info!("Dry run, not canceling pipeline with id: {pipeline_id}");
            return Ok(Action::WouldCancel);
        }

        info!("Canceling pipeline with id: {pipeline_id}");
        let response = self.client.cancel_pipeline(pipeline_id).await?;
        info!("Cancel result: {response}");

        let confirmed = match self.options.policy {
            CancelPolicy::FireAndForget => None,
            CancelPolicy::Verify => Some(self.confirm(pipeline_id, &response)),
        };

        Ok(Action::Canceled {
            response,
            confirmed,
        })
    }

    fn confirm(&self, pipeline_id: u64, response: &str) -> bool {
        match decode::<PipelineSummary>(response, &format!("cancel of pipeline {pipeline_id}")) {
            Ok(pipeline) if pipeline.status.is_cancelled() => true,
            Ok(pipeline) => {
                warn!(
                    "Pipeline {pipeline_id} reports status {:?} after cancel request",
                    pipeline.status
                );
                false
            }
            Err(e) => {
                warn!("Could not confirm cancellation of pipeline {pipeline_id}: {e}");
                false
            }
        }
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let reference = self.resolve_current_reference().await?;

        let running = self.fetch_running_pipelines(&reference).await?;
        if running.is_empty() {
            info!("There are no running pipelines -> Finishing");
            return Ok(RunOutcome::NothingToCancel { reference });
        }

        let latest_sha = self.resolve_latest_sha(&reference).await?;
        info!("Latest sha: {latest_sha}");

        let plan = plan_cancellations(&running, &latest_sha, &self.context.pipeline_id);

        let mut entries = Vec::with_capacity(plan.len());
        for planned in plan {
            let action = match planned.decision {
                Decision::Cancel => self.cancel(planned.pipeline_id).await?,
                Decision::Skip(reason) => {
                    info!("Ignoring pipeline (id: {}): {reason}", planned.pipeline_id);
                    Action::Ignored(reason)
                }
            };

            entries.push(ReportEntry {
                pipeline_id: planned.pipeline_id,
                sha: planned.sha,
                web_url: planned.web_url,
                action,
            });
        }

        info!("Cancelation complete");

        Ok(RunOutcome::Completed(RunReport {
            reference,
            latest_sha,
            entries,
        }))
    }
}
