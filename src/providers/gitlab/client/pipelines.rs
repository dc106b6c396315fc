use super::GitLabClient;
use crate::error::Result;
use crate::providers::gitlab::types::{PipelineDetail, PipelineStatus, PipelineSummary};

/// Filters for the pipeline list endpoint.
#[derive(Debug, Clone, Copy)]
pub struct PipelineQuery<'a> {
    pub ref_: &'a str,
    pub status: Option<PipelineStatus>,
    pub per_page: usize,
}

impl GitLabClient {
    /// `GET /projects/:id/pipelines/:pipeline_id`
    pub async fn fetch_pipeline(&self, pipeline_id: &str) -> Result<PipelineDetail> {
        let url = self.pipelines_url(&[pipeline_id]);
        self.get_json(url, &format!("pipeline {pipeline_id}")).await
    }

    /// `GET /projects/:id/pipelines` for a single page, newest first.
    pub async fn list_pipelines(&self, query: PipelineQuery<'_>) -> Result<Vec<PipelineSummary>> {
        let mut url = self.pipelines_url(&[]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("per_page", &query.per_page.to_string());
            if let Some(status) = query.status {
                pairs.append_pair("status", status_param(status));
            }
            pairs.append_pair("ref", query.ref_);
        }

        self.get_json(url, &format!("pipeline list for ref '{}'", query.ref_))
            .await
    }

    /// `POST /projects/:id/pipelines/:pipeline_id/cancel`, returning the raw body.
    pub async fn cancel_pipeline(&self, pipeline_id: u64) -> Result<String> {
        let id = pipeline_id.to_string();
        let url = self.pipelines_url(&[id.as_str(), "cancel"]);
        self.post_empty(url).await
    }
}

fn status_param(status: PipelineStatus) -> &'static str {
    match status {
        PipelineStatus::Created => "created",
        PipelineStatus::WaitingForResource => "waiting_for_resource",
        PipelineStatus::Preparing => "preparing",
        PipelineStatus::Pending => "pending",
        PipelineStatus::Running => "running",
        PipelineStatus::Success => "success",
        PipelineStatus::Failed => "failed",
        PipelineStatus::Canceling => "canceling",
        PipelineStatus::Canceled => "canceled",
        PipelineStatus::Skipped => "skipped",
        PipelineStatus::Manual => "manual",
        PipelineStatus::Scheduled => "scheduled",
        PipelineStatus::Unknown => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Token;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_list_pipelines_sends_filters_and_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/projects/42/pipelines")
            .match_header("PRIVATE-TOKEN", "secret")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("per_page".into(), "100".into()),
                Matcher::UrlEncoded("status".into(), "running".into()),
                Matcher::UrlEncoded("ref".into(), "feature/login".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 5, "sha": "abc", "ref": "feature/login", "status": "running"}]"#)
            .create_async()
            .await;

        let client = GitLabClient::new(&server.url(), "42", Token::from("secret")).unwrap();
        let pipelines = client
            .list_pipelines(PipelineQuery {
                ref_: "feature/login",
                status: Some(PipelineStatus::Running),
                per_page: 100,
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(pipelines.len(), 1);
        assert_eq!(pipelines[0].id, 5);
    }

    #[tokio::test]
    async fn test_cancel_pipeline_returns_raw_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v4/projects/42/pipelines/9/cancel")
            .match_header("PRIVATE-TOKEN", "secret")
            .with_status(200)
            .with_body(r#"{"id": 9, "status": "canceling"}"#)
            .create_async()
            .await;

        let client = GitLabClient::new(&server.url(), "42", Token::from("secret")).unwrap();
        let body = client.cancel_pipeline(9).await.unwrap();

        mock.assert_async().await;
        assert_eq!(body, r#"{"id": 9, "status": "canceling"}"#);
    }

    #[test]
    fn test_status_param_matches_serde_names() {
        for status in [
            PipelineStatus::WaitingForResource,
            PipelineStatus::Running,
            PipelineStatus::Canceled,
        ] {
            let json = format!("\"{}\"", status_param(status));
            let decoded: PipelineStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, status);
        }
    }
}
