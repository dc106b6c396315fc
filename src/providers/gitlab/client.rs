mod pipelines;

pub use pipelines::PipelineQuery;

use log::debug;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{CiPruneError, Result};

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Thin client over the GitLab REST API v4 for a single project.
pub struct GitLabClient {
    client: Client,
    api_url: Url,
    project_id: String,
    token: Token,
}

impl GitLabClient {
    pub fn new(base_url: &str, project_id: &str, token: Token) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ciprune/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                CiPruneError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        // Without a trailing slash `join` would drop the last path segment of
        // instances served under a sub-path.
        let mut base = base_url.trim_end_matches('/').to_owned();
        base.push('/');

        let api_url = Url::parse(&base)
            .map_err(|e| CiPruneError::Configuration(format!("Invalid base URL: {e}")))?
            .join("api/v4/")
            .map_err(|e| CiPruneError::Configuration(format!("Invalid API base URL: {e}")))?;

        if api_url.cannot_be_a_base() {
            return Err(CiPruneError::Configuration(format!(
                "Base URL cannot carry a path: {base_url}"
            )));
        }

        Ok(Self {
            client,
            api_url,
            project_id: project_id.to_owned(),
            token,
        })
    }

    /// Helper to build authenticated requests
    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(TOKEN_HEADER, self.token.as_str())
    }

    /// `{api}/projects/{project_id}/pipelines[/{segments}...]`, each segment percent-encoded.
    fn pipelines_url(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["projects", self.project_id.as_str(), "pipelines"])
                .extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        debug!("GET {url}");
        let response = self
            .auth_request(self.client.get(url.clone()))
            .send()
            .await?;
        let body = Self::success_body(response, &url).await?;
        decode(&body, what)
    }

    /// POST with an empty body; returns the raw response text.
    async fn post_empty(&self, url: Url) -> Result<String> {
        debug!("POST {url}");
        let response = self
            .auth_request(self.client.post(url.clone()))
            .send()
            .await?;
        Self::success_body(response, &url).await
    }

    async fn success_body(response: Response, url: &Url) -> Result<String> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(CiPruneError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}

pub(super) fn decode<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| CiPruneError::Decode {
        what: what.to_string(),
        source,
    })
}
