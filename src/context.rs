use crate::auth::Token;
use crate::error::{CiPruneError, Result};

pub const PROJECT_ID_VAR: &str = "CI_PROJECT_ID";
pub const PIPELINE_ID_VAR: &str = "CI_PIPELINE_ID";
pub const API_TOKEN_VAR: &str = "GITLAB_API_TOKEN";

/// Identity of the pipeline invoking the tool.
///
/// Built once at startup and passed by reference to everything that talks to
/// GitLab. There is no way to construct one with a missing field.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub project_id: String,
    pub pipeline_id: String,
    pub token: Token,
}

impl ExecutionContext {
    /// Validates the raw values gathered from the environment.
    ///
    /// Absent, empty and whitespace-only values count as missing. Every
    /// missing variable is reported, not just the first one.
    ///
    /// # Errors
    ///
    /// Returns `CiPruneError::Configuration` naming the missing variables.
    pub fn from_values(
        project_id: Option<&str>,
        pipeline_id: Option<&str>,
        token: Option<&str>,
    ) -> Result<Self> {
        let project_id = present(project_id);
        let pipeline_id = present(pipeline_id);
        let token = present(token);

        let missing: Vec<&str> = [
            (PROJECT_ID_VAR, project_id.is_none()),
            (PIPELINE_ID_VAR, pipeline_id.is_none()),
            (API_TOKEN_VAR, token.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, is_missing)| is_missing.then_some(name))
        .collect();

        match (project_id, pipeline_id, token) {
            (Some(project_id), Some(pipeline_id), Some(token)) => Ok(Self {
                project_id: project_id.to_owned(),
                pipeline_id: pipeline_id.to_owned(),
                token: Token::from(token),
            }),
            _ => Err(CiPruneError::Configuration(format!(
                "required environment variables not set: {}",
                missing.join(", ")
            ))),
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
