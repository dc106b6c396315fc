use thiserror::Error;

#[derive(Error, Debug)]
pub enum CiPruneError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GitLab API error (status {status}) for {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Unexpected response shape for {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No pipeline found for ref '{0}', cannot determine latest commit sha")]
    LatestPipelineNotFound(String),
}

pub type Result<T> = std::result::Result<T, CiPruneError>;
