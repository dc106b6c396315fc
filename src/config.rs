use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest page the GitLab REST API will return.
pub const MAX_PAGE_SIZE: usize = 100;

/// Configuration file structure for ciprune.
///
/// Every setting has a default, so the file is optional. The API token is
/// deliberately absent: it only ever comes from the environment or the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub gitlab: GitLabConfig,

    #[serde(default)]
    pub cancel: CancelConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitLabConfig {
    /// GitLab instance base URL
    #[serde(default = "default_gitlab_base_url")]
    pub base_url: String,

    /// Page size for the running-pipelines query (single page, 1..=100)
    #[serde(default = "default_running_page_size")]
    pub running_page_size: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CancelConfig {
    /// What to do with the response of a cancel request
    #[serde(default)]
    pub policy: CancelPolicy,

    /// Plan and report without sending cancel requests
    #[serde(default)]
    pub dry_run: bool,
}

/// How the body returned by the cancel endpoint is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CancelPolicy {
    /// Log the raw body and move on.
    #[default]
    FireAndForget,
    /// Decode the body and warn when the pipeline is not canceling/canceled.
    Verify,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Print the summary table after a completed run
    #[serde(default = "default_true")]
    pub summary: bool,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            base_url: default_gitlab_base_url(),
            running_page_size: default_running_page_size(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { summary: true }
    }
}

fn default_gitlab_base_url() -> String {
    "https://gitlab.com".to_string()
}

fn default_running_page_size() -> usize {
    MAX_PAGE_SIZE
}

fn default_true() -> bool {
    true
}

const CANDIDATES: [&str; 4] = ["ciprune.toml", "ciprune.json", "ciprune.yaml", "ciprune.yml"];

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path (must exist)
    /// 2. ./ciprune.toml, ./ciprune.json, ./ciprune.yaml, ./ciprune.yml
    /// 3. `<config dir>/ciprune/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let user_config = dirs::config_dir().map(|dir| dir.join("ciprune").join("config.toml"));

        let found = CANDIDATES
            .into_iter()
            .map(PathBuf::from)
            .chain(user_config)
            .find(|candidate| candidate.is_file());

        match found {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        let config: Self = match extension {
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
            _ => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
        };

        log::debug!("Loaded config from: {}", path.display());

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let size = self.gitlab.running_page_size;
        if size == 0 || size > MAX_PAGE_SIZE {
            bail!("running-page-size must be between 1 and {MAX_PAGE_SIZE}, got {size}");
        }
        Ok(())
    }
}
