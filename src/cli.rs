use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use crate::config::Config;
use crate::context::{ExecutionContext, API_TOKEN_VAR, PIPELINE_ID_VAR, PROJECT_ID_VAR};
use crate::output;
use crate::providers::gitlab::{CancelOptions, PipelineCanceller};

/// Every option is optional on the command line: inside a GitLab job the
/// predefined CI variables fill them in.
#[derive(Parser)]
#[command(name = "ciprune")]
#[command(
    author,
    version,
    about = "Cancel running GitLab pipelines superseded by a newer commit on the same ref",
    long_about = None
)]
pub struct Cli {
    /// Project id or `group/project` path
    #[arg(long, env = PROJECT_ID_VAR)]
    project_id: Option<String>,

    /// Id of the pipeline this tool runs in; never cancelled
    #[arg(long, env = PIPELINE_ID_VAR)]
    pipeline_id: Option<String>,

    /// API token sent as PRIVATE-TOKEN
    #[arg(long, env = API_TOKEN_VAR, hide_env_values = true)]
    token: Option<String>,

    /// GitLab base URL [default: https://gitlab.com]
    #[arg(long, env = "CI_SERVER_URL")]
    url: Option<String>,

    /// Config file (defaults to ./ciprune.{toml,json,yaml,yml})
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report what would be cancelled without cancelling anything
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

/// Everything `execute` needs once flags, env and the config file are merged.
#[derive(Debug)]
struct Settings {
    base_url: String,
    options: CancelOptions,
    print_summary: bool,
}

impl Cli {
    /// Flags and env vars win over the config file, which wins over defaults.
    fn settings(&self, config: Config) -> Settings {
        Settings {
            base_url: self.url.clone().unwrap_or(config.gitlab.base_url),
            options: CancelOptions {
                policy: config.cancel.policy,
                dry_run: self.dry_run || config.cancel.dry_run,
                running_page_size: config.gitlab.running_page_size,
            },
            print_summary: config.output.summary,
        }
    }

    pub async fn execute(&self) -> Result<()> {
        info!("Loading env variables");
        let context = ExecutionContext::from_values(
            self.project_id.as_deref(),
            self.pipeline_id.as_deref(),
            self.token.as_deref(),
        )?;

        let settings = self.settings(Config::load(self.config.as_deref())?);

        info!(
            "Pruning pipelines for project {} from pipeline {} on {}",
            context.project_id, context.pipeline_id, settings.base_url
        );

        let canceller = PipelineCanceller::new(&settings.base_url, &context, settings.options)?;
        let outcome = canceller.run().await?;

        if settings.print_summary {
            output::print_summary(&outcome);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CancelPolicy;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ciprune").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_arguments_is_valid() {
        assert!(Cli::try_parse_from(["ciprune"]).is_ok());
    }

    #[test]
    fn test_config_file_fills_unset_values() {
        let cli = parse(&[]);
        let mut config = Config::default();
        config.gitlab.base_url = "https://gitlab.internal".to_string();
        config.cancel.policy = CancelPolicy::Verify;
        config.output.summary = false;

        let settings = cli.settings(config);

        // CI_SERVER_URL may be set when the tests run inside a GitLab job.
        if std::env::var_os("CI_SERVER_URL").is_none() {
            assert_eq!(settings.base_url, "https://gitlab.internal");
        }
        assert_eq!(settings.options.policy, CancelPolicy::Verify);
        assert!(!settings.options.dry_run);
        assert!(!settings.print_summary);
    }

    #[test]
    fn test_flags_override_config_file() {
        let cli = parse(&["--url", "https://flag.example.com", "--dry-run"]);

        let settings = cli.settings(Config::default());

        assert_eq!(settings.base_url, "https://flag.example.com");
        assert!(settings.options.dry_run);
        assert_eq!(settings.options.running_page_size, 100);
    }

    #[test]
    fn test_dry_run_from_config_is_kept() {
        let cli = parse(&[]);
        let mut config = Config::default();
        config.cancel.dry_run = true;

        assert!(cli.settings(config).options.dry_run);
    }

    #[tokio::test]
    async fn test_missing_identity_fails_before_any_request() {
        // An unroutable URL proves no request is attempted: the error must be
        // the configuration error, not a network one.
        let cli = Cli {
            project_id: Some("42".to_string()),
            pipeline_id: None,
            token: Some(String::new()),
            url: Some("http://127.0.0.1:9".to_string()),
            config: None,
            dry_run: false,
        };

        let err = cli.execute().await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains(PIPELINE_ID_VAR));
        assert!(message.contains(API_TOKEN_VAR));
        assert!(err.downcast_ref::<crate::error::CiPruneError>().is_some());
    }
}
