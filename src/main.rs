mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod render;
mod services;
mod workflow;

use std::io::{self, Write};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::changelog::{self as changelog_cmd, ChangelogCommandArgs};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::refs as refs_cmd;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::drupal_org::DrupalOrgClient;
use crate::infra::gitlab::GitLabClient;

#[derive(Parser)]
#[command(name = "relnotes", author, version, about = "Release changelogs from commit history and the issue tracker")]
struct Cli {
    /// Log request and pipeline detail to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the changelog for a range of a project's history.
    Changelog(ChangelogArgs),
    /// List a project's tags and branches as JSON.
    Refs(ProjectArgs),
    /// Print the release that precedes a version.
    Previous(PreviousArgs),
    /// Inspect CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct ChangelogArgs {
    /// Project machine name, e.g. `views_remote_data`.
    project: String,
    /// Start of the range; defaults to the release preceding `--to`.
    #[arg(long)]
    from: Option<String>,
    /// End of the range.
    #[arg(long, default_value = "HEAD")]
    to: String,
    /// Output format: html, md, markdown or json.
    #[arg(short, long)]
    format: Option<String>,
}

#[derive(Args)]
struct ProjectArgs {
    project: String,
}

#[derive(Args)]
struct PreviousArgs {
    project: String,
    version: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> AppResult<()> {
    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Changelog(args) => {
            let context = build_context()?;
            let output = changelog_cmd::run(
                &context,
                ChangelogCommandArgs {
                    project: args.project,
                    from: args.from,
                    to: args.to,
                    format: args.format,
                },
            )
            .await?;
            emit(&output)
        }
        Commands::Refs(args) => {
            let context = build_context()?;
            emit(&refs_cmd::run(&context, &args.project).await?)
        }
        Commands::Previous(args) => {
            let context = build_context()?;
            emit(&changelog_cmd::run_previous(&context, &args.project, &args.version).await?)
        }
    }
}

fn emit(output: &str) -> AppResult<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    stdout.flush()?;
    Ok(())
}

fn build_context() -> AppResult<AppContext> {
    let config = AppConfig::load()?;

    let repository_host = Arc::new(GitLabClient::new(
        config.gitlab_base_url.clone(),
        config.gitlab_token.as_deref(),
        config.retry.clone(),
    )?);
    let issue_tracker = Arc::new(DrupalOrgClient::new(
        config.drupal_base_url.clone(),
        config.retry.clone(),
    ));

    Ok(AppContext::new(config, repository_host, issue_tracker))
}
