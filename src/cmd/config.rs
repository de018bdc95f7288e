use clap::{Args, Subcommand};

use crate::config::AppConfig;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Show => run_show(),
    }
}

fn run_show() -> AppResult<()> {
    let cfg = AppConfig::load()?;
    for line in describe(&cfg) {
        println!("{line}");
    }
    Ok(())
}

fn describe(cfg: &AppConfig) -> Vec<String> {
    vec![
        format!("GitLab URL: {}", cfg.gitlab_base_url),
        format!("GitLab token: {}", mask_secret(&cfg.gitlab_token)),
        format!("drupal.org URL: {}", cfg.drupal_base_url),
        format!("Noreply domain: {}", cfg.noreply_domain()),
        format!("Default format: {}", cfg.default_format),
        format!(
            "Retries: {} on {:?} (x{}s back-off)",
            cfg.retry.max_retries, cfg.retry.retry_on, cfg.retry.multiplier
        ),
    ]
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let prefix_end = token.char_indices().nth(3).map_or(token.len(), |(index, _)| index);
            let suffix_start = token.char_indices().rev().nth(2).map_or(0, |(index, _)| index);
            format!("{}***{}", &token[..prefix_end], &token[suffix_start..])
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}
