use std::env;

use reqwest::Url;

use crate::error::{AppError, AppResult};
use crate::infra::http::{MAX_RETRY_DELAY, RetryPolicy};

pub const DEFAULT_GITLAB_URL: &str = "https://git.drupalcode.org";
pub const DEFAULT_DRUPAL_URL: &str = "https://www.drupal.org";
pub const DEFAULT_FORMAT: &str = "html";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gitlab_base_url: Url,
    pub gitlab_token: Option<String>,
    pub drupal_base_url: Url,
    pub default_format: String,
    pub retry: RetryPolicy,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gitlab_base_url = parse_url(
            "RELNOTES_GITLAB_URL",
            value("RELNOTES_GITLAB_URL").as_deref().unwrap_or(DEFAULT_GITLAB_URL),
        )?;
        let drupal_base_url = parse_url(
            "RELNOTES_DRUPAL_URL",
            value("RELNOTES_DRUPAL_URL").as_deref().unwrap_or(DEFAULT_DRUPAL_URL),
        )?;

        let mut retry = RetryPolicy::default();
        if let Some(raw) = value("RELNOTES_RETRY_ATTEMPTS") {
            retry.max_retries = raw.trim().parse().map_err(|_| {
                AppError::Configuration(format!("RELNOTES_RETRY_ATTEMPTS must be an integer, got '{raw}'"))
            })?;
        }
        if let Some(raw) = value("RELNOTES_RETRY_MULTIPLIER") {
            let multiplier: f64 = raw.trim().parse().map_err(|_| {
                AppError::Configuration(format!("RELNOTES_RETRY_MULTIPLIER must be a number, got '{raw}'"))
            })?;
            let max = MAX_RETRY_DELAY.as_secs_f64();
            if !multiplier.is_finite() || !(0.0..=max).contains(&multiplier) {
                return Err(AppError::Configuration(format!(
                    "RELNOTES_RETRY_MULTIPLIER must be between 0 and {max}, got '{raw}'"
                )));
            }
            retry.multiplier = multiplier;
        }

        Ok(Self {
            gitlab_base_url,
            gitlab_token: value("RELNOTES_GITLAB_TOKEN").map(|t| t.trim().to_string()),
            drupal_base_url,
            default_format: value("RELNOTES_FORMAT")
                .map(|f| f.trim().to_lowercase())
                .unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
            retry,
        })
    }

    /// Domain of the machine-generated commit e-mails on the repository host,
    /// e.g. `users.noreply.drupalcode.org`.
    pub fn noreply_domain(&self) -> String {
        let host = self.gitlab_base_url.host_str().unwrap_or_default();
        let host = host.strip_prefix("git.").unwrap_or(host);
        format!("users.noreply.{host}")
    }
}

fn parse_url(key: &str, raw: &str) -> AppResult<Url> {
    Url::parse(raw.trim())
        .map_err(|err| AppError::Configuration(format!("{key} is not a valid URL ({raw}): {err}")))
}
