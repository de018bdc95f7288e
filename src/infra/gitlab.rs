use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::commit::CommitRecord;
use crate::domain::refs::{Branch, Tag, UserMatch};
use crate::error::{AppError, AppResult};
use crate::infra::http::{HttpClient, RetryPolicy};
use crate::services::RepositoryHostService;

const PRIVATE_TOKEN: &str = "private-token";
const PROJECT_NAMESPACE: &str = "project";

/// GitLab v4 API client for the project's source repository host.
pub struct GitLabClient {
    http: HttpClient,
    base_url: Url,
}

impl GitLabClient {
    pub fn new(base_url: Url, token: Option<&str>, retry: RetryPolicy) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(token).map_err(|_| {
                AppError::Configuration("GitLab token contains invalid characters".to_string())
            })?;
            headers.insert(HeaderName::from_static(PRIVATE_TOKEN), value);
        }
        Ok(Self {
            http: HttpClient::with_headers(retry, headers),
            base_url,
        })
    }

    /// `{base}/api/v4/<segments...>` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Configuration(format!("{} cannot be used as an API base", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "v4"])
            .extend(segments);
        Ok(url)
    }

    fn repository_endpoint(&self, project: &str, resource: &str) -> AppResult<Url> {
        let project_path = format!("{PROJECT_NAMESPACE}/{project}");
        self.endpoint(&["projects", &project_path, "repository", resource])
    }

    async fn try_search_users(&self, query: &str) -> AppResult<Vec<UserMatch>> {
        let mut url = self.endpoint(&["users"])?;
        url.query_pairs_mut().append_pair("search", query);
        Ok(self.http.get_json::<Option<Vec<UserMatch>>>(url).await?.unwrap_or_default())
    }
}

#[derive(Deserialize)]
struct CompareResponse {
    #[serde(default)]
    commits: Vec<CommitRecord>,
}

#[async_trait]
impl RepositoryHostService for GitLabClient {
    #[tracing::instrument(skip(self))]
    async fn compare_revisions(&self, project: &str, from_ref: &str, to_ref: &str) -> AppResult<Vec<CommitRecord>> {
        let mut url = self.repository_endpoint(project, "compare")?;
        url.query_pairs_mut()
            .append_pair("from", from_ref)
            .append_pair("to", to_ref);

        let compare: CompareResponse = self.http.get_json(url).await.map_err(|err| {
            let hint = match err.status() {
                Some(401 | 403) => " (check RELNOTES_GITLAB_TOKEN)",
                _ => "",
            };
            AppError::RepositoryHost(format!(
                "failed to compare {from_ref}...{to_ref} for {project}: {err}{hint}"
            ))
        })?;
        debug!(commits = compare.commits.len(), "compared revisions");
        Ok(compare.commits)
    }

    async fn search_users(&self, query: &str) -> Vec<UserMatch> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        match self.try_search_users(query).await {
            Ok(users) => users,
            Err(err) => {
                warn!(query, error = %err, "user search failed");
                Vec::new()
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list_tags(&self, project: &str) -> AppResult<Vec<Tag>> {
        let mut url = self.repository_endpoint(project, "tags")?;
        url.query_pairs_mut().append_pair("order_by", "updated");
        Ok(self.http.get_json(url).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn list_branches(&self, project: &str) -> AppResult<Vec<Branch>> {
        let url = self.repository_endpoint(project, "branches")?;
        Ok(self.http.get_json(url).await?)
    }
}
