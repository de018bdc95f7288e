use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::changelog::ChangeRecord;
use crate::error::{AppError, AppResult};
use crate::infra::http::{HttpClient, RetryPolicy};
use crate::services::{IssueMetadata, IssueTrackerService};

const NODE_LINK_BASE: &str = "https://www.drupal.org/node/";
const CHANGE_NOTICE_TYPE: &str = "changenotice";
const USER_RESOURCE_TYPE: &str = "user--user";

/// drupal.org issue tracker: the legacy `api-d7` REST endpoints plus
/// JSON:API for contribution records.
pub struct DrupalOrgClient {
    http: HttpClient,
    base_url: Url,
}

impl DrupalOrgClient {
    pub fn new(base_url: Url, retry: RetryPolicy) -> Self {
        Self {
            http: HttpClient::new(retry),
            base_url,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Configuration(format!("{} cannot be used as an API base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn try_resolve_project_id(&self, machine_name: &str) -> AppResult<Option<String>> {
        let mut url = self.endpoint(&["api-d7", "node.json"])?;
        url.query_pairs_mut()
            .append_pair("field_project_machine_name", machine_name);
        let payload = self.http.get_value(url).await?;
        Ok(payload
            .get("list")
            .and_then(Value::as_array)
            .and_then(|list| list.first())
            .and_then(|project| project.get("nid"))
            .and_then(scalar_string))
    }

    async fn try_fetch_issue(&self, issue_id: &str) -> AppResult<IssueMetadata> {
        let url = self.endpoint(&["api-d7", "node", &format!("{issue_id}.json")])?;
        let payload = self.http.get_value(url).await?;
        if !payload.is_object() {
            return Err(AppError::IssueTracker(format!("issue {issue_id} payload is not an object")));
        }
        let category = payload
            .get("field_issue_category")
            .and_then(scalar_string)
            .and_then(|code| code.trim().parse::<i64>().ok());
        Ok(IssueMetadata { category })
    }

    async fn try_fetch_contributors(&self, issue_id: &str) -> AppResult<Vec<String>> {
        let mut url = self.endpoint(&["jsonapi", "node", "contribution_record"])?;
        url.query_pairs_mut()
            .append_pair(
                "filter[field_source_link.uri]",
                &format!("{NODE_LINK_BASE}{issue_id}"),
            )
            .append_pair("include", "field_contributors.field_contributor_user")
            .append_pair("fields[node--contribution_record]", "field_contributors")
            .append_pair("fields[paragraph--contributor]", "field_contributor_user")
            .append_pair("fields[user--user]", "display_name");

        let payload = self.http.get_value(url).await?;
        let has_records = payload
            .get("data")
            .and_then(Value::as_array)
            .is_some_and(|data| !data.is_empty());
        if !has_records {
            return Ok(Vec::new());
        }

        let contributors = payload
            .get("included")
            .and_then(Value::as_array)
            .map(|included| {
                included
                    .iter()
                    .filter(|item| item.get("type").and_then(Value::as_str) == Some(USER_RESOURCE_TYPE))
                    .filter_map(|item| item.pointer("/attributes/display_name").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(contributors)
    }

    async fn try_fetch_change_records(&self, project_id: &str, target_version: &str) -> AppResult<Vec<ChangeRecord>> {
        let mut url = self.endpoint(&["api-d7", "node.json"])?;
        url.query_pairs_mut()
            .append_pair("type", CHANGE_NOTICE_TYPE)
            .append_pair("field_project", project_id)
            .append_pair("field_change_to", target_version);

        let payload = self.http.get_value(url).await?;
        let list = payload
            .get("list")
            .and_then(Value::as_array)
            .ok_or_else(|| AppError::IssueTracker("change record payload has no list".to_string()))?;
        Ok(list.iter().map(change_record).collect())
    }
}

fn change_record(item: &Value) -> ChangeRecord {
    let field = |name: &str| item.get(name).and_then(scalar_string).unwrap_or_default();
    ChangeRecord {
        issue_id: field("nid"),
        title: field("title"),
        url: field("url"),
        target_version: field("field_change_to"),
    }
}

/// api-d7 serializes ids and codes as strings, but not consistently.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl IssueTrackerService for DrupalOrgClient {
    #[tracing::instrument(skip(self))]
    async fn resolve_project_id(&self, machine_name: &str) -> Option<String> {
        match self.try_resolve_project_id(machine_name).await {
            Ok(project_id) => {
                debug!(machine_name, ?project_id, "resolved project id");
                project_id
            }
            Err(err) => {
                warn!(machine_name, error = %err, "project id lookup failed");
                None
            }
        }
    }

    async fn fetch_issue(&self, issue_id: &str) -> Option<IssueMetadata> {
        self.try_fetch_issue(issue_id)
            .await
            .inspect_err(|err| warn!(issue_id, error = %err, "issue lookup failed"))
            .ok()
    }

    async fn fetch_contributors(&self, issue_id: &str) -> Vec<String> {
        self.try_fetch_contributors(issue_id)
            .await
            .unwrap_or_else(|err| {
                warn!(issue_id, error = %err, "contribution record lookup failed");
                Vec::new()
            })
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_change_records(&self, project_id: &str, target_version: &str) -> Vec<ChangeRecord> {
        self.try_fetch_change_records(project_id, target_version)
            .await
            .unwrap_or_else(|err| {
                warn!(project_id, target_version, error = %err, "change record lookup failed");
                Vec::new()
            })
    }
}
