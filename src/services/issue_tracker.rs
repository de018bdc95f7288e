use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use futures::future::join_all;

use crate::domain::changelog::ChangeRecord;

/// Metadata of a single tracked issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueMetadata {
    /// Raw category code; `None` when the issue carries no category.
    pub category: Option<i64>,
}

/// Fail-soft access to the issue tracker.
///
/// No method reports errors: lookups that fail for any reason come back
/// as `None` or empty collections.
#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn resolve_project_id(&self, machine_name: &str) -> Option<String>;

    async fn fetch_issue(&self, issue_id: &str) -> Option<IssueMetadata>;

    /// Contributor display names credited on one issue, in tracker order.
    async fn fetch_contributors(&self, issue_id: &str) -> Vec<String>;

    async fn fetch_change_records(&self, project_id: &str, target_version: &str) -> Vec<ChangeRecord>;

    /// Fans out one `fetch_contributors` call per id and joins them all.
    ///
    /// Every id in `issue_ids` gets a slot in the result, empty when its
    /// fetch came back empty.
    async fn fetch_contributors_batch(&self, issue_ids: &BTreeSet<String>) -> HashMap<String, Vec<String>> {
        if issue_ids.is_empty() {
            return HashMap::new();
        }
        let fetches = issue_ids.iter().map(|issue_id| async move {
            let contributors = self.fetch_contributors(issue_id).await;
            (issue_id.clone(), contributors)
        });
        join_all(fetches).await.into_iter().collect()
    }
}
