use async_trait::async_trait;

use crate::domain::commit::CommitRecord;
use crate::domain::refs::{Branch, Tag, UserMatch};
use crate::error::AppResult;

#[async_trait]
pub trait RepositoryHostService: Send + Sync {
    /// Commits between two refs. Failure here is fatal to a changelog run.
    async fn compare_revisions(&self, project: &str, from_ref: &str, to_ref: &str) -> AppResult<Vec<CommitRecord>>;

    /// Best-effort directory search; empty on no match or error.
    async fn search_users(&self, query: &str) -> Vec<UserMatch>;

    /// Tags, most recently updated first.
    async fn list_tags(&self, project: &str) -> AppResult<Vec<Tag>>;

    async fn list_branches(&self, project: &str) -> AppResult<Vec<Branch>>;
}
