//! In-memory collaborators for deterministic tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::changelog::ChangeRecord;
use crate::domain::commit::CommitRecord;
use crate::domain::refs::{Branch, Tag, UserMatch};
use crate::error::{AppError, AppResult};
use crate::services::{IssueMetadata, IssueTrackerService, RepositoryHostService};

#[derive(Default)]
pub struct FakeIssueTracker {
    pub project_ids: HashMap<String, String>,
    pub issues: HashMap<String, IssueMetadata>,
    pub contributors: HashMap<String, Vec<String>>,
    pub change_records: HashMap<(String, String), Vec<ChangeRecord>>,
    pub contributor_calls: Mutex<Vec<String>>,
    pub issue_calls: Mutex<Vec<String>>,
}

impl FakeIssueTracker {
    pub fn with_project(mut self, machine_name: &str, project_id: &str) -> Self {
        self.project_ids.insert(machine_name.to_string(), project_id.to_string());
        self
    }

    pub fn with_issue(mut self, issue_id: &str, category: Option<i64>) -> Self {
        self.issues.insert(issue_id.to_string(), IssueMetadata { category });
        self
    }

    pub fn with_contributors(mut self, issue_id: &str, names: &[&str]) -> Self {
        self.contributors
            .insert(issue_id.to_string(), names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn with_change_record(mut self, project_id: &str, version: &str, record: ChangeRecord) -> Self {
        self.change_records
            .entry((project_id.to_string(), version.to_string()))
            .or_default()
            .push(record);
        self
    }

    pub fn contributor_calls(&self) -> Vec<String> {
        let mut calls = self.contributor_calls.lock().unwrap().clone();
        calls.sort();
        calls
    }
}

#[async_trait]
impl IssueTrackerService for FakeIssueTracker {
    async fn resolve_project_id(&self, machine_name: &str) -> Option<String> {
        self.project_ids.get(machine_name).cloned()
    }

    async fn fetch_issue(&self, issue_id: &str) -> Option<IssueMetadata> {
        self.issue_calls.lock().unwrap().push(issue_id.to_string());
        self.issues.get(issue_id).cloned()
    }

    async fn fetch_contributors(&self, issue_id: &str) -> Vec<String> {
        self.contributor_calls.lock().unwrap().push(issue_id.to_string());
        self.contributors.get(issue_id).cloned().unwrap_or_default()
    }

    async fn fetch_change_records(&self, project_id: &str, target_version: &str) -> Vec<ChangeRecord> {
        self.change_records
            .get(&(project_id.to_string(), target_version.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Default)]
pub struct FakeRepositoryHost {
    pub commits: Option<Vec<CommitRecord>>,
    pub users: HashMap<String, Vec<UserMatch>>,
    pub tags: Vec<Tag>,
    pub branches: Vec<Branch>,
    pub searches: Mutex<Vec<String>>,
}

impl FakeRepositoryHost {
    pub fn with_commits(mut self, commits: Vec<CommitRecord>) -> Self {
        self.commits = Some(commits);
        self
    }

    pub fn with_user(mut self, query: &str, username: &str, display_name: &str) -> Self {
        self.users.entry(query.to_string()).or_default().push(UserMatch {
            username: username.to_string(),
            display_name: display_name.to_string(),
        });
        self
    }

    pub fn with_tags(mut self, names: &[&str]) -> Self {
        self.tags = names
            .iter()
            .map(|name| Tag {
                name: name.to_string(),
                ..Tag::default()
            })
            .collect();
        self
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositoryHostService for FakeRepositoryHost {
    async fn compare_revisions(&self, project: &str, from_ref: &str, to_ref: &str) -> AppResult<Vec<CommitRecord>> {
        self.commits.clone().ok_or_else(|| {
            AppError::RepositoryHost(format!("failed to compare {from_ref}...{to_ref} for {project}"))
        })
    }

    async fn search_users(&self, query: &str) -> Vec<UserMatch> {
        self.searches.lock().unwrap().push(query.to_string());
        self.users.get(query).cloned().unwrap_or_default()
    }

    async fn list_tags(&self, _project: &str) -> AppResult<Vec<Tag>> {
        Ok(self.tags.clone())
    }

    async fn list_branches(&self, _project: &str) -> AppResult<Vec<Branch>> {
        Ok(self.branches.clone())
    }
}
