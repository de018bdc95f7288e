//! Turns a commit range into a categorized, attributed changelog.

use std::collections::{BTreeSet, HashMap};

use futures::future::join_all;
use tracing::{debug, info};

use crate::context::AppContext;
use crate::domain::annotation::{self, NoreplyPattern};
use crate::domain::changelog::{Category, ChangeEntry, ChangelogAggregate, normalize_contributors};
use crate::domain::commit::CommitRecord;
use crate::domain::refs::UserMatch;
use crate::domain::version::find_previous_version;
use crate::error::{AppError, AppResult};
use crate::services::{IssueMetadata, IssueTrackerService, RepositoryHostService};

#[derive(Debug, Clone)]
pub struct ChangelogRequest {
    pub project: String,
    /// Resolved from the project's tags when absent.
    pub from_ref: Option<String>,
    pub to_ref: String,
}

pub struct ChangelogAssembler<'a> {
    issue_tracker: &'a dyn IssueTrackerService,
    repository_host: &'a dyn RepositoryHostService,
    noreply: NoreplyPattern,
}

impl<'a> ChangelogAssembler<'a> {
    pub fn new(
        issue_tracker: &'a dyn IssueTrackerService,
        repository_host: &'a dyn RepositoryHostService,
        noreply: NoreplyPattern,
    ) -> Self {
        Self {
            issue_tracker,
            repository_host,
            noreply,
        }
    }

    /// Builds the changelog for `commits`, which must not be empty.
    ///
    /// Only an empty commit list is an error; every tracker or directory
    /// failure degrades to missing data for the affected entry.
    #[tracing::instrument(skip(self, commits), fields(commits = commits.len()))]
    pub async fn assemble(
        &self,
        project: &str,
        from_ref: &str,
        to_ref: &str,
        commits: &[CommitRecord],
    ) -> AppResult<ChangelogAggregate> {
        if commits.is_empty() {
            return Err(AppError::NoCommits);
        }

        let project_id = self.issue_tracker.resolve_project_id(project).await;

        let issue_ids: Vec<Option<String>> = commits
            .iter()
            .map(|commit| annotation::extract_issue_id(&commit.title))
            .collect();
        let distinct_ids: BTreeSet<String> = issue_ids.iter().flatten().cloned().collect();
        debug!(distinct_issues = distinct_ids.len(), "collected issue references");

        let (credited, issues) = futures::join!(
            self.issue_tracker.fetch_contributors_batch(&distinct_ids),
            self.fetch_issues(&distinct_ids),
        );

        let mut changes = Vec::with_capacity(commits.len());
        let mut issue_count = 0;
        for (commit, issue_id) in commits.iter().zip(issue_ids) {
            let contributors = self.attribute(commit, issue_id.as_deref(), &credited).await;

            let category = match issue_id.as_ref().and_then(|id| issues.get(id)) {
                Some(Some(issue)) => {
                    issue_count += 1;
                    issue.category.map(Category::from_code).unwrap_or_default()
                }
                _ => Category::Misc,
            };

            let summary = annotation::strip_summary_noise(&commit.title).to_string();
            changes.push(ChangeEntry::new(issue_id, category, summary, contributors));
        }

        let contributors = normalize_contributors(
            changes
                .iter()
                .flat_map(|change| change.contributors.iter().cloned()),
        );

        let change_records = match &project_id {
            Some(project_id) => {
                self.issue_tracker
                    .fetch_change_records(project_id, to_ref)
                    .await
            }
            None => Vec::new(),
        };

        info!(
            changes = changes.len(),
            contributors = contributors.len(),
            issue_count,
            change_records = change_records.len(),
            "assembled changelog"
        );

        Ok(ChangelogAggregate {
            project: project.to_string(),
            from_ref: from_ref.to_string(),
            to_ref: to_ref.to_string(),
            changes,
            contributors,
            issue_count,
            change_records,
        })
    }

    /// Issue metadata for every distinct id, fetched concurrently.
    async fn fetch_issues(&self, issue_ids: &BTreeSet<String>) -> HashMap<String, Option<IssueMetadata>> {
        let fetches = issue_ids.iter().map(|issue_id| async move {
            (issue_id.clone(), self.issue_tracker.fetch_issue(issue_id).await)
        });
        join_all(fetches).await.into_iter().collect()
    }

    /// First non-empty answer wins: contribution record, commit text,
    /// noreply e-mail, then the host's user directory.
    async fn attribute(
        &self,
        commit: &CommitRecord,
        issue_id: Option<&str>,
        credited: &HashMap<String, Vec<String>>,
    ) -> Vec<String> {
        let found = from_contribution_record(issue_id, credited)
            .or_else(|| from_commit_text(commit))
            .or_else(|| self.from_noreply_email(commit));
        let contributors = match found {
            Some(contributors) => contributors,
            None => self.from_user_directory(commit).await.unwrap_or_default(),
        };
        normalize_contributors(contributors)
    }

    fn from_noreply_email(&self, commit: &CommitRecord) -> Option<Vec<String>> {
        non_empty(
            [&commit.author_email, &commit.committer_email]
                .into_iter()
                .filter_map(|email| self.noreply.handle(email))
                .collect(),
        )
    }

    async fn from_user_directory(&self, commit: &CommitRecord) -> Option<Vec<String>> {
        let mut queries: Vec<&str> = Vec::new();
        for name in [commit.author_name.trim(), commit.committer_name.trim()] {
            if !name.is_empty() && !queries.contains(&name) {
                queries.push(name);
            }
        }

        let mut usernames = Vec::new();
        for query in queries {
            let users = self.repository_host.search_users(query).await;
            if let Some(user) = best_user_match(query, &users) {
                usernames.push(user.username.clone());
            }
        }
        non_empty(usernames)
    }
}

fn from_contribution_record(
    issue_id: Option<&str>,
    credited: &HashMap<String, Vec<String>>,
) -> Option<Vec<String>> {
    issue_id
        .and_then(|id| credited.get(id))
        .cloned()
        .and_then(non_empty)
}

fn from_commit_text(commit: &CommitRecord) -> Option<Vec<String>> {
    non_empty(annotation::extract_contributors(&commit.title, &commit.message, false))
}

/// Exact username or display name match, else the directory's first hit.
fn best_user_match<'u>(query: &str, users: &'u [UserMatch]) -> Option<&'u UserMatch> {
    users
        .iter()
        .find(|user| {
            user.username.eq_ignore_ascii_case(query) || user.display_name.eq_ignore_ascii_case(query)
        })
        .or_else(|| users.first())
}

fn non_empty(names: Vec<String>) -> Option<Vec<String>> {
    if names.is_empty() { None } else { Some(names) }
}

/// Fetches the commit range and assembles its changelog.
pub async fn generate_changelog(ctx: &AppContext, request: ChangelogRequest) -> AppResult<ChangelogAggregate> {
    let from_ref = match request.from_ref {
        Some(from_ref) => from_ref,
        None => previous_release(ctx, &request.project, &request.to_ref).await?,
    };

    let commits = ctx
        .repository_host
        .compare_revisions(&request.project, &from_ref, &request.to_ref)
        .await?;

    let noreply = NoreplyPattern::new(&ctx.config.noreply_domain())?;
    let assembler = ChangelogAssembler::new(ctx.issue_tracker.as_ref(), ctx.repository_host.as_ref(), noreply);
    assembler
        .assemble(&request.project, &from_ref, &request.to_ref, &commits)
        .await
}

/// The tag released before `version`, per the project's tag list.
pub async fn previous_release(ctx: &AppContext, project: &str, version: &str) -> AppResult<String> {
    let tags = ctx.repository_host.list_tags(project).await?;
    let names: Vec<&str> = tags.iter().map(|tag| tag.name.as_str()).collect();
    find_previous_version(version, &names).ok_or_else(|| {
        AppError::Configuration(format!(
            "no release of {project} precedes {version}; pass --from explicitly"
        ))
    })
}
