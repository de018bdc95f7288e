pub mod issue_tracker;
pub mod repository_host;

pub use issue_tracker::{IssueMetadata, IssueTrackerService};
pub use repository_host::RepositoryHostService;

#[cfg(test)]
pub mod fakes;
