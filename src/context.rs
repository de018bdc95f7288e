use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{IssueTrackerService, RepositoryHostService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub repository_host: Arc<dyn RepositoryHostService>,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        repository_host: Arc<dyn RepositoryHostService>,
        issue_tracker: Arc<dyn IssueTrackerService>,
    ) -> Self {
        Self {
            config,
            repository_host,
            issue_tracker,
        }
    }
}
