use crate::context::AppContext;
use crate::domain::refs::ProjectRefs;
use crate::error::{AppError, AppResult};

/// Tags (most recently updated first) and branches of a project.
pub async fn list_project_refs(ctx: &AppContext, project: &str) -> AppResult<ProjectRefs> {
    if project.trim().is_empty() {
        return Err(AppError::Configuration("the project must be provided".to_string()));
    }

    let (tags, branches) = futures::try_join!(
        ctx.repository_host.list_tags(project),
        ctx.repository_host.list_branches(project),
    )?;

    Ok(ProjectRefs { tags, branches })
}
