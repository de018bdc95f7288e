use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::workflow::refs::list_project_refs;

/// Tags and branches of a project as pretty-printed JSON.
pub async fn run(ctx: &AppContext, project: &str) -> AppResult<String> {
    let refs = list_project_refs(ctx, project).await?;
    serde_json::to_string_pretty(&refs).map_err(|err| AppError::Render(err.to_string()))
}
