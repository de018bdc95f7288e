use tracing::debug;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::render::OutputFormat;
use crate::workflow::changelog::{ChangelogRequest, generate_changelog, previous_release};

#[derive(Debug, Clone)]
pub struct ChangelogCommandArgs {
    pub project: String,
    pub from: Option<String>,
    pub to: String,
    pub format: Option<String>,
}

/// Renders the changelog for a commit range in the requested format.
pub async fn run(ctx: &AppContext, args: ChangelogCommandArgs) -> AppResult<String> {
    let key = args
        .format
        .unwrap_or_else(|| ctx.config.default_format.clone());
    let format = OutputFormat::from_key(&key)?;

    let changelog = generate_changelog(
        ctx,
        ChangelogRequest {
            project: args.project,
            from_ref: args.from,
            to_ref: args.to,
        },
    )
    .await?;

    let renderer = format.renderer();
    let output = renderer.format(&changelog)?;
    debug!(content_type = renderer.content_type(), bytes = output.len(), "rendered changelog");
    Ok(output)
}

pub async fn run_previous(ctx: &AppContext, project: &str, version: &str) -> AppResult<String> {
    previous_release(ctx, project, version).await
}
