use crate::domain::changelog::{ChangelogAggregate, group_by_category};
use crate::error::AppResult;

use super::{Renderer, SUMMARY_PLACEHOLDER, contributor_url, link_issue_refs, release_url};

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn format(&self, changelog: &ChangelogAggregate) -> AppResult<String> {
        let mut out = Vec::new();
        out.push(format!("/{SUMMARY_PLACEHOLDER}/"));
        out.push(String::new());
        out.push(format!("### Contributors ({})", changelog.contributors.len()));
        out.push(String::new());
        let links: Vec<String> = changelog
            .contributors
            .iter()
            .map(|name| format!("[{name}]({})", contributor_url(name)))
            .collect();
        out.push(links.join(", "));
        out.push(String::new());
        out.push("### Changelog".to_string());
        out.push(String::new());
        out.push(format!("**Issues**: {} issues resolved.", changelog.issue_count));
        out.push(String::new());
        out.push(format!(
            "Changes since [{from}]({release}):",
            from = changelog.from_ref,
            release = release_url(&changelog.project, &changelog.from_ref),
        ));
        out.push(String::new());

        for (category, changes) in group_by_category(&changelog.changes) {
            out.push(format!("#### {category}"));
            out.push(String::new());
            for change in changes {
                let summary = link_issue_refs(&change.summary, |nid| format!("[#{nid}]({})", change.issue_link));
                out.push(format!("* {summary}"));
            }
            out.push(String::new());
        }

        let records: Vec<_> = changelog
            .change_records
            .iter()
            .filter(|record| !record.title.is_empty() && !record.url.is_empty())
            .collect();
        if !records.is_empty() {
            out.push("### Change Records".to_string());
            out.push(String::new());
            for record in records {
                out.push(format!("* [{}]({})", record.title, record.url));
            }
            out.push(String::new());
        }

        Ok(out.join("\n"))
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=UTF-8"
    }
}
