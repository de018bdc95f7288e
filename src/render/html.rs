use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::domain::changelog::{ChangelogAggregate, group_by_category};
use crate::error::AppResult;

use super::{Renderer, SUMMARY_PLACEHOLDER, contributor_url, link_issue_refs, release_url};

const COMPARE_BASE_URL: &str = "https://git.drupalcode.org/project/";

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn format(&self, changelog: &ChangelogAggregate) -> AppResult<String> {
        let mut out = Vec::new();
        out.push(format!("<p><em>{SUMMARY_PLACEHOLDER}</em></p>"));
        out.push(format!("<h3>Contributors ({})</h3>", changelog.contributors.len()));
        let links: Vec<String> = changelog
            .contributors
            .iter()
            .map(|name| {
                format!(
                    r#"<a href="{}">{}</a>"#,
                    encode_double_quoted_attribute(&contributor_url(name)),
                    encode_text(name)
                )
            })
            .collect();
        out.push(format!("<p>{}</p>", links.join(", ")));
        out.push("<h3>Changelog</h3>".to_string());
        out.push(format!(
            "<p><strong>Issues:</strong> {} issues resolved.</p>",
            changelog.issue_count
        ));
        out.push(format!(
            r#"<p>Changes since <a href="{release}">{from}</a> (<a href="{COMPARE_BASE_URL}{project}/-/compare/{from}...{to}">compare</a>):</p>"#,
            release = release_url(&changelog.project, &changelog.from_ref),
            from = changelog.from_ref,
            project = changelog.project,
            to = changelog.to_ref,
        ));

        for (category, changes) in group_by_category(&changelog.changes) {
            out.push(format!("<h4>{category}</h4>"));
            out.push("<ul>".to_string());
            for change in changes {
                let summary = link_issue_refs(&encode_text(&change.summary), |nid| {
                    format!(r##"<a href="{}">#{nid}</a>"##, change.issue_link)
                });
                out.push(format!("  <li>{summary}</li>"));
            }
            out.push("</ul>".to_string());
        }

        if !changelog.change_records.is_empty() {
            out.push("<h3>Change Records</h3>".to_string());
            out.push("<ul>".to_string());
            for record in &changelog.change_records {
                if record.title.is_empty() || record.url.is_empty() {
                    continue;
                }
                out.push(format!(
                    r#"  <li><a href="{}">{}</a></li>"#,
                    encode_double_quoted_attribute(&record.url),
                    encode_text(&record.title)
                ));
            }
            out.push("</ul>".to_string());
        }

        Ok(out.join("\n"))
    }

    fn content_type(&self) -> &'static str {
        "text/html; charset=UTF-8"
    }
}
