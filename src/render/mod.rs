//! Output formats for an assembled changelog.

mod html;
mod json;
mod markdown;

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::domain::changelog::ChangelogAggregate;
use crate::error::{AppError, AppResult};

pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;

const CONTRIBUTOR_BASE_URL: &str = "https://www.drupal.org/u/";
const PROJECT_BASE_URL: &str = "https://www.drupal.org/project/";
const SUMMARY_PLACEHOLDER: &str = "Add a summary here";

static ISSUE_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)").expect("Invalid issue reference regex"));

pub trait Renderer: Send + Sync {
    fn format(&self, changelog: &ChangelogAggregate) -> AppResult<String>;

    fn content_type(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Markdown,
    Json,
}

const FORMAT_KEYS: [(&str, OutputFormat); 4] = [
    ("json", OutputFormat::Json),
    ("html", OutputFormat::Html),
    ("md", OutputFormat::Markdown),
    ("markdown", OutputFormat::Markdown),
];

static HTML: HtmlRenderer = HtmlRenderer;
static MARKDOWN: MarkdownRenderer = MarkdownRenderer;
static JSON: JsonRenderer = JsonRenderer;

impl OutputFormat {
    pub fn from_key(key: &str) -> AppResult<Self> {
        let key = key.trim();
        FORMAT_KEYS
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, format)| *format)
            .ok_or_else(|| AppError::UnsupportedFormat(key.to_string()))
    }

    pub fn renderer(&self) -> &'static dyn Renderer {
        match self {
            OutputFormat::Html => &HTML,
            OutputFormat::Markdown => &MARKDOWN,
            OutputFormat::Json => &JSON,
        }
    }
}

/// Profile URL of a contributor on drupal.org.
pub fn contributor_url(name: &str) -> String {
    format!("{CONTRIBUTOR_BASE_URL}{}", name.to_lowercase().replace(' ', "-"))
}

fn release_url(project: &str, version: &str) -> String {
    format!("{PROJECT_BASE_URL}{project}/releases/{version}")
}

/// Rewrites every `#<nid>` in a summary with `link`.
fn link_issue_refs(summary: &str, link: impl Fn(&str) -> String) -> String {
    ISSUE_REF_RE
        .replace_all(summary, |captures: &Captures| link(&captures[1]))
        .into_owned()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_format_keys() {
        assert_eq!(OutputFormat::from_key("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_key("html").unwrap(), OutputFormat::Html);
        assert_eq!(OutputFormat::from_key("md").unwrap(), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from_key("markdown").unwrap(), OutputFormat::Markdown);
        assert!(matches!(
            OutputFormat::from_key("xml"),
            Err(AppError::UnsupportedFormat(key)) if key == "xml"
        ));
    }

    #[test]
    fn content_types() {
        assert_eq!(OutputFormat::Html.renderer().content_type(), "text/html; charset=UTF-8");
        assert_eq!(OutputFormat::Markdown.renderer().content_type(), "text/plain; charset=UTF-8");
        assert_eq!(OutputFormat::Json.renderer().content_type(), "application/json");
    }

    #[test]
    fn contributor_alias_is_lowercased_and_dashed() {
        assert_eq!(contributor_url("Lal_"), "https://www.drupal.org/u/lal_");
        assert_eq!(contributor_url("wim leers"), "https://www.drupal.org/u/wim-leers");
    }

    #[test]
    fn links_every_issue_reference() {
        let linked = link_issue_refs("#1 and #22", |nid| format!("[{nid}]"));
        assert_eq!(linked, "[1] and [22]");
    }
}
