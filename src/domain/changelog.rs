use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Serialize, Serializer};

pub const ISSUE_LINK_BASE: &str = "https://www.drupal.org/i/";

/// Issue category as reported by the tracker's numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Misc,
    Bug,
    Task,
    Feature,
    Support,
    Plan,
}

/// Frozen code table. Index is the tracker's category code.
const CATEGORY_TABLE: [Category; 6] = [
    Category::Misc,
    Category::Bug,
    Category::Task,
    Category::Feature,
    Category::Support,
    Category::Plan,
];

impl Category {
    /// Unknown codes resolve to `Misc`.
    pub fn from_code(code: i64) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|index| CATEGORY_TABLE.get(index).copied())
            .unwrap_or(Category::Misc)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Misc => "Misc",
            Category::Bug => "Bug",
            Category::Task => "Task",
            Category::Feature => "Feature",
            Category::Support => "Support",
            Category::Plan => "Plan",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One line of the changelog, derived from a single commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEntry {
    #[serde(rename = "nid")]
    pub issue_id: Option<String>,
    #[serde(rename = "link")]
    pub issue_link: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub summary: String,
    pub contributors: Vec<String>,
}

impl ChangeEntry {
    pub fn new(
        issue_id: Option<String>,
        category: Category,
        summary: String,
        contributors: Vec<String>,
    ) -> Self {
        let issue_link = issue_id.as_deref().map(issue_link).unwrap_or_default();
        Self {
            issue_id,
            issue_link,
            category,
            summary,
            contributors: normalize_contributors(contributors),
        }
    }
}

/// Advisory notice attached to a project release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    #[serde(rename = "nid")]
    pub issue_id: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "targetVersion")]
    pub target_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogAggregate {
    pub project: String,
    pub from_ref: String,
    pub to_ref: String,
    pub changes: Vec<ChangeEntry>,
    pub contributors: Vec<String>,
    pub issue_count: usize,
    pub change_records: Vec<ChangeRecord>,
}

pub fn issue_link(issue_id: &str) -> String {
    format!("{ISSUE_LINK_BASE}{issue_id}")
}

/// Dedupe and sort ascending (byte order, case-sensitive).
pub fn normalize_contributors<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    names
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Groups entries by category label, labels in alphabetical order.
pub fn group_by_category(changes: &[ChangeEntry]) -> BTreeMap<&'static str, Vec<&ChangeEntry>> {
    let mut grouped: BTreeMap<&'static str, Vec<&ChangeEntry>> = BTreeMap::new();
    for change in changes {
        grouped.entry(change.category.as_str()).or_default().push(change);
    }
    grouped
}
