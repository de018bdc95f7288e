use serde::Serialize;

use crate::domain::changelog::{ChangeEntry, ChangeRecord, ChangelogAggregate};
use crate::error::{AppError, AppResult};

use super::Renderer;

pub struct JsonRenderer;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonChangelog<'a> {
    contributors: &'a [String],
    issue_count: usize,
    from: &'a str,
    to: &'a str,
    changes: &'a [ChangeEntry],
    change_records: &'a [ChangeRecord],
}

impl Renderer for JsonRenderer {
    fn format(&self, changelog: &ChangelogAggregate) -> AppResult<String> {
        let document = JsonChangelog {
            contributors: &changelog.contributors,
            issue_count: changelog.issue_count,
            from: &changelog.from_ref,
            to: &changelog.to_ref,
            changes: &changelog.changes,
            change_records: &changelog.change_records,
        };
        serde_json::to_string(&document).map_err(|err| AppError::Render(err.to_string()))
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::changelog::Category;
    use crate::render::fixtures;

    #[test]
    fn renders_views_remote_data_release() {
        let changelog = fixtures::views_remote_data(vec![fixtures::change_record()]);
        let rendered: Value = serde_json::from_str(&JsonRenderer.format(&changelog).unwrap()).unwrap();

        assert_eq!(
            rendered,
            json!({
                "contributors": ["Lal_", "mglaman", "mrinalini9"],
                "issueCount": 1,
                "from": "1.0.1",
                "to": "1.0.2",
                "changes": [{
                    "nid": "3294296",
                    "link": "https://www.drupal.org/i/3294296",
                    "type": "Task",
                    "summary": "#3294296 by mrinalini9, Lal_: Drupal 10 readiness for the module",
                    "contributors": ["Lal_", "mglaman", "mrinalini9"]
                }],
                "changeRecords": [{
                    "nid": "1234567",
                    "title": "Test change record for views_remote_data",
                    "url": "https://www.drupal.org/node/1234567",
                    "targetVersion": "1.0.2"
                }]
            })
        );
    }

    #[test]
    fn entries_without_issue_have_null_nid() {
        let mut changelog = fixtures::views_remote_data(Vec::new());
        changelog.changes = vec![ChangeEntry::new(None, Category::Misc, "Tidy".to_string(), vec![])];

        let rendered: Value = serde_json::from_str(&JsonRenderer.format(&changelog).unwrap()).unwrap();

        assert_eq!(rendered["changes"][0]["nid"], Value::Null);
        assert_eq!(rendered["changes"][0]["link"], "");
        assert_eq!(rendered["changes"][0]["type"], "Misc");
        assert_eq!(rendered["changeRecords"], json!([]));
    }
}
