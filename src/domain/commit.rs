use serde::{Deserialize, Serialize};

/// One commit as returned by the repository host's compare endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitRecord {
    pub id: String,
    pub title: String,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    pub committer_name: String,
    pub committer_email: String,
}

#[cfg(test)]
impl CommitRecord {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_author(mut self, name: &str, email: &str) -> Self {
        self.author_name = name.to_string();
        self.author_email = email.to_string();
        self
    }

    pub fn with_committer(mut self, name: &str, email: &str) -> Self {
        self.committer_name = name.to_string();
        self.committer_email = email.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_gitlab_commit_with_extra_fields() {
        let raw = r#"{
            "id": "8c1f3e2",
            "short_id": "8c1f3e2",
            "title": "Issue #3294296 by mrinalini9, Lal_: Drupal 10 readiness for the module",
            "message": "Issue #3294296 by mrinalini9, Lal_: Drupal 10 readiness for the module\n",
            "author_name": "Matt Glaman",
            "author_email": "nmd.matt@gmail.com",
            "committer_name": "Matt Glaman",
            "committer_email": "nmd.matt@gmail.com",
            "parent_ids": []
        }"#;
        let commit: CommitRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(commit.author_name, "Matt Glaman");
        assert!(commit.title.starts_with("Issue #3294296"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let commit: CommitRecord = serde_json::from_str(r#"{"title":"Fix"}"#).unwrap();
        assert_eq!(commit.title, "Fix");
        assert!(commit.message.is_empty());
        assert!(commit.committer_email.is_empty());
    }
}
