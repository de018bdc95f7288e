use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefCommit {
    pub id: String,
    pub short_id: String,
    pub title: String,
    pub committed_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub name: String,
    pub message: Option<String>,
    pub target: Option<String>,
    pub protected: bool,
    pub commit: Option<RefCommit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branch {
    pub name: String,
    pub merged: bool,
    pub protected: bool,
    pub default: bool,
    pub commit: Option<RefCommit>,
}

/// A user returned by the repository host's directory search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMatch {
    pub username: String,
    #[serde(rename = "name", default)]
    pub display_name: String,
}

/// Tags and branches of a project, as printed by `relnotes refs`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectRefs {
    pub tags: Vec<Tag>,
    pub branches: Vec<Branch>,
}
