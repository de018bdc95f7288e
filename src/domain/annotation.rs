//! Issue and contributor annotations embedded in commit text.
//!
//! Commits in this ecosystem have been written under several conventions
//! over the years:
//!
//! - `Issue #123 by alice, bob: Summary` (classic inline credit)
//! - `Authored-by: name <email>` and `Co-authored-by: name <email>` trailers
//! - `By: name` / `By: @name` trailers, one per line
//!
//! Everything here is pure and deterministic.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, AppResult};

static HASH_ISSUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)").expect("Invalid issue reference regex"));

static BARE_ISSUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4,}").expect("Invalid bare issue number regex"));

// The credit list must directly follow an issue reference (`#123` or a bare
// number of four or more digits) and end in a colon on the same line, so
// prose like "vary by access result" never matches.
static CLASSIC_CREDIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:#\d+|\b\d{4,})\S*[ \t]+by[ \t]+([^:\r\n]+):")
        .expect("Invalid classic credit regex")
});

static AUTHORED_TRAILER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[ \t]*(?:co-)?authored-by:[ \t]*([^<\r\n]+?)[ \t]*(?:<[^>\r\n]*>)?[ \t]*$")
        .expect("Invalid authored-by trailer regex")
});

static BY_TRAILER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*By:[ \t]*@?([^\r\n]+?)[ \t]*$").expect("Invalid by trailer regex")
});

const SUMMARY_NOISE: [&str; 3] = ["Patch ", "- ", "Issue "];
const MAX_NOISE_PREFIXES: usize = 3;

/// Finds the issue id a commit title refers to.
///
/// `#<digits>` wins; otherwise the first run of four or more digits.
pub fn extract_issue_id(title: &str) -> Option<String> {
    if let Some(captures) = HASH_ISSUE_RE.captures(title) {
        return Some(captures[1].to_string());
    }
    BARE_ISSUE_RE.find(title).map(|m| m.as_str().to_string())
}

/// Collects contributor handles credited by the title and message.
///
/// Names come back in discovery order: classic credits first (title, then
/// message), then trailers in message order. With `sort` set the result is
/// sorted ascending.
///
/// Repeats are dropped here, keeping the first occurrence, so callers never
/// see the raw union with duplicates in it.
pub fn extract_contributors(title: &str, message: &str, sort: bool) -> Vec<String> {
    let mut names = Vec::new();

    for text in [title, message] {
        for captures in CLASSIC_CREDIT_RE.captures_iter(text) {
            names.extend(captures[1].split(',').map(str::to_string));
        }
    }

    for line in message.lines() {
        if let Some(captures) = AUTHORED_TRAILER_RE.captures(line) {
            names.push(captures[1].to_string());
        } else if let Some(captures) = BY_TRAILER_RE.captures(line) {
            names.push(captures[1].to_string());
        }
    }

    let mut seen = HashSet::new();
    let mut contributors: Vec<String> = names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.clone()))
        .collect();

    if sort {
        contributors.sort();
    }
    contributors
}

/// Strips up to three leading `Patch `, `- ` or `Issue ` prefixes.
pub fn strip_summary_noise(title: &str) -> &str {
    let mut summary = title;
    for _ in 0..MAX_NOISE_PREFIXES {
        match SUMMARY_NOISE.iter().find_map(|prefix| summary.strip_prefix(prefix)) {
            Some(rest) => summary = rest,
            None => break,
        }
    }
    summary
}

/// Matches machine-generated commit e-mails such as
/// `40491-svendecabooter@users.noreply.drupalcode.org`.
#[derive(Debug, Clone)]
pub struct NoreplyPattern {
    regex: Regex,
}

impl NoreplyPattern {
    pub fn new(domain: &str) -> AppResult<Self> {
        let pattern = format!(r"[0-9]-([a-zA-Z0-9_.\-]{{2,255}})@{}", regex::escape(domain));
        let regex = Regex::new(&pattern).map_err(|err| {
            AppError::Configuration(format!("invalid noreply domain '{domain}': {err}"))
        })?;
        Ok(Self { regex })
    }

    pub fn handle(&self, email: &str) -> Option<String> {
        self.regex
            .captures(email)
            .map(|captures| captures[1].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIC: &str = "Issue #3294296 by mrinalini9, Lal_: Drupal 10 readiness for the module";

    #[test]
    fn issue_id_from_hash_reference() {
        assert_eq!(extract_issue_id(CLASSIC).as_deref(), Some("3294296"));
        assert_eq!(
            extract_issue_id("[#3542407] feat: Code cleanup").as_deref(),
            Some("3542407")
        );
        assert_eq!(
            extract_issue_id("fix(widgets): mglaman/drupal-mrn#3521641 AJAX race condition").as_deref(),
            Some("3521641")
        );
    }

    #[test]
    fn issue_id_from_bare_number() {
        assert_eq!(extract_issue_id("Fix issue 3178420").as_deref(), Some("3178420"));
        assert_eq!(extract_issue_id("Bump to 8.x-1.9"), None);
    }

    #[test]
    fn issue_id_absent() {
        assert_eq!(extract_issue_id("Some random code changes without an nid"), None);
    }

    #[test]
    fn classic_credit_keeps_discovery_order() {
        assert_eq!(extract_contributors(CLASSIC, CLASSIC, false), ["mrinalini9", "Lal_"]);
    }

    #[test]
    fn classic_credit_sorted() {
        assert_eq!(extract_contributors(CLASSIC, CLASSIC, true), ["Lal_", "mrinalini9"]);
    }

    #[test]
    fn authored_by_trailer_drops_email() {
        let message = "[#3542407] feat: Code cleanup\n\nAuthored-by: svendecabooter <40491-svendecabooter@users.noreply.drupalcode.org>";
        assert_eq!(
            extract_contributors("[#3542407] feat: Code cleanup", message, false),
            ["svendecabooter"]
        );
    }

    #[test]
    fn co_authored_by_trailers() {
        let message = "[#3542407] feat: Code cleanup\n\nCo-authored-by: user1 <user1@example.com>\nCo-authored-by: user2 <user2@example.com>";
        assert_eq!(
            extract_contributors("[#3542407] feat: Code cleanup", message, true),
            ["user1", "user2"]
        );
        assert_eq!(extract_contributors("", message, true), ["user1", "user2"]);
    }

    #[test]
    fn mixed_conventions_deduplicate() {
        let title = "Issue #123 by userA, userB: Fix stuff.";
        let message = format!(
            "{title}\n\nCo-authored-by: userA <userA@example.com>\nAuthored-by: userD <userD@example.com>"
        );
        assert_eq!(extract_contributors(title, &message, true), ["userA", "userB", "userD"]);
    }

    #[test]
    fn no_attribution() {
        let text = "A commit with no user attribution";
        assert!(extract_contributors(text, text, false).is_empty());
    }

    #[test]
    fn by_trailer() {
        assert_eq!(
            extract_contributors("feat: A new feature", "feat: A new feature\n\nBy: smustgrave", false),
            ["smustgrave"]
        );
    }

    #[test]
    fn by_in_prose_is_not_a_credit() {
        let title = "[#3531858] fix(Internal HTTP API): CanvasController's response must vary by access result cacheability";
        let message = format!("{title}\n\nBy: wim leers\nBy: mglaman\nBy: penyaskito");
        assert_eq!(
            extract_contributors(title, &message, false),
            ["wim leers", "mglaman", "penyaskito"]
        );
    }

    #[test]
    fn by_in_prose_before_a_later_colon_is_not_a_credit() {
        let title = "Improve caching by using tags: faster rebuilds";
        assert!(extract_contributors(title, title, false).is_empty());
    }

    #[test]
    fn classic_credit_after_bare_issue_number() {
        let title = "Issue 3178420 by alice, bob: Fix the widget";
        assert_eq!(extract_contributors(title, title, true), ["alice", "bob"]);
    }

    #[test]
    fn short_numbers_do_not_anchor_a_credit() {
        let title = "Bump to 1.2 by default: faster rebuilds";
        assert!(extract_contributors(title, title, false).is_empty());
    }

    #[test]
    fn by_trailer_strips_at_prefix() {
        let title = "fix(Redux-integrated field widgets): mglaman/drupal-mrn#3521641 AJAX race condition";
        let message = format!("{title}\n\nBy: @bnjmnm\nBy: @larowlan\nBy: @wimleers\nBy: @hooroomoo\nBy: @mglaman");
        assert_eq!(
            extract_contributors(title, &message, true),
            ["bnjmnm", "hooroomoo", "larowlan", "mglaman", "wimleers"]
        );
    }

    #[test]
    fn old_and_new_formats_merge() {
        let title = "Issue #123 by userA, userB: Fix stuff.";
        let message = format!("{title}\n\nBy: @userA\nBy: @userC");
        assert_eq!(extract_contributors(title, &message, true), ["userA", "userB", "userC"]);
    }

    #[test]
    fn trailers_tolerate_crlf() {
        let message = "feat: thing\r\n\r\nBy: alice\r\nCo-authored-by: bob <bob@example.com>\r\n";
        assert_eq!(extract_contributors("feat: thing", message, false), ["alice", "bob"]);
    }

    #[test]
    fn strips_bounded_noise_prefixes() {
        assert_eq!(
            strip_summary_noise(CLASSIC),
            "#3294296 by mrinalini9, Lal_: Drupal 10 readiness for the module"
        );
        assert_eq!(strip_summary_noise("Patch - Issue #1: x"), "#1: x");
        assert_eq!(strip_summary_noise("Issue Issue Issue Issue #1"), "Issue #1");
        assert_eq!(strip_summary_noise("issue #1"), "issue #1");
        assert_eq!(strip_summary_noise("Fix Issue #1"), "Fix Issue #1");
    }

    #[test]
    fn noreply_handle() {
        let pattern = NoreplyPattern::new("users.noreply.drupalcode.org").unwrap();
        assert_eq!(
            pattern
                .handle("40491-svendecabooter@users.noreply.drupalcode.org")
                .as_deref(),
            Some("svendecabooter")
        );
        assert_eq!(
            pattern.handle("123-some.user-name@users.noreply.drupalcode.org").as_deref(),
            Some("some.user-name")
        );
        assert_eq!(pattern.handle("nmd.matt@gmail.com"), None);
        assert_eq!(pattern.handle("12-a@users.noreply.drupalcode.org"), None);
        assert_eq!(pattern.handle("40491-someone@users.noreply.example.org"), None);
    }
}
