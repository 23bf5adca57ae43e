//! GitHub access: RFC discovery, RFC detail, comments.
//!
//! An RFC is a pull request that adds or edits a markdown file under
//! `requests-for-comments/` or `RFCs/`.

pub mod cache;
pub mod cli;
pub mod demo;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::comments::Comment;

pub use cache::ResponseCache;
pub use cli::GhCliClient;
pub use demo::DemoSource;

/// Directories that hold RFC documents, in lookup order.
pub const RFC_DIRECTORIES: [&str; 2] = ["requests-for-comments", "RFCs"];

static TITLE_NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^RFC - |^RFC:? |^Add RFC for |^\[RFC\] | RFC$)")
        .expect("title pattern is valid")
});

/// Repository reference, written `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((owner, name)) = s.trim().split_once('/') else {
            bail!("Expected owner/name, got {s:?}");
        };
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            bail!("Expected owner/name, got {s:?}");
        }
        Ok(Self::new(owner, name))
    }
}

/// Identity of one RFC across repositories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RfcKey {
    pub repo: RepoRef,
    pub number: u64,
}

impl fmt::Display for RfcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repo, self.number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RfcStatus {
    Open,
    Merged,
    Closed,
}

impl RfcStatus {
    /// Merged wins over the raw state.
    #[must_use]
    pub fn from_state(state: &str, merged: bool) -> Self {
        if merged {
            Self::Merged
        } else if state.eq_ignore_ascii_case("open") {
            Self::Open
        } else {
            Self::Closed
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Merged => "merged",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfcSummary {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub author_avatar: String,
    pub status: RfcStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comment_count: u64,
    pub inline_comment_count: u64,
    pub regular_comment_count: u64,
    pub url: String,
    pub repo: RepoRef,
    pub review_requested: bool,
}

impl RfcSummary {
    #[must_use]
    pub fn key(&self) -> RfcKey {
        RfcKey {
            repo: self.repo.clone(),
            number: self.number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
    pub login: String,
    pub avatar: String,
    pub yet_to_review: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfcDetail {
    pub summary: RfcSummary,
    pub body: String,
    pub markdown_content: String,
    pub markdown_file_path: Option<String>,
    pub reviewers: Vec<Reviewer>,
    pub comments: Vec<Comment>,
}

/// Where RFCs and their comments come from.
pub trait RfcSource: Send + Sync {
    /// Login of the authenticated user.
    fn current_user(&self) -> Result<String>;

    /// Repositories that have an RFC directory.
    fn list_repos_with_rfcs(&self) -> Result<Vec<RepoRef>>;

    /// RFC pull requests of one repository, sorted with [`sort_rfcs`].
    fn list_rfcs(&self, repo: &RepoRef, current_user: &str) -> Result<Vec<RfcSummary>>;

    /// RFCs across every repository with an RFC directory.
    fn list_all_rfcs(&self, current_user: &str) -> Result<Vec<RfcSummary>> {
        let mut all = Vec::new();
        for repo in self.list_repos_with_rfcs()? {
            all.extend(self.list_rfcs(&repo, current_user)?);
        }
        sort_rfcs(&mut all);
        Ok(all)
    }

    fn fetch_rfc_detail(&self, key: &RfcKey, current_user: &str) -> Result<RfcDetail>;

    /// Review and issue comments merged in `created_at` order.
    fn fetch_comments(&self, key: &RfcKey) -> Result<Vec<Comment>>;

    /// Post a comment. With both `path` and `line` it becomes a review
    /// comment on that line of the head commit; otherwise an issue comment.
    fn post_comment(
        &self,
        key: &RfcKey,
        body: &str,
        path: Option<&str>,
        line: Option<u32>,
    ) -> Result<()>;
}

/// Strip the usual "RFC" decorations from a pull request title.
#[must_use]
pub fn clean_title(title: &str) -> String {
    TITLE_NOISE_RE.replace(title, "").into_owned()
}

/// Whether `path` is an RFC markdown document.
#[must_use]
pub fn is_rfc_markdown_path(path: &str) -> bool {
    (path.starts_with("requests-for-comments/") || path.to_lowercase().starts_with("rfcs/"))
        && path.ends_with(".md")
}

/// Open first, then RFCs the user is asked to review, then newest first.
pub fn sort_rfcs(rfcs: &mut [RfcSummary]) {
    rfcs.sort_by(compare_rfcs);
}

fn compare_rfcs(a: &RfcSummary, b: &RfcSummary) -> Ordering {
    let a_open = a.status == RfcStatus::Open;
    let b_open = b.status == RfcStatus::Open;
    b_open
        .cmp(&a_open)
        .then(b.review_requested.cmp(&a.review_requested))
        .then(b.created_at.cmp(&a.created_at))
}

/// Merge review and issue comments, oldest first. Ties keep review comments first.
#[must_use]
pub fn merge_comments(review: Vec<Comment>, issue: Vec<Comment>) -> Vec<Comment> {
    let mut all = review;
    all.extend(issue);
    all.sort_by_key(|c| c.created_at);
    all
}

/// Reviewers who already reviewed (first review wins), then requested
/// reviewers who have not reviewed yet.
#[must_use]
pub fn merge_reviewers(
    reviewed: impl IntoIterator<Item = (String, String)>,
    requested: impl IntoIterator<Item = (String, String)>,
) -> Vec<Reviewer> {
    let mut reviewers: Vec<Reviewer> = Vec::new();
    for (login, avatar) in reviewed {
        if !reviewers.iter().any(|r| r.login == login) {
            reviewers.push(Reviewer {
                login,
                avatar,
                yet_to_review: false,
            });
        }
    }
    for (login, avatar) in requested {
        if !reviewers.iter().any(|r| r.login == login) {
            reviewers.push(Reviewer {
                login,
                avatar,
                yet_to_review: true,
            });
        }
    }
    reviewers
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn summary(number: u64, status: RfcStatus, requested: bool, day: u32) -> RfcSummary {
        let at = Utc
            .with_ymd_and_hms(2024, 3, day, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        RfcSummary {
            number,
            title: format!("RFC {number}"),
            author: "alice".to_string(),
            author_avatar: String::new(),
            status,
            created_at: at,
            updated_at: at,
            comment_count: 0,
            inline_comment_count: 0,
            regular_comment_count: 0,
            url: format!("https://github.com/acme/rfcs/pull/{number}"),
            repo: RepoRef::new("acme", "rfcs"),
            review_requested: requested,
        }
    }

    #[test]
    fn cleans_title_decorations() {
        assert_eq!(clean_title("RFC - New cache"), "New cache");
        assert_eq!(clean_title("rfc: New cache"), "New cache");
        assert_eq!(clean_title("RFC New cache"), "New cache");
        assert_eq!(clean_title("Add RFC for tracing"), "tracing");
        assert_eq!(clean_title("[RFC] Plugins"), "Plugins");
        assert_eq!(clean_title("Plugins RFC"), "Plugins");
        assert_eq!(clean_title("Plain title"), "Plain title");
    }

    #[test]
    fn detects_rfc_paths() {
        assert!(is_rfc_markdown_path("requests-for-comments/0001-x.md"));
        assert!(is_rfc_markdown_path("RFCs/0002-y.md"));
        assert!(is_rfc_markdown_path("rfcs/0003-z.md"));
        assert!(!is_rfc_markdown_path("Requests-For-Comments/0001-x.md"));
        assert!(!is_rfc_markdown_path("rfcs/image.png"));
        assert!(!is_rfc_markdown_path("docs/rfcs/0001.md"));
    }

    #[test]
    fn sorts_open_then_requested_then_newest() {
        let mut rfcs = vec![
            summary(1, RfcStatus::Merged, true, 9),
            summary(2, RfcStatus::Open, false, 5),
            summary(3, RfcStatus::Open, true, 1),
            summary(4, RfcStatus::Open, false, 7),
            summary(5, RfcStatus::Closed, false, 8),
        ];
        sort_rfcs(&mut rfcs);
        let order: Vec<u64> = rfcs.iter().map(|r| r.number).collect();
        assert_eq!(order, vec![3, 4, 2, 1, 5]);
    }

    #[test]
    fn repo_ref_parses_and_displays() {
        let repo: RepoRef = "acme/rfcs".parse().expect("parse");
        assert_eq!(repo, RepoRef::new("acme", "rfcs"));
        assert_eq!(repo.to_string(), "acme/rfcs");
        assert!("acme".parse::<RepoRef>().is_err());
        assert!("acme/".parse::<RepoRef>().is_err());
        assert!("a/b/c".parse::<RepoRef>().is_err());
    }

    #[test]
    fn status_prefers_merged() {
        assert_eq!(RfcStatus::from_state("closed", true), RfcStatus::Merged);
        assert_eq!(RfcStatus::from_state("OPEN", false), RfcStatus::Open);
        assert_eq!(RfcStatus::from_state("closed", false), RfcStatus::Closed);
    }

    #[test]
    fn reviewers_are_deduplicated() {
        let reviewers = merge_reviewers(
            [
                ("bob".to_string(), "b.png".to_string()),
                ("bob".to_string(), "b.png".to_string()),
            ],
            [
                ("bob".to_string(), "b.png".to_string()),
                ("carol".to_string(), "c.png".to_string()),
            ],
        );
        let view: Vec<(&str, bool)> = reviewers
            .iter()
            .map(|r| (r.login.as_str(), r.yet_to_review))
            .collect();
        assert_eq!(view, vec![("bob", false), ("carol", true)]);
    }

    #[test]
    fn comments_merge_by_time() {
        use crate::comments::tests::comment;
        let merged = merge_comments(
            vec![comment(3, Some(2), "r3"), comment(1, Some(4), "r1")],
            vec![comment(2, None, "i2")],
        );
        let ids: Vec<u64> = merged.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
