//! In-memory `RfcSource` for `--demo` mode and tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use anyhow::{Result, anyhow, bail};
use chrono::{Duration, TimeZone, Utc};

use super::{RepoRef, Reviewer, RfcDetail, RfcKey, RfcSource, RfcStatus, RfcSummary, sort_rfcs};
use crate::comments::Comment;

const DEMO_USER: &str = "demo-user";

const DEMO_RFC: &str = "# RFC 0007: Streaming response cache

## Summary

Cache GitHub API responses on disk so the RFC list opens instantly.
Entries expire after a per-endpoint TTL; see @octocat for the original idea.

## Motivation

- Listing RFCs takes several seconds on large organisations
- Rate limits are hit when many reviewers open the same RFC
- [x] Measure current latency
- [ ] Prototype the cache

## Design

| Endpoint | TTL |
|----------|-----|
| repos    | 600 |
| rfc list | 300 |
| content  | 60  |

```rust
fn get_json<T>(key: &str) -> Option<T> {
    // expired rows are misses
    None
}
```

> Cache failures must never fail a request.

## Open questions

1. Should entries be shared between users?
2. Do we need explicit invalidation after posting?
";

/// Deterministic in-memory RFC store.
pub struct DemoSource {
    user: String,
    repos: Vec<RepoRef>,
    rfcs: Mutex<BTreeMap<(RepoRef, u64), RfcDetail>>,
    next_id: AtomicU64,
    fail_posts: AtomicBool,
    fail_loads: AtomicBool,
}

impl DemoSource {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            user: DEMO_USER.to_string(),
            repos: Vec::new(),
            rfcs: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1000),
            fail_posts: AtomicBool::new(false),
            fail_loads: AtomicBool::new(false),
        }
    }

    /// A store with one repository and a few RFCs.
    #[must_use]
    pub fn seeded() -> Self {
        let mut source = Self::empty();
        let repo = RepoRef::new("acme", "rfcs");
        source.repos.push(repo.clone());

        let base = Utc
            .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let first_comment = Comment {
            id: 1,
            author: "octocat".to_string(),
            author_avatar: String::new(),
            body: "Do we want the TTLs configurable?".to_string(),
            created_at: base + Duration::hours(2),
            path: Some("rfcs/0007-streaming-cache.md".to_string()),
            line: Some(10),
        };
        let general = Comment {
            id: 2,
            author: "hubot".to_string(),
            author_avatar: String::new(),
            body: "Big +1 on this, the list is painfully slow today.".to_string(),
            created_at: base + Duration::hours(3),
            path: None,
            line: None,
        };

        source.insert(RfcDetail {
            summary: demo_summary(&repo, 7, "Streaming response cache", RfcStatus::Open, true, base),
            body: "Adds the streaming cache RFC.".to_string(),
            markdown_content: DEMO_RFC.to_string(),
            markdown_file_path: Some("rfcs/0007-streaming-cache.md".to_string()),
            reviewers: vec![
                Reviewer {
                    login: "octocat".to_string(),
                    avatar: String::new(),
                    yet_to_review: false,
                },
                Reviewer {
                    login: DEMO_USER.to_string(),
                    avatar: String::new(),
                    yet_to_review: true,
                },
            ],
            comments: vec![first_comment, general],
        });
        source.insert(RfcDetail {
            summary: demo_summary(
                &repo,
                5,
                "Plugin loading",
                RfcStatus::Merged,
                false,
                base - Duration::days(20),
            ),
            body: String::new(),
            markdown_content: "# Plugin loading\n\nPlugins are loaded from `~/.plugins`.\n".to_string(),
            markdown_file_path: Some("rfcs/0005-plugins.md".to_string()),
            reviewers: Vec::new(),
            comments: Vec::new(),
        });
        source
    }

    /// Add or replace an RFC.
    pub fn insert(&mut self, detail: RfcDetail) {
        if !self.repos.contains(&detail.summary.repo) {
            self.repos.push(detail.summary.repo.clone());
        }
        if let Ok(rfcs) = self.rfcs.get_mut() {
            rfcs.insert((detail.summary.repo.clone(), detail.summary.number), detail);
        }
    }

    /// Make subsequent posts fail.
    pub fn set_fail_posts(&self, fail: bool) {
        self.fail_posts.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent detail and comment loads fail.
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    fn with_rfc<T>(&self, key: &RfcKey, f: impl FnOnce(&mut RfcDetail) -> T) -> Result<T> {
        let mut rfcs = self.rfcs.lock().map_err(|_| anyhow!("demo store poisoned"))?;
        let detail = rfcs
            .get_mut(&(key.repo.clone(), key.number))
            .ok_or_else(|| anyhow!("RFC {key} not found"))?;
        Ok(f(detail))
    }

    fn check_loads(&self) -> Result<()> {
        if self.fail_loads.load(Ordering::SeqCst) {
            bail!("simulated load failure");
        }
        Ok(())
    }
}

fn demo_summary(
    repo: &RepoRef,
    number: u64,
    title: &str,
    status: RfcStatus,
    review_requested: bool,
    created_at: chrono::DateTime<Utc>,
) -> RfcSummary {
    RfcSummary {
        number,
        title: title.to_string(),
        author: "octocat".to_string(),
        author_avatar: String::new(),
        status,
        created_at,
        updated_at: created_at,
        comment_count: 0,
        inline_comment_count: 0,
        regular_comment_count: 0,
        url: format!("https://github.com/{repo}/pull/{number}"),
        repo: repo.clone(),
        review_requested,
    }
}

impl RfcSource for DemoSource {
    fn current_user(&self) -> Result<String> {
        Ok(self.user.clone())
    }

    fn list_repos_with_rfcs(&self) -> Result<Vec<RepoRef>> {
        Ok(self.repos.clone())
    }

    fn list_rfcs(&self, repo: &RepoRef, _current_user: &str) -> Result<Vec<RfcSummary>> {
        self.check_loads()?;
        let rfcs = self.rfcs.lock().map_err(|_| anyhow!("demo store poisoned"))?;
        let mut list: Vec<RfcSummary> = rfcs
            .values()
            .filter(|d| &d.summary.repo == repo)
            .map(|d| {
                let mut summary = d.summary.clone();
                let inline = d.comments.iter().filter(|c| c.line.is_some()).count() as u64;
                summary.inline_comment_count = inline;
                summary.regular_comment_count = d.comments.len() as u64 - inline;
                summary.comment_count = d.comments.len() as u64;
                summary
            })
            .collect();
        sort_rfcs(&mut list);
        Ok(list)
    }

    fn fetch_rfc_detail(&self, key: &RfcKey, _current_user: &str) -> Result<RfcDetail> {
        self.check_loads()?;
        self.with_rfc(key, |detail| detail.clone())
    }

    fn fetch_comments(&self, key: &RfcKey) -> Result<Vec<Comment>> {
        self.check_loads()?;
        self.with_rfc(key, |detail| detail.comments.clone())
    }

    fn post_comment(
        &self,
        key: &RfcKey,
        body: &str,
        path: Option<&str>,
        line: Option<u32>,
    ) -> Result<()> {
        if self.fail_posts.load(Ordering::SeqCst) {
            bail!("simulated post failure");
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let anchored = path.is_some() && line.is_some();
        let comment = Comment {
            id,
            author: self.user.clone(),
            author_avatar: String::new(),
            body: body.to_string(),
            created_at: Utc::now(),
            path: if anchored { path.map(str::to_string) } else { None },
            line: if anchored { line } else { None },
        };
        self.with_rfc(key, |detail| detail.comments.push(comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_key() -> RfcKey {
        RfcKey {
            repo: RepoRef::new("acme", "rfcs"),
            number: 7,
        }
    }

    #[test]
    fn seeded_store_lists_open_first() {
        let source = DemoSource::seeded();
        let rfcs = source.list_all_rfcs(DEMO_USER).expect("list");
        let numbers: Vec<u64> = rfcs.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![7, 5]);
        assert_eq!(rfcs[0].inline_comment_count, 1);
        assert_eq!(rfcs[0].regular_comment_count, 1);
    }

    #[test]
    fn anchored_post_needs_path_and_line() {
        let source = DemoSource::seeded();
        let key = demo_key();
        source
            .post_comment(&key, "line note", Some("rfcs/0007-streaming-cache.md"), Some(3))
            .expect("post");
        source.post_comment(&key, "no path", None, Some(4)).expect("post");
        let comments = source.fetch_comments(&key).expect("comments");
        let tail: Vec<Option<u32>> = comments.iter().rev().take(2).map(|c| c.line).collect();
        assert_eq!(tail, vec![None, Some(3)]);
    }

    #[test]
    fn injected_failures() {
        let source = DemoSource::seeded();
        let key = demo_key();
        source.set_fail_posts(true);
        assert!(source.post_comment(&key, "x", None, None).is_err());
        source.set_fail_loads(true);
        assert!(source.fetch_comments(&key).is_err());
        assert!(source.fetch_rfc_detail(&key, DEMO_USER).is_err());
    }

    #[test]
    fn unknown_rfc_is_an_error() {
        let source = DemoSource::seeded();
        let key = RfcKey {
            repo: RepoRef::new("acme", "rfcs"),
            number: 99,
        };
        assert!(source.fetch_comments(&key).is_err());
    }
}
