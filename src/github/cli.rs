//! `RfcSource` implementation that shells out to the `gh` CLI.
//!
//! `gh` owns authentication; every call is a `gh api` subprocess whose JSON
//! stdout is parsed here. Reads go through the response cache when one is
//! configured.

use std::process::Command;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::cache::{
    ResponseCache, TTL_COMMENT_COUNT, TTL_CONTENT, TTL_REPOS, TTL_RFC_LIST, TTL_USER,
};
use super::{
    RFC_DIRECTORIES, RepoRef, RfcDetail, RfcKey, RfcSource, RfcStatus, RfcSummary, clean_title,
    is_rfc_markdown_path, merge_comments, merge_reviewers, sort_rfcs,
};
use crate::comments::Comment;
use crate::telemetry;

const PULL_REQUESTS_QUERY: &str = r"
query($owner: String!, $repo: String!) {
  repository(owner: $owner, name: $repo) {
    pullRequests(first: 100, orderBy: {field: CREATED_AT, direction: DESC}, states: [OPEN, CLOSED, MERGED]) {
      nodes {
        number
        title
        state
        createdAt
        updatedAt
        mergedAt
        url
        author { login avatarUrl }
        files(first: 100) { nodes { path } }
        comments { totalCount }
        reviewRequests(first: 10) {
          nodes { requestedReviewer { ... on User { login } } }
        }
      }
    }
  }
}
";

/// Client that invokes the `gh` binary as a subprocess.
pub struct GhCliClient {
    cache: Option<Mutex<ResponseCache>>,
}

impl GhCliClient {
    #[must_use]
    pub fn new(cache: Option<ResponseCache>) -> Self {
        Self {
            cache: cache.map(Mutex::new),
        }
    }

    /// Run `gh <args>` and return stdout bytes.
    fn run_gh(args: &[&str]) -> Result<Vec<u8>> {
        let output = Command::new("gh")
            .args(args)
            .output()
            .context("Failed to run `gh`; is the GitHub CLI installed and on PATH?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "gh {} failed (exit {}): {}",
                args.first().copied().unwrap_or_default(),
                output.status,
                stderr.trim()
            );
        }

        Ok(output.stdout)
    }

    fn api<T: DeserializeOwned>(endpoint: &str) -> Result<T> {
        let stdout = Self::run_gh(&["api", endpoint])?;
        serde_json::from_slice(&stdout).with_context(|| format!("Failed to parse `gh api {endpoint}` JSON"))
    }

    /// `gh api --paginate` for a list endpoint, with every page merged.
    fn api_pages<T: DeserializeOwned>(endpoint: &str) -> Result<Vec<T>> {
        let stdout = Self::run_gh(&["api", "--paginate", endpoint])?;
        parse_pages(&stdout).with_context(|| format!("Failed to parse `gh api {endpoint}` JSON"))
    }

    /// Serve `key` from the cache or compute it with `fetch` and store it.
    /// Cache failures are recorded and treated as misses.
    fn cached<T, F>(&self, key: &str, ttl: u64, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T>,
    {
        if let Some(cache) = &self.cache {
            if let Ok(cache) = cache.lock() {
                match cache.get_json::<T>(key) {
                    Ok(Some(hit)) => return Ok(hit),
                    Ok(None) => {}
                    Err(err) => {
                        telemetry::capture_anyhow(&err, None, &[("cache_key", key), ("op", "get")]);
                    }
                }
            }
        }

        let value = fetch()?;

        if let Some(cache) = &self.cache {
            if let Ok(cache) = cache.lock() {
                if let Err(err) = cache.set_json(key, &value, ttl) {
                    telemetry::capture_anyhow(&err, None, &[("cache_key", key), ("op", "set")]);
                }
            }
        }
        Ok(value)
    }

    /// Which RFC directory `repo` has, if any.
    fn rfc_directory(&self, repo: &RepoRef) -> Option<String> {
        let key = format!("repo_rfcs_dir:{}:{}", repo.owner, repo.name);
        let found = self.cached(&key, TTL_REPOS, || {
            let dir = RFC_DIRECTORIES
                .iter()
                .find(|dir| {
                    Self::run_gh(&["api", &format!("repos/{repo}/contents/{dir}")]).is_ok()
                })
                .map_or_else(String::new, |dir| (*dir).to_string());
            Ok(dir)
        });
        found.ok().filter(|dir| !dir.is_empty())
    }

    fn review_comment_count(&self, repo: &RepoRef, number: u64) -> Result<u64> {
        let key = format!("rfc:{}:{}:{number}:review_comments_count", repo.owner, repo.name);
        self.cached(&key, TTL_COMMENT_COUNT, || {
            let endpoint = format!("repos/{repo}/pulls/{number}/comments?per_page=100");
            let stdout = Self::run_gh(&["api", "--paginate", "--jq", "length", &endpoint])?;
            Ok(sum_page_counts(&String::from_utf8_lossy(&stdout)))
        })
    }

    fn pull_request_nodes(&self, repo: &RepoRef) -> Result<Vec<PullNode>> {
        let key = format!("rfcs:{}:{}:graphql", repo.owner, repo.name);
        self.cached(&key, TTL_RFC_LIST, || {
            let stdout = Self::run_gh(&[
                "api",
                "graphql",
                "-f",
                &format!("query={PULL_REQUESTS_QUERY}"),
                "-f",
                &format!("owner={}", repo.owner),
                "-f",
                &format!("repo={}", repo.name),
            ])?;
            parse_pull_nodes(&stdout)
        })
    }

    fn rfc_content(&self, key: &RfcKey) -> Result<CachedContent> {
        let cache_key = format!("rfc:{}:{}:{}:content", key.repo.owner, key.repo.name, key.number);
        self.cached(&cache_key, TTL_CONTENT, || {
            let pr: RestPull = Self::api(&format!("repos/{}/pulls/{}", key.repo, key.number))?;
            let files: Vec<RestFile> =
                Self::api_pages(&format!("repos/{}/pulls/{}/files?per_page=100", key.repo, key.number))?;

            let markdown_file = files
                .iter()
                .find(|f| is_rfc_markdown_path(&f.filename))
                .map(|f| f.filename.clone());
            let mut markdown_content = pr.body.clone().unwrap_or_default();

            if let Some(path) = &markdown_file {
                let endpoint = format!("repos/{}/contents/{path}?ref={}", key.repo, pr.head.sha);
                match Self::run_gh(&["api", "-H", "Accept: application/vnd.github.raw", &endpoint]) {
                    Ok(raw) => markdown_content = String::from_utf8_lossy(&raw).into_owned(),
                    Err(err) => {
                        let number = key.number.to_string();
                        let repo = key.repo.to_string();
                        telemetry::capture_anyhow(
                            &err,
                            None,
                            &[
                                ("function", "fetch_rfc_detail"),
                                ("subfunction", "fetch_markdown_content"),
                                ("repo", &repo),
                                ("number", &number),
                                ("markdown_file", path),
                            ],
                        );
                    }
                }
            }

            Ok(CachedContent {
                pr,
                markdown_content,
                markdown_file_path: markdown_file,
            })
        })
    }

    fn comments_uncached(key: &RfcKey) -> Result<Vec<Comment>> {
        let review: Vec<RestReviewComment> =
            Self::api_pages(&format!("repos/{}/pulls/{}/comments?per_page=100", key.repo, key.number))?;
        let issue: Vec<RestIssueComment> =
            Self::api_pages(&format!("repos/{}/issues/{}/comments?per_page=100", key.repo, key.number))?;
        Ok(merge_comments(
            review.into_iter().map(Comment::from).collect(),
            issue.into_iter().map(Comment::from).collect(),
        ))
    }
}

impl RfcSource for GhCliClient {
    fn current_user(&self) -> Result<String> {
        self.cached("user:gh", TTL_USER, || {
            let user: RestUser = Self::api("user")?;
            Ok(user.login)
        })
        .context("Failed to fetch the current user")
    }

    fn list_repos_with_rfcs(&self) -> Result<Vec<RepoRef>> {
        self.cached("repos_with_rfcs:gh", TTL_REPOS, || {
            let repos: Vec<RestRepo> = Self::api(
                "user/repos?per_page=100&sort=updated&affiliation=owner,organization_member",
            )?;
            Ok(repos
                .into_iter()
                .map(|r| RepoRef::new(r.owner.login, r.name))
                .filter(|repo| self.rfc_directory(repo).is_some())
                .collect())
        })
        .context("Failed to list repositories with RFCs")
    }

    fn list_rfcs(&self, repo: &RepoRef, current_user: &str) -> Result<Vec<RfcSummary>> {
        let nodes = self
            .pull_request_nodes(repo)
            .with_context(|| format!("Failed to list RFCs in {repo}"))?;

        let mut rfcs = Vec::new();
        for node in nodes.into_iter().filter(PullNode::touches_rfc) {
            let inline = self.review_comment_count(repo, node.number).unwrap_or_else(|err| {
                telemetry::capture_anyhow(&err, Some(current_user), &[("function", "review_comment_count")]);
                0
            });
            rfcs.push(node.into_summary(repo, current_user, inline));
        }
        sort_rfcs(&mut rfcs);
        Ok(rfcs)
    }

    fn fetch_rfc_detail(&self, key: &RfcKey, current_user: &str) -> Result<RfcDetail> {
        let context = || format!("Failed to fetch RFC {key}");
        let content = self.rfc_content(key).with_context(context)?;
        let comments = Self::comments_uncached(key).with_context(context)?;
        let requested: RestRequestedReviewers =
            Self::api(&format!("repos/{}/pulls/{}/requested_reviewers", key.repo, key.number))
                .with_context(context)?;
        let reviews: Vec<RestReview> =
            Self::api_pages(&format!("repos/{}/pulls/{}/reviews?per_page=100", key.repo, key.number))
                .with_context(context)?;

        let review_requested = requested.users.iter().any(|u| u.login == current_user);
        let reviewers = merge_reviewers(
            reviews
                .into_iter()
                .filter_map(|r| r.user)
                .map(|u| (u.login, u.avatar_url)),
            requested.users.into_iter().map(|u| (u.login, u.avatar_url)),
        );

        let pr = content.pr;
        let author = pr.user.clone().unwrap_or_default();
        let summary = RfcSummary {
            number: pr.number,
            title: clean_title(&pr.title),
            author: if author.login.is_empty() {
                "unknown".to_string()
            } else {
                author.login
            },
            author_avatar: author.avatar_url,
            status: RfcStatus::from_state(&pr.state, pr.merged_at.is_some()),
            created_at: pr.created_at,
            updated_at: pr.updated_at,
            comment_count: pr.comments + pr.review_comments,
            inline_comment_count: pr.review_comments,
            regular_comment_count: pr.comments,
            url: pr.html_url,
            repo: key.repo.clone(),
            review_requested,
        };

        Ok(RfcDetail {
            summary,
            body: pr.body.unwrap_or_default(),
            markdown_content: content.markdown_content,
            markdown_file_path: content.markdown_file_path,
            reviewers,
            comments,
        })
    }

    fn fetch_comments(&self, key: &RfcKey) -> Result<Vec<Comment>> {
        Self::comments_uncached(key).with_context(|| format!("Failed to fetch comments for {key}"))
    }

    fn post_comment(
        &self,
        key: &RfcKey,
        body: &str,
        path: Option<&str>,
        line: Option<u32>,
    ) -> Result<()> {
        let body_field = format!("body={body}");
        let result = match (path, line) {
            (Some(path), Some(line)) => {
                Self::api::<RestPull>(&format!("repos/{}/pulls/{}", key.repo, key.number)).and_then(|pr| {
                    Self::run_gh(&[
                        "api",
                        "-X",
                        "POST",
                        &format!("repos/{}/pulls/{}/comments", key.repo, key.number),
                        "-f",
                        &body_field,
                        "-f",
                        &format!("commit_id={}", pr.head.sha),
                        "-f",
                        &format!("path={path}"),
                        "-F",
                        &format!("line={line}"),
                    ])
                })
            }
            _ => Self::run_gh(&[
                "api",
                "-X",
                "POST",
                &format!("repos/{}/issues/{}/comments", key.repo, key.number),
                "-f",
                &body_field,
            ]),
        };
        result.with_context(|| format!("Failed to post comment on {key} (line {line:?})"))?;
        log::info!("posted comment on {key} line={line:?}");
        Ok(())
    }
}

/// `gh api --paginate` prints each page's JSON array back to back.
fn parse_pages<T: DeserializeOwned>(output: &[u8]) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for page in serde_json::Deserializer::from_slice(output).into_iter::<Vec<T>>() {
        items.extend(page?);
    }
    Ok(items)
}

/// `gh api --paginate --jq length` prints one count per page.
fn sum_page_counts(output: &str) -> u64 {
    output
        .lines()
        .filter_map(|line| line.trim().parse::<u64>().ok())
        .sum()
}

// -- Intermediate serde types for the GraphQL pull request listing --

#[derive(Deserialize)]
struct GraphQlResponse {
    data: GraphQlData,
}

#[derive(Deserialize)]
struct GraphQlData {
    repository: GraphQlRepository,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRepository {
    pull_requests: Nodes<PullNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullNode {
    number: u64,
    title: String,
    state: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
    url: String,
    author: Option<GraphQlAuthor>,
    files: Nodes<GraphQlFile>,
    comments: TotalCount,
    review_requests: Option<Nodes<ReviewRequest>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlAuthor {
    login: String,
    avatar_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphQlFile {
    path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    total_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRequest {
    requested_reviewer: Option<RequestedReviewer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RequestedReviewer {
    login: Option<String>,
}

fn parse_pull_nodes(json: &[u8]) -> Result<Vec<PullNode>> {
    let response: GraphQlResponse =
        serde_json::from_slice(json).context("Failed to parse pull request GraphQL JSON")?;
    Ok(response.data.repository.pull_requests.nodes)
}

impl PullNode {
    fn touches_rfc(&self) -> bool {
        self.files.nodes.iter().any(|f| is_rfc_markdown_path(&f.path))
    }

    fn review_requested(&self, current_user: &str) -> bool {
        self.review_requests.as_ref().is_some_and(|requests| {
            requests.nodes.iter().any(|r| {
                r.requested_reviewer
                    .as_ref()
                    .and_then(|reviewer| reviewer.login.as_deref())
                    == Some(current_user)
            })
        })
    }

    fn into_summary(self, repo: &RepoRef, current_user: &str, inline_count: u64) -> RfcSummary {
        let review_requested = self.review_requested(current_user);
        let regular = self.comments.total_count;
        let (author, author_avatar) = self
            .author
            .map_or_else(|| ("unknown".to_string(), String::new()), |a| (a.login, a.avatar_url));
        RfcSummary {
            number: self.number,
            title: clean_title(&self.title),
            author,
            author_avatar,
            status: RfcStatus::from_state(&self.state, self.merged_at.is_some()),
            created_at: self.created_at,
            updated_at: self.updated_at,
            comment_count: inline_count + regular,
            inline_comment_count: inline_count,
            regular_comment_count: regular,
            url: self.url,
            repo: repo.clone(),
            review_requested,
        }
    }
}

// -- Intermediate serde types for REST endpoints --

#[derive(Deserialize)]
struct RestUser {
    login: String,
}

#[derive(Deserialize)]
struct RestRepo {
    name: String,
    owner: RestUser,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RestAccount {
    #[serde(default)]
    login: String,
    #[serde(default)]
    avatar_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RestHead {
    sha: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RestPull {
    number: u64,
    title: String,
    state: String,
    body: Option<String>,
    merged_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    html_url: String,
    user: Option<RestAccount>,
    head: RestHead,
    #[serde(default)]
    comments: u64,
    #[serde(default)]
    review_comments: u64,
}

#[derive(Deserialize)]
struct RestFile {
    filename: String,
}

#[derive(Serialize, Deserialize)]
struct CachedContent {
    pr: RestPull,
    markdown_content: String,
    markdown_file_path: Option<String>,
}

#[derive(Deserialize)]
struct RestReviewComment {
    id: u64,
    user: Option<RestAccount>,
    body: Option<String>,
    created_at: DateTime<Utc>,
    path: Option<String>,
    line: Option<u32>,
    original_line: Option<u32>,
}

#[derive(Deserialize)]
struct RestIssueComment {
    id: u64,
    user: Option<RestAccount>,
    body: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RestRequestedReviewers {
    #[serde(default)]
    users: Vec<RestAccount>,
}

#[derive(Deserialize)]
struct RestReview {
    user: Option<RestAccount>,
}

fn account_parts(user: Option<RestAccount>) -> (String, String) {
    match user {
        Some(user) if !user.login.is_empty() => (user.login, user.avatar_url),
        _ => ("unknown".to_string(), String::new()),
    }
}

impl From<RestReviewComment> for Comment {
    fn from(c: RestReviewComment) -> Self {
        let (author, author_avatar) = account_parts(c.user);
        Self {
            id: c.id,
            author,
            author_avatar,
            body: c.body.unwrap_or_default(),
            created_at: c.created_at,
            path: c.path,
            line: c.line.or(c.original_line),
        }
    }
}

impl From<RestIssueComment> for Comment {
    fn from(c: RestIssueComment) -> Self {
        let (author, author_avatar) = account_parts(c.user);
        Self {
            id: c.id,
            author,
            author_avatar,
            body: c.body.unwrap_or_default(),
            created_at: c.created_at,
            path: None,
            line: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPHQL_FIXTURE: &str = r#"{
      "data": {"repository": {"pullRequests": {"nodes": [
        {
          "number": 12, "title": "RFC: Streaming cache", "state": "OPEN",
          "createdAt": "2024-03-02T10:00:00Z", "updatedAt": "2024-03-03T10:00:00Z",
          "mergedAt": null, "url": "https://github.com/acme/rfcs/pull/12",
          "author": {"login": "alice", "avatarUrl": "https://avatars/alice"},
          "files": {"nodes": [{"path": "rfcs/0012-streaming.md"}]},
          "comments": {"totalCount": 3},
          "reviewRequests": {"nodes": [{"requestedReviewer": {"login": "bob"}}, {"requestedReviewer": {}}]}
        },
        {
          "number": 13, "title": "Fix typo", "state": "MERGED",
          "createdAt": "2024-03-04T10:00:00Z", "updatedAt": "2024-03-04T10:00:00Z",
          "mergedAt": "2024-03-05T10:00:00Z", "url": "https://github.com/acme/rfcs/pull/13",
          "author": null,
          "files": {"nodes": [{"path": "src/main.rs"}]},
          "comments": {"totalCount": 0},
          "reviewRequests": {"nodes": []}
        }
      ]}}}
    }"#;

    #[test]
    fn graphql_nodes_map_to_summaries() {
        let nodes = parse_pull_nodes(GRAPHQL_FIXTURE.as_bytes()).expect("parse");
        assert_eq!(nodes.len(), 2);
        let rfcs: Vec<_> = nodes.into_iter().filter(PullNode::touches_rfc).collect();
        assert_eq!(rfcs.len(), 1);

        let repo = RepoRef::new("acme", "rfcs");
        let summary = rfcs[0].clone().into_summary(&repo, "bob", 4);
        assert_eq!(summary.title, "Streaming cache");
        assert_eq!(summary.status, RfcStatus::Open);
        assert_eq!(summary.comment_count, 7);
        assert_eq!(summary.regular_comment_count, 3);
        assert!(summary.review_requested);
        assert!(!rfcs[0].clone().into_summary(&repo, "carol", 0).review_requested);
    }

    #[test]
    fn merged_node_without_author() {
        let nodes = parse_pull_nodes(GRAPHQL_FIXTURE.as_bytes()).expect("parse");
        let summary = nodes[1].clone().into_summary(&RepoRef::new("acme", "rfcs"), "bob", 0);
        assert_eq!(summary.status, RfcStatus::Merged);
        assert_eq!(summary.author, "unknown");
    }

    #[test]
    fn review_comment_falls_back_to_original_line() {
        let json = r#"[
          {"id": 1, "user": {"login": "bob", "avatar_url": "a"}, "body": "hi",
           "created_at": "2024-03-02T10:00:00Z", "path": "rfcs/x.md", "line": null, "original_line": 7},
          {"id": 2, "user": null, "body": null,
           "created_at": "2024-03-01T10:00:00Z", "path": "rfcs/x.md", "line": 3, "original_line": 2}
        ]"#;
        let parsed: Vec<RestReviewComment> = serde_json::from_str(json).expect("parse");
        let comments: Vec<Comment> = parsed.into_iter().map(Comment::from).collect();
        assert_eq!(comments[0].line, Some(7));
        assert_eq!(comments[1].line, Some(3));
        assert_eq!(comments[1].author, "unknown");
        assert_eq!(comments[1].body, "");
    }

    #[test]
    fn issue_comments_are_general() {
        let json = r#"[{"id": 9, "user": {"login": "carol", "avatar_url": "c"}, "body": "lgtm",
                        "created_at": "2024-03-02T10:00:00Z"}]"#;
        let parsed: Vec<RestIssueComment> = serde_json::from_str(json).expect("parse");
        let comment = Comment::from(parsed.into_iter().next().expect("one comment"));
        assert_eq!(comment.line, None);
        assert_eq!(comment.path, None);
        assert_eq!(comment.author, "carol");
    }

    #[test]
    fn page_counts_are_summed() {
        assert_eq!(sum_page_counts("100\n100\n7\n"), 207);
        assert_eq!(sum_page_counts(""), 0);
    }

    #[test]
    fn cached_values_skip_fetch() {
        let client = GhCliClient::new(Some(ResponseCache::open_in_memory().expect("cache")));
        let first: u64 = client.cached("k", 60, || Ok(5)).expect("first");
        let second: u64 = client
            .cached("k", 60, || anyhow::bail!("should not fetch"))
            .expect("second");
        assert_eq!((first, second), (5, 5));
    }

    #[test]
    fn fetch_errors_propagate_without_cache() {
        let client = GhCliClient::new(None);
        let before = telemetry::captured_on_this_thread();
        let result: Result<u64> = client.cached("k", 60, || anyhow::bail!("offline"));
        assert!(result.is_err());
        assert_eq!(telemetry::captured_on_this_thread(), before);
    }

    #[test]
    fn paginated_pages_are_concatenated() {
        let output = br#"[{"id": 1, "user": {"login": "bob", "avatar_url": "b"}, "body": "one",
                           "created_at": "2024-03-02T10:00:00Z"}]
[{"id": 2, "user": null, "body": "two", "created_at": "2024-03-03T10:00:00Z"}]
"#;
        let parsed: Vec<RestIssueComment> = parse_pages(output).expect("parse");
        let bodies: Vec<_> = parsed.into_iter().map(|c| Comment::from(c).body).collect();
        assert_eq!(bodies, vec!["one", "two"]);

        assert!(parse_pages::<RestIssueComment>(b"").expect("empty").is_empty());
        assert!(parse_pages::<RestIssueComment>(b"[]\n[]").expect("empty pages").is_empty());
        assert!(parse_pages::<RestIssueComment>(b"[{\"id\": ").is_err());
    }
}
