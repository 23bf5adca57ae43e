//! Comments, threads and the optimistic pending overlay.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A comment as stored on GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub author: String,
    pub author_avatar: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub path: Option<String>,
    pub line: Option<u32>,
}

/// A comment the user submitted that the server has not confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingComment {
    pub local_id: Uuid,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub line: Option<u32>,
}

impl PendingComment {
    #[must_use]
    pub fn new(author: &str, body: &str, line: Option<u32>) -> Self {
        Self {
            local_id: Uuid::new_v4(),
            author: author.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
            line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentEntry {
    Confirmed(Comment),
    Pending(PendingComment),
}

impl CommentEntry {
    #[must_use]
    pub fn author(&self) -> &str {
        match self {
            Self::Confirmed(c) => &c.author,
            Self::Pending(p) => &p.author,
        }
    }

    #[must_use]
    pub fn body(&self) -> &str {
        match self {
            Self::Confirmed(c) => &c.body,
            Self::Pending(p) => &p.body,
        }
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Confirmed(c) => c.created_at,
            Self::Pending(p) => p.created_at,
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Anything that may be anchored to a source line.
pub trait Anchored {
    fn anchor_line(&self) -> Option<u32>;
}

impl Anchored for Comment {
    fn anchor_line(&self) -> Option<u32> {
        self.line
    }
}

impl Anchored for PendingComment {
    fn anchor_line(&self) -> Option<u32> {
        self.line
    }
}

impl Anchored for CommentEntry {
    fn anchor_line(&self) -> Option<u32> {
        match self {
            Self::Confirmed(c) => c.line,
            Self::Pending(p) => p.line,
        }
    }
}

impl<T: Anchored> Anchored for &T {
    fn anchor_line(&self) -> Option<u32> {
        (**self).anchor_line()
    }
}

/// General and anchored items, each in input order.
#[derive(Debug)]
pub struct Partition<'a, T> {
    pub general: Vec<&'a T>,
    pub anchored: Vec<&'a T>,
}

pub fn partition<T: Anchored>(items: &[T]) -> Partition<'_, T> {
    let (anchored, general) = items.iter().partition(|item| item.anchor_line().is_some());
    Partition { general, anchored }
}

/// Group items by line, preserving input order within each line.
pub fn group_by_line<I>(items: I) -> BTreeMap<u32, Vec<I::Item>>
where
    I: IntoIterator,
    I::Item: Anchored,
{
    let mut threads: BTreeMap<u32, Vec<I::Item>> = BTreeMap::new();
    for item in items {
        if let Some(line) = item.anchor_line() {
            threads.entry(line).or_default().push(item);
        }
    }
    threads
}

/// Confirmed comments plus the pending overlay.
///
/// Confirmed entries come first in the order the server returned them
/// (`created_at` ascending); pending ones follow in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentList {
    entries: Vec<CommentEntry>,
}

impl CommentList {
    #[must_use]
    pub fn new(confirmed: Vec<Comment>) -> Self {
        Self {
            entries: confirmed.into_iter().map(CommentEntry::Confirmed).collect(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[CommentEntry] {
        &self.entries
    }

    pub fn add_pending(&mut self, pending: PendingComment) {
        self.entries.push(CommentEntry::Pending(pending));
    }

    /// Drop every pending entry and take `fresh` as the confirmed list.
    pub fn reconcile(&mut self, fresh: Vec<Comment>) {
        *self = Self::new(fresh);
    }

    /// Drop exactly the pending entry with `local_id`. Returns whether it existed.
    pub fn rollback(&mut self, local_id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !matches!(entry, CommentEntry::Pending(p) if p.local_id == local_id));
        self.entries.len() != before
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_pending()).count()
    }

    #[must_use]
    pub fn threads(&self) -> BTreeMap<u32, Vec<&CommentEntry>> {
        group_by_line(self.entries.iter())
    }

    #[must_use]
    pub fn general(&self) -> Vec<&CommentEntry> {
        partition(&self.entries).general
    }

    /// Sorted lines that have at least one entry.
    #[must_use]
    pub fn commented_lines(&self) -> Vec<u32> {
        self.threads().into_keys().collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn comment(id: u64, line: Option<u32>, body: &str) -> Comment {
        Comment {
            id,
            author: "alice".to_string(),
            author_avatar: String::new(),
            body: body.to_string(),
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, id as u32)
                .single()
                .expect("valid timestamp"),
            path: line.map(|_| "rfcs/0001-test.md".to_string()),
            line,
        }
    }

    #[test]
    fn grouping_preserves_order() {
        let comments = vec![
            comment(0, Some(1), "c0"),
            comment(1, None, "c1"),
            comment(2, Some(1), "c2"),
            comment(3, Some(2), "c3"),
        ];
        let split = partition(&comments);
        assert_eq!(split.general.len(), 1);
        assert_eq!(split.general[0].id, 1);

        let threads = group_by_line(split.anchored);
        let ids: BTreeMap<u32, Vec<u64>> = threads
            .into_iter()
            .map(|(line, items)| (line, items.iter().map(|c| c.id).collect()))
            .collect();
        assert_eq!(ids, BTreeMap::from([(1, vec![0, 2]), (2, vec![3])]));
    }

    #[test]
    fn empty_input_yields_empty_groups() {
        let comments: Vec<Comment> = Vec::new();
        let split = partition(&comments);
        assert!(split.general.is_empty());
        assert!(group_by_line(split.anchored).is_empty());
    }

    #[test]
    fn pending_entries_follow_confirmed_in_thread() {
        let mut list = CommentList::new(vec![comment(1, Some(4), "hi")]);
        list.add_pending(PendingComment::new("bob", "me too", Some(4)));
        let threads = list.threads();
        let thread = &threads[&4];
        assert_eq!(thread.len(), 2);
        assert!(!thread[0].is_pending());
        assert!(thread[1].is_pending());
        assert_eq!(thread[1].body(), "me too");
    }

    #[test]
    fn rollback_removes_only_that_entry() {
        let original = CommentList::new(vec![comment(1, Some(4), "hi"), comment(2, None, "general")]);
        let mut list = original.clone();
        let pending = PendingComment::new("bob", "oops", Some(7));
        let local_id = pending.local_id;
        list.add_pending(pending);
        assert_eq!(list.pending_count(), 1);

        assert!(list.rollback(local_id));
        assert_eq!(list, original);
        assert!(!list.rollback(local_id));
    }

    #[test]
    fn reconcile_drops_all_pending() {
        let mut list = CommentList::new(vec![comment(1, Some(4), "hi")]);
        list.add_pending(PendingComment::new("bob", "a", Some(7)));
        list.add_pending(PendingComment::new("bob", "b", None));
        list.reconcile(vec![comment(1, Some(4), "hi"), comment(2, Some(7), "a")]);
        assert_eq!(list.pending_count(), 0);
        assert_eq!(list.commented_lines(), vec![4, 7]);
        assert!(list.general().is_empty());
    }
}
