//! Background execution of [`Effect`]s.
//!
//! Each effect runs on its own thread against the shared [`RfcSource`] and
//! reports back with a [`Message`] on the channel the main loop polls.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, warn};

use crate::github::{RfcKey, RfcSource};
use crate::interaction::SubmitTarget;
use crate::message::{Message, RfcListing};
use crate::model::Effect;
use crate::telemetry;

pub struct Worker {
    source: Arc<dyn RfcSource>,
    tx: Sender<Message>,
}

impl Worker {
    /// Create a worker and the receiving end of its result channel.
    #[must_use]
    pub fn new(source: Arc<dyn RfcSource>) -> (Self, Receiver<Message>) {
        let (tx, rx) = mpsc::channel();
        (Self { source, tx }, rx)
    }

    /// Run `effect` on a background thread.
    pub fn spawn(&self, effect: Effect) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let msg = run(source.as_ref(), effect);
            if tx.send(msg).is_err() {
                debug!("Result dropped: UI has shut down");
            }
        });
    }

    pub fn spawn_all(&self, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            self.spawn(effect);
        }
    }
}

/// Execute one effect synchronously and build its result message.
pub fn run(source: &dyn RfcSource, effect: Effect) -> Message {
    match effect {
        Effect::LoadRfcs => Message::RfcsLoaded(load_listing(source).map_err(|e| {
            telemetry::capture_anyhow(&e, None, &[("function", "load_rfcs")]);
            format!("{e:#}")
        })),

        Effect::LoadRfc { key } => {
            let result = source
                .current_user()
                .and_then(|user| source.fetch_rfc_detail(&key, &user))
                .map_err(|e| report(&e, "fetch_rfc_detail", &key));
            Message::RfcLoaded { key, result }
        }

        Effect::ReloadComments { key, generation } => {
            let result = source
                .fetch_comments(&key)
                .map_err(|e| report(&e, "fetch_comments", &key));
            Message::CommentsReloaded {
                key,
                generation,
                result,
            }
        }

        Effect::PostComment {
            key,
            local_id,
            target,
            body,
            path,
            line,
        } => post_then_reload(source, key, local_id, target, &body, path.as_deref(), line),
    }
}

fn load_listing(source: &dyn RfcSource) -> anyhow::Result<RfcListing> {
    let user = source.current_user()?;
    let repos = source.list_repos_with_rfcs()?;
    let mut rfcs = Vec::new();
    for repo in &repos {
        match source.list_rfcs(repo, &user) {
            Ok(list) => rfcs.extend(list),
            Err(e) => {
                warn!("Skipping {repo}: {e:#}");
                telemetry::capture_anyhow(&e, Some(&user), &[("function", "list_rfcs")]);
            }
        }
    }
    crate::github::sort_rfcs(&mut rfcs);
    Ok(RfcListing { user, repos, rfcs })
}

/// Post, and only after the post succeeded fetch the authoritative list.
fn post_then_reload(
    source: &dyn RfcSource,
    key: RfcKey,
    local_id: uuid::Uuid,
    target: SubmitTarget,
    body: &str,
    path: Option<&str>,
    line: Option<u32>,
) -> Message {
    if let Err(e) = source.post_comment(&key, body, path, line) {
        let error = report(&e, "post_comment", &key);
        return Message::CommentPostFailed {
            key,
            local_id,
            target,
            error,
        };
    }
    let reload = source
        .fetch_comments(&key)
        .map_err(|e| report(&e, "fetch_comments", &key));
    Message::CommentPosted {
        key,
        local_id,
        target,
        reload,
    }
}

fn report(error: &anyhow::Error, function: &str, key: &RfcKey) -> String {
    let rfc = key.to_string();
    telemetry::capture_anyhow(error, None, &[("function", function), ("rfc", &rfc)]);
    format!("{error:#}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{DemoSource, RepoRef};

    fn key() -> RfcKey {
        RfcKey {
            repo: RepoRef::new("acme", "rfcs"),
            number: 7,
        }
    }

    fn post(line: Option<u32>) -> Effect {
        Effect::PostComment {
            key: key(),
            local_id: uuid::Uuid::new_v4(),
            target: line.map_or(SubmitTarget::General, |line| SubmitTarget::Composer { line }),
            body: "from worker".to_string(),
            path: line.map(|_| "rfcs/0007-streaming-cache.md".to_string()),
            line,
        }
    }

    #[test]
    fn listing_collects_every_repo() {
        let source = DemoSource::seeded();
        let Message::RfcsLoaded(Ok(listing)) = run(&source, Effect::LoadRfcs) else {
            panic!("expected a listing");
        };
        assert_eq!(listing.user, "demo-user");
        assert_eq!(listing.repos, vec![RepoRef::new("acme", "rfcs")]);
        assert_eq!(listing.rfcs.len(), 2);
    }

    #[test]
    fn post_is_followed_by_reload() {
        let source = DemoSource::seeded();
        let Message::CommentPosted { reload, .. } = run(&source, post(Some(12))) else {
            panic!("expected a posted result");
        };
        let comments = reload.expect("reload");
        assert!(comments.iter().any(|c| c.body == "from worker" && c.line == Some(12)));
    }

    #[test]
    fn failed_post_skips_reload() {
        let source = DemoSource::seeded();
        source.set_fail_posts(true);
        let msg = run(&source, post(None));
        assert!(matches!(msg, Message::CommentPostFailed { error, .. } if error.contains("simulated")));
    }

    #[test]
    fn reload_failure_is_reported_separately() {
        let source = DemoSource::seeded();
        source.set_fail_loads(true);
        let Message::CommentPosted { reload, .. } = run(&source, post(None)) else {
            panic!("post itself should succeed");
        };
        assert!(reload.is_err());
    }

    #[test]
    fn each_failure_is_captured_once() {
        let source = DemoSource::seeded();
        source.set_fail_loads(true);
        let before = telemetry::captured_on_this_thread();
        let msg = run(
            &source,
            Effect::ReloadComments {
                key: key(),
                generation: 1,
            },
        );
        assert!(matches!(msg, Message::CommentsReloaded { result: Err(_), .. }));
        assert_eq!(telemetry::captured_on_this_thread(), before + 1);
    }

    #[test]
    fn spawned_jobs_report_on_the_channel() {
        let (worker, rx) = Worker::new(Arc::new(DemoSource::seeded()));
        worker.spawn(Effect::LoadRfc { key: key() });
        let msg = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("result");
        assert!(matches!(msg, Message::RfcLoaded { result: Ok(_), .. }));
    }
}
