//! Error capture with contextual metadata.
//!
//! Records go through the `log` facade under the `telemetry` target so they
//! can be filtered separately (`RFC_UI_LOG=telemetry=error`). Capturing never
//! changes control flow; callers still handle the error themselves.

use std::fmt::Display;

pub const TARGET: &str = "telemetry";

#[cfg(test)]
thread_local! {
    static CAPTURED: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Number of captures recorded on the current thread.
#[cfg(test)]
pub fn captured_on_this_thread() -> usize {
    CAPTURED.with(std::cell::Cell::get)
}

/// Record `error` with the acting user and `context` key/value pairs.
pub fn capture_exception(error: &dyn Display, user: Option<&str>, context: &[(&str, &str)]) {
    #[cfg(test)]
    CAPTURED.with(|count| count.set(count.get() + 1));
    let fields = format_context(user, context);
    log::error!(target: TARGET, "{error} [{fields}]");
}

/// Same as [`capture_exception`] for an `anyhow::Error`, including its cause chain.
pub fn capture_anyhow(error: &anyhow::Error, user: Option<&str>, context: &[(&str, &str)]) {
    capture_exception(&format!("{error:#}"), user, context);
}

fn format_context(user: Option<&str>, context: &[(&str, &str)]) -> String {
    user.map(|u| ("user", u))
        .into_iter()
        .chain(context.iter().copied())
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_rendered_as_pairs() {
        let fields = format_context(Some("alice"), &[("function", "list_rfcs"), ("repo", "acme/rfcs")]);
        assert_eq!(fields, "user=alice function=list_rfcs repo=acme/rfcs");
    }

    #[test]
    fn capture_does_not_panic_without_logger() {
        capture_exception(&"boom", None, &[("function", "post_comment")]);
        capture_anyhow(&anyhow::anyhow!("outer").context("ctx"), Some("bob"), &[]);
    }
}
