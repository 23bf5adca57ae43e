//! Composer, reply and collapse state for one open RFC.
//!
//! Only one new-comment composer exists per document; opening it on another
//! line moves it there. Replies are a separate single draft, and collapse
//! flags are independent of both.

use std::collections::BTreeSet;

use crate::editor::TextArea;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposerState {
    #[default]
    Idle,
    Open { line: u32 },
}

/// Which text box a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTarget {
    Composer { line: u32 },
    Reply { line: u32 },
    General,
}

impl SubmitTarget {
    #[must_use]
    pub const fn line(self) -> Option<u32> {
        match self {
            Self::Composer { line } | Self::Reply { line } => Some(line),
            Self::General => None,
        }
    }
}

/// A validated submission ready to post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub target: SubmitTarget,
    pub line: Option<u32>,
    pub body: String,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    pub composer: ComposerState,
    pub composer_text: TextArea,
    pub reply_line: Option<u32>,
    pub reply_text: TextArea,
    pub general_open: bool,
    pub general_text: TextArea,
    pub collapsed: BTreeSet<u32>,
    pub selected_quote: Option<String>,
    /// The one submission in flight, if any.
    pub submitting: Option<SubmitTarget>,
}

impl InteractionState {
    #[must_use]
    pub const fn composer_line(&self) -> Option<u32> {
        match self.composer {
            ComposerState::Open { line } => Some(line),
            ComposerState::Idle => None,
        }
    }

    const fn composer_busy(&self) -> bool {
        matches!(self.submitting, Some(SubmitTarget::Composer { .. }))
    }

    const fn reply_busy(&self) -> bool {
        matches!(self.submitting, Some(SubmitTarget::Reply { .. }))
    }

    /// Open the composer on `line`, closing any other. Returns false while
    /// the composer's own submission is in flight.
    pub fn open_composer(&mut self, line: u32) -> bool {
        if self.composer_busy() {
            return false;
        }
        self.composer = ComposerState::Open { line };
        self.composer_text.clear();
        self.selected_quote = None;
        true
    }

    /// Open the composer prefilled with `selection` as a block quote.
    /// Blank selections are ignored.
    pub fn open_composer_with_quote(&mut self, line: u32, selection: &str) -> bool {
        let selection = selection.trim();
        if selection.is_empty() || !self.open_composer(line) {
            return false;
        }
        let quoted: Vec<String> = selection.lines().map(|l| format!("> {l}")).collect();
        self.composer_text.set_text(&format!("{}\n", quoted.join("\n")));
        self.selected_quote = Some(selection.to_string());
        true
    }

    pub fn cancel_composer(&mut self) {
        if self.composer_busy() {
            return;
        }
        self.composer = ComposerState::Idle;
        self.composer_text.clear();
        self.selected_quote = None;
    }

    pub fn open_reply(&mut self, line: u32) -> bool {
        if self.reply_busy() {
            return false;
        }
        if self.reply_line != Some(line) {
            self.reply_text.clear();
        }
        self.reply_line = Some(line);
        true
    }

    pub fn cancel_reply(&mut self) {
        if self.reply_busy() {
            return;
        }
        self.reply_line = None;
        self.reply_text.clear();
    }

    pub fn open_general(&mut self) {
        self.general_open = true;
    }

    pub fn cancel_general(&mut self) {
        if self.submitting == Some(SubmitTarget::General) {
            return;
        }
        self.general_open = false;
        self.general_text.clear();
    }

    pub fn toggle_collapsed(&mut self, line: u32) {
        if !self.collapsed.remove(&line) {
            self.collapsed.insert(line);
        }
    }

    #[must_use]
    pub fn is_collapsed(&self, line: u32) -> bool {
        self.collapsed.contains(&line)
    }

    #[must_use]
    pub fn is_submitting(&self, target: SubmitTarget) -> bool {
        self.submitting == Some(target)
    }

    fn text_for(&self, target: SubmitTarget) -> Option<&TextArea> {
        match target {
            SubmitTarget::Composer { line } if self.composer_line() == Some(line) => {
                Some(&self.composer_text)
            }
            SubmitTarget::Reply { line } if self.reply_line == Some(line) => Some(&self.reply_text),
            SubmitTarget::General if self.general_open => Some(&self.general_text),
            _ => None,
        }
    }

    /// Start submitting `target`. Returns `None` when its box is not open,
    /// its text is blank, or another submission is already in flight.
    pub fn begin_submit(&mut self, target: SubmitTarget) -> Option<Submission> {
        if self.submitting.is_some() {
            return None;
        }
        let text = self.text_for(target)?;
        if text.is_blank() {
            return None;
        }
        let body = text.body();
        self.submitting = Some(target);
        Some(Submission {
            target,
            line: target.line(),
            body,
        })
    }

    /// Complete the in-flight submission. Success closes its box and clears
    /// the text; failure leaves the box open with the text intact.
    pub fn finish_submit(&mut self, target: SubmitTarget, ok: bool) {
        if self.submitting != Some(target) {
            return;
        }
        self.submitting = None;
        if !ok {
            return;
        }
        match target {
            SubmitTarget::Composer { .. } => self.cancel_composer(),
            SubmitTarget::Reply { .. } => self.cancel_reply(),
            SubmitTarget::General => self.cancel_general(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(state: &mut InteractionState, text: &str) {
        state.composer_text.insert_str(text);
    }

    #[test]
    fn single_active_composer() {
        let mut state = InteractionState::default();
        assert!(state.open_composer(2));
        typed(&mut state, "draft");
        assert!(state.open_composer(5));
        assert_eq!(state.composer, ComposerState::Open { line: 5 });
        assert!(state.composer_text.is_blank());
    }

    #[test]
    fn quote_prefills_composer() {
        let mut state = InteractionState::default();
        assert!(state.open_composer_with_quote(3, "  some text  "));
        assert_eq!(state.composer_text.text(), "> some text\n");
        assert_eq!(state.selected_quote.as_deref(), Some("some text"));

        assert!(state.open_composer_with_quote(4, "a\nb"));
        assert_eq!(state.composer_text.text(), "> a\n> b\n");
    }

    #[test]
    fn blank_selection_is_ignored() {
        let mut state = InteractionState::default();
        assert!(!state.open_composer_with_quote(3, " \n\t "));
        assert_eq!(state.composer, ComposerState::Idle);
    }

    #[test]
    fn submit_success_closes_and_clears() {
        let mut state = InteractionState::default();
        state.open_composer(7);
        typed(&mut state, " test ");
        let target = SubmitTarget::Composer { line: 7 };
        let submission = state.begin_submit(target).expect("submission");
        assert_eq!(submission.body, "test");
        assert_eq!(submission.line, Some(7));
        state.finish_submit(target, true);
        assert_eq!(state.composer, ComposerState::Idle);
        assert!(state.composer_text.is_blank());
        assert!(state.submitting.is_none());
    }

    #[test]
    fn submit_failure_keeps_text() {
        let mut state = InteractionState::default();
        state.open_composer(7);
        typed(&mut state, "keep me");
        let target = SubmitTarget::Composer { line: 7 };
        state.begin_submit(target).expect("submission");
        state.finish_submit(target, false);
        assert_eq!(state.composer, ComposerState::Open { line: 7 });
        assert_eq!(state.composer_text.text(), "keep me");
    }

    #[test]
    fn only_one_submission_in_flight() {
        let mut state = InteractionState::default();
        state.open_composer(1);
        typed(&mut state, "one");
        state.open_reply(4);
        state.reply_text.insert_str("two");
        assert!(state.begin_submit(SubmitTarget::Composer { line: 1 }).is_some());
        assert!(state.begin_submit(SubmitTarget::Reply { line: 4 }).is_none());
        assert!(state.begin_submit(SubmitTarget::Composer { line: 1 }).is_none());
        // Composer can't be moved mid-flight.
        assert!(!state.open_composer(9));
    }

    #[test]
    fn blank_or_closed_targets_do_not_submit() {
        let mut state = InteractionState::default();
        assert!(state.begin_submit(SubmitTarget::General).is_none());
        state.open_composer(2);
        assert!(state.begin_submit(SubmitTarget::Composer { line: 2 }).is_none());
        typed(&mut state, "x");
        assert!(state.begin_submit(SubmitTarget::Composer { line: 3 }).is_none());
    }

    #[test]
    fn collapse_is_orthogonal() {
        let mut state = InteractionState::default();
        state.toggle_collapsed(4);
        state.open_composer(4);
        state.cancel_composer();
        state.open_reply(4);
        state.cancel_reply();
        assert!(state.is_collapsed(4));
        state.toggle_collapsed(4);
        assert!(!state.is_collapsed(4));
    }
}
