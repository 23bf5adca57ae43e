//! Application state model

use std::cell::RefCell;

use uuid::Uuid;

use crate::comments::{CommentEntry, CommentList};
use crate::config::UiConfig;
use crate::github::{RepoRef, RfcDetail, RfcKey, RfcSummary};
use crate::interaction::{InteractionState, SubmitTarget};
use crate::layout;
use crate::markdown::{
    Document, DocumentLayout, LayoutRow, deep_link_id, layout_document, render_comment,
};
use crate::packer::Placements;
use crate::position::{LineOffsets, MountedFrame};
use crate::syntax::Highlighter;
use crate::theme::Theme;

/// Current screen/view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    RfcList,
    RfcDetail,
}

/// Which pane has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    RfcList,
    Document,
    Composer,
    Reply,
    GeneralComposer,
}

/// Progress of a background load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Background work requested by `update`, drained by the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadRfcs,
    LoadRfc {
        key: RfcKey,
    },
    ReloadComments {
        key: RfcKey,
        generation: u64,
    },
    PostComment {
        key: RfcKey,
        local_id: Uuid,
        target: SubmitTarget,
        body: String,
        path: Option<String>,
        line: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneralLineKind {
    Heading,
    Author,
    Body,
    Blank,
}

/// One row of the general-comments section under the document.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralLine {
    pub text: String,
    pub kind: GeneralLineKind,
    pub pending: bool,
    /// Rendered markdown for body rows.
    pub row: Option<LayoutRow>,
}

impl GeneralLine {
    fn new(text: impl Into<String>, kind: GeneralLineKind, pending: bool) -> Self {
        Self {
            text: text.into(),
            kind,
            pending,
            row: None,
        }
    }

    fn body(row: LayoutRow, pending: bool) -> Self {
        Self {
            text: format!("  {}", row.plain_text()),
            kind: GeneralLineKind::Body,
            pending,
            row: Some(row),
        }
    }
}

/// An open RFC: its document, comments and everything the detail screen
/// needs between frames.
#[derive(Debug, Clone)]
pub struct RfcView {
    pub key: RfcKey,
    /// Metadata; `detail.comments` is empty, the live list is `comments`.
    pub detail: RfcDetail,
    pub document: Document,
    pub layout: DocumentLayout,
    pub layout_width: u32,
    pub comments: CommentList,
    pub interaction: InteractionState,
    /// Row index into the document followed by the general section.
    pub cursor_row: usize,
    pub scroll: usize,
    /// Row where visual selection started.
    pub visual_anchor: Option<usize>,
    pub line_offsets: LineOffsets,
    pub placements: Placements,
    /// Local id of the pending comment whose post is in flight.
    pub posting: Option<Uuid>,
    /// Stamp of the most recently requested comment reload.
    pub reload_generation: u64,
    /// Reloads stamped at or below this were requested before the last
    /// completed post and may not contain it.
    pub synced_generation: u64,
}

impl RfcView {
    #[must_use]
    pub fn new(mut detail: RfcDetail, width: u32, highlighter: Option<&Highlighter>) -> Self {
        let key = detail.summary.key();
        let comments = CommentList::new(std::mem::take(&mut detail.comments));
        let document = Document::new(&detail.markdown_content);
        let layout = layout_document(&document.tree, width, highlighter);
        Self {
            key,
            detail,
            document,
            layout,
            layout_width: width,
            comments,
            interaction: InteractionState::default(),
            cursor_row: 0,
            scroll: 0,
            visual_anchor: None,
            line_offsets: LineOffsets::default(),
            placements: Placements::default(),
            posting: None,
            reload_generation: 0,
            synced_generation: 0,
        }
    }

    /// Lay the document out again at `width`, keeping the cursor on its line.
    pub fn relayout(&mut self, width: u32, highlighter: Option<&Highlighter>) {
        let line = self.cursor_line();
        self.layout = layout_document(&self.document.tree, width, highlighter);
        self.layout_width = width;
        self.visual_anchor = None;
        self.line_offsets = LineOffsets::default();
        self.placements = Placements::default();
        let row = line
            .and_then(|l| self.row_for_line(l))
            .unwrap_or(self.cursor_row);
        self.cursor_row = row.min(self.total_rows().saturating_sub(1));
    }

    #[must_use]
    pub fn doc_rows(&self) -> usize {
        self.layout.rows.len()
    }

    /// Document rows plus the general-comments section.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.doc_rows() + self.general_lines().len()
    }

    /// Source line under the cursor, if the cursor is inside the document.
    #[must_use]
    pub fn cursor_line(&self) -> Option<u32> {
        self.layout.row_line(self.cursor_row)
    }

    /// Shareable fragment for the cursor's line, as accepted by `--goto`.
    #[must_use]
    pub fn cursor_link(&self) -> Option<String> {
        self.cursor_line().map(|line| format!("#{}", deep_link_id(line)))
    }

    /// First row showing `line`, or the next anchored line after it.
    #[must_use]
    pub fn row_for_line(&self, line: u32) -> Option<usize> {
        self.layout
            .anchors
            .range(line..)
            .next()
            .map(|(_, row)| *row)
    }

    /// Row of the next commented line strictly below the cursor.
    #[must_use]
    pub fn next_commented_row(&self) -> Option<usize> {
        self.commented_rows()
            .into_iter()
            .filter(|row| *row > self.cursor_row)
            .min()
    }

    #[must_use]
    pub fn prev_commented_row(&self) -> Option<usize> {
        self.commented_rows()
            .into_iter()
            .filter(|row| *row < self.cursor_row)
            .max()
    }

    fn commented_rows(&self) -> Vec<usize> {
        self.comments
            .commented_lines()
            .into_iter()
            .filter_map(|line| self.layout.anchor_row(line))
            .collect()
    }

    /// Move the cursor by `delta` rows, clamped to the content.
    pub fn move_cursor(&mut self, delta: isize, visible: usize) {
        let max = self.total_rows().saturating_sub(1);
        self.cursor_row = self.cursor_row.saturating_add_signed(delta).min(max);
        self.ensure_cursor_visible(visible);
    }

    pub fn set_cursor(&mut self, row: usize, visible: usize) {
        self.cursor_row = row.min(self.total_rows().saturating_sub(1));
        self.ensure_cursor_visible(visible);
    }

    pub fn ensure_cursor_visible(&mut self, visible: usize) {
        let visible = visible.max(1);
        if self.cursor_row < self.scroll {
            self.scroll = self.cursor_row;
        } else if self.cursor_row >= self.scroll + visible {
            self.scroll = self.cursor_row + 1 - visible;
        }
    }

    /// Visual selection as an ordered row range, clamped to the document.
    #[must_use]
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.visual_anchor?;
        let last = self.doc_rows().checked_sub(1)?;
        let (start, end) = if anchor <= self.cursor_row {
            (anchor, self.cursor_row)
        } else {
            (self.cursor_row, anchor)
        };
        (start <= last).then(|| (start, end.min(last)))
    }

    #[must_use]
    pub fn selection_text(&self) -> Option<String> {
        let (start, end) = self.selection()?;
        Some(self.layout.text_between(start, end))
    }

    /// Line a selection comment attaches to: the last line it covers.
    #[must_use]
    pub fn selection_line(&self) -> Option<u32> {
        let (start, end) = self.selection()?;
        (start..=end).rev().find_map(|row| self.layout.row_line(row))
    }

    /// Threads currently shown in the sidebar.
    #[must_use]
    pub fn thread_lines(&self) -> Vec<u32> {
        self.comments.commented_lines()
    }

    #[must_use]
    pub fn has_thread(&self, line: u32) -> bool {
        self.comments.threads().contains_key(&line)
    }

    /// Rows of the general-comments section, wrapped to the document width.
    #[must_use]
    pub fn general_lines(&self) -> Vec<GeneralLine> {
        let general = self.comments.general();
        let width = self.layout_width as usize;
        let mut lines = vec![
            GeneralLine::new("", GeneralLineKind::Blank, false),
            GeneralLine::new(
                format!("General comments ({})", general.len()),
                GeneralLineKind::Heading,
                false,
            ),
        ];
        if general.is_empty() {
            lines.push(GeneralLine::new(
                "No general comments yet. Press C to add one.",
                GeneralLineKind::Body,
                false,
            ));
        }
        for entry in general {
            let pending = entry.is_pending();
            lines.push(GeneralLine::new("", GeneralLineKind::Blank, false));
            lines.push(GeneralLine::new(
                entry_header(entry),
                GeneralLineKind::Author,
                pending,
            ));
            for row in render_comment(entry.body(), width.saturating_sub(2).max(1) as u32) {
                lines.push(GeneralLine::body(row, pending));
            }
        }
        lines
    }
}

/// `author · date`, or `author · posting…` for pending entries.
#[must_use]
pub fn entry_header(entry: &CommentEntry) -> String {
    if entry.is_pending() {
        format!("{} · posting…", entry.author())
    } else {
        format!(
            "{} · {}",
            entry.author(),
            entry.created_at().format("%Y-%m-%d %H:%M")
        )
    }
}

/// Application state
#[allow(clippy::struct_excessive_bools)] // TUI state inherently needs many boolean flags
pub struct Model {
    // === Screen state ===
    pub screen: Screen,
    pub focus: Focus,

    // === Data ===
    pub current_user: Option<String>,
    pub repos: Vec<RepoRef>,
    pub rfcs: Vec<RfcSummary>,
    pub list_state: LoadState,
    /// Repository shown on the list, `None` for all
    pub repo_filter: Option<RepoRef>,
    /// The open RFC, once loaded
    pub rfc: Option<RfcView>,
    /// RFC being opened or shown; results for any other key are stale
    pub active_key: Option<RfcKey>,
    pub detail_state: LoadState,
    /// Syntax highlighter
    pub highlighter: Highlighter,

    // === UI state ===
    /// Selected index in RFC list
    pub list_index: usize,
    /// Scroll offset in RFC list
    pub list_scroll: usize,

    // === Layout ===
    pub width: u16,
    pub height: u16,

    // === Theme ===
    pub theme: Theme,
    pub config: UiConfig,

    // === Effects ===
    /// Jobs for the worker, drained by the main loop after each update
    pub effects: Vec<Effect>,

    // === Render-computed data ===
    /// Anchor rows and box heights captured by the last detail render
    pub mounted: RefCell<MountedFrame>,

    // === Flash message (transient error/status) ===
    /// Shown in the help bar area until the next keypress.
    pub flash_message: Option<String>,

    // === Control ===
    pub should_quit: bool,
    /// Flag indicating the view needs a full redraw
    pub needs_redraw: bool,

    // === Pending CLI navigation targets ===
    pub pending_rfc: Option<u64>,
    pub pending_line: Option<u32>,
}

impl Model {
    /// Create a new model
    #[must_use]
    pub fn new(width: u16, height: u16, config: UiConfig) -> Self {
        let repo_filter = config
            .last_repo
            .as_deref()
            .and_then(|repo| repo.parse().ok());
        Self {
            screen: Screen::default(),
            focus: Focus::default(),
            current_user: None,
            repos: Vec::new(),
            rfcs: Vec::new(),
            list_state: LoadState::default(),
            repo_filter,
            rfc: None,
            active_key: None,
            detail_state: LoadState::default(),
            highlighter: Highlighter::new(),
            list_index: 0,
            list_scroll: 0,
            width,
            height,
            theme: Theme::default(),
            config,
            effects: Vec::new(),
            mounted: RefCell::new(MountedFrame::default()),
            flash_message: None,
            should_quit: false,
            needs_redraw: true,
            pending_rfc: None,
            pending_line: None,
        }
    }

    /// RFCs in the selected repository, in list order
    #[must_use]
    pub fn filtered_rfcs(&self) -> Vec<&RfcSummary> {
        self.rfcs
            .iter()
            .filter(|rfc| self.repo_filter.as_ref().is_none_or(|repo| &rfc.repo == repo))
            .collect()
    }

    #[must_use]
    pub fn selected_rfc(&self) -> Option<&RfcSummary> {
        self.filtered_rfcs().get(self.list_index).copied()
    }

    /// Rows available for list items (minus group headers and spacing)
    #[must_use]
    pub fn list_visible_height(&self) -> usize {
        u32::from(self.height).saturating_sub(layout::LIST_HEADER_HEIGHT + layout::HELP_BAR_HEIGHT + 4)
            as usize
    }

    /// Width the document is laid out at
    #[must_use]
    pub fn document_width(&self) -> u32 {
        layout::document_width(u32::from(self.width))
    }

    /// Rows of document visible on the detail screen
    #[must_use]
    pub fn document_height(&self) -> usize {
        layout::document_height(u32::from(self.height)) as usize
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let doc_width = self.document_width();
        if let Some(view) = self.rfc.as_mut() {
            if view.layout_width != doc_width {
                view.relayout(doc_width, Some(&self.highlighter));
            }
            let visible = layout::document_height(u32::from(height)) as usize;
            view.ensure_cursor_visible(visible);
        }
        self.needs_redraw = true;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::comments::tests::comment;
    use crate::github::RfcStatus;
    use crate::github::tests::summary;

    pub(crate) fn detail(markdown: &str, comments: Vec<crate::comments::Comment>) -> RfcDetail {
        RfcDetail {
            summary: summary(7, RfcStatus::Open, false, 1),
            body: String::new(),
            markdown_content: markdown.to_string(),
            markdown_file_path: Some("rfcs/0007.md".to_string()),
            reviewers: Vec::new(),
            comments,
        }
    }

    #[test]
    fn cursor_reports_source_line() {
        let view = RfcView::new(detail("# Title\n\nBody text\n", Vec::new()), 40, None);
        assert_eq!(view.cursor_line(), Some(1));
        assert_eq!(view.row_for_line(3), view.layout.anchor_row(3));
    }

    #[test]
    fn commented_rows_skip_to_threads() {
        let view = RfcView::new(
            detail(
                "one\n\ntwo\n\nthree\n",
                vec![comment(1, Some(3), "a"), comment(2, Some(5), "b")],
            ),
            40,
            None,
        );
        let row3 = view.layout.anchor_row(3).expect("line 3 anchored");
        let row5 = view.layout.anchor_row(5).expect("line 5 anchored");
        assert_eq!(view.next_commented_row(), Some(row3));
        let mut view = view;
        view.cursor_row = row3;
        assert_eq!(view.next_commented_row(), Some(row5));
        assert_eq!(view.prev_commented_row(), None);
    }

    #[test]
    fn cursor_link_matches_goto_syntax() {
        let mut view = RfcView::new(detail("alpha\n\nbeta\n", Vec::new()), 40, None);
        view.cursor_row = view.layout.anchor_row(3).expect("anchored");
        let link = view.cursor_link().expect("on a line");
        assert_eq!(link, "#line-3");
        assert_eq!(crate::markdown::parse_deep_link(&link), Some(3));
    }

    #[test]
    fn general_section_follows_document() {
        let view = RfcView::new(
            detail("text\n", vec![comment(1, None, "hello there")]),
            40,
            None,
        );
        let general = view.general_lines();
        assert!(general.iter().any(|l| l.text == "  hello there"));
        let bold = RfcView::new(detail("text\n", vec![comment(1, None, "a **b**")]), 40, None);
        let row = bold
            .general_lines()
            .into_iter()
            .find_map(|l| l.row)
            .expect("body row");
        assert!(row.spans.iter().any(|s| s.role == crate::markdown::SpanRole::Strong));
        assert_eq!(view.total_rows(), view.doc_rows() + general.len());
        let mut view = view;
        view.move_cursor(100, 5);
        assert_eq!(view.cursor_line(), None);
    }

    #[test]
    fn selection_is_ordered_and_quotes_rows() {
        let mut view = RfcView::new(detail("alpha\n\nbeta\n", Vec::new()), 40, None);
        let beta = view.layout.anchor_row(3).expect("anchored");
        view.cursor_row = beta;
        view.visual_anchor = Some(0);
        assert_eq!(view.selection(), Some((0, beta)));
        assert_eq!(view.selection_line(), Some(3));
        let text = view.selection_text().expect("text");
        assert!(text.starts_with("alpha"));
        assert!(text.ends_with("beta"));
    }

    #[test]
    fn relayout_keeps_cursor_line() {
        let long = "word ".repeat(40);
        let mut view = RfcView::new(detail(&format!("{long}\n\nend\n"), Vec::new()), 80, None);
        view.cursor_row = view.layout.anchor_row(3).expect("anchored");
        view.relayout(20, None);
        assert_eq!(view.cursor_line(), Some(3));
    }
}
