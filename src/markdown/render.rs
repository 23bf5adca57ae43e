//! Lays an annotated markdown tree out into terminal rows.
//!
//! This is the "browser layout" step: it decides which row every piece of
//! content lands on, and records the row of every line anchor so the
//! position resolver can read line offsets back after the frame is drawn.

use std::collections::BTreeMap;

use opentui::Rgba;

use super::tree::{NodeKind, RenderedNode};
use crate::syntax::Highlighter;

/// Semantic role of a span; mapped to theme colors at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanRole {
    Text,
    Heading,
    HeadingMarker,
    Strong,
    Emphasis,
    Strike,
    Link,
    Mention,
    InlineCode,
    Code,
    CodeLabel,
    QuoteBar,
    ListMarker,
    TableBorder,
    TableHeader,
    Rule,
    Html,
    Muted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyledSpan {
    pub text: String,
    pub role: SpanRole,
    /// Syntax color for code spans.
    pub highlight: Option<Rgba>,
}

impl StyledSpan {
    #[must_use]
    pub fn new(text: impl Into<String>, role: SpanRole) -> Self {
        Self {
            text: text.into(),
            role,
            highlight: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Blank,
    Text,
    Heading(u8),
    Code,
    Table,
    Rule,
}

/// One laid-out terminal row of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRow {
    pub spans: Vec<StyledSpan>,
    /// Index of the first span after list/quote prefixes.
    pub content_start: usize,
    /// Source line of the innermost element this row belongs to.
    pub line: Option<u32>,
    pub kind: RowKind,
}

impl LayoutRow {
    fn blank(prefix: Vec<StyledSpan>) -> Self {
        let content_start = prefix.len();
        Self {
            spans: prefix,
            content_start,
            line: None,
            kind: RowKind::Blank,
        }
    }

    /// Row text without list or quote prefixes.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.spans[self.content_start.min(self.spans.len())..]
            .iter()
            .map(|span| span.text.as_str())
            .collect()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }
}

/// Result of laying out a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentLayout {
    pub rows: Vec<LayoutRow>,
    /// Row of each mounted line anchor.
    pub anchors: BTreeMap<u32, usize>,
}

impl DocumentLayout {
    #[must_use]
    pub fn anchor_row(&self, line: u32) -> Option<usize> {
        self.anchors.get(&line).copied()
    }

    #[must_use]
    pub fn row_line(&self, row: usize) -> Option<u32> {
        self.rows.get(row).and_then(|r| r.line)
    }

    /// Plain text of rows `start..=end`, blank rows included.
    #[must_use]
    pub fn text_between(&self, start: usize, end: usize) -> String {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        self.rows
            .iter()
            .skip(start)
            .take(end.saturating_sub(start) + 1)
            .map(LayoutRow::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Lay `root` out at `width` columns.
#[must_use]
pub fn layout_document(
    root: &RenderedNode,
    width: u32,
    highlighter: Option<&Highlighter>,
) -> DocumentLayout {
    let mut ctx = LayoutCtx {
        width: width.max(8) as usize,
        rows: Vec::new(),
        anchors: BTreeMap::new(),
        pending: Vec::new(),
        current_line: None,
        prefixes: Vec::new(),
        highlighter,
    };
    ctx.blocks(&root.children, true);
    ctx.flush_pending_to_last();
    DocumentLayout {
        rows: ctx.rows,
        anchors: ctx.anchors,
    }
}

struct Prefix {
    first: String,
    rest: String,
    role: SpanRole,
    used: bool,
}

enum Atom {
    Word(String, SpanRole),
    Space,
    Break,
    Anchor(u32),
}

struct LayoutCtx<'h> {
    width: usize,
    rows: Vec<LayoutRow>,
    anchors: BTreeMap<u32, usize>,
    /// Anchors waiting for the next content row.
    pending: Vec<u32>,
    current_line: Option<u32>,
    prefixes: Vec<Prefix>,
    highlighter: Option<&'h Highlighter>,
}

impl LayoutCtx<'_> {
    fn prefix_width(&self) -> usize {
        self.prefixes
            .iter()
            .map(|p| {
                if p.used {
                    p.rest.chars().count()
                } else {
                    p.first.chars().count()
                }
            })
            .sum()
    }

    fn available(&self) -> usize {
        self.width.saturating_sub(self.prefix_width()).max(4)
    }

    fn take_prefix_spans(&mut self) -> Vec<StyledSpan> {
        self.prefixes
            .iter_mut()
            .map(|p| {
                let text = if p.used { &p.rest } else { &p.first };
                let span = StyledSpan::new(text.clone(), p.role);
                p.used = true;
                span
            })
            .filter(|s| !s.text.is_empty())
            .collect()
    }

    fn emit(&mut self, spans: Vec<StyledSpan>, kind: RowKind, line: Option<u32>) {
        self.emit_with(spans, kind, line, true);
    }

    fn emit_with(&mut self, spans: Vec<StyledSpan>, kind: RowKind, line: Option<u32>, attach: bool) {
        let mut row_spans = self.take_prefix_spans();
        let content_start = row_spans.len();
        row_spans.extend(spans);
        let idx = self.rows.len();
        if attach {
            for anchor in self.pending.drain(..) {
                self.anchors.entry(anchor).or_insert(idx);
            }
        }
        self.rows.push(LayoutRow {
            spans: row_spans,
            content_start,
            line,
            kind,
        });
    }

    fn blank(&mut self) {
        let prefix: Vec<StyledSpan> = self
            .prefixes
            .iter()
            .filter(|p| p.role == SpanRole::QuoteBar)
            .map(|p| StyledSpan::new(p.rest.clone(), p.role))
            .collect();
        self.rows.push(LayoutRow::blank(prefix));
    }

    fn flush_pending_to_last(&mut self) {
        if let Some(last) = self.rows.len().checked_sub(1) {
            for anchor in self.pending.drain(..) {
                self.anchors.entry(anchor).or_insert(last);
            }
        }
    }

    fn note_line(&mut self, node: &RenderedNode) {
        if let Some(line) = node.source_line {
            self.current_line = Some(line);
        }
    }

    /// Lay out a run of sibling blocks; `separate` inserts a blank row between them.
    fn blocks(&mut self, nodes: &[RenderedNode], separate: bool) {
        let mut inline_run: Vec<&RenderedNode> = Vec::new();
        let mut emitted_any = false;

        for node in nodes {
            if let NodeKind::Anchor { line } = node.kind {
                self.pending.push(line);
                self.current_line = Some(line);
                continue;
            }
            if !node.kind.is_block() {
                inline_run.push(node);
                continue;
            }
            if !inline_run.is_empty() {
                self.inline_flow(&inline_run, SpanRole::Text, RowKind::Text);
                inline_run.clear();
                emitted_any = true;
            }
            if separate && emitted_any {
                self.blank();
            }
            self.block(node);
            emitted_any = true;
        }
        if !inline_run.is_empty() {
            self.inline_flow(&inline_run, SpanRole::Text, RowKind::Text);
        }
    }

    fn block(&mut self, node: &RenderedNode) {
        self.note_line(node);
        match &node.kind {
            NodeKind::Heading(level) => {
                let marker = format!("{} ", "#".repeat(usize::from(*level)));
                let children: Vec<&RenderedNode> = node.children.iter().collect();
                let mut atoms = vec![Atom::Word(marker.trim_end().to_string(), SpanRole::HeadingMarker), Atom::Space];
                // Leading anchors must attach with the first word.
                let mut rest = Vec::new();
                for child in &children {
                    if let NodeKind::Anchor { line } = child.kind {
                        if rest.is_empty() {
                            atoms.insert(0, Atom::Anchor(line));
                            continue;
                        }
                    }
                    rest.push(*child);
                }
                for child in rest {
                    collect_atoms(child, SpanRole::Heading, &mut atoms);
                }
                self.wrap_atoms(atoms, RowKind::Heading(*level));
            }
            NodeKind::Paragraph | NodeKind::TableCell => {
                let children: Vec<&RenderedNode> = node.children.iter().collect();
                self.inline_flow(&children, SpanRole::Text, RowKind::Text);
            }
            NodeKind::BlockQuote => {
                self.prefixes.push(Prefix {
                    first: "│ ".to_string(),
                    rest: "│ ".to_string(),
                    role: SpanRole::QuoteBar,
                    used: false,
                });
                self.blocks(&node.children, true);
                self.prefixes.pop();
            }
            NodeKind::List { start } => self.list(node, *start),
            NodeKind::Item => self.blocks(&node.children, false),
            NodeKind::CodeBlock { lang, .. } => self.code_block(node, lang.as_deref()),
            NodeKind::HtmlBlock => self.html_block(node),
            NodeKind::Table => self.table(node),
            NodeKind::Rule => {
                let avail = self.available();
                self.emit_with(
                    vec![StyledSpan::new("─".repeat(avail), SpanRole::Rule)],
                    RowKind::Rule,
                    self.current_line,
                    false,
                );
            }
            _ => self.blocks(&node.children, true),
        }
    }

    fn list(&mut self, node: &RenderedNode, start: Option<u64>) {
        let mut number = start.unwrap_or(1);
        for child in &node.children {
            if let NodeKind::Anchor { line } = child.kind {
                self.pending.push(line);
                self.current_line = Some(line);
                continue;
            }
            let marker = if start.is_some() {
                let m = format!("{number}. ");
                number += 1;
                m
            } else {
                "• ".to_string()
            };
            let rest = " ".repeat(marker.chars().count());
            self.prefixes.push(Prefix {
                first: marker,
                rest,
                role: SpanRole::ListMarker,
                used: false,
            });
            self.note_line(child);
            self.block(child);
            self.prefixes.pop();
        }
    }

    fn code_block(&mut self, node: &RenderedNode, lang: Option<&str>) {
        // Header row carries the fence line's anchor.
        for child in &node.children {
            if let NodeKind::Anchor { line } = child.kind {
                self.pending.push(line);
            }
        }
        let label = lang.unwrap_or("");
        if !self.pending.is_empty() || !label.is_empty() {
            self.emit(
                vec![StyledSpan::new(label, SpanRole::CodeLabel)],
                RowKind::Code,
                node.source_line,
            );
        }

        let source = self.highlighter;
        let mut highlighter = lang.and_then(|l| source.and_then(|h| h.for_language(l)));
        for child in &node.children {
            if child.kind != NodeKind::CodeLine {
                continue;
            }
            for grandchild in &child.children {
                if let NodeKind::Anchor { line } = grandchild.kind {
                    self.pending.push(line);
                }
            }
            let text = child.text_content();
            let avail = self.available();
            let spans = highlighter.as_mut().map_or_else(
                || vec![StyledSpan::new(truncate_chars(&text, avail), SpanRole::Code)],
                |hl| {
                    let mut out = Vec::new();
                    let mut used = 0usize;
                    for span in hl.highlight_line(&text) {
                        if used >= avail {
                            break;
                        }
                        let piece = truncate_chars(&span.text, avail - used);
                        used += piece.chars().count();
                        out.push(StyledSpan {
                            text: piece,
                            role: SpanRole::Code,
                            highlight: Some(span.fg),
                        });
                    }
                    out
                },
            );
            self.emit(spans, RowKind::Code, child.source_line);
        }
    }

    fn html_block(&mut self, node: &RenderedNode) {
        for line in node.anchor_lines() {
            self.pending.push(line);
            self.current_line = Some(line);
        }
        let text = node.text_content();
        let avail = self.available();
        for line in text.trim_end_matches('\n').split('\n') {
            for chunk in crate::text::wrap_text_preserve(line, avail) {
                self.emit(
                    vec![StyledSpan::new(chunk, SpanRole::Html)],
                    RowKind::Text,
                    self.current_line,
                );
            }
        }
    }

    fn table(&mut self, node: &RenderedNode) {
        let mut grid: Vec<(Vec<String>, Vec<u32>, Option<u32>, bool)> = Vec::new();
        for child in &node.children {
            match child.kind {
                NodeKind::Anchor { line } => self.pending.push(line),
                NodeKind::TableHead | NodeKind::TableRow => {
                    let header = child.kind == NodeKind::TableHead;
                    let cells: Vec<String> = child
                        .children
                        .iter()
                        .filter(|c| c.kind == NodeKind::TableCell)
                        .map(|c| c.text_content().trim().to_string())
                        .collect();
                    let anchors = child.anchor_lines();
                    grid.push((cells, anchors, child.source_line, header));
                }
                _ => {}
            }
        }
        let columns = grid.iter().map(|(cells, ..)| cells.len()).max().unwrap_or(0);
        if columns == 0 {
            return;
        }

        let mut widths = vec![1usize; columns];
        for (cells, ..) in &grid {
            for (i, cell) in cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
        // Borders: one per column plus one, and a space either side of each cell.
        let chrome = columns * 3 + 1;
        let avail = self.available().saturating_sub(chrome).max(columns);
        shrink_widths(&mut widths, avail);

        let border = |left: &str, mid: &str, right: &str, widths: &[usize]| {
            let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}", inner.join(mid))
        };

        let table_line = node.source_line;
        self.emit_with(
            vec![StyledSpan::new(border("┌", "┬", "┐", &widths), SpanRole::TableBorder)],
            RowKind::Table,
            table_line,
            false,
        );
        for (cells, anchors, line, header) in &grid {
            self.pending.extend(anchors.iter().copied());
            let mut spans = vec![StyledSpan::new("│", SpanRole::TableBorder)];
            for (i, width) in widths.iter().enumerate() {
                let cell = cells.get(i).map_or("", String::as_str);
                let text = truncate_chars(cell, *width);
                let pad = width.saturating_sub(text.chars().count());
                let role = if *header {
                    SpanRole::TableHeader
                } else {
                    SpanRole::Text
                };
                spans.push(StyledSpan::new(format!(" {text}{} ", " ".repeat(pad)), role));
                spans.push(StyledSpan::new("│", SpanRole::TableBorder));
            }
            if let Some(line) = line {
                self.current_line = Some(*line);
            }
            self.emit(spans, RowKind::Table, *line);
            if *header {
                self.emit_with(
                    vec![StyledSpan::new(border("├", "┼", "┤", &widths), SpanRole::TableBorder)],
                    RowKind::Table,
                    *line,
                    false,
                );
            }
        }
        self.emit_with(
            vec![StyledSpan::new(border("└", "┴", "┘", &widths), SpanRole::TableBorder)],
            RowKind::Table,
            self.current_line,
            false,
        );
    }

    fn inline_flow(&mut self, nodes: &[&RenderedNode], role: SpanRole, kind: RowKind) {
        let mut atoms = Vec::new();
        for node in nodes {
            collect_atoms(node, role, &mut atoms);
        }
        self.wrap_atoms(atoms, kind);
    }

    fn wrap_atoms(&mut self, atoms: Vec<Atom>, kind: RowKind) {
        let mut spans: Vec<StyledSpan> = Vec::new();
        let mut row_width = 0usize;
        let mut row_line: Option<u32> = None;
        let mut pending_space = false;
        let mut waiting: Vec<u32> = Vec::new();
        let mut emitted = false;

        for atom in atoms {
            match atom {
                Atom::Anchor(line) => waiting.push(line),
                Atom::Space => pending_space = row_width > 0,
                Atom::Break => {
                    self.pending.append(&mut waiting);
                    let line = row_line.or(self.current_line);
                    self.emit(std::mem::take(&mut spans), kind, line);
                    emitted = true;
                    row_width = 0;
                    row_line = None;
                    pending_space = false;
                }
                Atom::Word(word, role) => {
                    let avail = self.available();
                    let mut chunks = split_long_word(&word, avail);
                    let first = chunks.remove(0);
                    let first_len = first.chars().count();
                    let space = usize::from(pending_space && row_width > 0);
                    if row_width > 0 && row_width + space + first_len > avail {
                        let line = row_line.or(self.current_line);
                        self.emit(std::mem::take(&mut spans), kind, line);
                        emitted = true;
                        row_width = 0;
                        row_line = None;
                    }
                    if !waiting.is_empty() {
                        self.current_line = waiting.last().copied();
                        self.pending.append(&mut waiting);
                    }
                    if row_width == 0 {
                        row_line = self.current_line;
                    }
                    let lead = if row_width > 0 && pending_space { " " } else { "" };
                    push_span(&mut spans, lead, &first, role);
                    row_width += lead.len() + first_len;
                    pending_space = false;

                    for chunk in chunks {
                        let line = row_line.or(self.current_line);
                        self.emit(std::mem::take(&mut spans), kind, line);
                        emitted = true;
                        row_line = self.current_line;
                        row_width = chunk.chars().count();
                        push_span(&mut spans, "", &chunk, role);
                    }
                }
            }
        }

        self.pending.append(&mut waiting);
        if row_width > 0 || !emitted {
            let line = row_line.or(self.current_line);
            self.emit(spans, kind, line);
        }
    }
}

fn push_span(spans: &mut Vec<StyledSpan>, lead: &str, text: &str, role: SpanRole) {
    if let Some(last) = spans.last_mut() {
        if last.role == role {
            last.text.push_str(lead);
            last.text.push_str(text);
            return;
        }
        last.text.push_str(lead);
    }
    spans.push(StyledSpan::new(text, role));
}

fn collect_atoms(node: &RenderedNode, role: SpanRole, atoms: &mut Vec<Atom>) {
    match &node.kind {
        NodeKind::Anchor { line } => atoms.push(Atom::Anchor(*line)),
        NodeKind::Text(value) => push_words(value, role, atoms),
        NodeKind::InlineCode(value) => {
            for line in node.anchor_lines() {
                atoms.push(Atom::Anchor(line));
            }
            push_words(value, SpanRole::InlineCode, atoms);
        }
        NodeKind::SoftBreak => atoms.push(Atom::Space),
        NodeKind::HardBreak => atoms.push(Atom::Break),
        NodeKind::Mention { login } => atoms.push(Atom::Word(format!("@{login}"), SpanRole::Mention)),
        NodeKind::TaskMarker(checked) => {
            let mark = if *checked { "[x]" } else { "[ ]" };
            atoms.push(Atom::Word(mark.to_string(), SpanRole::ListMarker));
            atoms.push(Atom::Space);
        }
        NodeKind::Image { .. } => {
            let alt = node.text_content();
            let label = if alt.trim().is_empty() {
                "[image]".to_string()
            } else {
                format!("[image: {}]", alt.trim())
            };
            push_words(&label, SpanRole::Muted, atoms);
        }
        kind => {
            let role = match kind {
                NodeKind::Strong => SpanRole::Strong,
                NodeKind::Emphasis => SpanRole::Emphasis,
                NodeKind::Strikethrough => SpanRole::Strike,
                NodeKind::Link { .. } => SpanRole::Link,
                _ => role,
            };
            for child in &node.children {
                collect_atoms(child, role, atoms);
            }
        }
    }
}

fn push_words(text: &str, role: SpanRole, atoms: &mut Vec<Atom>) {
    let mut word = String::new();
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !word.is_empty() {
                atoms.push(Atom::Word(std::mem::take(&mut word), role));
            }
            if !matches!(atoms.last(), Some(Atom::Space)) {
                atoms.push(Atom::Space);
            }
        } else {
            word.push(ch);
        }
    }
    if !word.is_empty() {
        atoms.push(Atom::Word(word, role));
    }
}

fn split_long_word(word: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= max {
        return vec![word.to_string()];
    }
    chars.chunks(max).map(|c| c.iter().collect()).collect()
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 1 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// Shrink the widest columns until the total fits in `avail`.
fn shrink_widths(widths: &mut [usize], avail: usize) {
    while widths.iter().sum::<usize>() > avail {
        let Some((idx, &widest)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
            return;
        };
        if widest <= 1 {
            return;
        }
        widths[idx] -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::Document;

    fn layout(text: &str, width: u32) -> DocumentLayout {
        let doc = Document::new(text);
        layout_document(&doc.tree, width, None)
    }

    fn row_texts(layout: &DocumentLayout) -> Vec<String> {
        layout
            .rows
            .iter()
            .map(|r| r.spans.iter().map(|s| s.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn blocks_are_separated_by_blank_rows() {
        let l = layout("# Title\n\nBody", 40);
        assert_eq!(row_texts(&l), vec!["# Title", "", "Body"]);
        assert_eq!(l.anchor_row(1), Some(0));
        assert_eq!(l.anchor_row(3), Some(2));
    }

    #[test]
    fn paragraph_wraps_and_keeps_line_attribution() {
        let l = layout("alpha beta gamma delta", 11);
        assert_eq!(row_texts(&l), vec!["alpha beta", "gamma delta"]);
        assert_eq!(l.row_line(0), Some(1));
        assert_eq!(l.row_line(1), Some(1));
    }

    #[test]
    fn inline_anchor_on_later_source_line_lands_on_its_row() {
        // line 2 is claimed by the strong element, which wraps to row 1
        let l = layout("aaaa bbbb\n**cc** dd", 10);
        assert_eq!(row_texts(&l), vec!["aaaa bbbb", "cc dd"]);
        assert_eq!(l.anchor_row(2), Some(1));
        assert_eq!(l.row_line(1), Some(2));
    }

    #[test]
    fn code_block_has_one_row_per_line() {
        let l = layout("```rust\nlet a = 1;\nlet b = 2;\n```", 40);
        let texts = row_texts(&l);
        assert_eq!(texts, vec!["rust", "let a = 1;", "let b = 2;"]);
        assert_eq!(l.anchor_row(1), Some(0));
        assert_eq!(l.anchor_row(2), Some(1));
        assert_eq!(l.anchor_row(3), Some(2));
        assert_eq!(l.rows[1].kind, RowKind::Code);
    }

    #[test]
    fn list_items_get_markers_and_anchors() {
        let l = layout("- one\n- two\n\n1. first\n2. second", 40);
        let texts = row_texts(&l);
        assert_eq!(texts, vec!["• one", "• two", "", "1. first", "2. second"]);
        assert_eq!(l.anchor_row(2), Some(1));
        assert_eq!(l.anchor_row(5), Some(4));
        assert_eq!(l.rows[0].plain_text(), "one");
    }

    #[test]
    fn block_quote_prefixes_rows() {
        let l = layout("> quoted text", 40);
        assert_eq!(row_texts(&l), vec!["│ quoted text"]);
        assert_eq!(l.rows[0].plain_text(), "quoted text");
    }

    #[test]
    fn table_rows_are_anchored() {
        let l = layout("| a | bb |\n|---|----|\n| 1 | 2 |", 40);
        let texts = row_texts(&l);
        assert_eq!(texts[0], "┌───┬────┐");
        assert_eq!(texts[1], "│ a │ bb │");
        assert_eq!(texts[3], "│ 1 │ 2  │");
        assert_eq!(l.anchor_row(1), Some(1));
        assert_eq!(l.anchor_row(3), Some(3));
    }

    #[test]
    fn mentions_render_with_at_sign() {
        let l = layout("cc @alice", 40);
        assert_eq!(row_texts(&l), vec!["cc @alice"]);
        assert!(l.rows[0].spans.iter().any(|s| s.role == SpanRole::Mention));
    }

    #[test]
    fn every_anchored_line_has_a_row() {
        let doc = Document::new("# T\n\n- a\n- b\n\n```\nx\n```\n\n> q\n\ntext\n**more**");
        let l = layout_document(&doc.tree, 30, None);
        for line in &doc.anchored_lines {
            assert!(l.anchor_row(*line).is_some(), "line {line} has no row");
        }
    }

    #[test]
    fn inline_code_and_html_lines_keep_their_anchor() {
        for text in ["a\n`b`", "Some text\n`code` more", "para\n\n<div>\nhi\n</div>\n\nafter"] {
            let doc = Document::new(text);
            let l = layout_document(&doc.tree, 40, None);
            for line in &doc.anchored_lines {
                assert!(l.anchor_row(*line).is_some(), "line {line} of {text:?} has no row");
            }
        }

        let l = layout("a\n`b`", 40);
        assert_eq!(row_texts(&l), vec!["a b"]);
        assert_eq!(l.anchor_row(2), Some(0));
    }

    #[test]
    fn text_between_joins_plain_rows() {
        let l = layout("- one\n- two", 40);
        assert_eq!(l.text_between(1, 0), "one\ntwo");
    }
}
