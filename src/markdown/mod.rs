//! Markdown rendering pipeline.
//!
//! Source text goes through [`parse::parse_markdown`], mention linking and
//! line-marker annotation to become a [`RenderedNode`] tree. The tree is then
//! laid out into terminal rows by [`render::layout_document`].

pub mod line_index;
pub mod markers;
pub mod mentions;
pub mod parse;
pub mod render;
pub mod tree;

use std::collections::BTreeSet;

pub use line_index::{LineClass, classify};
pub use markers::{anchor_id, deep_link_id, parse_deep_link};
pub use render::{DocumentLayout, LayoutRow, RowKind, SpanRole, StyledSpan, layout_document};
pub use tree::{NodeKind, RenderedNode};

/// A parsed and annotated RFC document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Source lines, split on `\n` only. Line `n` is `lines[n - 1]`.
    pub lines: Vec<String>,
    pub classes: Vec<LineClass>,
    pub tree: RenderedNode,
    /// Lines that received an anchor in the rendered tree.
    pub anchored_lines: BTreeSet<u32>,
}

impl Document {
    #[must_use]
    pub fn new(content: &str) -> Self {
        let lines: Vec<String> = content.split('\n').map(str::to_string).collect();
        let classes = classify(&lines);
        let mut tree = parse::parse_markdown(content);
        mentions::link_mentions(&mut tree);
        let anchored_lines = markers::annotate(&mut tree);
        Self {
            lines,
            classes,
            tree,
            anchored_lines,
        }
    }

    #[must_use]
    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    #[must_use]
    pub fn line(&self, line: u32) -> Option<&str> {
        let idx = usize::try_from(line).ok()?.checked_sub(1)?;
        self.lines.get(idx).map(String::as_str)
    }

    #[must_use]
    pub fn class(&self, line: u32) -> Option<LineClass> {
        let idx = usize::try_from(line).ok()?.checked_sub(1)?;
        self.classes.get(idx).copied()
    }

    /// Whether the gutter offers a comment affordance for `line`.
    #[must_use]
    pub fn is_commentable(&self, line: u32) -> bool {
        self.class(line).is_some_and(LineClass::is_commentable)
    }
}

/// Lay a comment body out as markdown at `width` columns.
///
/// Comments are not commentable, so their anchors are dropped after code
/// blocks are split into lines. Trailing blank rows are dropped so the box
/// height is exactly the rendered content.
#[must_use]
pub fn render_comment(body: &str, width: u32) -> Vec<LayoutRow> {
    let mut tree = parse::parse_markdown(body);
    mentions::link_mentions(&mut tree);
    markers::annotate(&mut tree);
    strip_anchors(&mut tree);
    let mut rows = layout_document(&tree, width, None).rows;
    while rows.last().is_some_and(|row| row.kind == RowKind::Blank) {
        rows.pop();
    }
    rows
}

fn strip_anchors(node: &mut RenderedNode) {
    node.children
        .retain(|child| !matches!(child.kind, NodeKind::Anchor { .. }));
    for child in &mut node.children {
        strip_anchors(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_indexes_lines_from_one() {
        let doc = Document::new("# A\n\nbody\n");
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.line(1), Some("# A"));
        assert_eq!(doc.line(0), None);
        assert!(doc.is_commentable(1));
        assert!(!doc.is_commentable(2));
        assert_eq!(doc.anchored_lines.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn comments_render_as_markdown() {
        let rows = render_comment("**Nice** work @bob\n\n```\nlet x = 1;\n```\n", 40);
        let texts: Vec<String> = rows.iter().map(LayoutRow::plain_text).collect();
        assert_eq!(texts, vec!["Nice work @bob", "", "let x = 1;"]);
        let roles: Vec<SpanRole> = rows[0].spans.iter().map(|s| s.role).collect();
        assert!(roles.contains(&SpanRole::Strong));
        assert!(roles.contains(&SpanRole::Mention));
        assert_eq!(rows[2].kind, RowKind::Code);
        assert!(render_comment("", 40).is_empty());
    }

    #[test]
    fn empty_document_has_one_blank_line() {
        let doc = Document::new("");
        assert_eq!(doc.line_count(), 1);
        assert!(doc.anchored_lines.is_empty());
    }
}
