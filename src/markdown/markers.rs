//! Line-marker annotation of the rendered tree.
//!
//! Gives every element the source line it starts on and inserts one
//! zero-size [`NodeKind::Anchor`] per distinct line, so that after layout
//! the position of each line can be read back from its anchor.

use std::collections::BTreeSet;

use super::tree::{NodeKind, RenderedNode};

/// Element id of the anchor for `line`.
#[must_use]
pub fn anchor_id(line: u32) -> String {
    format!("line-marker-{line}")
}

/// Deep-link id of the gutter row for `line`.
#[must_use]
pub fn deep_link_id(line: u32) -> String {
    format!("line-{line}")
}

/// Parse a deep-link fragment (`line-42` or `#line-42`) into a line number.
#[must_use]
pub fn parse_deep_link(fragment: &str) -> Option<u32> {
    fragment
        .trim_start_matches('#')
        .strip_prefix("line-")
        .and_then(|n| n.parse().ok())
        .filter(|&n| n > 0)
}

/// Annotate `root` in place. Returns the set of lines that received an anchor.
///
/// Walks the tree in document order:
/// - void elements are skipped entirely,
/// - code blocks are exploded into one [`NodeKind::CodeLine`] per physical
///   line, each preceded by its own anchor,
/// - every other element with a position gets `source_line`, and the first
///   element claiming a line gets that line's anchor as its first child.
pub fn annotate(root: &mut RenderedNode) -> BTreeSet<u32> {
    let mut seen = BTreeSet::new();
    for child in &mut root.children {
        annotate_node(child, &mut seen);
    }
    seen
}

fn annotate_node(node: &mut RenderedNode, seen: &mut BTreeSet<u32>) {
    if node.kind.is_void() || node.kind.is_text() {
        return;
    }
    if matches!(node.kind, NodeKind::Anchor { .. } | NodeKind::Mention { .. }) {
        return;
    }

    if let Some(line) = node.position_line {
        node.source_line = Some(line);
        if seen.insert(line) {
            node.children.insert(0, RenderedNode::anchor(line));
        }
    }

    if let NodeKind::CodeBlock { fenced, .. } = node.kind {
        explode_code_block(node, fenced, seen);
        return;
    }

    for child in &mut node.children {
        annotate_node(child, seen);
    }
}

/// Replace a code block's text with per-line children. Fenced content starts
/// on the line after the fence; indented content starts on the block's line.
fn explode_code_block(node: &mut RenderedNode, fenced: bool, seen: &mut BTreeSet<u32>) {
    let Some(block_line) = node.position_line else {
        return;
    };
    let first_line = if fenced { block_line + 1 } else { block_line };

    let body = node.text_content();
    let body = body.strip_suffix('\n').unwrap_or(&body);

    // An indented block's own anchor would duplicate its first code line's.
    let mut children: Vec<RenderedNode> = node
        .children
        .drain(..)
        .filter(|child| matches!(child.kind, NodeKind::Anchor { line } if line < first_line))
        .collect();

    if body.is_empty() {
        node.children = children;
        return;
    }

    for (i, text) in body.split('\n').enumerate() {
        let line = first_line + i as u32;
        seen.insert(line);
        let mut code_line = RenderedNode::new(NodeKind::CodeLine, Some(line));
        code_line.source_line = Some(line);
        code_line.children.push(RenderedNode::anchor(line));
        code_line.children.push(RenderedNode::text(text));
        children.push(code_line);
    }
    node.children = children;
}
