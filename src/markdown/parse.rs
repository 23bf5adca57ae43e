//! Markdown to [`RenderedNode`] tree using pulldown-cmark.
//!
//! Every element records the 1-based line of the byte offset its event
//! range starts at. Text runs carry no position: only elements claim lines.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use super::tree::{NodeKind, RenderedNode};

/// Byte offsets of line starts, for offset to line-number lookups.
struct LineStarts(Vec<usize>);

impl LineStarts {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(idx, _)| idx + 1));
        Self(starts)
    }

    fn line_of(&self, offset: usize) -> u32 {
        self.0.partition_point(|&start| start <= offset) as u32
    }
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Parse `text` into a tree rooted at a [`NodeKind::Root`] node.
#[must_use]
pub fn parse_markdown(text: &str) -> RenderedNode {
    let starts = LineStarts::new(text);
    let mut stack = vec![RenderedNode::new(NodeKind::Root, None)];

    for (event, range) in Parser::new_ext(text, options()).into_offset_iter() {
        let line = Some(starts.line_of(range.start));
        match event {
            Event::Start(tag) => stack.push(RenderedNode::new(tag_kind(tag), line)),
            Event::End(_) => {
                if stack.len() > 1 {
                    if let Some(node) = stack.pop() {
                        push_child(&mut stack, node);
                    }
                }
            }
            Event::Text(value) => push_text(&mut stack, &value),
            Event::Code(value) => {
                let node = RenderedNode::new(NodeKind::InlineCode(value.to_string()), line);
                push_child(&mut stack, node);
            }
            Event::Html(value) | Event::InlineHtml(value) => push_text(&mut stack, &value),
            Event::FootnoteReference(label) => push_text(&mut stack, &format!("[^{label}]")),
            Event::SoftBreak => {
                push_child(&mut stack, RenderedNode::new(NodeKind::SoftBreak, None));
            }
            Event::HardBreak => {
                push_child(&mut stack, RenderedNode::new(NodeKind::HardBreak, line));
            }
            Event::Rule => push_child(&mut stack, RenderedNode::new(NodeKind::Rule, line)),
            Event::TaskListMarker(checked) => {
                push_child(&mut stack, RenderedNode::new(NodeKind::TaskMarker(checked), line));
            }
            #[allow(unreachable_patterns)]
            _ => {}
        }
    }

    // Close anything left open.
    while stack.len() > 1 {
        if let Some(node) = stack.pop() {
            push_child(&mut stack, node);
        }
    }
    stack.pop().unwrap_or_else(|| RenderedNode::new(NodeKind::Root, None))
}

fn tag_kind(tag: Tag<'_>) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => NodeKind::Heading(level as u8),
        Tag::BlockQuote(_) => NodeKind::BlockQuote,
        Tag::CodeBlock(CodeBlockKind::Fenced(info)) => NodeKind::CodeBlock {
            lang: info
                .split_whitespace()
                .next()
                .map(str::to_string)
                .filter(|lang| !lang.is_empty()),
            fenced: true,
        },
        Tag::CodeBlock(CodeBlockKind::Indented) => NodeKind::CodeBlock {
            lang: None,
            fenced: false,
        },
        Tag::HtmlBlock => NodeKind::HtmlBlock,
        Tag::List(start) => NodeKind::List { start },
        Tag::Item => NodeKind::Item,
        Tag::Table(_) => NodeKind::Table,
        Tag::TableHead => NodeKind::TableHead,
        Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Strikethrough => NodeKind::Strikethrough,
        Tag::Link { dest_url, .. } => NodeKind::Link {
            url: dest_url.to_string(),
        },
        Tag::Image { dest_url, .. } => NodeKind::Image {
            url: dest_url.to_string(),
        },
        _ => NodeKind::Container,
    }
}

fn push_child(stack: &mut [RenderedNode], node: RenderedNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

/// Append a text run, merging with a preceding run inside code blocks so
/// the block body stays one contiguous string.
fn push_text(stack: &mut [RenderedNode], value: &str) {
    let Some(parent) = stack.last_mut() else {
        return;
    };
    if matches!(parent.kind, NodeKind::CodeBlock { .. } | NodeKind::HtmlBlock) {
        if let Some(RenderedNode {
            kind: NodeKind::Text(existing),
            ..
        }) = parent.children.last_mut()
        {
            existing.push_str(value);
            return;
        }
    }
    parent.children.push(RenderedNode::text(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(node: &RenderedNode) -> Vec<NodeKind> {
        node.children.iter().map(|c| c.kind.clone()).collect()
    }

    #[test]
    fn heading_and_paragraph_lines() {
        let root = parse_markdown("# Title\n\nBody text\nsecond line");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].kind, NodeKind::Heading(1));
        assert_eq!(root.children[0].position_line, Some(1));
        assert_eq!(root.children[1].kind, NodeKind::Paragraph);
        assert_eq!(root.children[1].position_line, Some(3));
    }

    #[test]
    fn fenced_code_block_keeps_language_and_body() {
        let root = parse_markdown("intro\n\n```rust\nlet a = 1;\nlet b = 2;\n```\n");
        let code = &root.children[1];
        assert_eq!(
            code.kind,
            NodeKind::CodeBlock {
                lang: Some("rust".to_string()),
                fenced: true
            }
        );
        assert_eq!(code.position_line, Some(3));
        assert_eq!(code.text_content(), "let a = 1;\nlet b = 2;\n");
    }

    #[test]
    fn list_items_start_on_their_own_lines() {
        let root = parse_markdown("- one\n- two\n- three");
        let list = &root.children[0];
        let lines: Vec<_> = list.children.iter().map(|i| i.position_line).collect();
        assert_eq!(lines, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn table_rows_get_positions() {
        let root = parse_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |");
        let table = &root.children[0];
        assert_eq!(table.kind, NodeKind::Table);
        let rows: Vec<_> = table
            .children
            .iter()
            .map(|r| (r.kind.clone(), r.position_line))
            .collect();
        assert_eq!(rows[0], (NodeKind::TableHead, Some(1)));
        assert_eq!(rows[1], (NodeKind::TableRow, Some(3)));
        assert_eq!(rows[2], (NodeKind::TableRow, Some(4)));
    }

    #[test]
    fn inline_elements_on_later_lines_keep_their_line() {
        let root = parse_markdown("first line\nand **bold** here");
        let para = &root.children[0];
        let strong = para
            .children
            .iter()
            .find(|c| c.kind == NodeKind::Strong)
            .expect("strong node");
        assert_eq!(strong.position_line, Some(2));
    }

    #[test]
    fn text_runs_carry_no_position() {
        let root = parse_markdown("plain");
        let para = &root.children[0];
        assert_eq!(kinds(para), vec![NodeKind::Text("plain".to_string())]);
        assert_eq!(para.children[0].position_line, None);
    }

    #[test]
    fn rule_is_void() {
        let root = parse_markdown("a\n\n---\n\nb");
        assert!(root.children.iter().any(|c| c.kind == NodeKind::Rule));
        assert!(NodeKind::Rule.is_void());
    }
}
