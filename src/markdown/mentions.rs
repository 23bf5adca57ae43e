//! `@login` mentions turned into GitHub profile links.

use std::sync::LazyLock;

use regex::Regex;

use super::tree::{NodeKind, RenderedNode};

static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)").expect("mention pattern is valid")
});

/// Split text runs containing `@login` into text and [`NodeKind::Mention`] nodes.
///
/// Text already inside a link, or inside code and raw HTML, is left alone.
/// Mention nodes carry no position, so they never claim a source line.
pub fn link_mentions(node: &mut RenderedNode) {
    if matches!(
        node.kind,
        NodeKind::Link { .. } | NodeKind::CodeBlock { .. } | NodeKind::HtmlBlock
    ) {
        return;
    }

    let mut children = Vec::with_capacity(node.children.len());
    for mut child in std::mem::take(&mut node.children) {
        if let NodeKind::Text(value) = &child.kind {
            if MENTION_RE.is_match(value) {
                children.extend(split_mentions(value));
                continue;
            }
        }
        link_mentions(&mut child);
        children.push(child);
    }
    node.children = children;
}

fn split_mentions(text: &str) -> Vec<RenderedNode> {
    let mut nodes = Vec::new();
    let mut last = 0;
    for captures in MENTION_RE.captures_iter(text) {
        let (Some(whole), Some(login)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if whole.start() > last {
            nodes.push(RenderedNode::text(&text[last..whole.start()]));
        }
        nodes.push(RenderedNode::new(
            NodeKind::Mention {
                login: login.as_str().to_string(),
            },
            None,
        ));
        last = whole.end();
    }
    if last < text.len() {
        nodes.push(RenderedNode::text(&text[last..]));
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse::parse_markdown;

    fn mentions(node: &RenderedNode) -> Vec<String> {
        let mut out = Vec::new();
        node.visit(&mut |n| {
            if let NodeKind::Mention { login } = &n.kind {
                out.push(login.clone());
            }
        });
        out
    }

    #[test]
    fn splits_text_around_mentions() {
        let mut root = parse_markdown("ping @alice and @bob-smith please");
        link_mentions(&mut root);
        let para = &root.children[0];
        assert_eq!(mentions(&root), vec!["alice", "bob-smith"]);
        assert_eq!(para.children.len(), 5);
        assert_eq!(para.children[0].kind, NodeKind::Text("ping ".to_string()));
        assert_eq!(para.children[4].kind, NodeKind::Text(" please".to_string()));
    }

    #[test]
    fn trailing_hyphen_is_not_part_of_login() {
        let mut root = parse_markdown("thanks @carol-");
        link_mentions(&mut root);
        assert_eq!(mentions(&root), vec!["carol"]);
        assert_eq!(root.text_content(), "thanks @carol-");
    }

    #[test]
    fn skips_links_and_code() {
        let mut root = parse_markdown("[@dave](https://x.test) `@erin`\n\n```\n@frank\n```");
        link_mentions(&mut root);
        assert!(mentions(&root).is_empty());
    }

    #[test]
    fn mentions_have_no_position() {
        let mut root = parse_markdown("@gina");
        link_mentions(&mut root);
        let mention = &root.children[0].children[0];
        assert_eq!(mention.position_line, None);
    }
}
