//! Rendered document tree.

/// Kind of a node in the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Heading(u8),
    Paragraph,
    BlockQuote,
    List { start: Option<u64> },
    Item,
    CodeBlock { lang: Option<String>, fenced: bool },
    /// One physical line of an exploded code block.
    CodeLine,
    HtmlBlock,
    Table,
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String },
    Image { url: String },
    Mention { login: String },
    InlineCode(String),
    Text(String),
    SoftBreak,
    HardBreak,
    Rule,
    TaskMarker(bool),
    /// Zero-size element that marks where a source line starts.
    Anchor { line: u32 },
    /// Any other element the parser produces that we only render as a container.
    Container,
}

impl NodeKind {
    /// Elements with no content model. They never carry a source line.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        matches!(
            self,
            Self::Rule | Self::Image { .. } | Self::HardBreak | Self::TaskMarker(_)
        )
    }

    /// Leaf nodes that are not elements (plain text runs).
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_) | Self::SoftBreak)
    }

    #[must_use]
    pub const fn is_block(&self) -> bool {
        matches!(
            self,
            Self::Root
                | Self::Heading(_)
                | Self::Paragraph
                | Self::BlockQuote
                | Self::List { .. }
                | Self::Item
                | Self::CodeBlock { .. }
                | Self::HtmlBlock
                | Self::Table
                | Self::Rule
                | Self::Container
        )
    }
}

/// A node of the rendered tree.
///
/// `position_line` is where the parser says the node's content starts;
/// `source_line` is the attribute set by the line-marker annotator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNode {
    pub kind: NodeKind,
    pub position_line: Option<u32>,
    pub source_line: Option<u32>,
    pub children: Vec<RenderedNode>,
}

impl RenderedNode {
    #[must_use]
    pub const fn new(kind: NodeKind, position_line: Option<u32>) -> Self {
        Self {
            kind,
            position_line,
            source_line: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub const fn anchor(line: u32) -> Self {
        Self::new(NodeKind::Anchor { line }, None)
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(value.into()), None)
    }

    /// Concatenated text content of this subtree.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(value) | NodeKind::InlineCode(value) => out.push_str(value),
            NodeKind::Mention { login } => {
                out.push('@');
                out.push_str(login);
            }
            NodeKind::SoftBreak | NodeKind::HardBreak => out.push('\n'),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Lines of every anchor in document order.
    #[must_use]
    pub fn anchor_lines(&self) -> Vec<u32> {
        let mut lines = Vec::new();
        self.visit(&mut |node| {
            if let NodeKind::Anchor { line } = node.kind {
                lines.push(line);
            }
        });
        lines
    }

    /// Pre-order traversal.
    pub fn visit(&self, f: &mut impl FnMut(&Self)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }
}
