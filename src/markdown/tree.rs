use std::ops::Range;

use pulldown_cmark::{Event, Options, Parser, Tag};

use super::heading::HeadingIds;

/// What a [`Node`] represents, together with the data specific to that kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Root of the tree. Spans the whole source.
    Document,
    /// Section heading. `id` is the explicit `{#id}` or a generated slug.
    Heading { level: u8, id: String },
    Paragraph,
    Table,
    /// A table row. The table head is folded into a plain row, so it is
    /// always the first row of its table.
    TableRow,
    TableCell,
    Link { destination: String },
    /// Literal text. Its span points at the raw source characters.
    Text,
    /// Inline code. Its span includes the surrounding backticks.
    Code,
    /// Containers nothing downstream inspects (lists, emphasis, quotes, ...).
    Other,
}

/// A node of the parsed markdown tree.
///
/// Nodes do not own their text: text-bearing nodes carry a byte range into
/// the source they were parsed from, resolved with [`Node::literal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    span: Range<usize>,
    children: Vec<Node>,
}

impl Node {
    fn new(kind: NodeKind, span: Range<usize>) -> Self {
        Self {
            kind,
            span,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Byte range of this node in the source document.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Destination of a link node, `None` for every other kind.
    pub fn destination(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Link { destination } => Some(destination),
            _ => None,
        }
    }

    /// Identifier of a heading node, `None` for every other kind.
    pub fn heading_id(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Heading { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Raw source text of a text or code node.
    pub fn literal<'s>(&self, source: &'s str) -> Option<&'s str> {
        match self.kind {
            NodeKind::Text | NodeKind::Code => source.get(self.span.clone()),
            _ => None,
        }
    }

    /// Concatenates every literal span beneath this node, in document order.
    pub fn text(&self, source: &str) -> String {
        let mut buf = String::new();
        for node in self.descendants() {
            if let Some(literal) = node.literal(source) {
                buf.push_str(literal);
            }
        }
        buf
    }

    /// Depth-first, pre-order traversal starting with this node.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Iterator returned by [`Node::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Parser options: GFM tables and `{#id}` heading attributes.
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Parses markdown into an owned [`Node`] tree rooted at a `Document` node.
///
/// Parsing never fails: malformed markup degrades to paragraphs and text the
/// same way CommonMark renderers treat it.
pub fn parse(source: &str) -> Node {
    let mut builder = TreeBuilder::new(source);
    for (event, range) in Parser::new_ext(source, parser_options()).into_offset_iter() {
        builder.push(event, range);
    }
    builder.finish()
}

/// Folds the flat pulldown-cmark event stream into nested nodes.
struct TreeBuilder<'s> {
    source: &'s str,
    /// Open nodes. Index 0 is always the document root.
    stack: Vec<Node>,
    heading_ids: HeadingIds,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            stack: vec![Node::new(NodeKind::Document, 0..source.len())],
            heading_ids: HeadingIds::default(),
        }
    }

    fn push(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.stack.push(Node::new(kind_of(tag), range)),
            Event::End(_) => self.close(),
            Event::Text(_) => self.append(Node::new(NodeKind::Text, range)),
            Event::Code(_) => self.append(Node::new(NodeKind::Code, range)),
            _ => {}
        }
    }

    fn close(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(mut node) = self.stack.pop() else {
            return;
        };

        let resolved = match &node.kind {
            NodeKind::Heading { id, .. } => {
                Some(self.heading_ids.resolve(id, &node.text(self.source)))
            }
            _ => None,
        };
        if let (Some(resolved), NodeKind::Heading { id, .. }) = (resolved, &mut node.kind) {
            *id = resolved;
        }

        self.append(node);
    }

    fn append(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
    }

    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.close();
        }
        let len = self.source.len();
        self.stack
            .pop()
            .unwrap_or_else(|| Node::new(NodeKind::Document, 0..len))
    }
}

fn kind_of(tag: Tag<'_>) -> NodeKind {
    match tag {
        Tag::Heading { level, id, .. } => NodeKind::Heading {
            level: level as u8,
            id: id.map(|id| id.to_string()).unwrap_or_default(),
        },
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Table(_) => NodeKind::Table,
        Tag::TableHead | Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::Link { dest_url, .. } => NodeKind::Link {
            destination: dest_url.to_string(),
        },
        _ => NodeKind::Other,
    }
}
