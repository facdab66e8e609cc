//! Dialect-neutral syntax tree.
//!
//! Each dialect's tree builder lowers its parser's native tree into these
//! nodes, keeping only the shapes step extraction consults. Everything else
//! becomes [`NodeKind::Other`] so traversal can still reach nested calls.

use std::borrow::Cow;

/// Byte range into the original source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The bytes covered by this span, or `None` if it falls outside `source`.
    pub fn slice<'a>(&self, source: &'a [u8]) -> Option<&'a [u8]> {
        source.get(self.start..self.end)
    }

    /// Source text covered by this span. Invalid UTF-8 is replaced; an
    /// out-of-range span yields an empty string.
    pub fn text<'a>(&self, source: &'a [u8]) -> Cow<'a, str> {
        match self.slice(source) {
            Some(bytes) => String::from_utf8_lossy(bytes),
            None => Cow::Borrowed(""),
        }
    }
}

/// How a block literal was delimited in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// `{ ... }`, `function () { ... }`, `() => ...`
    Brace,
    /// `do ... end`
    Do,
}

/// The receiver side of a member access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    /// `this` in JavaScript; no receiver or `self` in Ruby.
    Contextual,
    Explicit(Box<SyntaxNode>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub callee: Box<SyntaxNode>,
    pub arguments: Vec<SyntaxNode>,
    /// Block attached to the call (`foo(x) do ... end`). Always `None` for
    /// JavaScript, where handlers are passed as ordinary arguments.
    pub block: Option<Box<SyntaxNode>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub receiver: Receiver,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub style: BlockStyle,
    /// Text between the delimiters for Ruby blocks (after any `|params|`);
    /// the function body for JavaScript.
    pub body: Option<Span>,
    pub children: Vec<SyntaxNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Call(Call),
    Member(Member),
    Literal,
    /// Regular expression literal; `pattern` covers the text between the
    /// delimiters.
    Regex {
        pattern: Span,
    },
    Block(Block),
    Other(Vec<SyntaxNode>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Span,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn other(span: Span, children: Vec<SyntaxNode>) -> Self {
        Self::new(NodeKind::Other(children), span)
    }

    pub fn literal(span: Span) -> Self {
        Self::new(NodeKind::Literal, span)
    }

    /// Direct children in source order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &SyntaxNode> {
        let none: &[SyntaxNode] = &[];
        let (head, list, tail): (Option<&SyntaxNode>, &[SyntaxNode], Option<&SyntaxNode>) =
            match &self.kind {
                NodeKind::Call(call) => (
                    Some(call.callee.as_ref()),
                    call.arguments.as_slice(),
                    call.block.as_deref(),
                ),
                NodeKind::Member(Member {
                    receiver: Receiver::Explicit(receiver),
                    ..
                }) => (Some(receiver.as_ref()), none, None),
                NodeKind::Block(block) => (None, block.children.as_slice(), None),
                NodeKind::Other(children) => (None, children.as_slice(), None),
                NodeKind::Member(_) | NodeKind::Literal | NodeKind::Regex { .. } => {
                    (None, none, None)
                }
            };
        head.into_iter().chain(list).chain(tail)
    }

    pub fn text<'a>(&self, source: &'a [u8]) -> Cow<'a, str> {
        self.span.text(source)
    }
}
