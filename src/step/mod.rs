//! Step registration recognition over the dialect-neutral tree.
//!
//! [`classify`] is the only place that inspects node shapes. It turns a
//! node into a [`StepCall`] (patterns, handler, block style) or explains why
//! not; the walker, pattern extractor and body reconstructor only ever see
//! the `StepCall`.

pub mod body;
pub mod pattern;
pub mod walker;

use std::fmt;

use crate::catalog::{Catalog, StepEntry};
use crate::parse::Dialect;
use crate::parse::source::SourceFile;
use crate::syntax::{BlockStyle, NodeKind, Receiver, Span, SyntaxNode};
use walker::StepWalker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Given,
    When,
    Then,
    And,
}

impl Keyword {
    /// Case-sensitive, exact match.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Given" => Some(Keyword::Given),
            "When" => Some(Keyword::When),
            "Then" => Some(Keyword::Then),
            "And" => Some(Keyword::And),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Given => "Given",
            Keyword::When => "When",
            Keyword::Then => "Then",
            Keyword::And => "And",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized step registration call site.
#[derive(Debug, Clone, Copy)]
pub struct StepCall<'t> {
    pub keyword: Keyword,
    pub span: Span,
    /// Arguments that make up the pattern key, in source order.
    pub patterns: &'t [SyntaxNode],
    pub handler: &'t SyntaxNode,
}

impl StepCall<'_> {
    /// Non-block handlers (a function reference, a variable) count as brace.
    pub fn block_style(&self) -> BlockStyle {
        match &self.handler.kind {
            NodeKind::Block(block) => block.style,
            _ => BlockStyle::Brace,
        }
    }

    /// Inner span of a block handler.
    pub fn body(&self) -> Option<Span> {
        match &self.handler.kind {
            NodeKind::Block(block) => block.body,
            _ => None,
        }
    }
}

/// Why a node is not a step registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Mismatch {
    #[error("not a call")]
    NotACall,
    #[error("callee is not a member access")]
    NotAMember,
    #[error("`{0}` is not a step keyword")]
    NotAKeyword(String),
    #[error("`{0}` is called on an explicit receiver")]
    ExplicitReceiver(Keyword),
    #[error("`{0}` has no handler")]
    MissingHandler(Keyword),
}

impl Mismatch {
    /// The node names a step keyword but is shaped wrong. Worth a debug line;
    /// every other mismatch is just ordinary code.
    pub fn is_near_miss(&self) -> bool {
        matches!(
            self,
            Mismatch::ExplicitReceiver(_) | Mismatch::MissingHandler(_)
        )
    }
}

pub fn classify(node: &SyntaxNode) -> Result<StepCall<'_>, Mismatch> {
    let NodeKind::Call(call) = &node.kind else {
        return Err(Mismatch::NotACall);
    };
    let NodeKind::Member(member) = &call.callee.kind else {
        return Err(Mismatch::NotAMember);
    };
    let keyword = Keyword::from_name(&member.name)
        .ok_or_else(|| Mismatch::NotAKeyword(member.name.clone()))?;
    if let Receiver::Explicit(_) = member.receiver {
        return Err(Mismatch::ExplicitReceiver(keyword));
    }

    let (patterns, handler) = match call.block.as_deref() {
        Some(block) => (call.arguments.as_slice(), block),
        None => {
            let (handler, patterns) = call
                .arguments
                .split_last()
                .ok_or(Mismatch::MissingHandler(keyword))?;
            (patterns, handler)
        }
    };

    Ok(StepCall {
        keyword,
        span: node.span,
        patterns,
        handler,
    })
}

/// Extract every step registration in one file's tree. Duplicate patterns
/// within the file keep the last occurrence.
pub fn extract_steps(
    root: &SyntaxNode,
    source: &SourceFile,
    dialect: Dialect,
    file_label: &str,
) -> Catalog {
    let mut walker = StepWalker::new(source, dialect);
    walker.walk(root);

    let bytes = source.as_bytes();
    let mut steps = Catalog::new();
    for call in walker.calls {
        let key = pattern::pattern_key(call.patterns, bytes, dialect);
        let code = body::handler_code(&call, bytes);
        steps.insert(key, StepEntry::new(code, file_label));
    }
    steps
}
