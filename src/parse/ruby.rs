//! Ruby tree builder backed by Prism.
//!
//! Lowering runs as a single Prism visit. Every branch node opens a frame on
//! enter and closes it on leave; unmodelled ones become an `Other` holding
//! whatever their children emitted. Modelled node types override their visit
//! method and hand a typed node to the open frame, which leave emits instead.
//! Leaves emit an `Other` on enter that a modelled leaf then replaces.

use ruby_prism::Visit;

use super::ParseError;
use super::source::SourceFile;
use crate::syntax::{Block, BlockStyle, Call, Member, NodeKind, Receiver, Span, SyntaxNode};

pub fn parse(source: &SourceFile) -> Result<SyntaxNode, ParseError> {
    // ParseResult is !Send; it lives and dies on this thread.
    let result = ruby_prism::parse(source.as_bytes());

    if let Some(first) = result.errors().next() {
        let count = result.errors().count();
        let message = if count > 1 {
            format!("{} (and {} more)", first.message(), count - 1)
        } else {
            first.message().to_string()
        };
        return Err(ParseError::Syntax {
            location: source.location(first.location().start_offset()),
            message,
        });
    }

    let mut lowering = Lowering::default();
    Ok(lowering.lower(&result.node()))
}

fn span_of(loc: &ruby_prism::Location<'_>) -> Span {
    Span::new(loc.start_offset(), loc.end_offset())
}

#[derive(Default)]
struct Frame {
    span: Span,
    children: Vec<SyntaxNode>,
    lowered: Option<SyntaxNode>,
}

#[derive(Default)]
struct Lowering {
    frames: Vec<Frame>,
}

impl Lowering {
    fn lower(&mut self, node: &ruby_prism::Node<'_>) -> SyntaxNode {
        let span = span_of(&node.location());
        self.collect(|this| this.visit(node))
            .pop()
            .unwrap_or_else(|| SyntaxNode::other(span, Vec::new()))
    }

    /// Run `f` against a fresh frame and return whatever it emitted.
    fn collect(&mut self, f: impl FnOnce(&mut Self)) -> Vec<SyntaxNode> {
        self.frames.push(Frame::default());
        f(self);
        self.frames.pop().map(|frame| frame.children).unwrap_or_default()
    }

    fn emit(&mut self, node: SyntaxNode) {
        if let Some(frame) = self.frames.last_mut() {
            frame.children.push(node);
        }
    }

    /// Typed result for the branch node whose frame is open.
    fn finish(&mut self, node: SyntaxNode) {
        match self.frames.last_mut() {
            Some(frame) if frame.span == node.span && frame.lowered.is_none() => {
                frame.lowered = Some(node);
            }
            _ => self.emit(node),
        }
    }

    /// Typed result for a leaf, replacing the placeholder its enter hook emitted.
    fn replace_leaf(&mut self, node: SyntaxNode) {
        if let Some(frame) = self.frames.last_mut() {
            let placeholder = frame
                .children
                .last()
                .is_some_and(|last| last.span == node.span && matches!(last.kind, NodeKind::Other(_)));
            if placeholder {
                frame.children.pop();
            }
        }
        self.emit(node);
    }

    fn emit_block(
        &mut self,
        span: Span,
        delimiters: (ruby_prism::Location<'_>, ruby_prism::Location<'_>),
        parameters: Option<ruby_prism::Node<'_>>,
        body: Option<ruby_prism::Node<'_>>,
    ) {
        let (opening, closing) = delimiters;
        // The opening token is read from the block's own location; `{` and
        // `do` otherwise lower to the same shape.
        let style = if opening.as_slice() == b"do" {
            BlockStyle::Do
        } else {
            BlockStyle::Brace
        };
        // Everything between the delimiters, after any `|params|`. Heredoc
        // bodies and trailing comments lie outside the body node's location.
        let start = parameters
            .map(|p| p.location().end_offset())
            .map_or(opening.end_offset(), |end| end.max(opening.end_offset()));
        let end = closing.start_offset().max(start);
        let children = match &body {
            Some(body) => vec![self.lower(body)],
            None => Vec::new(),
        };
        self.finish(SyntaxNode::new(
            NodeKind::Block(Block {
                style,
                body: Some(Span::new(start, end)),
                children,
            }),
            span,
        ));
    }
}

impl<'pr> Visit<'pr> for Lowering {
    fn visit_branch_node_enter(&mut self, node: ruby_prism::Node<'pr>) {
        self.frames.push(Frame {
            span: span_of(&node.location()),
            ..Frame::default()
        });
    }

    fn visit_branch_node_leave(&mut self) {
        if let Some(frame) = self.frames.pop() {
            let node = frame
                .lowered
                .unwrap_or_else(|| SyntaxNode::other(frame.span, frame.children));
            self.emit(node);
        }
    }

    fn visit_leaf_node_enter(&mut self, node: ruby_prism::Node<'pr>) {
        self.emit(SyntaxNode::other(span_of(&node.location()), Vec::new()));
    }

    fn visit_call_node(&mut self, node: &ruby_prism::CallNode<'pr>) {
        let call_span = span_of(&node.location());

        let receiver = match node.receiver() {
            None => Receiver::Contextual,
            Some(r) if r.as_self_node().is_some() => Receiver::Contextual,
            Some(r) => Receiver::Explicit(Box::new(self.lower(&r))),
        };
        let member_span = match node.message_loc() {
            Some(msg) => Span::new(call_span.start, msg.end_offset()),
            None => call_span,
        };
        let callee = SyntaxNode::new(
            NodeKind::Member(Member {
                receiver,
                name: String::from_utf8_lossy(node.name().as_slice()).into_owned(),
            }),
            member_span,
        );

        let mut arguments = Vec::new();
        if let Some(args) = node.arguments() {
            for arg in args.arguments().iter() {
                arguments.push(self.lower(&arg));
            }
        }

        let block = node.block().map(|b| Box::new(self.lower(&b)));

        self.finish(SyntaxNode::new(
            NodeKind::Call(Call {
                callee: Box::new(callee),
                arguments,
                block,
            }),
            call_span,
        ));
    }

    fn visit_block_node(&mut self, node: &ruby_prism::BlockNode<'pr>) {
        self.emit_block(
            span_of(&node.location()),
            (node.opening_loc(), node.closing_loc()),
            node.parameters(),
            node.body(),
        );
    }

    fn visit_lambda_node(&mut self, node: &ruby_prism::LambdaNode<'pr>) {
        self.emit_block(
            span_of(&node.location()),
            (node.opening_loc(), node.closing_loc()),
            node.parameters(),
            node.body(),
        );
    }

    fn visit_regular_expression_node(&mut self, node: &ruby_prism::RegularExpressionNode<'pr>) {
        self.replace_leaf(SyntaxNode::new(
            NodeKind::Regex {
                pattern: span_of(&node.content_loc()),
            },
            span_of(&node.location()),
        ));
    }

    fn visit_string_node(&mut self, node: &ruby_prism::StringNode<'pr>) {
        self.replace_leaf(SyntaxNode::literal(span_of(&node.location())));
    }

    fn visit_symbol_node(&mut self, node: &ruby_prism::SymbolNode<'pr>) {
        self.replace_leaf(SyntaxNode::literal(span_of(&node.location())));
    }

    fn visit_integer_node(&mut self, node: &ruby_prism::IntegerNode<'pr>) {
        self.replace_leaf(SyntaxNode::literal(span_of(&node.location())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn tree(text: &str) -> (SourceFile, SyntaxNode) {
        let source = SourceFile::from_string(PathBuf::from("steps.rb"), text.to_string());
        let root = parse(&source).unwrap();
        (source, root)
    }

    fn first_call<'a>(node: &'a SyntaxNode, name: &str) -> Option<&'a Call> {
        if let NodeKind::Call(call) = &node.kind {
            if let NodeKind::Member(member) = &call.callee.kind {
                if member.name == name {
                    return Some(call);
                }
            }
        }
        node.children().find_map(|child| first_call(child, name))
    }

    #[test]
    fn lowers_do_block_step() {
        let (src, root) = tree("Given(/^a user exists$/) do\n  true\nend\n");
        let call = first_call(&root, "Given").unwrap();
        match &call.callee.kind {
            NodeKind::Member(member) => assert_eq!(member.receiver, Receiver::Contextual),
            other => panic!("expected member, got {other:?}"),
        }
        assert_eq!(call.arguments.len(), 1);
        match &call.arguments[0].kind {
            NodeKind::Regex { pattern } => assert_eq!(src.slice(*pattern), "^a user exists$"),
            other => panic!("expected regex, got {other:?}"),
        }
        let block = call.block.as_deref().unwrap();
        match &block.kind {
            NodeKind::Block(b) => {
                assert_eq!(b.style, BlockStyle::Do);
                assert_eq!(src.slice(b.body.unwrap()).trim(), "true");
            }
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn lowers_brace_block_step() {
        let (src, root) = tree("When(/x/) { |a| a + 1 }\n");
        let call = first_call(&root, "When").unwrap();
        let block = call.block.as_deref().unwrap();
        assert!(matches!(
            block.kind,
            NodeKind::Block(Block {
                style: BlockStyle::Brace,
                ..
            })
        ));
        assert_eq!(block.text(src.as_bytes()), "{ |a| a + 1 }");
    }

    #[test]
    fn self_receiver_is_contextual() {
        let (_, root) = tree("self.Then(/x/) { }\n");
        let call = first_call(&root, "Then").unwrap();
        match &call.callee.kind {
            NodeKind::Member(member) => assert_eq!(member.receiver, Receiver::Contextual),
            other => panic!("expected member, got {other:?}"),
        }
    }

    #[test]
    fn explicit_receiver_is_kept() {
        let (_, root) = tree("world.Then(/x/) { }\n");
        let call = first_call(&root, "Then").unwrap();
        match &call.callee.kind {
            NodeKind::Member(member) => {
                assert!(matches!(member.receiver, Receiver::Explicit(_)));
            }
            other => panic!("expected member, got {other:?}"),
        }
    }

    #[test]
    fn nested_calls_survive_lowering() {
        let (_, root) = tree("if ENV['X']\n  module Steps\n    And(/y/) do\n    end\n  end\nend\n");
        assert!(first_call(&root, "And").is_some());
    }

    #[test]
    fn empty_block_has_blank_body() {
        let (src, root) = tree("Given(/x/) do\nend\n");
        let call = first_call(&root, "Given").unwrap();
        match &call.block.as_deref().unwrap().kind {
            NodeKind::Block(b) => {
                assert!(b.children.is_empty());
                assert_eq!(src.slice(b.body.unwrap()).trim(), "");
            }
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn syntax_error_is_located() {
        let source = SourceFile::from_string(
            PathBuf::from("bad.rb"),
            "Given(/x/) do\n  puts 'unterminated\n".to_string(),
        );
        let err = parse(&source).unwrap_err();
        assert!(err.location().is_some());
    }
}
