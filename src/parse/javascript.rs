//! JavaScript tree builder backed by tree-sitter.

use tree_sitter::{Node, Parser};

use super::ParseError;
use super::source::SourceFile;
use crate::syntax::{Block, BlockStyle, Call, Member, NodeKind, Receiver, Span, SyntaxNode};

pub fn parse(source: &SourceFile) -> Result<SyntaxNode, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|e| ParseError::Grammar(e.to_string()))?;

    let tree = parser
        .parse(source.as_bytes(), None)
        .ok_or(ParseError::NoTree)?;

    let root = tree.root_node();
    if root.has_error() {
        let bad = first_error(root).unwrap_or(root);
        let message = if bad.is_missing() {
            format!("missing `{}`", bad.kind())
        } else {
            "unexpected token".to_string()
        };
        return Err(ParseError::Syntax {
            location: source.location(bad.start_byte()),
            message,
        });
    }

    Ok(lower(root, source.as_bytes()))
}

fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn span_of(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

/// Named children, minus comments.
fn operands<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn lower_all(nodes: Vec<Node<'_>>, src: &[u8]) -> Vec<SyntaxNode> {
    nodes.into_iter().map(|n| lower(n, src)).collect()
}

fn lower(node: Node<'_>, src: &[u8]) -> SyntaxNode {
    let span = span_of(node);
    let kind = match node.kind() {
        "call_expression" => lower_call(node, src),
        "member_expression" => lower_member(node, src),
        "regex" => node
            .child_by_field_name("pattern")
            .map(|pattern| NodeKind::Regex {
                pattern: span_of(pattern),
            }),
        "function_expression" | "function" | "arrow_function" | "generator_function" => {
            Some(NodeKind::Block(Block {
                style: BlockStyle::Brace,
                body: node.child_by_field_name("body").map(span_of),
                children: lower_all(operands(node), src),
            }))
        }
        "string" | "template_string" | "number" | "true" | "false" | "null" => {
            Some(NodeKind::Literal)
        }
        _ => None,
    };
    let kind = kind.unwrap_or_else(|| NodeKind::Other(lower_all(operands(node), src)));
    SyntaxNode::new(kind, span)
}

fn lower_call(node: Node<'_>, src: &[u8]) -> Option<NodeKind> {
    let function = node.child_by_field_name("function")?;
    let arguments = node.child_by_field_name("arguments")?;
    // tagged templates (foo`...`) put a template_string in the arguments slot
    if arguments.kind() != "arguments" {
        return None;
    }
    Some(NodeKind::Call(Call {
        callee: Box::new(lower(function, src)),
        arguments: lower_all(operands(arguments), src),
        block: None,
    }))
}

fn lower_member(node: Node<'_>, src: &[u8]) -> Option<NodeKind> {
    let object = node.child_by_field_name("object")?;
    let property = node.child_by_field_name("property")?;
    let name = property.utf8_text(src).ok()?.to_string();
    let receiver = if object.kind() == "this" {
        Receiver::Contextual
    } else {
        Receiver::Explicit(Box::new(lower(object, src)))
    };
    Some(NodeKind::Member(Member { receiver, name }))
}
