use std::borrow::Cow;

use crate::parse::Dialect;
use crate::syntax::{NodeKind, SyntaxNode};

/// Separator between the texts of multiple pattern arguments.
pub const SEPARATOR: &str = ", ";

/// Canonical catalog key for a step's pattern arguments. No arguments gives
/// the empty key.
pub fn pattern_key(args: &[SyntaxNode], source: &[u8], dialect: Dialect) -> String {
    args.iter()
        .map(|arg| pattern_text(arg, source, dialect))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

fn pattern_text<'a>(arg: &SyntaxNode, source: &'a [u8], dialect: Dialect) -> Cow<'a, str> {
    match (dialect.regex_delimiter(), &arg.kind) {
        (Some(delimiter), _) => {
            let raw = arg.text(source);
            if let Some(inner) = strip_delimiters(&raw, delimiter) {
                return Cow::Owned(strip_anchors(inner).to_string());
            }
            raw
        }
        (None, NodeKind::Regex { pattern }) => {
            let raw = pattern.text(source);
            Cow::Owned(strip_anchors(&raw).to_string())
        }
        (None, _) => arg.text(source),
    }
}

/// `/foo/` -> `foo`. `None` when the text isn't wrapped in the delimiter.
pub fn strip_delimiters(text: &str, delimiter: char) -> Option<&str> {
    text.strip_prefix(delimiter)?.strip_suffix(delimiter)
}

/// Drop one leading `^` and one unescaped trailing `$`.
pub fn strip_anchors(pattern: &str) -> &str {
    let pattern = pattern.strip_prefix('^').unwrap_or(pattern);
    match pattern.strip_suffix('$') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => pattern,
    }
}
