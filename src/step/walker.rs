use tracing::debug;

use super::{StepCall, classify};
use crate::parse::Dialect;
use crate::parse::source::SourceFile;
use crate::syntax::SyntaxNode;

/// Pre-order walk that collects step call sites. A recognized call site is
/// not descended into, so steps registered inside a handler body are not
/// collected.
pub struct StepWalker<'a, 't> {
    pub source: &'a SourceFile,
    pub dialect: Dialect,
    pub calls: Vec<StepCall<'t>>,
}

impl<'a, 't> StepWalker<'a, 't> {
    pub fn new(source: &'a SourceFile, dialect: Dialect) -> Self {
        Self {
            source,
            dialect,
            calls: Vec::new(),
        }
    }

    pub fn walk(&mut self, root: &'t SyntaxNode) {
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            match classify(node) {
                Ok(call) => {
                    let loc = self.source.location(call.span.start);
                    debug!(
                        "{}:{}:{}: {} step",
                        self.source.path_str(),
                        loc.line,
                        loc.column,
                        call.keyword,
                    );
                    self.calls.push(call);
                }
                Err(mismatch) => {
                    if mismatch.is_near_miss() {
                        let loc = self.source.location(node.span.start);
                        debug!(
                            "{}:{}:{}: skipped ({:?}): {mismatch}",
                            self.source.path_str(),
                            loc.line,
                            loc.column,
                            self.dialect,
                        );
                    }
                    pending.extend(node.children().rev());
                }
            }
        }
    }
}
