use super::StepCall;
use crate::syntax::BlockStyle;

/// Source text for a step handler.
///
/// Bracket-style handlers come back exactly as written. A `do ... end` block
/// is rebuilt as `do\n<body>\nend` around the trimmed text between its
/// delimiters, so block parameters and the original indentation of the
/// delimiters are dropped.
pub fn handler_code(call: &StepCall<'_>, source: &[u8]) -> String {
    match call.block_style() {
        BlockStyle::Do => {
            let body = call.body().map(|span| span.text(source)).unwrap_or_default();
            format!("do\n{}\nend", body.trim())
        }
        BlockStyle::Brace => call.handler.text(source).into_owned(),
    }
}
