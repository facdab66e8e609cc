pub mod javascript;
pub mod ruby;
pub mod source;

use clap::ValueEnum;

use crate::diagnostic::Location;
use crate::syntax::SyntaxNode;
use source::SourceFile;

/// Source language of a step definition file. Chosen by run configuration,
/// never sniffed from file contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dialect {
    /// `this.Given(/pattern/, function () { ... })`
    #[value(alias = "js")]
    Javascript,
    /// `Given(/pattern/) do ... end`
    #[value(alias = "rb")]
    Ruby,
}

impl Dialect {
    pub fn extension(self) -> &'static str {
        match self {
            Dialect::Javascript => "js",
            Dialect::Ruby => "rb",
        }
    }

    /// Delimiter that marks a pattern argument's raw slice as a regex literal.
    /// Ruby regex nodes carry their bare pattern directly, so none is needed.
    pub fn regex_delimiter(self) -> Option<char> {
        match self {
            Dialect::Javascript => Some('/'),
            Dialect::Ruby => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to load grammar: {0}")]
    Grammar(String),
    #[error("parser produced no tree")]
    NoTree,
    #[error("{message}")]
    Syntax { location: Location, message: String },
}

impl ParseError {
    pub fn location(&self) -> Option<&Location> {
        match self {
            ParseError::Syntax { location, .. } => Some(location),
            _ => None,
        }
    }
}

/// Build a syntax tree for one file. Any parser error, including trees the
/// parser recovered from, fails the whole file.
pub fn build_tree(dialect: Dialect, source: &SourceFile) -> Result<SyntaxNode, ParseError> {
    match dialect {
        Dialect::Javascript => javascript::parse(source),
        Dialect::Ruby => ruby::parse(source),
    }
}
