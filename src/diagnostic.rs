use std::fmt;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    PermissionDenied,
    Read,
    Parse,
}

impl FailureKind {
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FailureKind::NotFound,
            io::ErrorKind::PermissionDenied => FailureKind::PermissionDenied,
            _ => FailureKind::Read,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::NotFound => "file not found",
            FailureKind::PermissionDenied => "permission denied reading file",
            FailureKind::Read => "error reading file",
            FailureKind::Parse => "syntax error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// 1-indexed line number
    pub line: usize,
    /// 0-indexed column (character offset within the line)
    pub column: usize,
}

/// A file that contributed nothing to the catalog, and why.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub path: String,
    pub location: Option<Location>,
    pub kind: FailureKind,
    pub message: String,
}

impl Diagnostic {
    pub fn io(path: &str, err: &io::Error) -> Self {
        Self {
            path: path.to_string(),
            location: None,
            kind: FailureKind::from_io(err),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{}:{}:{}: ", self.path, loc.line, loc.column)?,
            None => write!(f, "{}: ", self.path)?,
        }
        write!(f, "{}: {}", self.kind, self.message)
    }
}
