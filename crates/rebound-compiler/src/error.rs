//! Compile errors and their rendering.

use std::fmt;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use serde::Serialize;

/// Every error code a pattern can fail with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadPattern,
    Collate,
    Ctype,
    Escape,
    Backref,
    Brack,
    Paren,
    Brace,
    BadBrace,
    Range,
    Space,
    BadRepeat,
    Size,
    Empty,
    Complexity,
    Stack,
    PerlExtension,
    Unknown,
}

impl ErrorKind {
    /// Canonical human-readable message.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::BadPattern => "Invalid regular expression.",
            Self::Collate => "Invalid collation character.",
            Self::Ctype => "Invalid character class name.",
            Self::Escape => "Invalid or trailing backslash.",
            Self::Backref => "Invalid back reference.",
            Self::Brack => "Unmatched [ or [^.",
            Self::Paren => "Unmatched ( or \\(.",
            Self::Brace => "Unmatched { or \\{.",
            Self::BadBrace => "Invalid content of \\{\\}.",
            Self::Range => "Invalid range end.",
            Self::Space => "Memory exhausted.",
            Self::BadRepeat => "Invalid preceding regular expression.",
            Self::Size => "Regular expression too big.",
            Self::Empty => "Empty expression.",
            Self::Complexity => "Complexity requirements exceeded.",
            Self::Stack => "Out of stack space.",
            Self::PerlExtension => "Invalid or unterminated Perl (?...) sequence.",
            Self::Unknown => "Unknown error.",
        }
    }

    /// Stable snake_case code, as used in JSON output.
    pub fn code(self) -> &'static str {
        match self {
            Self::BadPattern => "bad_pattern",
            Self::Collate => "collate",
            Self::Ctype => "ctype",
            Self::Escape => "escape",
            Self::Backref => "backref",
            Self::Brack => "brack",
            Self::Paren => "paren",
            Self::Brace => "brace",
            Self::BadBrace => "bad_brace",
            Self::Range => "range",
            Self::Space => "space",
            Self::BadRepeat => "bad_repeat",
            Self::Size => "size",
            Self::Empty => "empty",
            Self::Complexity => "complexity",
            Self::Stack => "stack",
            Self::PerlExtension => "perl_extension",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A failed compilation: what went wrong and where.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message} (at offset {offset})")]
pub struct CompileError {
    pub kind: ErrorKind,
    /// Byte offset into the pattern.
    pub offset: usize,
    pub message: String,
}

impl CompileError {
    pub fn new(kind: ErrorKind, offset: usize) -> Self {
        Self {
            kind,
            offset,
            message: kind.default_message().to_owned(),
        }
    }

    pub fn with_message(kind: ErrorKind, offset: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            offset,
            message: message.into(),
        }
    }

    /// Renders the error as an annotated snippet of `pattern`.
    pub fn render(&self, pattern: &str, colored: bool) -> String {
        let renderer = if colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };
        let range = adjust_range(pattern, self.offset);
        let snippet = Snippet::source(pattern)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(range).label(self.kind.code()));
        let report: Vec<Group> = vec![Level::ERROR.primary_title(&self.message).element(snippet)];
        renderer.render(&report).to_string()
    }
}

/// Points at the offending character; past-the-end offsets point at the
/// last character.
fn adjust_range(pattern: &str, offset: usize) -> std::ops::Range<usize> {
    if pattern.is_empty() {
        return 0..0;
    }
    let mut start = offset.min(pattern.len() - 1);
    while !pattern.is_char_boundary(start) {
        start -= 1;
    }
    let width = pattern[start..].chars().next().map_or(1, char::len_utf8);
    start..start + width
}
