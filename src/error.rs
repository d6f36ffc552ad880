//! Error types for saxtree

use std::fmt;
use thiserror::Error;

/// Position in the source document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in the source document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Syntactically invalid markup that the engine cannot recover from
    InvalidToken,
    /// Input ended inside an open construct
    UnexpectedEof,
    /// End tag does not close the innermost open element
    MismatchedTag { expected: String, found: String },
    /// Attribute repeated on the same start tag
    DuplicateAttribute { name: String },
    /// A DOCTYPE declaration was found while XXE protection is active
    DoctypeDisallowed,
    /// Element or attribute prefix has no in-scope namespace binding
    UndeclaredPrefix { prefix: String },
    /// Entity reference to a name with no declaration
    UnknownEntity { name: String },
    /// Entity reference that would require fetching an external resource
    ExternalEntity { name: String },
    /// Entity whose expansion references itself, directly or through
    /// other entities
    RecursiveEntity { name: String },
    /// Entity expansions nested deeper than the hard limit
    EntityNestingExceeded { max: usize },
    /// Element not declared by the schema vocabulary in force
    UnknownElement { name: String },
    /// Schema resource could not be understood
    InvalidSchema,
    /// Nesting deeper than the secure-processing limit
    MaxDepthExceeded { max: usize },
    /// Cumulative entity expansions beyond the secure-processing budget
    EntityExpansionOverflow { max: usize },
    /// Engine factory was asked for a feature it does not implement
    UnsupportedFeature { name: String },
    /// A second input source was configured on the same parse
    SourceAlreadySet {
        existing: &'static str,
        requested: &'static str,
    },
    /// Execute was called with no input source configured
    NoSourceConfigured,
    /// Singular child lookup matched more than one direct child
    AmbiguousChild { tag: String, count: usize },
    /// Input source could not be opened or read
    Io { message: String },
    /// The engine failed while parsing the named document
    ParseFailure { name: String },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::MismatchedTag { expected, found } => {
                write!(
                    f,
                    "mismatched end tag: expected </{expected}>, found </{found}>"
                )
            }
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::DoctypeDisallowed => write!(f, "DOCTYPE is disallowed"),
            Self::UndeclaredPrefix { prefix } => {
                write!(f, "undeclared namespace prefix: {prefix}")
            }
            Self::UnknownEntity { name } => write!(f, "unknown entity: &{name};"),
            Self::ExternalEntity { name } => {
                write!(f, "external entity not resolved: &{name};")
            }
            Self::RecursiveEntity { name } => {
                write!(f, "recursive entity reference: &{name};")
            }
            Self::EntityNestingExceeded { max } => {
                write!(f, "entity nesting too deep: {max}")
            }
            Self::UnknownElement { name } => write!(f, "unknown element: {name}"),
            Self::InvalidSchema => write!(f, "invalid schema"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::EntityExpansionOverflow { max } => {
                write!(f, "entity expansion limit exceeded: {max}")
            }
            Self::UnsupportedFeature { name } => write!(f, "unsupported feature: {name}"),
            Self::SourceAlreadySet {
                existing,
                requested,
            } => {
                write!(f, "source already set to {existing}, cannot set {requested}")
            }
            Self::NoSourceConfigured => write!(f, "no input source configured"),
            Self::AmbiguousChild { tag, count } => {
                write!(f, "ambiguous child: {count} elements named {tag}")
            }
            Self::Io { message } => write!(f, "io error: {message}"),
            Self::ParseFailure { name } => write!(f, "couldn't parse '{name}'"),
        }
    }
}

/// Main error type for saxtree
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create error at a specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::at(pos))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// All messages carried by this error, outermost first, joined by `": "`.
    ///
    /// The kind's own rendering comes first; a custom message that differs
    /// from it is treated as the underlying cause and appended.
    pub fn message_chain(&self) -> String {
        let kind_message = self.kind.to_string();
        if self.message == kind_message {
            kind_message
        } else {
            format!("{}: {}", kind_message, self.message)
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at {}: {}", self.span.start, self.message)
    }
}

/// Result type alias for saxtree
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "10:5");
    }

    #[test]
    fn test_error_creation() {
        let err = Error::at(ErrorKind::InvalidToken, Pos::new(0, 1, 1));
        assert_eq!(err.kind(), &ErrorKind::InvalidToken);
        assert_eq!(err.span().start.line, 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::at(ErrorKind::DoctypeDisallowed, Pos::new(10, 2, 5));
        let display = err.to_string();
        assert!(display.contains("error at 2:5"));
        assert!(display.contains("DOCTYPE is disallowed"));
    }

    #[test]
    fn test_message_chain_plain() {
        let err = Error::new(ErrorKind::UnexpectedEof, Span::empty());
        assert_eq!(err.message_chain(), "unexpected end of input");
    }

    #[test]
    fn test_message_chain_with_cause() {
        let err = Error::with_message(
            ErrorKind::ParseFailure {
                name: "invoice.bpmn".to_string(),
            },
            Span::empty(),
            "unexpected end of input",
        );
        assert_eq!(
            err.message_chain(),
            "couldn't parse 'invoice.bpmn': unexpected end of input"
        );
    }
}
