//! Normalized parse diagnostics
//!
//! A problem is one recoverable issue observed during a parse: either
//! reported by the engine through its error callbacks, or raised by an
//! application layer against a specific element of the tree. Problems are
//! collected, never thrown.

use std::fmt;

use crate::element::Element;
use crate::error::Error;

/// Where a diagnostic came from, with the data needed to normalize it
#[derive(Debug)]
pub enum ProblemSource<'a> {
    /// Reported by the engine; position is taken from the error's span
    Engine { error: &'a Error },
    /// Raised by application code against a parsed element
    Element {
        message: String,
        element: &'a Element,
    },
    /// Raised by application code with explicit coordinates
    Location {
        message: String,
        line: u32,
        column: u32,
    },
}

/// A single normalized diagnostic
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    message: String,
    resource: Option<String>,
    line: u32,
    column: u32,
}

impl Problem {
    pub fn new(source: ProblemSource<'_>, resource: Option<&str>) -> Self {
        let (message, line, column) = match source {
            ProblemSource::Engine { error } => {
                let pos = error.span().start;
                (error.message_chain(), pos.line, pos.col)
            }
            ProblemSource::Element { message, element } => {
                (message, element.line(), element.column())
            }
            ProblemSource::Location {
                message,
                line,
                column,
            } => (message, line, column),
        };
        Self {
            message,
            resource: resource.map(str::to_string),
            line,
            column,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(resource) = &self.resource {
            write!(f, " | {resource}")?;
        }
        write!(f, " | line {} | column {}", self.line, self.column)
    }
}
