//! saxtree - Secure streaming XML ingestion
//!
//! Turns an untrusted XML document into a namespace-aware element tree
//! while protecting against XXE and DTD-expansion attacks and collecting
//! multiple diagnostics in a single pass instead of stopping at the first.
//!
//! # Quick Start
//!
//! ```
//! use saxtree::Parser;
//! # fn main() -> saxtree::Result<()> {
//! let mut parser = Parser::new();
//! let parse = parser
//!     .create_parse()
//!     .name("greeting.xml")
//!     .string_source("<greeting lang=\"en\">hello</greeting>")?
//!     .execute()?;
//! let root = parse.root_element().unwrap();
//! assert_eq!(root.tag_name(), "greeting");
//! assert_eq!(root.attribute("lang"), Some("en"));
//! assert_eq!(root.text(), "hello");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod cursor;
pub use cursor::Cursor;

pub mod input;
pub use input::Source;

pub mod namespace;
pub use namespace::Namespace;

pub mod element;
pub use element::Element;

pub mod problem;
pub use problem::{Problem, ProblemSource};

pub mod sax;
pub use sax::{Attribute, Engine, EngineConfig, SaxHandler};

pub mod parser;
pub use parser::{EngineFactory, Parser};

pub mod schema;
pub use schema::Vocabulary;

pub mod parse;
pub use parse::Parse;

mod builder;

/// Parse XML from a string and return the root element.
///
/// Escalates any collected errors, so this is the strict one-shot entry
/// point; use [`Parser`] and [`Parse`] for diagnostic accumulation.
pub fn parse_str(xml: &str) -> Result<Element> {
    let mut parser = Parser::new();
    let parse = parser.create_parse().string_source(xml)?.execute()?;
    parse.throw_exception_for_errors()?;
    parse.into_root_element().ok_or_else(|| {
        Error::with_message(
            ErrorKind::UnexpectedEof,
            Span::empty(),
            "document has no root element",
        )
    })
}

/// Parse XML from bytes and return the root element
pub fn parse_bytes(bytes: &[u8]) -> Result<Element> {
    let mut parser = Parser::new();
    let parse = parser
        .create_parse()
        .bytes_source(bytes.to_vec())?
        .execute()?;
    parse.throw_exception_for_errors()?;
    parse.into_root_element().ok_or_else(|| {
        Error::with_message(
            ErrorKind::UnexpectedEof,
            Span::empty(),
            "document has no root element",
        )
    })
}
