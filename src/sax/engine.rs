//! Streaming XML engine
//!
//! A single forward pass over the input bytes, firing [`SaxHandler`]
//! callbacks. The engine is deliberately dumb about trees and schemas; it
//! knows security policy (DOCTYPE, entity budgets, nesting depth) and
//! namespace resolution, nothing else.

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::cursor::Cursor;
use crate::error::{Error, ErrorKind, Result};
use crate::sax::handler::{Attribute, SaxHandler};

/// Default nesting limit under secure processing
pub const DEFAULT_MAX_DEPTH: usize = 256;
/// Default cumulative entity expansion budget under secure processing
pub const DEFAULT_MAX_ENTITY_EXPANSIONS: usize = 10_000;
/// Hard cap on how deeply entity expansions may nest. Unlike the budget
/// above this is not policy and never relaxes: a cycle or a long chain
/// must fail with an error, not exhaust the call stack.
pub const MAX_ENTITY_NESTING: usize = 64;

/// Engine policy, produced by the factory for one parse
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Resolve namespace prefixes to URIs on elements and attributes
    pub namespace_aware: bool,
    /// Report `xmlns` attributes to the handler alongside ordinary ones
    pub namespace_prefixes: bool,
    /// Schema validation engaged
    pub validating: bool,
    /// Permit a DOCTYPE declaration (off while XXE protection is active)
    pub allow_doctype: bool,
    /// SAX feature: external general entities
    pub external_general_entities: bool,
    /// SAX feature: external parameter entities
    pub external_parameter_entities: bool,
    /// SAX feature: load the external DTD subset
    pub load_external_dtd: bool,
    /// Generic secure-processing switch; gates the limits below
    pub secure_processing: bool,
    pub max_depth: usize,
    pub max_entity_expansions: usize,
    /// Schema language identifier, set when validating
    pub schema_language: Option<String>,
    /// Caller-supplied schema resource, set when validating
    pub schema_source: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            namespace_aware: false,
            namespace_prefixes: false,
            validating: false,
            allow_doctype: false,
            external_general_entities: false,
            external_parameter_entities: false,
            load_external_dtd: false,
            secure_processing: true,
            max_depth: DEFAULT_MAX_DEPTH,
            max_entity_expansions: DEFAULT_MAX_ENTITY_EXPANSIONS,
            schema_language: None,
            schema_source: None,
        }
    }
}

/// Outcome of reading one entity reference
enum Expansion {
    /// Replacement text to deliver
    Text(String),
    /// Reference left unexpanded; carries the literal form and the
    /// recoverable error to report
    Unresolved(String, Error),
}

/// The streaming engine for one parse
pub struct Engine<'a, H: SaxHandler> {
    cursor: Cursor<'a>,
    config: EngineConfig,
    handler: &'a mut H,
    /// Open elements: qualified name plus the namespace-binding mark to
    /// truncate to when the element closes
    open: Vec<(String, usize)>,
    /// In-scope prefix bindings, innermost last; empty prefix is the
    /// default namespace
    bindings: Vec<(String, Option<String>)>,
    /// Internal entity declarations from the DTD internal subset
    entities: IndexMap<String, String>,
    /// Declared external entities; recorded, never fetched
    external_entities: Vec<String>,
    /// Entities currently being expanded, outermost first; a name
    /// reappearing here is a reference cycle
    active: Vec<String>,
    expansions: usize,
}

impl<'a, H: SaxHandler> Engine<'a, H> {
    pub fn new(input: &'a [u8], config: EngineConfig, handler: &'a mut H) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            handler,
            open: Vec::new(),
            bindings: Vec::new(),
            entities: IndexMap::new(),
            external_entities: Vec::new(),
            active: Vec::new(),
            expansions: 0,
        }
    }

    /// Drive the whole document through the handler
    pub fn parse(&mut self) -> Result<()> {
        self.cursor.consume_seq(b"\xEF\xBB\xBF");
        self.parse_prolog()?;
        self.parse_content()?;
        self.parse_epilog()
    }

    fn parse_prolog(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.is_eof() {
                return Err(Error::with_message(
                    ErrorKind::UnexpectedEof,
                    self.here(),
                    "document has no root element",
                ));
            }
            if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else if self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
            } else if self.cursor.starts_with(b"<!DOCTYPE") {
                self.parse_doctype()?;
            } else if self.cursor.current() == Some(b'<') {
                return Ok(());
            } else {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    self.here(),
                    "text before root element",
                ));
            }
        }
    }

    fn parse_content(&mut self) -> Result<()> {
        self.parse_start_tag()?;
        while !self.open.is_empty() {
            match self.cursor.current() {
                None => {
                    return Err(Error::with_message(
                        ErrorKind::UnexpectedEof,
                        self.here(),
                        format!(
                            "unterminated element <{}>",
                            self.open.last().map(|(n, _)| n.as_str()).unwrap_or("")
                        ),
                    ));
                }
                Some(b'<') => {
                    if self.cursor.starts_with(b"</") {
                        self.parse_end_tag()?;
                    } else if self.cursor.starts_with(b"<!--") {
                        self.skip_comment()?;
                    } else if self.cursor.starts_with(b"<![CDATA[") {
                        self.parse_cdata()?;
                    } else if self.cursor.starts_with(b"<?") {
                        self.skip_processing_instruction()?;
                    } else if self.cursor.starts_with(b"<!") {
                        return Err(Error::with_message(
                            ErrorKind::InvalidToken,
                            self.here(),
                            "declaration inside element content",
                        ));
                    } else {
                        self.parse_start_tag()?;
                    }
                }
                Some(b'&') => match self.read_entity_reference()? {
                    Expansion::Text(text) => self.handler.characters(&text),
                    Expansion::Unresolved(literal, error) => {
                        self.handler.error(&error);
                        self.handler.characters(&literal);
                    }
                },
                Some(_) => {
                    let start = self.cursor.pos();
                    while let Some(b) = self.cursor.current() {
                        if b == b'<' || b == b'&' {
                            break;
                        }
                        self.cursor.advance();
                    }
                    let run = self.to_str(self.cursor.slice_from(start))?;
                    self.handler.characters(run);
                }
            }
        }
        Ok(())
    }

    fn parse_epilog(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.is_eof() {
                return Ok(());
            }
            if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else if self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
            } else {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    self.here(),
                    "content after root element",
                ));
            }
        }
    }

    fn parse_start_tag(&mut self) -> Result<()> {
        let pos = self.cursor.position();
        self.cursor.advance(); // '<'
        let qualified_name = self.parse_name()?;

        let mut raw_attrs: Vec<(String, String)> = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => {
                    return Err(Error::with_message(
                        ErrorKind::UnexpectedEof,
                        self.here(),
                        format!("unterminated start tag <{qualified_name}>"),
                    ));
                }
            }
            let attr_pos = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            if !self.cursor.consume(b'=') {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    crate::error::Span::at(self.cursor.position()),
                    format!("expected '=' after attribute {name}"),
                ));
            }
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;
            if raw_attrs.iter().any(|(n, _)| n == &name) {
                return Err(Error::at(
                    ErrorKind::DuplicateAttribute { name },
                    attr_pos,
                ));
            }
            raw_attrs.push((name, value));
        }

        if self.config.secure_processing
            && self.config.max_depth > 0
            && self.open.len() >= self.config.max_depth
        {
            return Err(Error::at(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                pos,
            ));
        }

        let mark = self.bindings.len();
        if self.config.namespace_aware {
            for (name, value) in &raw_attrs {
                let binding = if value.is_empty() {
                    None
                } else {
                    Some(value.clone())
                };
                if name == "xmlns" {
                    self.bindings.push((String::new(), binding));
                } else if let Some(prefix) = name.strip_prefix("xmlns:") {
                    self.bindings.push((prefix.to_string(), binding));
                }
            }
        }

        let (prefix, local_name) = split_qualified(&qualified_name);
        let namespace_uri = if self.config.namespace_aware {
            match self.resolve_prefix(prefix) {
                Ok(uri) => uri,
                Err(error) => {
                    self.handler.error(&error);
                    None
                }
            }
        } else {
            None
        };

        let mut attributes = Vec::with_capacity(raw_attrs.len());
        for (name, value) in &raw_attrs {
            if self.config.namespace_aware && (name == "xmlns" || name.starts_with("xmlns:")) {
                if !self.config.namespace_prefixes {
                    continue;
                }
                attributes.push(Attribute {
                    namespace_uri: None,
                    local_name: name.strip_prefix("xmlns:").unwrap_or(name).to_string(),
                    qualified_name: name.clone(),
                    value: value.clone(),
                });
                continue;
            }
            let (attr_prefix, attr_local) = split_qualified(name);
            let attr_uri = if self.config.namespace_aware && !attr_prefix.is_empty() {
                match self.resolve_prefix(attr_prefix) {
                    Ok(uri) => uri,
                    Err(error) => {
                        self.handler.error(&error);
                        None
                    }
                }
            } else {
                None
            };
            attributes.push(Attribute {
                namespace_uri: attr_uri,
                local_name: attr_local.to_string(),
                qualified_name: name.clone(),
                value: value.clone(),
            });
        }

        // Distinct prefixes bound to the same URI collapse to one expanded
        // name; namespace-aware well-formedness forbids that.
        if self.config.namespace_aware {
            for (index, attr) in attributes.iter().enumerate() {
                let Some(uri) = attr.namespace_uri.as_deref() else {
                    continue;
                };
                let collision = attributes.iter().take(index).any(|earlier| {
                    earlier.namespace_uri.as_deref() == Some(uri)
                        && earlier.local_name == attr.local_name
                });
                if collision {
                    return Err(Error::at(
                        ErrorKind::DuplicateAttribute {
                            name: format!("{uri}:{}", attr.local_name),
                        },
                        pos,
                    ));
                }
            }
        }

        self.handler.start_element(
            namespace_uri.as_deref(),
            local_name,
            &qualified_name,
            &attributes,
            pos,
        );

        if self.cursor.consume(b'/') {
            if !self.cursor.consume(b'>') {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    crate::error::Span::at(self.cursor.position()),
                    "expected '>' after '/'",
                ));
            }
            self.handler.end_element(&qualified_name);
            self.bindings.truncate(mark);
        } else {
            self.cursor.advance(); // '>'
            self.open.push((qualified_name, mark));
        }
        Ok(())
    }

    fn parse_end_tag(&mut self) -> Result<()> {
        let pos = self.cursor.position();
        self.cursor.advance_by(2); // '</'
        let name = self.parse_name()?;
        self.cursor.skip_whitespace();
        if !self.cursor.consume(b'>') {
            return Err(Error::with_message(
                ErrorKind::InvalidToken,
                crate::error::Span::at(self.cursor.position()),
                format!("expected '>' after </{name}"),
            ));
        }
        match self.open.pop() {
            None => Err(Error::with_message(
                ErrorKind::InvalidToken,
                crate::error::Span::at(pos),
                format!("end tag </{name}> with no open element"),
            )),
            Some((expected, _)) if expected != name => Err(Error::at(
                ErrorKind::MismatchedTag {
                    expected,
                    found: name,
                },
                pos,
            )),
            Some((_, mark)) => {
                self.handler.end_element(&name);
                self.bindings.truncate(mark);
                Ok(())
            }
        }
    }

    fn resolve_prefix(&self, prefix: &str) -> std::result::Result<Option<String>, Error> {
        if prefix == "xml" {
            return Ok(Some("http://www.w3.org/XML/1998/namespace".to_string()));
        }
        for (bound, uri) in self.bindings.iter().rev() {
            if bound == prefix {
                return Ok(uri.clone());
            }
        }
        if prefix.is_empty() {
            // No default namespace in scope.
            Ok(None)
        } else {
            Err(Error::at(
                ErrorKind::UndeclaredPrefix {
                    prefix: prefix.to_string(),
                },
                self.cursor.position(),
            ))
        }
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    crate::error::Span::at(self.cursor.position()),
                    "expected quoted attribute value",
                ));
            }
        };
        self.cursor.advance();

        let mut value = String::new();
        loop {
            let start = self.cursor.pos();
            while let Some(b) = self.cursor.current() {
                if b == quote || b == b'&' || b == b'<' {
                    break;
                }
                self.cursor.advance();
            }
            value.push_str(self.to_str(self.cursor.slice_from(start))?);
            match self.cursor.current() {
                Some(q) if q == quote => {
                    self.cursor.advance();
                    return Ok(value);
                }
                Some(b'&') => match self.read_entity_reference()? {
                    Expansion::Text(text) => value.push_str(&text),
                    Expansion::Unresolved(literal, error) => {
                        self.handler.error(&error);
                        value.push_str(&literal);
                    }
                },
                Some(b'<') => {
                    return Err(Error::with_message(
                        ErrorKind::InvalidToken,
                        crate::error::Span::at(self.cursor.position()),
                        "'<' in attribute value",
                    ));
                }
                _ => {
                    return Err(Error::with_message(
                        ErrorKind::UnexpectedEof,
                        self.here(),
                        "unterminated attribute value",
                    ));
                }
            }
        }
    }

    /// Read `&...;` at the cursor and resolve it.
    ///
    /// Every reference, predefined ones included, counts against the
    /// secure-processing expansion budget.
    fn read_entity_reference(&mut self) -> Result<Expansion> {
        let pos = self.cursor.position();
        self.cursor.advance(); // '&'
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b';' {
                break;
            }
            if b == b'<' || b == b'&' || self.cursor.pos() - start > 64 {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    crate::error::Span::at(pos),
                    "entity reference without ';'",
                ));
            }
            self.cursor.advance();
        }
        if self.cursor.is_eof() {
            return Err(Error::with_message(
                ErrorKind::UnexpectedEof,
                crate::error::Span::at(pos),
                "entity reference without ';'",
            ));
        }
        let name = self.to_str(self.cursor.slice_from(start))?.to_string();
        self.cursor.advance(); // ';'

        self.bump_expansions(pos)?;

        if let Some(ch) = predefined_entity(&name) {
            return Ok(Expansion::Text(ch.to_string()));
        }
        if let Some(rest) = name.strip_prefix('#') {
            return match decode_char_reference(rest) {
                Some(ch) => Ok(Expansion::Text(ch.to_string())),
                None => Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    crate::error::Span::at(pos),
                    format!("invalid character reference &#{rest};"),
                )),
            };
        }
        if let Some(value) = self.entities.get(&name).cloned() {
            let expanded = self.expand_declared_entity(&name, &value, pos)?;
            return Ok(Expansion::Text(expanded));
        }
        let literal = format!("&{name};");
        let error = if self.external_entities.contains(&name) {
            Error::at(ErrorKind::ExternalEntity { name }, pos)
        } else {
            Error::at(ErrorKind::UnknownEntity { name }, pos)
        };
        Ok(Expansion::Unresolved(literal, error))
    }

    /// Expand one declared entity, guarding against reference cycles and
    /// unbounded nesting. The well-formedness rule here is absolute and
    /// does not depend on the secure-processing policy.
    fn expand_declared_entity(
        &mut self,
        name: &str,
        value: &str,
        pos: crate::error::Pos,
    ) -> Result<String> {
        if self.active.iter().any(|active| active == name) {
            return Err(Error::at(
                ErrorKind::RecursiveEntity {
                    name: name.to_string(),
                },
                pos,
            ));
        }
        if self.active.len() >= MAX_ENTITY_NESTING {
            return Err(Error::at(
                ErrorKind::EntityNestingExceeded {
                    max: MAX_ENTITY_NESTING,
                },
                pos,
            ));
        }
        self.active.push(name.to_string());
        let expanded = self.expand_entity_value(value, pos);
        self.active.pop();
        expanded
    }

    /// Expand entity references nested inside a declared entity's value
    fn expand_entity_value(&mut self, value: &str, pos: crate::error::Pos) -> Result<String> {
        let mut out = String::with_capacity(value.len());
        let mut chars = value.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch != '&' {
                out.push(ch);
                continue;
            }
            let mut name = String::new();
            let mut closed = false;
            for next in chars.by_ref() {
                if next == ';' {
                    closed = true;
                    break;
                }
                name.push(next);
            }
            if !closed {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    crate::error::Span::at(pos),
                    "entity reference without ';'",
                ));
            }
            self.bump_expansions(pos)?;
            if let Some(c) = predefined_entity(&name) {
                out.push(c);
            } else if let Some(rest) = name.strip_prefix('#') {
                match decode_char_reference(rest) {
                    Some(c) => out.push(c),
                    None => {
                        return Err(Error::with_message(
                            ErrorKind::InvalidToken,
                            crate::error::Span::at(pos),
                            format!("invalid character reference &#{rest};"),
                        ));
                    }
                }
            } else if let Some(nested) = self.entities.get(&name).cloned() {
                out.push_str(&self.expand_declared_entity(&name, &nested, pos)?);
            } else {
                let error = if self.external_entities.contains(&name) {
                    Error::at(ErrorKind::ExternalEntity { name: name.clone() }, pos)
                } else {
                    Error::at(ErrorKind::UnknownEntity { name: name.clone() }, pos)
                };
                self.handler.error(&error);
                out.push('&');
                out.push_str(&name);
                out.push(';');
            }
        }
        Ok(out)
    }

    fn bump_expansions(&mut self, pos: crate::error::Pos) -> Result<()> {
        if !self.config.secure_processing || self.config.max_entity_expansions == 0 {
            return Ok(());
        }
        self.expansions += 1;
        if self.expansions > self.config.max_entity_expansions {
            return Err(Error::at(
                ErrorKind::EntityExpansionOverflow {
                    max: self.config.max_entity_expansions,
                },
                pos,
            ));
        }
        Ok(())
    }

    fn parse_doctype(&mut self) -> Result<()> {
        let pos = self.cursor.position();
        if !self.config.allow_doctype {
            return Err(Error::at(ErrorKind::DoctypeDisallowed, pos));
        }
        self.cursor.advance_by(b"<!DOCTYPE".len());
        self.cursor.skip_whitespace();
        self.parse_name()?;
        self.cursor.skip_whitespace();
        self.skip_external_id()?;
        self.cursor.skip_whitespace();

        if self.cursor.consume(b'[') {
            loop {
                self.cursor.skip_whitespace();
                if self.cursor.consume(b']') {
                    break;
                }
                if self.cursor.is_eof() {
                    return Err(Error::with_message(
                        ErrorKind::UnexpectedEof,
                        self.here(),
                        "unterminated DTD internal subset",
                    ));
                }
                if self.cursor.starts_with(b"<!--") {
                    self.skip_comment()?;
                } else if self.cursor.starts_with(b"<?") {
                    self.skip_processing_instruction()?;
                } else if self.cursor.starts_with(b"<!ENTITY") {
                    self.parse_entity_declaration()?;
                } else if self.cursor.starts_with(b"<!") {
                    // ELEMENT, ATTLIST, NOTATION: irrelevant to tree building
                    self.skip_until(b">")?;
                } else if self.cursor.consume(b'%') {
                    // Parameter entity reference; never expanded here.
                    self.skip_until(b";")?;
                } else {
                    return Err(Error::with_message(
                        ErrorKind::InvalidToken,
                        self.here(),
                        "unexpected content in DTD internal subset",
                    ));
                }
            }
        }
        self.cursor.skip_whitespace();
        if !self.cursor.consume(b'>') {
            return Err(Error::with_message(
                ErrorKind::InvalidToken,
                self.here(),
                "expected '>' after DOCTYPE",
            ));
        }
        Ok(())
    }

    fn parse_entity_declaration(&mut self) -> Result<()> {
        self.cursor.advance_by(b"<!ENTITY".len());
        self.cursor.skip_whitespace();
        let parameter = self.cursor.consume(b'%');
        self.cursor.skip_whitespace();
        let name = self.parse_name()?;
        self.cursor.skip_whitespace();

        match self.cursor.current() {
            Some(b'"' | b'\'') => {
                let value = self.parse_quoted()?;
                if !parameter {
                    self.entities.insert(name, value);
                }
            }
            _ => {
                // SYSTEM/PUBLIC external identifier; recorded, never fetched.
                self.skip_external_id()?;
                if !parameter {
                    self.external_entities.push(name);
                }
            }
        }
        self.cursor.skip_whitespace();
        // NDATA and similar trailers are irrelevant here.
        self.skip_until(b">")
    }

    fn skip_external_id(&mut self) -> Result<()> {
        if self.cursor.consume_seq(b"SYSTEM") {
            self.cursor.skip_whitespace();
            self.parse_quoted()?;
        } else if self.cursor.consume_seq(b"PUBLIC") {
            self.cursor.skip_whitespace();
            self.parse_quoted()?;
            self.cursor.skip_whitespace();
            if matches!(self.cursor.current(), Some(b'"' | b'\'')) {
                self.parse_quoted()?;
            }
        }
        Ok(())
    }

    fn parse_quoted(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    self.here(),
                    "expected quoted literal",
                ));
            }
        };
        self.cursor.advance();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                let text = self.to_str(raw)?.to_string();
                self.cursor.advance();
                return Ok(text);
            }
            self.cursor.advance();
        }
        Err(Error::with_message(
            ErrorKind::UnexpectedEof,
            self.here(),
            "unterminated literal",
        ))
    }

    fn parse_cdata(&mut self) -> Result<()> {
        self.cursor.advance_by(b"<![CDATA[".len());
        let start = self.cursor.pos();
        while !self.cursor.starts_with(b"]]>") {
            if self.cursor.is_eof() {
                return Err(Error::with_message(
                    ErrorKind::UnexpectedEof,
                    self.here(),
                    "unterminated CDATA section",
                ));
            }
            self.cursor.advance();
        }
        let content = self.to_str(self.cursor.slice_from(start))?;
        self.handler.characters(content);
        self.cursor.advance_by(3);
        Ok(())
    }

    fn skip_comment(&mut self) -> Result<()> {
        self.cursor.advance_by(4);
        self.skip_until(b"-->")
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        self.cursor.advance_by(2);
        self.skip_until(b"?>")
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while !self.cursor.is_eof() {
            if self.cursor.consume_seq(pattern) {
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(Error::with_message(
            ErrorKind::UnexpectedEof,
            self.here(),
            "unterminated markup",
        ))
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();
        let Some(first) = self.cursor.current() else {
            return Err(Error::with_message(
                ErrorKind::UnexpectedEof,
                self.here(),
                "expected name",
            ));
        };
        if !is_name_start(first) {
            return Err(Error::with_message(
                ErrorKind::InvalidToken,
                self.here(),
                "expected name",
            ));
        }
        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }
        Ok(self.to_str(self.cursor.slice_from(start))?.to_string())
    }

    fn to_str(&self, bytes: &'a [u8]) -> Result<&'a str> {
        std::str::from_utf8(bytes).map_err(|_| {
            Error::with_message(ErrorKind::InvalidToken, self.here(), "invalid utf-8")
        })
    }

    fn here(&self) -> crate::error::Span {
        crate::error::Span::at(self.cursor.position())
    }
}

fn split_qualified(name: &str) -> (&str, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (prefix, local),
        None => ("", name),
    }
}

fn predefined_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

fn decode_char_reference(reference: &str) -> Option<char> {
    if let Some(hex) = reference.strip_prefix('x') {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else {
        reference.parse::<u32>().ok().and_then(char::from_u32)
    }
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}
