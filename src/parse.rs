//! Parse orchestration
//!
//! A [`Parse`] configures exactly one input source, drives the engine to
//! completion, and exposes the resulting root element plus the two ordered
//! diagnostic lists. Fatal failures (misconfiguration, I/O, markup the
//! engine cannot recover from) raise immediately; recoverable diagnostics
//! accumulate, and escalating them into a failure is the caller's explicit
//! decision.

use std::path::PathBuf;

use tracing::warn;

use crate::builder::TreeBuilder;
use crate::element::Element;
use crate::error::{Error, ErrorKind, Result, Span};
use crate::input::Source;
use crate::parser::Parser;
use crate::problem::{Problem, ProblemSource};
use crate::sax::Engine;
use crate::schema::{ValidatingHandler, Vocabulary};

/// One parse against a per-worker [`Parser`]
#[derive(Debug)]
pub struct Parse<'p> {
    parser: &'p mut Parser,
    name: Option<String>,
    source: Option<Source>,
    schema_resource: Option<PathBuf>,
    root_element: Option<Element>,
    errors: Vec<Problem>,
    warnings: Vec<Problem>,
}

impl<'p> Parse<'p> {
    pub(crate) fn new(parser: &'p mut Parser) -> Self {
        Self {
            parser,
            name: None,
            source: None,
            schema_resource: None,
            root_element: None,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Name the parse for diagnostics; overrides any source-derived default
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Read from an in-memory byte buffer
    pub fn bytes_source(self, bytes: Vec<u8>) -> Result<Self> {
        self.set_source(Source::Bytes(bytes))
    }

    /// Read from an in-memory string
    pub fn string_source(self, text: impl Into<String>) -> Result<Self> {
        self.set_source(Source::Text(text.into()))
    }

    /// Read from a resource path
    pub fn resource_source(self, path: impl Into<PathBuf>) -> Result<Self> {
        self.set_source(Source::File(path.into()))
    }

    /// Read from a URL (`file://` only)
    pub fn url_source(self, url: impl Into<String>) -> Result<Self> {
        self.set_source(Source::Url(url.into()))
    }

    /// Configuring a second source is a caller bug; fail fast naming both
    /// kinds rather than silently preferring one.
    fn set_source(mut self, source: Source) -> Result<Self> {
        if let Some(existing) = &self.source {
            return Err(Error::new(
                ErrorKind::SourceAlreadySet {
                    existing: existing.kind(),
                    requested: source.kind(),
                },
                Span::empty(),
            ));
        }
        if self.name.is_none() {
            self.name = Some(source.default_name());
        }
        self.source = Some(source);
        Ok(self)
    }

    /// Engage schema validation against the given resource
    pub fn schema_resource(mut self, resource: impl Into<PathBuf>) -> Self {
        self.schema_resource = Some(resource.into());
        self
    }

    /// Open the source, configure an engine under the parser's current
    /// policy, and build the tree.
    ///
    /// Recoverable diagnostics land on [`errors`](Self::errors) and
    /// [`warnings`](Self::warnings); a non-empty error list does not fail
    /// this call.
    pub fn execute(mut self) -> Result<Self> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| Error::new(ErrorKind::NoSourceConfigured, Span::empty()))?;
        let data = source.open()?;

        let vocabulary = match &self.schema_resource {
            Some(resource) => Some(Vocabulary::compile(&Source::File(resource.clone()).open()?)?),
            None => None,
        };

        let config = self.parser.configure(self.schema_resource.as_deref())?;

        let mut builder = TreeBuilder::new(self.name.clone());
        let outcome = match &vocabulary {
            Some(vocabulary) => {
                let mut validating = ValidatingHandler::new(vocabulary, &mut builder);
                Engine::new(&data, config, &mut validating).parse()
            }
            None => Engine::new(&data, config, &mut builder).parse(),
        };

        let (root, errors, warnings) = builder.finish();
        self.root_element = root;
        self.errors.extend(errors);
        self.warnings.extend(warnings);

        if let Err(cause) = outcome {
            let name = self.parse_name().to_string();
            return Err(Error::with_message(
                ErrorKind::ParseFailure { name },
                cause.span(),
                cause.message_chain(),
            ));
        }
        Ok(self)
    }

    fn parse_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    pub fn root_element(&self) -> Option<&Element> {
        self.root_element.as_ref()
    }

    /// Take ownership of the tree
    pub fn into_root_element(self) -> Option<Element> {
        self.root_element
    }

    /// Collected errors; the original contract exposes these as "problems"
    pub fn problems(&self) -> &[Problem] {
        &self.errors
    }

    pub fn errors(&self) -> &[Problem] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Problem] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Append an engine-reported error
    pub fn add_error(&mut self, error: &Error) {
        let resource = self.name.clone();
        self.errors.push(Problem::new(
            ProblemSource::Engine { error },
            resource.as_deref(),
        ));
    }

    /// Append an application error anchored to an element of the tree
    pub fn add_error_at(&mut self, message: impl Into<String>, element: &Element) {
        let resource = self.name.clone();
        self.errors.push(Problem::new(
            ProblemSource::Element {
                message: message.into(),
                element,
            },
            resource.as_deref(),
        ));
    }

    /// Append an engine-reported warning
    pub fn add_warning(&mut self, error: &Error) {
        let resource = self.name.clone();
        self.warnings.push(Problem::new(
            ProblemSource::Engine { error },
            resource.as_deref(),
        ));
    }

    /// Append an application warning anchored to an element of the tree
    pub fn add_warning_at(&mut self, message: impl Into<String>, element: &Element) {
        let resource = self.name.clone();
        self.warnings.push(Problem::new(
            ProblemSource::Element {
                message: message.into(),
                element,
            },
            resource.as_deref(),
        ));
    }

    /// Render all warnings as one multi-line report
    pub fn warnings_report(&self) -> String {
        let mut report = String::new();
        for warning in &self.warnings {
            report.push_str("\n* ");
            report.push_str(&warning.to_string());
        }
        report
    }

    /// Emit the warning report through the logging sink
    pub fn log_warnings(&self) {
        if self.has_warnings() {
            warn!(
                "following warnings were encountered during parsing:{}",
                self.warnings_report()
            );
        }
    }

    /// Escalate accumulated errors into a single fatal failure.
    ///
    /// `execute()` never fails merely because errors were collected; this
    /// call is how the caller decides they are fatal after all.
    pub fn throw_exception_for_errors(&self) -> Result<()> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let mut message = String::new();
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                message.push('\n');
            }
            message.push_str(&error.to_string());
        }
        Err(Error::with_message(
            ErrorKind::ParseFailure {
                name: self.parse_name().to_string(),
            },
            Span::empty(),
            message,
        ))
    }
}
