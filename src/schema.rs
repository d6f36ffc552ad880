//! Schema vocabulary validation
//!
//! A compiled schema is the set of element names the schema declares for
//! its target namespace. During a validating parse every element inside
//! that namespace must be declared; violations are recoverable diagnostics
//! so a single pass can surface all of them.
//!
//! This is deliberately a vocabulary check, not a full XSD validator:
//! content models and type facets are out of scope for tree ingestion.

use std::collections::HashSet;

use crate::builder::TreeBuilder;
use crate::element::Element;
use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::sax::handler::{Attribute, SaxHandler};
use crate::sax::{Engine, EngineConfig};

/// The W3C XML Schema namespace, doubling as the schema-language identifier
pub const XML_SCHEMA_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// Element vocabulary compiled from an XSD resource
#[derive(Clone, Debug)]
pub struct Vocabulary {
    target_namespace: Option<String>,
    elements: HashSet<String>,
}

impl Vocabulary {
    /// Compile the vocabulary from XSD bytes.
    ///
    /// The schema document is parsed with this crate's own engine,
    /// namespace-aware and under the default security policy.
    pub fn compile(xsd: &[u8]) -> Result<Self> {
        let config = EngineConfig {
            namespace_aware: true,
            ..EngineConfig::default()
        };
        let mut builder = TreeBuilder::new(None);
        Engine::new(xsd, config, &mut builder).parse().map_err(|e| {
            Error::with_message(ErrorKind::InvalidSchema, e.span(), e.message_chain())
        })?;
        let (root, errors, _) = builder.finish();

        let Some(root) = root else {
            return Err(Error::new(ErrorKind::InvalidSchema, Span::empty()));
        };
        if !errors.is_empty()
            || root.namespace_uri() != Some(XML_SCHEMA_NS)
            || root.tag_name() != "schema"
        {
            return Err(Error::with_message(
                ErrorKind::InvalidSchema,
                Span::empty(),
                "schema resource is not an XML Schema document",
            ));
        }

        let target_namespace = root.attribute("targetNamespace").map(str::to_string);
        let mut elements = HashSet::new();
        collect_declarations(&root, &mut elements);
        Ok(Self {
            target_namespace,
            elements,
        })
    }

    pub fn target_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }

    pub fn declares(&self, local_name: &str) -> bool {
        self.elements.contains(local_name)
    }
}

/// Collect `xs:element name="..."` declarations, global and nested
fn collect_declarations(element: &Element, out: &mut HashSet<String>) {
    if element.namespace_uri() == Some(XML_SCHEMA_NS) && element.tag_name() == "element" {
        if let Some(name) = element.attribute("name") {
            out.insert(name.to_string());
        }
    }
    for child in element.children() {
        collect_declarations(child, out);
    }
}

/// Handler layer that checks the vocabulary before delegating.
///
/// Violations are routed through the inner handler's own error callback so
/// they land on the same diagnostic list as engine-reported issues.
pub(crate) struct ValidatingHandler<'a, H: SaxHandler> {
    vocabulary: &'a Vocabulary,
    inner: &'a mut H,
}

impl<'a, H: SaxHandler> ValidatingHandler<'a, H> {
    pub(crate) fn new(vocabulary: &'a Vocabulary, inner: &'a mut H) -> Self {
        Self { vocabulary, inner }
    }
}

impl<H: SaxHandler> SaxHandler for ValidatingHandler<'_, H> {
    fn start_element(
        &mut self,
        namespace_uri: Option<&str>,
        local_name: &str,
        qualified_name: &str,
        attributes: &[Attribute],
        pos: Pos,
    ) {
        if namespace_uri == self.vocabulary.target_namespace()
            && !self.vocabulary.declares(local_name)
        {
            self.inner.error(&Error::at(
                ErrorKind::UnknownElement {
                    name: qualified_name.to_string(),
                },
                pos,
            ));
        }
        self.inner
            .start_element(namespace_uri, local_name, qualified_name, attributes, pos);
    }

    fn characters(&mut self, fragment: &str) {
        self.inner.characters(fragment);
    }

    fn end_element(&mut self, qualified_name: &str) {
        self.inner.end_element(qualified_name);
    }

    fn error(&mut self, error: &Error) {
        self.inner.error(error);
    }

    fn warning(&mut self, error: &Error) {
        self.inner.warning(error);
    }
}
