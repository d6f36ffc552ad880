//! Namespace-aware element tree built during a parse
//!
//! Elements own their children outright; there are no parent back
//! references, so a finished tree is freely shareable between readers.

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Pos, Result};
use crate::namespace::Namespace;
use crate::sax::handler::Attribute;

/// One node of the parsed document tree.
///
/// Created when the engine reports the element's start tag, mutated while
/// the element is open (text accumulation, child additions), and immutable
/// once its end tag has been seen.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    namespace_uri: Option<String>,
    tag_name: String,
    /// Keyed by `"{uri}:{name}"` for namespaced attributes, by the literal
    /// qualified name otherwise; document order is preserved.
    attributes: IndexMap<String, String>,
    text: String,
    children: Vec<Element>,
    line: u32,
    column: u32,
}

fn attribute_key(namespace_uri: Option<&str>, name: &str) -> String {
    match namespace_uri {
        Some(uri) => format!("{uri}:{name}"),
        None => name.to_string(),
    }
}

impl Element {
    /// Create an element programmatically, without source coordinates
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            namespace_uri: None,
            tag_name: tag_name.into(),
            attributes: IndexMap::new(),
            text: String::new(),
            children: Vec::new(),
            line: 0,
            column: 0,
        }
    }

    /// Build an element from an engine start-tag event.
    ///
    /// When the element carries no namespace URI the qualified name (prefix
    /// included) becomes the tag name; otherwise the local name does.
    pub(crate) fn from_event(
        namespace_uri: Option<&str>,
        local_name: &str,
        qualified_name: &str,
        attributes: &[Attribute],
        pos: Pos,
    ) -> Self {
        let (namespace_uri, tag_name) = match namespace_uri {
            Some(uri) if !uri.is_empty() => (Some(uri.to_string()), local_name.to_string()),
            _ => (None, qualified_name.to_string()),
        };

        let mut map = IndexMap::with_capacity(attributes.len());
        for attr in attributes {
            let key = match attr.namespace_uri.as_deref() {
                Some(uri) => attribute_key(Some(uri), &attr.local_name),
                None => attr.qualified_name.clone(),
            };
            map.insert(key, attr.value.clone());
        }

        Self {
            namespace_uri,
            tag_name,
            attributes: map,
            text: String::new(),
            children: Vec::new(),
            line: pos.line,
            column: pos.col,
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// Accumulated character data, exactly as delivered.
    ///
    /// Fragmented callbacks concatenate; nothing is trimmed or collapsed,
    /// so CDATA and significant whitespace survive. Callers wanting a
    /// cleaned-up form trim on their side.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Unqualified attribute lookup.
    ///
    /// Falls back to the literal qualified name as delivered by the engine
    /// when the document was parsed without namespace awareness.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Unqualified attribute lookup with a default
    pub fn attribute_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attribute(name).unwrap_or(default)
    }

    /// Namespace-qualified attribute lookup.
    ///
    /// Tries the namespace's primary URI first; when that misses and an
    /// alternative URI is declared, retries with the alternative.
    pub fn attribute_ns(&self, namespace: &Namespace, name: &str) -> Option<&str> {
        self.attributes
            .get(&attribute_key(Some(namespace.uri()), name))
            .or_else(|| {
                namespace
                    .alternative_uri()
                    .and_then(|alt| self.attributes.get(&attribute_key(Some(alt), name)))
            })
            .map(String::as_str)
    }

    /// Namespace-qualified attribute lookup with a default
    pub fn attribute_ns_or<'a>(
        &'a self,
        namespace: &Namespace,
        name: &str,
        default: &'a str,
    ) -> &'a str {
        self.attribute_ns(namespace, name).unwrap_or(default)
    }

    /// All direct children in document order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Direct children with the given tag name, in document order
    pub fn children_named(&self, tag_name: &str) -> Vec<&Element> {
        self.children
            .iter()
            .filter(|c| c.tag_name == tag_name)
            .collect()
    }

    /// Direct children with the given tag name inside the namespace.
    ///
    /// When the primary URI yields no matches and the namespace declares an
    /// alternative URI, the filter is retried with the alternative.
    pub fn children_ns(&self, namespace: &Namespace, tag_name: &str) -> Vec<&Element> {
        let matches = self.children_in_uri(namespace.uri(), tag_name);
        if matches.is_empty() {
            if let Some(alt) = namespace.alternative_uri() {
                return self.children_in_uri(alt, tag_name);
            }
        }
        matches
    }

    fn children_in_uri(&self, uri: &str, tag_name: &str) -> Vec<&Element> {
        self.children
            .iter()
            .filter(|c| c.tag_name == tag_name && c.namespace_uri.as_deref() == Some(uri))
            .collect()
    }

    /// The single direct child with the given tag name.
    ///
    /// Returns `Ok(None)` when nothing matches and fails when more than one
    /// direct child matches; callers that expect a unique child must not
    /// silently receive the first of several.
    pub fn child(&self, tag_name: &str) -> Result<Option<&Element>> {
        Self::single(self.children_named(tag_name), tag_name)
    }

    /// The single direct child with the given tag name inside the namespace
    pub fn child_ns(&self, namespace: &Namespace, tag_name: &str) -> Result<Option<&Element>> {
        Self::single(self.children_ns(namespace, tag_name), tag_name)
    }

    fn single<'a>(matches: Vec<&'a Element>, tag_name: &str) -> Result<Option<&'a Element>> {
        if matches.len() > 1 {
            return Err(Error::new(
                ErrorKind::AmbiguousChild {
                    tag: tag_name.to_string(),
                    count: matches.len(),
                },
                crate::error::Span::empty(),
            ));
        }
        Ok(matches.into_iter().next())
    }

    /// Append this element's `id` attribute and every descendant's,
    /// pre-order, depth-first.
    ///
    /// An element without an `id` attribute still contributes a `None`
    /// entry. Historical consumers rely on the collect-regardless behavior,
    /// so it is preserved as is.
    pub fn collect_ids(&self, out: &mut Vec<Option<String>>) {
        out.push(self.attribute("id").map(str::to_string));
        for child in &self.children {
            child.collect_ids(out);
        }
    }

    pub(crate) fn append_text(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    pub(crate) fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    #[cfg(test)]
    pub(crate) fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }
}
