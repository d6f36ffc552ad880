//! Event-to-tree translation
//!
//! The tree builder keeps an explicit stack of open elements. Engine
//! callbacks grow the tree; error callbacks become problems on the two
//! diagnostic lists, and never stop construction.

use crate::element::Element;
use crate::error::{Error, Pos};
use crate::problem::{Problem, ProblemSource};
use crate::sax::handler::{Attribute, SaxHandler};

/// Builds the element tree for one parse
pub(crate) struct TreeBuilder {
    stack: Vec<Element>,
    root: Option<Element>,
    errors: Vec<Problem>,
    warnings: Vec<Problem>,
    /// Parse name stamped onto problems as the resource
    resource: Option<String>,
}

impl TreeBuilder {
    pub(crate) fn new(resource: Option<String>) -> Self {
        Self {
            stack: Vec::new(),
            root: None,
            errors: Vec::new(),
            warnings: Vec::new(),
            resource,
        }
    }

    /// Tear down into (root, errors, warnings)
    pub(crate) fn finish(self) -> (Option<Element>, Vec<Problem>, Vec<Problem>) {
        (self.root, self.errors, self.warnings)
    }
}

impl SaxHandler for TreeBuilder {
    fn start_element(
        &mut self,
        namespace_uri: Option<&str>,
        local_name: &str,
        qualified_name: &str,
        attributes: &[Attribute],
        pos: Pos,
    ) {
        let element = Element::from_event(namespace_uri, local_name, qualified_name, attributes, pos);
        self.stack.push(element);
    }

    fn characters(&mut self, fragment: &str) {
        if let Some(open) = self.stack.last_mut() {
            open.append_text(fragment);
        }
    }

    fn end_element(&mut self, _qualified_name: &str) {
        // The engine guarantees well-formed nesting; a mismatch surfaces as
        // the engine's own fatal error before this callback fires.
        if let Some(closed) = self.stack.pop() {
            match self.stack.last_mut() {
                Some(parent) => parent.push_child(closed),
                None => self.root = Some(closed),
            }
        }
    }

    fn error(&mut self, error: &Error) {
        self.errors.push(Problem::new(
            ProblemSource::Engine { error },
            self.resource.as_deref(),
        ));
    }

    fn warning(&mut self, error: &Error) {
        self.warnings.push(Problem::new(
            ProblemSource::Engine { error },
            self.resource.as_deref(),
        ));
    }
}
