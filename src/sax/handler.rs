//! Event handler trait fired by the streaming engine

use crate::error::{Error, Pos};

/// One attribute as delivered on a start-tag event.
///
/// In namespace-aware mode prefixed attributes carry their resolved URI;
/// unprefixed attributes never inherit the default namespace. Without
/// namespace awareness the qualified name is all there is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub namespace_uri: Option<String>,
    pub local_name: String,
    pub qualified_name: String,
    pub value: String,
}

/// Callbacks fired by the engine, strictly in document order.
///
/// All methods default to no-ops. Recoverable issues arrive through
/// [`error`](SaxHandler::error) and [`warning`](SaxHandler::warning) and do
/// not stop the event stream; a fatal problem ends the parse through the
/// engine's own returned error instead.
#[allow(unused_variables)]
pub trait SaxHandler {
    /// A start tag was read. `pos` is the engine's current document
    /// location, to be stamped onto whatever the handler builds.
    fn start_element(
        &mut self,
        namespace_uri: Option<&str>,
        local_name: &str,
        qualified_name: &str,
        attributes: &[Attribute],
        pos: Pos,
    ) {
    }

    /// Character data. May arrive in several fragments for one logically
    /// contiguous run; implementations must accumulate.
    fn characters(&mut self, fragment: &str) {}

    /// The innermost open element was closed.
    fn end_element(&mut self, qualified_name: &str) {}

    /// A recoverable error; the engine keeps going.
    fn error(&mut self, error: &Error) {}

    /// A recoverable warning; the engine keeps going.
    fn warning(&mut self, error: &Error) {}
}
