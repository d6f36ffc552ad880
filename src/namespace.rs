//! Namespace value object with a backward-compatible alternative URI

use std::hash::{Hash, Hasher};

/// An XML namespace, identified by its URI.
///
/// A namespace may carry an alternative URI: a secondary URI accepted for
/// backward compatibility when a schema's canonical namespace changed
/// between versions. Lookups try the primary URI first and fall back to
/// the alternative. Equality and hashing consider the primary URI only.
#[derive(Clone, Debug, Eq)]
pub struct Namespace {
    uri: String,
    alternative_uri: Option<String>,
}

impl Namespace {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            alternative_uri: None,
        }
    }

    pub fn with_alternative(uri: impl Into<String>, alternative_uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            alternative_uri: Some(alternative_uri.into()),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn alternative_uri(&self) -> Option<&str> {
        self.alternative_uri.as_deref()
    }

    pub fn has_alternative_uri(&self) -> bool {
        self.alternative_uri.is_some()
    }
}

impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Hash for Namespace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alternative_uri() {
        let ns = Namespace::new("urn:v1");
        assert!(!ns.has_alternative_uri());
        assert_eq!(ns.alternative_uri(), None);

        let ns = Namespace::with_alternative("urn:v1", "urn:v0");
        assert!(ns.has_alternative_uri());
        assert_eq!(ns.alternative_uri(), Some("urn:v0"));
    }

    #[test]
    fn test_identity_ignores_alternative() {
        let a = Namespace::new("urn:v1");
        let b = Namespace::with_alternative("urn:v1", "urn:v0");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_different_primary_uris_differ() {
        assert_ne!(Namespace::new("urn:v1"), Namespace::new("urn:v2"));
    }
}
