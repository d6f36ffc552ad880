//! Engine factory and per-worker parsing policy
//!
//! A [`Parser`] owns the security and validation policy plus a lazily
//! created, cached [`EngineFactory`]. The parser is a per-worker value:
//! create one per worker and reuse it across parses; the `&mut` receiver
//! on [`Parser::create_parse`] keeps the cached factory exclusively owned
//! for the duration of each parse.

use std::path::Path;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::parse::Parse;
use crate::sax::engine::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_ENTITY_EXPANSIONS};
use crate::sax::EngineConfig;
use crate::schema::XML_SCHEMA_NS;

/// SAX feature: resolve external general entities
pub const EXTERNAL_GENERAL_ENTITIES: &str =
    "http://xml.org/sax/features/external-general-entities";
/// SAX feature: resolve external parameter entities
pub const EXTERNAL_PARAMETER_ENTITIES: &str =
    "http://xml.org/sax/features/external-parameter-entities";
/// Xerces feature: reject any DOCTYPE declaration
pub const DISALLOW_DOCTYPE_DECL: &str = "http://apache.org/xml/features/disallow-doctype-decl";
/// Xerces feature: fetch the external DTD subset
pub const LOAD_EXTERNAL_DTD: &str =
    "http://apache.org/xml/features/nonvalidating/load-external-dtd";
/// Generic secure-processing switch
pub const SECURE_PROCESSING: &str = "http://javax.xml.XMLConstants/feature/secure-processing";
/// SAX feature: report namespace prefixes alongside resolved names
pub const NAMESPACE_PREFIXES: &str = "http://xml.org/sax/features/namespace-prefixes";

/// The configurable, reusable engine factory.
///
/// Expensive to set up conceptually, so a [`Parser`] creates it once and
/// reconfigures it at the start of every parse. Asking for a feature the
/// engine does not implement is a fatal configuration error; proceeding
/// would silently weaken the security posture.
#[derive(Clone, Debug, Default)]
pub struct EngineFactory {
    config: EngineConfig,
}

impl EngineFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature by its identifier, honored verbatim
    pub fn set_feature(&mut self, name: &str, value: bool) -> Result<()> {
        match name {
            EXTERNAL_GENERAL_ENTITIES => self.config.external_general_entities = value,
            EXTERNAL_PARAMETER_ENTITIES => self.config.external_parameter_entities = value,
            DISALLOW_DOCTYPE_DECL => self.config.allow_doctype = !value,
            LOAD_EXTERNAL_DTD => self.config.load_external_dtd = value,
            SECURE_PROCESSING => {
                self.config.secure_processing = value;
                let (depth, expansions) = if value {
                    (DEFAULT_MAX_DEPTH, DEFAULT_MAX_ENTITY_EXPANSIONS)
                } else {
                    (0, 0)
                };
                self.config.max_depth = depth;
                self.config.max_entity_expansions = expansions;
            }
            NAMESPACE_PREFIXES => self.config.namespace_prefixes = value,
            _ => {
                return Err(Error::new(
                    ErrorKind::UnsupportedFeature {
                        name: name.to_string(),
                    },
                    Span::empty(),
                ));
            }
        }
        Ok(())
    }

    pub fn set_namespace_aware(&mut self, value: bool) {
        self.config.namespace_aware = value;
    }

    pub fn set_validating(&mut self, value: bool) {
        self.config.validating = value;
    }

    /// Point the factory at an external schema resource
    pub fn set_schema_source(&mut self, resource: &Path) {
        self.config.schema_source = Some(resource.to_path_buf());
    }

    /// Identify the schema language in force
    pub fn set_schema_language(&mut self, language: &str) {
        self.config.schema_language = Some(language.to_string());
    }

    /// Snapshot the current policy for one engine run
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Per-worker parser with security and validation policy
#[derive(Debug, Default)]
pub struct Parser {
    factory: Option<EngineFactory>,
    xxe_processing: bool,
}

impl Parser {
    /// New parser with XXE protection enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicitly allow DOCTYPE declarations and entity processing.
    ///
    /// This weakens the security posture and exists only for trusted
    /// legacy configurations; it is never inferred.
    pub fn set_xxe_processing(&mut self, enabled: bool) {
        self.xxe_processing = enabled;
    }

    pub fn is_xxe_processing(&self) -> bool {
        self.xxe_processing
    }

    /// Begin configuring a single parse against this parser
    pub fn create_parse(&mut self) -> Parse<'_> {
        Parse::new(self)
    }

    /// Reconfigure the cached factory for the current policy and return
    /// the engine configuration for one run.
    ///
    /// Called once at the start of every `execute()`; never while a parse
    /// on this worker is in flight.
    pub(crate) fn configure(&mut self, schema_resource: Option<&Path>) -> Result<EngineConfig> {
        let xxe = self.xxe_processing;
        let factory = self.factory.get_or_insert_with(EngineFactory::new);

        factory.set_feature(EXTERNAL_GENERAL_ENTITIES, xxe)?;
        factory.set_feature(EXTERNAL_PARAMETER_ENTITIES, xxe)?;
        factory.set_feature(DISALLOW_DOCTYPE_DECL, !xxe)?;
        factory.set_feature(LOAD_EXTERNAL_DTD, xxe)?;
        factory.set_feature(SECURE_PROCESSING, !xxe)?;

        match schema_resource {
            Some(resource) => {
                factory.set_namespace_aware(true);
                factory.set_validating(true);
                factory.set_feature(NAMESPACE_PREFIXES, true)?;
                factory.set_schema_language(XML_SCHEMA_NS);
                factory.set_schema_source(resource);
            }
            None => {
                factory.set_namespace_aware(false);
                factory.set_validating(false);
                factory.set_feature(NAMESPACE_PREFIXES, false)?;
            }
        }
        Ok(factory.config().clone())
    }
}
