//! Input source abstraction for the parse orchestrator
//!
//! A parse reads from exactly one source. Each variant knows how to open
//! itself into a byte buffer or fail with a source-specific I/O error;
//! no other I/O happens in this crate.

use std::fs;
use std::path::PathBuf;

use tracing::error;

use crate::error::{Error, ErrorKind, Result, Span};

/// A configured input source for a single parse
#[derive(Clone, Debug)]
pub enum Source {
    /// In-memory byte buffer
    Bytes(Vec<u8>),
    /// In-memory string
    Text(String),
    /// Resource path on the local filesystem
    File(PathBuf),
    /// URL; only `file://` URLs are supported, the core performs no
    /// network I/O
    Url(String),
}

impl Source {
    /// Stable label for the source kind, used in configuration errors
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "inputStream",
            Self::Text(_) => "string",
            Self::File(_) => "resource",
            Self::Url(_) => "url",
        }
    }

    /// Default parse name derived from the source kind
    pub fn default_name(&self) -> String {
        match self {
            Self::Bytes(_) => "inputStream".to_string(),
            Self::Text(_) => "string".to_string(),
            Self::File(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }

    /// Open the source and return its bytes
    pub fn open(&self) -> Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes.clone()),
            Self::Text(text) => Ok(text.clone().into_bytes()),
            Self::File(path) => fs::read(path).map_err(|e| {
                error!("failed to read resource {}: {}", path.display(), e);
                Error::with_message(
                    ErrorKind::Io {
                        message: e.to_string(),
                    },
                    Span::empty(),
                    format!("couldn't read resource {}: {e}", path.display()),
                )
            }),
            Self::Url(url) => {
                let Some(path) = url.strip_prefix("file://") else {
                    error!("unsupported url scheme: {url}");
                    return Err(Error::with_message(
                        ErrorKind::Io {
                            message: format!("unsupported url scheme: {url}"),
                        },
                        Span::empty(),
                        format!("unsupported url scheme: {url}"),
                    ));
                };
                fs::read(path).map_err(|e| {
                    error!("failed to read url {url}: {e}");
                    Error::with_message(
                        ErrorKind::Io {
                            message: e.to_string(),
                        },
                        Span::empty(),
                        format!("couldn't read url {url}: {e}"),
                    )
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_source() {
        let source = Source::Bytes(b"<a/>".to_vec());
        assert_eq!(source.kind(), "inputStream");
        assert_eq!(source.default_name(), "inputStream");
        assert_eq!(source.open().unwrap(), b"<a/>");
    }

    #[test]
    fn test_text_source() {
        let source = Source::Text("<a/>".to_string());
        assert_eq!(source.kind(), "string");
        assert_eq!(source.open().unwrap(), b"<a/>");
    }

    #[test]
    fn test_missing_file_fails() {
        let source = Source::File(PathBuf::from("/nonexistent/definitely-not-here.xml"));
        let err = source.open().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Io { .. }));
    }

    #[test]
    fn test_non_file_url_rejected() {
        let source = Source::Url("http://example.com/x.xml".to_string());
        let err = source.open().unwrap_err();
        assert!(err.message().contains("unsupported url scheme"));
    }

    #[test]
    fn test_url_default_name_is_url_text() {
        let source = Source::Url("file:///tmp/x.xml".to_string());
        assert_eq!(source.default_name(), "file:///tmp/x.xml");
    }
}
