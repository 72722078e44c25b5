//! Application error type
//!
//! Covers configuration persistence and HTML export. Formatting operations
//! never fail with an error; a missing selection is reported through
//! [`crate::markup::FormatOutcome`] instead.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Result Alias
// ─────────────────────────────────────────────────────────────────────────────

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Export Errors
    // ─────────────────────────────────────────────────────────────────────────
    Io(io::Error),

    /// Writing an exported document failed
    ExportWrite { path: PathBuf, source: io::Error },

    /// The system clipboard refused the content
    Clipboard(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Config file exists but is not valid settings JSON
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    ConfigDirNotFound,
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<arboard::Error> for Error {
    fn from(err: arboard::Error) -> Self {
        Error::Clipboard(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::ExportWrite { path, source } => {
                write!(f, "Failed to export to '{}': {}", path.display(), source)
            }
            Error::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),

            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => write!(f, "Configuration directory not found"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::ExportWrite { source, .. } => Some(source),
            Error::ConfigLoad { source, .. } | Error::ConfigSave { source, .. } => {
                Some(source.as_ref())
            }
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::Clipboard(_) | Error::ConfigDirNotFound => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation
// ─────────────────────────────────────────────────────────────────────────────

pub trait ResultExt<T> {
    /// Log the error as a warning and fall back to `default`.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_io_conversion() {
        let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_serde_json_conversion() {
        let parsed: std::result::Result<u32, _> = serde_json::from_str("nope");
        let err = Error::from(parsed.unwrap_err());
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_export_write_display() {
        let err = Error::ExportWrite {
            path: PathBuf::from("/tmp/out.html"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("out.html"));
        assert!(msg.contains("denied"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_simple_variants_have_no_source() {
        assert!(Error::ConfigDirNotFound.source().is_none());
        assert!(Error::Clipboard("busy".into()).source().is_none());
        assert_eq!(
            Error::ConfigDirNotFound.to_string(),
            "Configuration directory not found"
        );
    }

    #[test]
    fn test_unwrap_or_warn_default() {
        let ok: Result<i32> = Ok(7);
        assert_eq!(ok.unwrap_or_warn_default(0, "ctx"), 7);

        let err: Result<i32> = Err(Error::Clipboard("busy".into()));
        assert_eq!(err.unwrap_or_warn_default(0, "ctx"), 0);
    }
}
