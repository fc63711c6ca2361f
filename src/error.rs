use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::report::Report;

/// The main error type for segui operations.
#[derive(Debug, Error)]
pub enum SeguiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image {path}: {attempts}")]
    Decode {
        path: PathBuf,
        attempts: DecodeAttempts,
    },

    #[error("No counterpart found for {path}: {message}")]
    MissingPair { path: PathBuf, message: String },

    #[error("Invalid shape: {message}")]
    InvalidShape { message: String },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("Failed to parse config YAML from {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse layout JSON from {path}: {source}")]
    LayoutJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write layout JSON to {path}: {source}")]
    LayoutJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse bounds annotation JSON from {path}: {source}")]
    AnnotationJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Indexing finished with {error_count} error(s) and {warning_count} warning(s)")]
    IndexFailed {
        error_count: usize,
        warning_count: usize,
        report: Report,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl SeguiError {
    pub(crate) fn invalid_shape(message: impl Into<String>) -> Self {
        SeguiError::InvalidShape {
            message: message.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        SeguiError::Configuration {
            message: message.into(),
        }
    }
}

/// One failed decode step: which strategy ran and why it gave up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeAttempt {
    pub strategy: &'static str,
    pub message: String,
}

/// The ordered chain of decode failures behind a [`SeguiError::Decode`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeAttempts(pub Vec<DecodeAttempt>);

impl DecodeAttempts {
    pub fn push(&mut self, strategy: &'static str, message: impl Into<String>) {
        self.0.push(DecodeAttempt {
            strategy,
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecodeAttempt> {
        self.0.iter()
    }
}

impl fmt::Display for DecodeAttempts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "no decode strategy applied");
        }
        for (i, attempt) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "[{}] {}: {}", i + 1, attempt.strategy, attempt.message)?;
        }
        Ok(())
    }
}
