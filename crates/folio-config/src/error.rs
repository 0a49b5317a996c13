//! Error types for configuration loading and page validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::page::PageRef;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration errors.
///
/// Page-level variants always carry the [`PageRef`] of the offending page so the
/// message names it by index and title.
#[derive(Debug, Error)]
pub enum ConfigError {
    // Page descriptor errors
    #[error("{page}: missing required option 'title'")]
    MissingTitle { page: PageRef },

    #[error("{page}: no entry declared and no global 'build.entry' to inherit")]
    MissingEntry { page: PageRef },

    #[error("{page}: entry chunk '{chunk}' lists no modules")]
    EmptyEntry { page: PageRef, chunk: String },

    #[error("{page}: invalid output path '{path}': {reason}")]
    InvalidOutputPath {
        page: PageRef,
        path: String,
        reason: String,
    },

    #[error("output path '{path}' is used by both {first} and {second}")]
    DuplicateOutputPath {
        path: String,
        first: PageRef,
        second: PageRef,
    },

    #[error("entry chunk '{chunk}' is declared by both {first} and {second}")]
    EntryCollision {
        chunk: String,
        first: PageRef,
        second: PageRef,
    },

    #[error("{page}: 'chunks' does not include the page's own entry chunk '{chunk}'")]
    ChunksMissingEntry { page: PageRef, chunk: String },

    #[error("{page}: 'chunks' references unknown chunk '{chunk}'")]
    UnknownChunk { page: PageRef, chunk: String },

    #[error("{page}: 'chunks' lists '{chunk}' more than once")]
    DuplicateChunk { page: PageRef, chunk: String },

    #[error("no pages configured")]
    NoPages,

    // Filesystem validation errors (for CLI use)
    #[error("entry module not found: {}", path.display())]
    EntryNotFound { path: PathBuf },

    #[error("template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    // Config parsing/loading errors
    #[error("config not found")]
    NotFound,

    #[error("invalid config value for '{field}'{}", hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    #[error("invalid profile override: {message}")]
    InvalidProfileOverride { message: String },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Create an InvalidValue error with a hint
    pub fn invalid_value(field: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            hint: Some(hint.into()),
        }
    }
}
