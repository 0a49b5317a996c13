//! Error types for plan assembly and page emission.

use folio_config::ConfigError;
use folio_graph::{GraphError, ModuleId, ModuleIdError};

/// Error types for folio-planner operations.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Invalid pages or build options.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failure reported by the dependency graph.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// An entry module id could not be normalised.
    #[error(transparent)]
    ModuleId(#[from] ModuleIdError),

    /// A shared chunk holds a module reachable from fewer than two pages.
    #[error(
        "shared chunk '{chunk}' contains '{module}', which is used by {usage_count} page(s)"
    )]
    ClassificationInvariant {
        chunk: String,
        module: ModuleId,
        usage_count: usize,
    },

    /// A chunk rule is unusable (threshold too low, name clash, ...).
    #[error("invalid chunk rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },

    /// Failure reported by the document emitter, passed through unchanged.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type Result<T> = std::result::Result<T, PlanError>;

/// Error raised by an external collaborator (bundler, template engine, writer).
///
/// Display and `source()` are those of the wrapped error.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct EngineError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl EngineError {
    pub fn new<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self(error.into())
    }

    pub fn msg(message: impl Into<String>) -> Self {
        Self(message.into().into())
    }

    /// The wrapped collaborator error.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }

    /// Attempt to downcast the wrapped error to a concrete type.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }
}

impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        Self::new(error)
    }
}

impl miette::Diagnostic for PlanError {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            PlanError::Config(_) => "INVALID_CONFIG",
            PlanError::Graph(_) | PlanError::ModuleId(_) => "GRAPH_ERROR",
            PlanError::ClassificationInvariant { .. } => "CLASSIFICATION_INVARIANT",
            PlanError::InvalidRule { .. } => "INVALID_CHUNK_RULE",
            PlanError::Engine(_) => "ENGINE_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            PlanError::Config(ConfigError::DuplicateOutputPath { .. }) => Some(Box::new(
                "Give every page its own 'path' so their documents do not overwrite each other.",
            )),
            PlanError::Config(ConfigError::EntryCollision { .. }) => Some(Box::new(
                "Entry chunk names must be unique across pages in shared mode. Rename one of them.",
            )),
            PlanError::Config(ConfigError::ChunksMissingEntry { .. }) => Some(Box::new(
                "A page's 'chunks' list must contain its own entry chunks, or be removed.",
            )),
            PlanError::Config(ConfigError::DuplicateChunk { .. }) => Some(Box::new(
                "Each chunk is loaded once per document; remove the repeated name.",
            )),
            PlanError::Graph(GraphError::UnknownEntry { .. }) => Some(Box::new(
                "Every entry module must be present in the dependency graph.",
            )),
            PlanError::ClassificationInvariant { .. } => Some(Box::new(
                "Modules used by a single page must stay in that page's entry chunk. Check the chunk rules.",
            )),
            PlanError::InvalidRule { .. } => Some(Box::new(
                "Chunk rules need a unique name and a sharing threshold of at least 2 pages.",
            )),
            _ => None,
        }
    }
}
