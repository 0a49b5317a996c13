use std::path::PathBuf;

use thiserror::Error;

use crate::module_id::{ModuleId, ModuleIdError};

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    InvalidModuleId(#[from] ModuleIdError),

    #[error("entry module '{id}' is not part of the dependency graph")]
    UnknownEntry { id: ModuleId },

    #[error("invalid graph manifest {}: {message}", path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<inline>".to_string()))]
    Manifest {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
