//! Global configuration settings shared across profiles.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Default log level when neither `--verbose`, `--quiet` nor `RUST_LOG` is given
    #[serde(default)]
    pub log_level: Option<String>,

    /// Log graph walks (trace level) for the folio crates
    #[serde(default)]
    pub trace: bool,

    /// Worker threads for isolated planning and emission (defaults to the CPU count)
    #[serde(default)]
    pub parallel_jobs: Option<usize>,
}
